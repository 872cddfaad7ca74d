use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::ScheduleIoError;
use crate::schedule::stats::assignment_in;
use crate::schedule::{Assignment, Player, Schedule};

const HEADER: [&str; 5] = ["Round", "Board", "Group", "Player", "Opponent"];
const OFF: &str = "OFF";

/// One line of the exported table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Round")]
    pub round: u32,
    /// Board number, or "OFF" when the player sits out
    #[serde(rename = "Board")]
    pub board: String,
    /// 1-based group number
    #[serde(rename = "Group")]
    pub group: usize,
    #[serde(rename = "Player")]
    pub player: Player,
    #[serde(rename = "Opponent")]
    pub opponent: String,
}

/// Flattens the schedule into one row per player per round, players listed
/// group by group
pub fn export_rows(groups: &[Vec<Player>], schedule: &Schedule) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for round in &schedule.rounds {
        for (group_index, group) in groups.iter().enumerate() {
            for player in group {
                let (board, opponent) = match assignment_in(round, player) {
                    Assignment::Playing { board, opponent, .. } => (board.to_string(), opponent),
                    Assignment::Off => (OFF.to_string(), String::new()),
                };
                rows.push(ExportRow {
                    round: round.number,
                    board,
                    group: group_index + 1,
                    player: player.clone(),
                    opponent,
                });
            }
        }
    }
    rows
}

/// Renders the schedule as CSV text with a `Round,Board,Group,Player,Opponent` header
pub fn schedule_to_csv(groups: &[Vec<Player>], schedule: &Schedule) -> Result<String, ScheduleIoError> {
    let mut wtr = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    wtr.write_record(HEADER)?;
    for row in export_rows(groups, schedule) {
        wtr.serialize(row)?;
    }

    let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Writes the CSV export to a file
pub fn write_schedule_csv<P: AsRef<Path>>(
    path: P,
    groups: &[Vec<Player>],
    schedule: &Schedule,
) -> Result<(), ScheduleIoError> {
    let text = schedule_to_csv(groups, schedule)?;
    std::fs::write(path, text)?;
    Ok(())
}

/// Counts games per player from exported CSV text (every row not marked OFF)
pub fn games_played_from_csv(text: &str) -> Result<HashMap<Player, u32>, ScheduleIoError> {
    let mut reader = ReaderBuilder::new().from_reader(text.as_bytes());
    let mut games: HashMap<Player, u32> = HashMap::new();

    for result in reader.deserialize() {
        let row: ExportRow = result?;
        let count = games.entry(row.player).or_insert(0);
        if row.board != OFF {
            *count += 1;
        }
    }
    Ok(games)
}
