use csv::ReaderBuilder;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::ScheduleIoError;
use crate::schedule::Player;

/// Default name for the player at a 1-based position
pub fn default_player_name(position: usize) -> Player {
    format!("Player {}", position)
}

/// "Player 1" through "Player N"
pub fn default_player_names(count: usize) -> Vec<Player> {
    (1..=count).map(default_player_name).collect()
}

/// Cleans up a raw name list into distinct players.
///
/// Names are trimmed and blanks get their positional default. When `count`
/// is given the list is cut or padded with defaults to that length. Repeated
/// names get a " (2)", " (3)" ... suffix so each player stays distinguishable.
pub fn resolve_players(names: &[String], count: Option<usize>) -> Vec<Player> {
    let count = count.unwrap_or(names.len());
    let mut used: HashSet<Player> = HashSet::new();
    let mut players = Vec::with_capacity(count);

    for position in 1..=count {
        let base = names
            .get(position - 1)
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(|n| n.to_string())
            .unwrap_or_else(|| default_player_name(position));

        let mut name = base.clone();
        let mut suffix = 2;
        while used.contains(&name) {
            name = format!("{} ({})", base, suffix);
            suffix += 1;
        }
        used.insert(name.clone());
        players.push(name);
    }

    players
}

/// Reads player names from the first column of CSV data.
/// A leading "name" or "player" header row is skipped.
pub fn read_players<R: Read>(input: R) -> Result<Vec<Player>, ScheduleIoError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let mut names = Vec::new();
    for (row, result) in reader.records().enumerate() {
        let record = result?;
        let name = record.get(0).unwrap_or("");

        if row == 0 && is_header(name) {
            continue;
        }
        if name.is_empty() {
            continue;
        }
        names.push(name.to_string());
    }

    if names.is_empty() {
        return Err(ScheduleIoError::EmptyPlayerList);
    }
    Ok(resolve_players(&names, None))
}

/// Loads players from a CSV or plain text file with one name per line
pub fn load_players<P: AsRef<Path>>(path: P) -> Result<Vec<Player>, ScheduleIoError> {
    let file = std::fs::File::open(path)?;
    read_players(file)
}

fn is_header(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower == "name" || lower == "player" || lower == "players"
}
