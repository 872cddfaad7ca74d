use std::fs::File;
use std::io::Write;

use chrono::Local;

use crate::schedule::{players_off, Round, TournamentPlan};

/// Formats a match line as "Board N: A vs B (Group G)"
fn format_round_lines(round: &Round) -> Vec<String> {
    round
        .matches
        .iter()
        .map(|m| {
            format!(
                "Board {}: {} vs {} (Group {})",
                m.board,
                m.player_a,
                m.player_b,
                m.group_index + 1
            )
        })
        .collect()
}

/// Writes the plan as plain text, round by round, then the games table
pub fn write_plan<W: Write>(out: &mut W, plan: &TournamentPlan) -> std::io::Result<()> {
    match plan.schedule.target_games {
        Some(target) => writeln!(out, "Games per player: {}", target)?,
        None => writeln!(out, "No balanced schedule possible with these settings")?,
    }

    for round in &plan.schedule.rounds {
        writeln!(out, "\n** Round {} **", round.number)?;
        for line in format_round_lines(round) {
            writeln!(out, "  {}", line)?;
        }
        let off = players_off(&plan.players, round);
        if !off.is_empty() {
            let names: Vec<&str> = off.iter().map(|p| p.as_str()).collect();
            writeln!(out, "  OFF: {}", names.join(", "))?;
        }
    }

    writeln!(out, "\nGames played:")?;
    for player in &plan.players {
        let games = plan.games_played.get(player).copied().unwrap_or(0);
        writeln!(out, "  {}: {}", player, games)?;
    }
    Ok(())
}

/// Prints the plan to stdout
pub fn print_plan(plan: &TournamentPlan) {
    println!("\n=== Tournament Schedule ===");
    println!(
        "{} players, {} groups, {} boards, {} rounds",
        plan.players.len(),
        plan.groups.len(),
        plan.config.board_count,
        plan.config.round_count
    );
    for (i, group) in plan.groups.iter().enumerate() {
        println!("Group {}: {}", i + 1, group.join(", "));
    }

    let mut buffer = Vec::new();
    if write_plan(&mut buffer, plan).is_ok() {
        print!("{}", String::from_utf8_lossy(&buffer));
    }
}

/// Writes the plan to a text file with a generation timestamp header
pub fn write_schedule_to_file(plan: &TournamentPlan, filename: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::create(filename)?;
    writeln!(file, "** Tournament Schedule **")?;
    writeln!(file, "Generated {}", Local::now().format("%Y-%m-%d %H:%M"))?;
    write_plan(&mut file, plan)?;
    Ok(())
}
