use std::collections::HashMap;

use super::types::{Assignment, Player, Round, Schedule};

/// Counts the rounds each player has a game in.
/// Every listed player gets an entry, including those who never play.
pub fn compute_games_played(players: &[Player], schedule: &Schedule) -> HashMap<Player, u32> {
    let mut games: HashMap<Player, u32> = players.iter().map(|p| (p.clone(), 0)).collect();
    for round in &schedule.rounds {
        for player in players {
            if round.matches.iter().any(|m| m.involves(player)) {
                if let Some(count) = games.get_mut(player) {
                    *count += 1;
                }
            }
        }
    }
    games
}

/// What a single player does in one round
pub fn assignment_in(round: &Round, player: &str) -> Assignment {
    round
        .matches
        .iter()
        .find_map(|m| {
            m.opponent_of(player).map(|opponent| Assignment::Playing {
                board: m.board,
                opponent: opponent.clone(),
                group_index: m.group_index,
            })
        })
        .unwrap_or(Assignment::Off)
}

/// Per round, one assignment for every player in input order
pub fn player_assignments(players: &[Player], schedule: &Schedule) -> Vec<Vec<(Player, Assignment)>> {
    schedule
        .rounds
        .iter()
        .map(|round| {
            players
                .iter()
                .map(|p| (p.clone(), assignment_in(round, p)))
                .collect()
        })
        .collect()
}

/// Players without a game in this round
pub fn players_off<'a>(players: &'a [Player], round: &Round) -> Vec<&'a Player> {
    players
        .iter()
        .filter(|p| !round.matches.iter().any(|m| m.involves(p)))
        .collect()
}
