pub mod types;
pub mod groups;
pub mod round_robin;
pub mod builder;
pub mod rebalance;
pub mod stats;

use std::collections::HashMap;

use log::info;
use serde::Serialize;

use crate::config::TournamentConfig;

pub use types::{Assignment, GroupPairings, Player, Round, Schedule};
pub use groups::{partition_players, shuffle_players};
pub use round_robin::pair_groups;
pub use builder::build_schedule;
pub use rebalance::rebalance_boards;
pub use stats::{compute_games_played, player_assignments, players_off};

/// Everything produced for one scheduling request
#[derive(Debug, Clone, Serialize)]
pub struct TournamentPlan {
    pub config: TournamentConfig,
    pub players: Vec<Player>,
    pub groups: Vec<Vec<Player>>,
    pub pairings: Vec<GroupPairings>,
    pub schedule: Schedule,
    pub games_played: HashMap<Player, u32>,
}

/// Runs the whole pipeline from scratch: shuffle (when seeded), deal into
/// groups, pair, build, rebalance boards and count games.
pub fn plan_tournament(players: &[Player], config: &TournamentConfig) -> TournamentPlan {
    let players = match config.shuffle_seed {
        Some(seed) => shuffle_players(players, seed),
        None => players.to_vec(),
    };

    let groups = partition_players(&players, config.group_count);
    let pairings = pair_groups(&groups);
    let built = build_schedule(&pairings, config.board_count, config.round_count);
    let schedule = rebalance_boards(&built);
    let games_played = compute_games_played(&players, &schedule);

    info!(
        "Planned {} players in {} groups: {} matches over {} rounds",
        players.len(),
        groups.len(),
        schedule.matches().count(),
        schedule.rounds.len()
    );

    TournamentPlan {
        config: config.clone(),
        players,
        groups,
        pairings,
        schedule,
        games_played,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::default_player_names;

    #[test]
    fn test_plan_eight_players() {
        let players = default_player_names(8);
        let plan = plan_tournament(&players, &TournamentConfig::new(2, 3, 6));

        assert_eq!(plan.groups.len(), 2);
        assert_eq!(plan.pairings.len(), 2);
        assert_eq!(plan.schedule.target_games, Some(3));
        assert_eq!(plan.games_played.len(), 8);
        assert!(plan.games_played.values().all(|&g| g == 3));
        let built = build_schedule(&plan.pairings, 3, 6);
        assert!(rebalance::total_conflict(&plan.schedule) <= rebalance::total_conflict(&built));
    }

    #[test]
    fn test_plan_no_players() {
        let plan = plan_tournament(&[], &TournamentConfig::new(2, 3, 4));
        assert_eq!(plan.schedule, Schedule::empty(4));
        assert!(plan.games_played.is_empty());
    }

    #[test]
    fn test_plan_is_repeatable() {
        let players = default_player_names(10);
        let config = TournamentConfig {
            shuffle_seed: Some(99),
            ..TournamentConfig::new(2, 2, 5)
        };
        let first = plan_tournament(&players, &config);
        let second = plan_tournament(&players, &config);
        assert_eq!(first.players, second.players);
        assert_eq!(first.schedule, second.schedule);

        let mut sorted = first.players.clone();
        sorted.sort();
        let mut expected = players.clone();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_plan_serializes() {
        let plan = plan_tournament(&default_player_names(4), &TournamentConfig::new(1, 2, 3));
        let json = serde_json::to_value(&plan).unwrap();
        assert_eq!(json["schedule"]["rounds"].as_array().unwrap().len(), 3);
        assert_eq!(json["config"]["board_count"], 2);
    }
}
