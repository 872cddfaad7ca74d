use std::collections::HashMap;

use log::debug;

use super::types::{Match, Player, Schedule};

/// Upper bound on improvement passes per round
const MAX_PASSES: u32 = 10;

/// Board each player used the last time they played
type LastBoards<'a> = HashMap<&'a Player, u32>;

fn conflict_score(m: &Match, last_boards: &LastBoards) -> u32 {
    [&m.player_a, &m.player_b]
        .into_iter()
        .filter(|p| last_boards.get(*p) == Some(&m.board))
        .count() as u32
}

fn record_boards<'a>(matches: &'a [Match], last_boards: &mut LastBoards<'a>) {
    for m in matches {
        last_boards.insert(&m.player_a, m.board);
        last_boards.insert(&m.player_b, m.board);
    }
}

/// Number of times a player lands on the same board as in their previous game
pub fn total_conflict(schedule: &Schedule) -> u32 {
    let mut last_boards = LastBoards::new();
    let mut total = 0;
    for round in &schedule.rounds {
        total += round
            .matches
            .iter()
            .map(|m| conflict_score(m, &last_boards))
            .sum::<u32>();
        record_boards(&round.matches, &mut last_boards);
    }
    total
}

/// Swaps board numbers inside each round so players move between boards.
///
/// Pairings and round membership are untouched, only `board` labels change.
/// Each round gets at most ten hill-climbing passes over all match pairs. If
/// the reshuffled boards push more repeats into later rounds than were there
/// to begin with, the input boards are kept.
pub fn rebalance_boards(schedule: &Schedule) -> Schedule {
    let mut rebalanced = schedule.clone();
    let mut last_boards = LastBoards::new();

    for (original, round) in schedule.rounds.iter().zip(rebalanced.rounds.iter_mut()) {
        let passes = settle_round(&mut round.matches, &last_boards, MAX_PASSES);
        debug!("Round {} settled after {} passes", round.number, passes);

        // keyed by the input's names, the working copy stays mutable
        for (m, settled) in original.matches.iter().zip(round.matches.iter()) {
            last_boards.insert(&m.player_a, settled.board);
            last_boards.insert(&m.player_b, settled.board);
        }
        round.matches.sort_by_key(|m| m.board);
    }

    let before = total_conflict(schedule);
    let after = total_conflict(&rebalanced);
    debug!("Board repeats: {} before rebalancing, {} after", before, after);
    if after > before {
        return schedule.clone();
    }
    rebalanced
}

/// Hill-climbs one round's board labels and returns the number of passes run
fn settle_round(matches: &mut [Match], last_boards: &LastBoards, max_passes: u32) -> u32 {
    let mut passes = 0;
    while passes < max_passes {
        passes += 1;
        let mut improved = false;

        for i in 0..matches.len() {
            for j in (i + 1)..matches.len() {
                let before = conflict_score(&matches[i], last_boards)
                    + conflict_score(&matches[j], last_boards);
                swap_boards(matches, i, j);
                let after = conflict_score(&matches[i], last_boards)
                    + conflict_score(&matches[j], last_boards);

                if after < before {
                    improved = true;
                } else {
                    swap_boards(matches, i, j);
                }
            }
        }

        if !improved {
            break;
        }
    }
    passes
}

fn swap_boards(matches: &mut [Match], i: usize, j: usize) {
    let board = matches[i].board;
    matches[i].board = matches[j].board;
    matches[j].board = board;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::builder::build_schedule;
    use crate::schedule::groups::partition_players;
    use crate::schedule::round_robin::pair_groups;
    use crate::schedule::types::Round;

    fn game(round: u32, board: u32, a: &str, b: &str) -> Match {
        Match {
            round,
            board,
            player_a: a.to_string(),
            player_b: b.to_string(),
            group_index: 0,
        }
    }

    fn schedule_of(rounds: Vec<Vec<Match>>) -> Schedule {
        Schedule {
            rounds: rounds
                .into_iter()
                .enumerate()
                .map(|(i, matches)| Round {
                    number: i as u32 + 1,
                    matches,
                })
                .collect(),
            target_games: None,
        }
    }

    fn pairs_by_round(schedule: &Schedule) -> Vec<Vec<(Player, Player)>> {
        schedule
            .rounds
            .iter()
            .map(|r| {
                let mut pairs: Vec<(Player, Player)> = r
                    .matches
                    .iter()
                    .map(|m| (m.player_a.clone(), m.player_b.clone()))
                    .collect();
                pairs.sort();
                pairs
            })
            .collect()
    }

    #[test]
    fn test_swaps_away_repeats() {
        let schedule = schedule_of(vec![
            vec![game(1, 1, "A", "B"), game(1, 2, "C", "D")],
            vec![game(2, 1, "A", "E"), game(2, 2, "C", "F")],
        ]);
        assert_eq!(total_conflict(&schedule), 2);

        let rebalanced = rebalance_boards(&schedule);
        assert_eq!(total_conflict(&rebalanced), 0);
        assert_eq!(
            rebalanced.rounds[1].matches,
            vec![game(2, 1, "C", "F"), game(2, 2, "A", "E")]
        );
        // first round has no history to conflict with
        assert_eq!(rebalanced.rounds[0], schedule.rounds[0]);
    }

    #[test]
    fn test_sitting_out_keeps_last_board() {
        let schedule = schedule_of(vec![
            vec![game(1, 1, "A", "B"), game(1, 2, "C", "D")],
            vec![game(2, 1, "C", "E")],
            vec![game(3, 1, "A", "C"), game(3, 2, "B", "D")],
        ]);
        // A, B and D sit out round 2 and their round 1 boards still count
        assert_eq!(total_conflict(&schedule), 3);
    }

    #[test]
    fn test_no_improvement_leaves_boards() {
        let schedule = schedule_of(vec![
            vec![game(1, 1, "A", "B"), game(1, 2, "C", "D")],
            vec![game(2, 1, "A", "C"), game(2, 2, "B", "D")],
        ]);
        // either labelling repeats twice
        assert_eq!(total_conflict(&schedule), 2);
        assert_eq!(rebalance_boards(&schedule), schedule);
    }

    #[test]
    fn test_pairings_untouched_and_score_not_worse() {
        for (count, groups, boards, rounds) in [(8, 2, 3, 6), (12, 2, 4, 8), (10, 1, 5, 9), (9, 3, 3, 7)] {
            let players: Vec<Player> = (1..=count).map(|i| format!("P{}", i)).collect();
            let pairings = pair_groups(&partition_players(&players, groups));
            let schedule = build_schedule(&pairings, boards, rounds);
            let rebalanced = rebalance_boards(&schedule);

            assert_eq!(pairs_by_round(&schedule), pairs_by_round(&rebalanced));
            assert!(total_conflict(&rebalanced) <= total_conflict(&schedule));
            assert_eq!(rebalanced.target_games, schedule.target_games);

            for round in &rebalanced.rounds {
                let boards_used: Vec<u32> = round.matches.iter().map(|m| m.board).collect();
                let expected: Vec<u32> = (1..=round.matches.len() as u32).collect();
                assert_eq!(boards_used, expected);
            }
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let schedule = schedule_of(vec![
            vec![game(1, 1, "A", "B"), game(1, 2, "C", "D")],
            vec![game(2, 1, "A", "E"), game(2, 2, "C", "F")],
        ]);
        let copy = schedule.clone();
        let _ = rebalance_boards(&schedule);
        assert_eq!(schedule, copy);
    }

    #[test]
    fn test_settle_round_stops_early() {
        let mut matches = vec![game(1, 1, "A", "B"), game(1, 2, "C", "D")];
        let last_boards = LastBoards::new();
        assert_eq!(settle_round(&mut matches, &last_boards, MAX_PASSES), 1);
    }

    fn three_pass_round() -> (Vec<Match>, Vec<Player>) {
        let matches = vec![game(2, 1, "A", "B"), game(2, 2, "C", "D"), game(2, 3, "E", "F")];
        let names = ["A", "B", "C", "D", "E", "F"].iter().map(|p| p.to_string()).collect();
        (matches, names)
    }

    fn previous_boards(names: &[Player]) -> LastBoards<'_> {
        names.iter().zip([3, 3, 2, 1, 3, 2]).collect()
    }

    fn boards_of(matches: &[Match]) -> Vec<u32> {
        matches.iter().map(|m| m.board).collect()
    }

    #[test]
    fn test_settle_round_converges_over_several_passes() {
        let (mut matches, names) = three_pass_round();
        let last_boards = previous_boards(&names);
        // pass 1 swaps C-D with E-F, pass 2 swaps A-B with E-F, pass 3 finds nothing
        assert_eq!(settle_round(&mut matches, &last_boards, MAX_PASSES), 3);
        assert_eq!(boards_of(&matches), vec![2, 3, 1]);
        let remaining: u32 = matches.iter().map(|m| conflict_score(m, &last_boards)).sum();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_settle_round_respects_pass_limit() {
        let (mut matches, names) = three_pass_round();
        let last_boards = previous_boards(&names);
        assert_eq!(settle_round(&mut matches, &last_boards, 1), 1);
        // stopped after the first improving pass
        assert_eq!(boards_of(&matches), vec![1, 3, 2]);
    }
}
