use std::cmp::Reverse;
use std::collections::HashSet;

use log::{debug, info, warn};

use super::types::{GroupPairings, Match, Player, Round, Schedule};

/// A possible intra-group match, by index into the flattened player list
#[derive(Debug, Clone, Copy)]
struct Candidate {
    a: usize,
    b: usize,
    group_index: usize,
}

/// Result of one greedy pass at a fixed per-player target
struct BuildAttempt {
    rounds: Vec<Round>,
    games_played: Vec<u32>,
}

impl BuildAttempt {
    fn is_equalized(&self, target: u32) -> bool {
        !self.games_played.is_empty() && self.games_played.iter().all(|&g| g == target)
    }
}

/// Builds a schedule where every player plays the same number of games.
///
/// Starts at the highest target allowed by boards, rounds and group sizes and
/// lowers it until a greedy pass reaches it for every player. If nothing works
/// (only possible without players) the result is `round_count` empty rounds.
/// Counts of zero are treated as 1.
///
/// The equalized count is not a promise that each group completes its full
/// round-robin: short tournaments settle for a lower target instead.
pub fn build_schedule(pairings: &[GroupPairings], board_count: u32, round_count: u32) -> Schedule {
    let board_count = board_count.max(1);
    let round_count = round_count.max(1);

    let players: Vec<&Player> = pairings.iter().flat_map(|g| g.players.iter()).collect();
    if players.is_empty() {
        debug!("No players to schedule, returning {} empty rounds", round_count);
        return Schedule::empty(round_count);
    }

    let candidates = candidate_matches(pairings);
    let cap = target_cap(pairings, board_count, round_count);
    debug!(
        "{} players, {} candidate matches, target cap {}",
        players.len(),
        candidates.len(),
        cap
    );

    for target in (0..=cap).rev() {
        let attempt = try_build(&players, &candidates, board_count, round_count, target);
        if attempt.is_equalized(target) {
            info!("Scheduled {} games per player over {} rounds", target, round_count);
            return Schedule {
                rounds: attempt.rounds,
                target_games: Some(target),
            };
        }
        debug!("Target of {} games per player not reachable, lowering", target);
    }

    warn!("No equalized schedule found, falling back to empty rounds");
    Schedule::empty(round_count)
}

/// Highest per-player game count worth trying: the smallest of the board
/// capacity share, the number of rounds and the smallest opponent pool.
pub fn target_cap(pairings: &[GroupPairings], board_count: u32, round_count: u32) -> u32 {
    let total_players: usize = pairings.iter().map(|g| g.players.len()).sum();
    if total_players == 0 {
        return 0;
    }

    let slots = u64::from(board_count) * u64::from(round_count) * 2;
    let board_cap = u32::try_from(slots / total_players as u64).unwrap_or(u32::MAX);

    let opponent_cap = pairings
        .iter()
        .filter(|g| !g.players.is_empty())
        .map(|g| (g.players.len() - 1) as u32)
        .min()
        .unwrap_or(0);

    board_cap.min(round_count).min(opponent_cap)
}

/// Every pairing inside each group, in group then position order
fn candidate_matches(pairings: &[GroupPairings]) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    let mut offset = 0;
    for group in pairings {
        let size = group.players.len();
        for i in 0..size {
            for j in (i + 1)..size {
                candidates.push(Candidate {
                    a: offset + i,
                    b: offset + j,
                    group_index: group.group_index,
                });
            }
        }
        offset += size;
    }
    candidates
}

fn try_build(
    players: &[&Player],
    candidates: &[Candidate],
    board_count: u32,
    round_count: u32,
    target: u32,
) -> BuildAttempt {
    let mut games_played = vec![0u32; players.len()];
    // round number each player last played in, 0 = not yet
    let mut last_played = vec![0u32; players.len()];
    let mut used_pairs: HashSet<(usize, usize)> = HashSet::new();
    let mut rounds = Vec::with_capacity(round_count as usize);

    for round in 1..=round_count {
        let sat_out = |p: usize| last_played[p] + 1 < round;
        let need = |p: usize| target - games_played[p];

        let mut ranked: Vec<&Candidate> = candidates
            .iter()
            .filter(|c| {
                !used_pairs.contains(&(c.a, c.b))
                    && games_played[c.a] < target
                    && games_played[c.b] < target
            })
            .collect();

        // stable, so generation order breaks the remaining ties
        ranked.sort_by_key(|c| {
            let bye_score = u8::from(sat_out(c.a)) + u8::from(sat_out(c.b));
            let (need_a, need_b) = (need(c.a), need(c.b));
            Reverse((bye_score, need_a + need_b, need_a.max(need_b)))
        });

        let mut busy = vec![false; players.len()];
        let mut selected: Vec<&Candidate> = Vec::new();
        for candidate in ranked {
            if selected.len() >= board_count as usize {
                break;
            }
            if busy[candidate.a] || busy[candidate.b] {
                continue;
            }
            busy[candidate.a] = true;
            busy[candidate.b] = true;
            selected.push(candidate);
        }

        let mut matches = Vec::with_capacity(selected.len());
        for (slot, candidate) in selected.into_iter().enumerate() {
            used_pairs.insert((candidate.a, candidate.b));
            for p in [candidate.a, candidate.b] {
                games_played[p] += 1;
                last_played[p] = round;
            }
            matches.push(Match {
                round,
                board: slot as u32 + 1,
                player_a: players[candidate.a].clone(),
                player_b: players[candidate.b].clone(),
                group_index: candidate.group_index,
            });
        }

        rounds.push(Round {
            number: round,
            matches,
        });
    }

    BuildAttempt {
        rounds,
        games_played,
    }
}
