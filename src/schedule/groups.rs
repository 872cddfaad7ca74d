use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::types::Player;

/// Deals players into groups like cards: player i goes to group i mod n.
/// A group count of zero is treated as 1.
pub fn partition_players(players: &[Player], group_count: u32) -> Vec<Vec<Player>> {
    let group_count = group_count.max(1) as usize;
    let mut groups = vec![Vec::new(); group_count];
    for (i, player) in players.iter().enumerate() {
        groups[i % group_count].push(player.clone());
    }
    groups
}

/// Reorders players with a seeded shuffle, so the same seed gives the same draw
pub fn shuffle_players(players: &[Player], seed: u64) -> Vec<Player> {
    let mut shuffled = players.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);
    shuffled
}
