use super::types::{GroupPairings, Pair, Player};

/// Generates the circle-method round-robin rotation for one group.
///
/// Even groups of size k give k-1 rounds, odd groups give k rounds with one
/// player sitting out each round. The first player stays fixed while the rest
/// rotate one position per round.
pub fn generate_pairings(group: &[Player]) -> Vec<Vec<Pair>> {
    // None is the bye slot for odd groups
    let mut slots: Vec<Option<&Player>> = group.iter().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }

    let n = slots.len();
    let half = n / 2;
    let mut rounds = Vec::with_capacity(n.saturating_sub(1));

    for _ in 1..n {
        let (front, back) = slots.split_at(half);
        let pairs: Vec<Pair> = front
            .iter()
            .zip(back.iter().rev())
            .filter_map(|(a, b)| match (a, b) {
                (Some(a), Some(b)) => Some(((*a).clone(), (*b).clone())),
                _ => None,
            })
            .collect();
        rounds.push(pairs);

        // Hold slot 0, move the last slot to position 1
        slots[1..].rotate_right(1);
    }

    rounds
}

/// Runs the rotation for every group, keeping the group index alongside
pub fn pair_groups(groups: &[Vec<Player>]) -> Vec<GroupPairings> {
    groups
        .iter()
        .enumerate()
        .map(|(group_index, players)| GroupPairings {
            group_index,
            players: players.clone(),
            rounds: generate_pairings(players),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn names(list: &[&str]) -> Vec<Player> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn unordered(pair: &Pair) -> (Player, Player) {
        if pair.0 <= pair.1 {
            (pair.0.clone(), pair.1.clone())
        } else {
            (pair.1.clone(), pair.0.clone())
        }
    }

    fn assert_full_cycle(group: &[Player]) {
        let rounds = generate_pairings(group);
        let k = group.len();
        let expected_rounds = if k % 2 == 0 { k - 1 } else { k };
        assert_eq!(rounds.len(), expected_rounds, "group size {}", k);

        let mut seen = HashSet::new();
        for round in &rounds {
            assert_eq!(round.len(), k / 2);
            let mut in_round = HashSet::new();
            for pair in round {
                assert_ne!(pair.0, pair.1);
                assert!(in_round.insert(pair.0.clone()));
                assert!(in_round.insert(pair.1.clone()));
                assert!(seen.insert(unordered(pair)), "pair repeated: {:?}", pair);
            }
        }
        assert_eq!(seen.len(), k * (k - 1) / 2);
    }

    #[test]
    fn test_even_group_first_round() {
        let rounds = generate_pairings(&names(&["A", "B", "C", "D"]));
        assert_eq!(rounds.len(), 3);
        assert_eq!(
            rounds[0],
            vec![
                ("A".to_string(), "D".to_string()),
                ("B".to_string(), "C".to_string()),
            ]
        );
        assert_eq!(
            rounds[1],
            vec![
                ("A".to_string(), "C".to_string()),
                ("D".to_string(), "B".to_string()),
            ]
        );
    }

    #[test]
    fn test_odd_group_has_one_bye_per_round() {
        let group = names(&["A", "B", "C", "D", "E"]);
        let rounds = generate_pairings(&group);
        assert_eq!(rounds.len(), 5);
        for round in &rounds {
            assert_eq!(round.len(), 2);
            let playing: HashSet<&Player> = round.iter().flat_map(|(a, b)| [a, b]).collect();
            let sitting_out = group.iter().filter(|p| !playing.contains(p)).count();
            assert_eq!(sitting_out, 1);
        }
        // the bye starts opposite the fixed slot
        assert_eq!(rounds[0], vec![("B".to_string(), "E".to_string()), ("C".to_string(), "D".to_string())]);
    }

    #[test]
    fn test_every_pair_exactly_once() {
        for k in 2..=9 {
            let group: Vec<Player> = (1..=k).map(|i| format!("P{}", i)).collect();
            assert_full_cycle(&group);
        }
    }

    #[test]
    fn test_degenerate_groups() {
        assert!(generate_pairings(&[]).is_empty());

        let single = generate_pairings(&names(&["Solo"]));
        assert_eq!(single.len(), 1);
        assert!(single[0].is_empty());
    }

    #[test]
    fn test_pair_groups_keeps_index_and_players() {
        let groups = vec![names(&["A", "B"]), names(&["C", "D", "E"])];
        let pairings = pair_groups(&groups);
        assert_eq!(pairings.len(), 2);
        assert_eq!(pairings[1].group_index, 1);
        assert_eq!(pairings[1].players, groups[1]);
        assert_eq!(pairings[0].rounds, vec![vec![("A".to_string(), "B".to_string())]]);
        assert_eq!(pairings[1].rounds.len(), 3);
    }
}
