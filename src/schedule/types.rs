use serde::{Deserialize, Serialize};

/// Players are identified by name only
pub type Player = String;

/// An unordered pairing produced by the round-robin rotation
pub type Pair = (Player, Player);

/// One game on one board in one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub round: u32,
    pub board: u32,
    pub player_a: Player,
    pub player_b: Player,
    pub group_index: usize,
}

impl Match {
    pub fn involves(&self, player: &str) -> bool {
        self.player_a == player || self.player_b == player
    }

    /// Returns the other player of this match, if `player` is playing in it
    pub fn opponent_of(&self, player: &str) -> Option<&Player> {
        if self.player_a == player {
            Some(&self.player_b)
        } else if self.player_b == player {
            Some(&self.player_a)
        } else {
            None
        }
    }
}

/// All matches sharing a round number, ordered by board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub number: u32,
    pub matches: Vec<Match>,
}

impl Round {
    pub fn empty(number: u32) -> Self {
        Round {
            number,
            matches: Vec::new(),
        }
    }
}

/// Full tournament schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub rounds: Vec<Round>,
    /// Games every player plays; `None` marks the all-empty fallback
    pub target_games: Option<u32>,
}

impl Schedule {
    /// Schedule with `round_count` empty rounds and no target
    pub fn empty(round_count: u32) -> Self {
        Schedule {
            rounds: (1..=round_count).map(Round::empty).collect(),
            target_games: None,
        }
    }

    pub fn matches(&self) -> impl Iterator<Item = &Match> {
        self.rounds.iter().flat_map(|r| r.matches.iter())
    }
}

/// Round-robin rotation of a single group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupPairings {
    pub group_index: usize,
    pub players: Vec<Player>,
    pub rounds: Vec<Vec<Pair>>,
}

/// What a player does in a given round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assignment {
    Playing {
        board: u32,
        opponent: Player,
        group_index: usize,
    },
    Off,
}
