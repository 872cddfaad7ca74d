use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper limits on counts from the environment, CLI flags and web requests
pub const MAX_PLAYERS: u32 = 256;
pub const MAX_GROUPS: u32 = 64;
pub const MAX_BOARDS: u32 = 128;
pub const MAX_ROUNDS: u32 = 100;

/// Settings for one scheduling request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub group_count: u32,
    pub board_count: u32,
    pub round_count: u32,
    /// Shuffle players with this seed before dealing them into groups
    pub shuffle_seed: Option<u64>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            group_count: 2,
            board_count: 3,
            round_count: 6,
            shuffle_seed: None,
        }
    }
}

impl TournamentConfig {
    pub fn new(group_count: u32, board_count: u32, round_count: u32) -> Self {
        Self {
            group_count,
            board_count,
            round_count,
            shuffle_seed: None,
        }
        .clamped()
    }

    /// Brings every count into `1..=MAX_*`
    pub fn clamped(self) -> Self {
        Self {
            group_count: self.group_count.clamp(1, MAX_GROUPS),
            board_count: self.board_count.clamp(1, MAX_BOARDS),
            round_count: self.round_count.clamp(1, MAX_ROUNDS),
            shuffle_seed: self.shuffle_seed,
        }
    }

    /// Defaults overridden by SCHEDULER_GROUPS, SCHEDULER_BOARDS,
    /// SCHEDULER_ROUNDS and SCHEDULER_SEED when they are set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let var = |name: &str| std::env::var(name).ok();

        if let Some(v) = var("SCHEDULER_GROUPS") {
            config.group_count = coerce_count_str(&v);
        }
        if let Some(v) = var("SCHEDULER_BOARDS") {
            config.board_count = coerce_count_str(&v);
        }
        if let Some(v) = var("SCHEDULER_ROUNDS") {
            config.round_count = coerce_count_str(&v);
        }
        if let Some(v) = var("SCHEDULER_SEED") {
            config.shuffle_seed = v.trim().parse().ok();
        }
        config.clamped()
    }
}

/// Turns any user-supplied count into a positive integer.
///
/// Numbers are floored, numeric strings are parsed, and anything below 1,
/// non-numeric or missing becomes 1.
pub fn coerce_count(value: &Value) -> u32 {
    match value {
        Value::Number(n) => n.as_f64().map(coerce_float).unwrap_or(1),
        Value::String(s) => coerce_count_str(s),
        _ => 1,
    }
}

pub fn coerce_count_str(value: &str) -> u32 {
    value.trim().parse::<f64>().map(coerce_float).unwrap_or(1)
}

fn coerce_float(value: f64) -> u32 {
    if !value.is_finite() || value < 1.0 {
        return 1;
    }
    value.floor().min(u32::MAX as f64) as u32
}

/// Reads a shuffle seed. Non-negative numbers are floored and numeric strings
/// parsed; negative, non-finite or non-numeric input means no seed.
pub fn coerce_seed(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(seed_from_float)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(seed_from_float))
        }
        _ => None,
    }
}

fn seed_from_float(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.floor() as u64)
}
