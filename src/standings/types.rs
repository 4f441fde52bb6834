use std::cmp::Ordering;

use serde::Serialize;

use crate::domain::PlayerId;

/// A player's record inside one group. Derived from matches, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Standing {
    pub player_id: PlayerId,
    pub player_name: String,
    pub matches_won: i32,
    pub sets_won: i32,
    pub sets_lost: i32,
}

impl Standing {
    pub fn new(player_id: PlayerId, player_name: &str) -> Self {
        Self {
            player_id,
            player_name: player_name.to_string(),
            matches_won: 0,
            sets_won: 0,
            sets_lost: 0,
        }
    }

    pub fn sets_differential(&self) -> i32 {
        self.sets_won - self.sets_lost
    }
}

/// A resolved position in a group, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedPlayer {
    pub player_id: PlayerId,
    pub position: i32,
    pub matches_won: i32,
}

pub fn compare_global_differential(a: &Standing, b: &Standing) -> Ordering {
    b.sets_differential().cmp(&a.sets_differential())
}

/// Case-insensitive name order. Exact case and then id break the remaining
/// ties, so two distinct players never compare equal.
pub fn compare_names(a: &Standing, b: &Standing) -> Ordering {
    a.player_name
        .to_lowercase()
        .cmp(&b.player_name.to_lowercase())
        .then_with(|| a.player_name.cmp(&b.player_name))
        .then_with(|| a.player_id.cmp(&b.player_id))
}
