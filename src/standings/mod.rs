pub mod calculator;
pub mod tiebreak;
pub mod types;

pub use calculator::{compute_standings, counted_matches, validate_result};
pub use tiebreak::{HeadToHead, MiniLeague, TieBreaker, resolve};
pub use types::{RankedPlayer, Standing};

use std::collections::HashMap;

use crate::domain::{Match, Player, PlayerId};
use crate::errors::StandingsError;

/// Full ranking of a group: standings, tie-breaks and 1-based positions.
pub fn rank_group(
    players: &[Player],
    matches: &[Match],
) -> Result<Vec<RankedPlayer>, StandingsError> {
    let standings = compute_standings(players, matches)?;
    let wins: HashMap<PlayerId, i32> = standings
        .iter()
        .map(|s| (s.player_id, s.matches_won))
        .collect();

    Ok(resolve(&standings, matches)
        .into_iter()
        .enumerate()
        .map(|(idx, player_id)| RankedPlayer {
            player_id,
            position: idx as i32 + 1,
            matches_won: wins.get(&player_id).copied().unwrap_or_default(),
        })
        .collect())
}
