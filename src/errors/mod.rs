use thiserror::Error;

use crate::domain::{GroupId, MatchId, PlayerId, SeasonId};

/// Integrity violations found while aggregating match results.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StandingsError {
    #[error("match {match_id} references player {player_id} who is not in the group")]
    UnknownPlayer { match_id: MatchId, player_id: PlayerId },

    #[error("match {match_id} has an invalid score {games_won1}-{games_won2}")]
    InvalidScore {
        match_id: MatchId,
        games_won1: i32,
        games_won2: i32,
    },

    #[error("match {match_id} names winner {winner_id} who did not win it")]
    InconsistentWinner { match_id: MatchId, winner_id: PlayerId },

    #[error("match {match_id} pits player {player_id} against themselves")]
    SelfMatch { match_id: MatchId, player_id: PlayerId },
}

#[derive(Debug, Error)]
pub enum ClosureError {
    #[error("no closure exists for season {0}")]
    NotFound(SeasonId),

    #[error("season {0} not found")]
    SeasonNotFound(SeasonId),

    #[error("season {0} has no groups")]
    NoGroups(SeasonId),

    #[error("closure for season {0} is approved and can no longer be edited")]
    AlreadyApproved(SeasonId),

    #[error("player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("player {0} has no entry in the closure")]
    EntryNotFound(PlayerId),

    #[error("player {0} already has an entry in the closure")]
    DuplicateEntry(PlayerId),

    #[error("entry for player {player_id} points to group {group_id}, which no longer exists")]
    MissingGroup { player_id: PlayerId, group_id: GroupId },

    #[error(transparent)]
    Standings(#[from] StandingsError),

    #[error(transparent)]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Context for failed queries
pub fn query_context(what: &str, id: i32) -> String {
    format!("Failed to query {} {}", what, id)
}

/// Context for failed writes
pub fn write_context(what: &str, id: i32) -> String {
    format!("Failed to write {} {}", what, id)
}
