use serde::{Deserialize, Serialize};

pub type PlayerId = i32;
pub type GroupId = i32;
pub type SeasonId = i32;
pub type MatchId = i32;

/// Games a player needs to take a match (best of five).
pub const GAMES_TO_WIN: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
}

/// A tier of a season. Tier 1 is the strongest group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub season_id: SeasonId,
    pub name: String,
    pub tier: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Played,
    Injury,
    Cancelled,
}

impl MatchStatus {
    pub fn as_str(&self) -> &str {
        match self {
            MatchStatus::Played => "PLAYED",
            MatchStatus::Injury => "INJURY",
            MatchStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PLAYED" => Some(MatchStatus::Played),
            "INJURY" => Some(MatchStatus::Injury),
            "CANCELLED" => Some(MatchStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub group_id: GroupId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    pub games_won1: Option<i32>,
    pub games_won2: Option<i32>,
    pub status: MatchStatus,
    pub winner_id: Option<PlayerId>,
}

impl Match {
    /// Both game counts, when the match was played and scored.
    pub fn score(&self) -> Option<(i32, i32)> {
        if self.status != MatchStatus::Played {
            return None;
        }
        self.games_won1.zip(self.games_won2)
    }

    pub fn counts_for_standings(&self) -> bool {
        self.score().is_some()
    }

    pub fn is_between(&self, a: PlayerId, b: PlayerId) -> bool {
        (self.player1_id == a && self.player2_id == b)
            || (self.player1_id == b && self.player2_id == a)
    }

    /// Sets won and lost from `player_id`'s side, if they took part.
    pub fn sets_for(&self, player_id: PlayerId) -> Option<(i32, i32)> {
        let (games1, games2) = self.score()?;
        if self.player1_id == player_id {
            Some((games1, games2))
        } else if self.player2_id == player_id {
            Some((games2, games1))
        } else {
            None
        }
    }

    /// The side that reached the winning game count, if exactly one did.
    pub fn decided_winner(&self) -> Option<PlayerId> {
        match self.score()? {
            (GAMES_TO_WIN, other) if other < GAMES_TO_WIN => Some(self.player1_id),
            (other, GAMES_TO_WIN) if other < GAMES_TO_WIN => Some(self.player2_id),
            _ => None,
        }
    }
}
