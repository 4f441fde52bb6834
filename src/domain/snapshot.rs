use serde::{Deserialize, Serialize};

use super::models::{GroupId, MatchStatus, PlayerId, SeasonId};

/// League data exported by the match-management side, loaded by `import`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueSnapshot {
    #[serde(default)]
    pub seasons: Vec<SeasonRecord>,
    #[serde(default)]
    pub groups: Vec<GroupRecord>,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
    #[serde(default)]
    pub memberships: Vec<MembershipRecord>,
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonRecord {
    pub id: SeasonId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub id: GroupId,
    pub season_id: SeasonId,
    pub name: String,
    pub tier: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub current_group_id: Option<GroupId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRecord {
    pub group_id: GroupId,
    pub player_id: PlayerId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub group_id: GroupId,
    pub player1_id: PlayerId,
    pub player2_id: PlayerId,
    #[serde(default)]
    pub games_won1: Option<i32>,
    #[serde(default)]
    pub games_won2: Option<i32>,
    pub status: MatchStatus,
    #[serde(default)]
    pub winner_id: Option<PlayerId>,
}
