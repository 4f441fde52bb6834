use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::closure::{ClosureStatus, MovementType};
use crate::domain::{GroupId, MatchStatus, PlayerId, SeasonId};

#[derive(Debug, Clone)]
pub struct PlayerRow {
    pub id: PlayerId,
    pub name: String,
    pub current_group_id: Option<GroupId>,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone)]
pub struct GroupPlayerRow {
    pub group_id: GroupId,
    pub player_id: PlayerId,
    pub player_name: String,
    pub ranking_position: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct ClosureRow {
    pub id: i32,
    pub season_id: SeasonId,
    pub status: ClosureStatus,
    pub created_at: Option<NaiveDateTime>,
    pub approved_at: Option<NaiveDateTime>,
}

// DTO for the movement timeline
#[derive(Debug, Clone)]
pub struct HistoryRow {
    pub id: i32,
    pub player_id: PlayerId,
    pub season_id: SeasonId,
    pub season_name: String,
    pub group_id: GroupId,
    pub group_name: String,
    pub final_rank: Option<i32>,
    pub movement_type: MovementType,
    pub recorded_at: Option<NaiveDateTime>,
}

fn unknown_value(kind: &str, value: &str) -> FromSqlError {
    FromSqlError::Other(format!("Unknown {} '{}'", kind, value).into())
}

impl FromSql for MovementType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        MovementType::parse(s).ok_or_else(|| unknown_value("movement type", s))
    }
}

impl ToSql for MovementType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for ClosureStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        ClosureStatus::parse(s).ok_or_else(|| unknown_value("closure status", s))
    }
}

impl ToSql for ClosureStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for MatchStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        MatchStatus::parse(s).ok_or_else(|| unknown_value("match status", s))
    }
}

impl ToSql for MatchStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}
