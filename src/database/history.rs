use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use super::models::HistoryRow;
use crate::closure::MovementType;
use crate::domain::{GroupId, PlayerId, SeasonId};
use crate::errors::{query_context, write_context};

pub fn insert_entry(
    conn: &Connection,
    player_id: PlayerId,
    season_id: SeasonId,
    group_id: GroupId,
    final_rank: Option<i32>,
    movement_type: MovementType,
) -> Result<()> {
    let sql = "INSERT INTO player_group_history (player_id, season_id, group_id, final_rank, movement_type) VALUES (?1, ?2, ?3, ?4, ?5)";

    conn.execute(
        sql,
        params![player_id, season_id, group_id, final_rank, movement_type],
    )
    .with_context(|| write_context("history of player", player_id))
    .map(|_| ())
}

fn parse_history_row(row: &rusqlite::Row) -> rusqlite::Result<HistoryRow> {
    Ok(HistoryRow {
        id: row.get(0)?,
        player_id: row.get(1)?,
        season_id: row.get(2)?,
        season_name: row.get(3)?,
        group_id: row.get(4)?,
        group_name: row.get(5)?,
        final_rank: row.get(6)?,
        movement_type: row.get(7)?,
        recorded_at: row.get(8)?,
    })
}

/// A player's movement timeline, oldest season first.
pub fn list_by_player(conn: &Connection, player_id: PlayerId) -> Result<Vec<HistoryRow>> {
    let sql = "
        SELECT h.id, h.player_id, h.season_id, s.name, h.group_id, g.name, h.final_rank, h.movement_type, h.recorded_at
        FROM player_group_history h
        JOIN seasons s ON s.id = h.season_id
        JOIN league_groups g ON g.id = h.group_id
        WHERE h.player_id = ?1
        ORDER BY h.season_id ASC
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![player_id], parse_history_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("history of player", player_id))?;

    Ok(rows)
}
