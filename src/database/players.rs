use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::models::PlayerRow;
use crate::domain::{GroupId, PlayerId};
use crate::errors::{query_context, write_context};

pub fn insert_player(
    conn: &Connection,
    id: PlayerId,
    name: &str,
    current_group_id: Option<GroupId>,
) -> Result<PlayerRow> {
    let sql = "INSERT INTO players (id, name, current_group_id) VALUES (?1, ?2, ?3) RETURNING id, name, current_group_id, created_at";

    conn.query_row(sql, params![id, name, current_group_id], parse_player_row)
        .with_context(|| write_context("player", id))
}

fn parse_player_row(row: &rusqlite::Row) -> rusqlite::Result<PlayerRow> {
    Ok(PlayerRow {
        id: row.get(0)?,
        name: row.get(1)?,
        current_group_id: row.get(2)?,
        created_at: row.get(3)?,
    })
}

pub fn find_by_id(conn: &Connection, id: PlayerId) -> Result<Option<PlayerRow>> {
    let sql = "SELECT id, name, current_group_id, created_at FROM players WHERE id = ?1";

    conn.query_row(sql, params![id], parse_player_row)
        .optional()
        .with_context(|| query_context("player", id))
}

/// Points the player at the group they play in next. `None` means the
/// player is not continuing.
pub fn set_current_group(
    conn: &Connection,
    player_id: PlayerId,
    group_id: Option<GroupId>,
) -> Result<()> {
    let sql = "UPDATE players SET current_group_id = ?1 WHERE id = ?2";

    let updated = conn
        .execute(sql, params![group_id, player_id])
        .with_context(|| write_context("current group of player", player_id))?;

    if updated != 1 {
        anyhow::bail!("Player {} not found", player_id);
    }
    Ok(())
}
