use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{Season, SeasonId};

pub fn insert_season(conn: &Connection, id: SeasonId, name: &str) -> Result<Season> {
    let sql = "INSERT INTO seasons (id, name) VALUES (?1, ?2) RETURNING id, name";

    conn.query_row(sql, params![id, name], parse_season_row)
        .with_context(|| crate::errors::write_context("season", id))
}

fn parse_season_row(row: &rusqlite::Row) -> rusqlite::Result<Season> {
    Ok(Season {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub fn find_by_id(conn: &Connection, id: SeasonId) -> Result<Option<Season>> {
    let sql = "SELECT id, name FROM seasons WHERE id = ?1";

    conn.query_row(sql, params![id], parse_season_row)
        .optional()
        .with_context(|| crate::errors::query_context("season", id))
}
