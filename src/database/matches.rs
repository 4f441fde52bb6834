use anyhow::{Context, Result};
use rusqlite::{Connection, params};

use crate::domain::{GroupId, Match, MatchStatus, PlayerId};
use crate::errors::query_context;

#[allow(clippy::too_many_arguments)]
pub fn insert_match(
    conn: &Connection,
    group_id: GroupId,
    player1_id: PlayerId,
    player2_id: PlayerId,
    games_won1: Option<i32>,
    games_won2: Option<i32>,
    status: MatchStatus,
    winner_id: Option<PlayerId>,
) -> Result<Match> {
    let sql = "INSERT INTO matches (group_id, player1_id, player2_id, games_won1, games_won2, status, winner_id) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) RETURNING id, group_id, player1_id, player2_id, games_won1, games_won2, status, winner_id";

    conn.query_row(
        sql,
        params![
            group_id,
            player1_id,
            player2_id,
            games_won1,
            games_won2,
            status,
            winner_id
        ],
        parse_match_row,
    )
    .context("Failed to insert match")
}

fn parse_match_row(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        group_id: row.get(1)?,
        player1_id: row.get(2)?,
        player2_id: row.get(3)?,
        games_won1: row.get(4)?,
        games_won2: row.get(5)?,
        status: row.get(6)?,
        winner_id: row.get(7)?,
    })
}

pub fn list_by_group(conn: &Connection, group_id: GroupId) -> Result<Vec<Match>> {
    let sql = "SELECT id, group_id, player1_id, player2_id, games_won1, games_won2, status, winner_id FROM matches WHERE group_id = ?1 ORDER BY id";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![group_id], parse_match_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("matches of group", group_id))?;

    Ok(rows)
}
