use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};

use super::models::GroupPlayerRow;
use crate::domain::{Group, GroupId, Player, PlayerId, SeasonId};
use crate::errors::{query_context, write_context};
use crate::standings::RankedPlayer;

pub fn insert_group(
    conn: &Connection,
    id: GroupId,
    season_id: SeasonId,
    name: &str,
    tier: i32,
) -> Result<Group> {
    let sql = "INSERT INTO league_groups (id, season_id, name, tier) VALUES (?1, ?2, ?3, ?4) RETURNING id, season_id, name, tier";

    conn.query_row(sql, params![id, season_id, name, tier], parse_group_row)
        .with_context(|| write_context("group", id))
}

fn parse_group_row(row: &rusqlite::Row) -> rusqlite::Result<Group> {
    Ok(Group {
        id: row.get(0)?,
        season_id: row.get(1)?,
        name: row.get(2)?,
        tier: row.get(3)?,
    })
}

pub fn find_by_id(conn: &Connection, id: GroupId) -> Result<Option<Group>> {
    let sql = "SELECT id, season_id, name, tier FROM league_groups WHERE id = ?1";

    conn.query_row(sql, params![id], parse_group_row)
        .optional()
        .with_context(|| query_context("group", id))
}

/// Groups of a season from the top tier down.
pub fn list_by_season(conn: &Connection, season_id: SeasonId) -> Result<Vec<Group>> {
    let sql = "SELECT id, season_id, name, tier FROM league_groups WHERE season_id = ?1 ORDER BY tier ASC, name ASC";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![season_id], parse_group_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("groups of season", season_id))?;

    Ok(rows)
}

pub fn add_member(conn: &Connection, group_id: GroupId, player_id: PlayerId) -> Result<()> {
    let sql = "INSERT OR IGNORE INTO group_players (group_id, player_id) VALUES (?1, ?2)";

    conn.execute(sql, params![group_id, player_id])
        .with_context(|| write_context("membership in group", group_id))
        .map(|_| ())
}

fn parse_member_row(row: &rusqlite::Row) -> rusqlite::Result<GroupPlayerRow> {
    Ok(GroupPlayerRow {
        group_id: row.get(0)?,
        player_id: row.get(1)?,
        player_name: row.get(2)?,
        ranking_position: row.get(3)?,
    })
}

/// Members in ranking order; unranked members come last, by name.
pub fn list_members(conn: &Connection, group_id: GroupId) -> Result<Vec<GroupPlayerRow>> {
    let sql = "
        SELECT gp.group_id, gp.player_id, p.name, gp.ranking_position
        FROM group_players gp
        JOIN players p ON p.id = gp.player_id
        WHERE gp.group_id = ?1
        ORDER BY gp.ranking_position IS NULL, gp.ranking_position, p.name
    ";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![group_id], parse_member_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("members of group", group_id))?;

    Ok(rows)
}

pub fn list_players(conn: &Connection, group_id: GroupId) -> Result<Vec<Player>> {
    Ok(list_members(conn, group_id)?
        .into_iter()
        .map(|m| Player {
            id: m.player_id,
            name: m.player_name,
        })
        .collect())
}

/// The only writer of `ranking_position`.
pub fn write_ranking_positions(
    conn: &Connection,
    group_id: GroupId,
    ranking: &[RankedPlayer],
) -> Result<()> {
    let sql = "UPDATE group_players SET ranking_position = ?1 WHERE group_id = ?2 AND player_id = ?3";
    let mut stmt = conn.prepare(sql)?;

    for ranked in ranking {
        let updated = stmt
            .execute(params![ranked.position, group_id, ranked.player_id])
            .with_context(|| write_context("ranking position of player", ranked.player_id))?;
        if updated != 1 {
            anyhow::bail!(
                "Player {} is not a member of group {}",
                ranked.player_id,
                group_id
            );
        }
    }

    Ok(())
}
