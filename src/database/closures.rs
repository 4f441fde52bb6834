use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, params};

use super::models::ClosureRow;
use crate::closure::{ApprovedClosure, ClosureEntry, ClosureStatus, DraftClosure, SeasonClosure};
use crate::domain::SeasonId;
use crate::errors::{query_context, write_context};

pub fn find_by_season(conn: &Connection, season_id: SeasonId) -> Result<Option<ClosureRow>> {
    let sql = "SELECT id, season_id, status, created_at, approved_at FROM season_closures WHERE season_id = ?1";

    conn.query_row(sql, params![season_id], parse_closure_row)
        .optional()
        .with_context(|| query_context("closure of season", season_id))
}

fn parse_closure_row(row: &rusqlite::Row) -> rusqlite::Result<ClosureRow> {
    Ok(ClosureRow {
        id: row.get(0)?,
        season_id: row.get(1)?,
        status: row.get(2)?,
        created_at: row.get(3)?,
        approved_at: row.get(4)?,
    })
}

fn parse_entry_row(row: &rusqlite::Row) -> rusqlite::Result<ClosureEntry> {
    Ok(ClosureEntry {
        player_id: row.get(0)?,
        from_group_id: row.get(1)?,
        to_group_id: row.get(2)?,
        final_rank: row.get(3)?,
        matches_won: row.get(4)?,
        movement_type: row.get(5)?,
        active: row.get(6)?,
        manual: row.get(7)?,
    })
}

pub fn list_entries(conn: &Connection, closure_id: i32) -> Result<Vec<ClosureEntry>> {
    let sql = "SELECT player_id, from_group_id, to_group_id, final_rank, matches_won, movement_type, active, manual FROM closure_entries WHERE closure_id = ?1 ORDER BY position";

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params![closure_id], parse_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .with_context(|| query_context("entries of closure", closure_id))?;

    Ok(rows)
}

/// Loads a season's closure in whichever state it is in.
pub fn load(conn: &Connection, season_id: SeasonId) -> Result<Option<SeasonClosure>> {
    let Some(row) = find_by_season(conn, season_id)? else {
        return Ok(None);
    };
    let entries = list_entries(conn, row.id)?;

    let closure = match row.status {
        ClosureStatus::Draft => SeasonClosure::Draft(DraftClosure::new(season_id, entries)),
        ClosureStatus::Approved => {
            let approved_at = row.approved_at.with_context(|| {
                format!("Approved closure {} has no approval time", row.id)
            })?;
            SeasonClosure::Approved(ApprovedClosure::restore(season_id, entries, approved_at))
        }
    };

    Ok(Some(closure))
}

/// Stores a draft, replacing any entries the season's draft had before.
/// Returns the closure id.
pub fn save_draft(conn: &Connection, draft: &DraftClosure) -> Result<i32> {
    let season_id = draft.season_id();
    conn.execute(
        "INSERT INTO season_closures (season_id, status) VALUES (?1, ?2) ON CONFLICT (season_id) DO NOTHING",
        params![season_id, ClosureStatus::Draft],
    )
    .with_context(|| write_context("closure of season", season_id))?;

    let row = find_by_season(conn, season_id)?
        .with_context(|| format!("Closure of season {} vanished while saving", season_id))?;
    if row.status == ClosureStatus::Approved {
        anyhow::bail!("Closure of season {} is already approved", season_id);
    }

    conn.execute(
        "DELETE FROM closure_entries WHERE closure_id = ?1",
        params![row.id],
    )
    .with_context(|| write_context("entries of closure", row.id))?;

    let sql = "INSERT INTO closure_entries (closure_id, position, player_id, from_group_id, to_group_id, final_rank, matches_won, movement_type, active, manual) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
    let mut stmt = conn.prepare(sql)?;
    for (position, entry) in draft.entries().iter().enumerate() {
        stmt.execute(params![
            row.id,
            position as i32,
            entry.player_id,
            entry.from_group_id,
            entry.to_group_id,
            entry.final_rank,
            entry.matches_won,
            entry.movement_type,
            entry.active,
            entry.manual
        ])
        .with_context(|| write_context("closure entry of player", entry.player_id))?;
    }

    Ok(row.id)
}

/// Flips a draft to APPROVED. Fails if the closure is not a draft.
pub fn mark_approved(
    conn: &Connection,
    closure_id: i32,
    approved_at: NaiveDateTime,
) -> Result<()> {
    let sql = "UPDATE season_closures SET status = ?1, approved_at = ?2 WHERE id = ?3 AND status = ?4";

    let updated = conn
        .execute(
            sql,
            params![
                ClosureStatus::Approved,
                approved_at,
                closure_id,
                ClosureStatus::Draft
            ],
        )
        .with_context(|| write_context("approval of closure", closure_id))?;

    if updated != 1 {
        anyhow::bail!("Closure {} is not a draft", closure_id);
    }
    Ok(())
}
