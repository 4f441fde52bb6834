use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::{Connection, TransactionBehavior};

use crate::database::{self, DbPool, groups, matches};
use crate::domain::GroupId;
use crate::standings::{self, RankedPlayer, Standing};

/// Keeps `ranking_position` in step with a group's matches.
pub struct RankingService {
    pool: DbPool,
}

impl RankingService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Recomputes and stores a group's positions. Called after any match of
    /// the group is created, edited or deleted.
    pub fn recalculate_group(&self, group_id: GroupId) -> Result<Vec<RankedPlayer>> {
        let mut conn = database::get_connection(&self.pool)?;
        // IMMEDIATE takes the write lock up front, so two recalculations of
        // the same group cannot interleave their read and write phases.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let ranking = recalculate_in(&tx, group_id)?;
        tx.commit().context("Failed to commit ranking positions")?;

        info!("Recalculated group {}: {} players ranked", group_id, ranking.len());
        Ok(ranking)
    }

    /// Resolved standings of a group, best first. Nothing is written.
    pub fn group_table(&self, group_id: GroupId) -> Result<Vec<Standing>> {
        let conn = database::get_connection(&self.pool)?;
        ensure_group(&conn, group_id)?;

        let players = groups::list_players(&conn, group_id)?;
        let group_matches = matches::list_by_group(&conn, group_id)?;
        let standings = standings::compute_standings(&players, &group_matches)
            .with_context(|| format!("Failed to compute standings of group {}", group_id))?;

        let mut table = Vec::with_capacity(standings.len());
        for player_id in standings::resolve(&standings, &group_matches) {
            if let Some(s) = standings.iter().find(|s| s.player_id == player_id) {
                table.push(s.clone());
            }
        }
        Ok(table)
    }
}

fn ensure_group(conn: &Connection, group_id: GroupId) -> Result<()> {
    if groups::find_by_id(conn, group_id)?.is_none() {
        anyhow::bail!("Group {} not found", group_id);
    }
    Ok(())
}

/// Read, rank and write one group on an open connection or transaction.
pub fn recalculate_in(conn: &Connection, group_id: GroupId) -> Result<Vec<RankedPlayer>> {
    ensure_group(conn, group_id)?;

    let players = groups::list_players(conn, group_id)?;
    if players.is_empty() {
        debug!("Group {} has no players, nothing to rank", group_id);
        return Ok(Vec::new());
    }

    let group_matches = matches::list_by_group(conn, group_id)?;
    let ranking = standings::rank_group(&players, &group_matches)
        .with_context(|| format!("Failed to rank group {}", group_id))?;

    groups::write_ranking_positions(conn, group_id, &ranking)?;
    Ok(ranking)
}
