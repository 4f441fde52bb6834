use std::collections::HashMap;

use chrono::Utc;
use log::{info, warn};
use rusqlite::{Connection, TransactionBehavior};

use super::rankings::recalculate_in;
use crate::closure::{
    ApprovedClosure, ClosureEntry, DraftClosure, EntryUpdate, SeasonClosure, compute_closure,
};
use crate::config::settings::AppConfig;
use crate::database::{self, DbPool, closures, groups, history, players, seasons};
use crate::domain::{GroupId, PlayerId, SeasonId};
use crate::errors::{ClosureError, StandingsError};

/// Drives a season's closure from preview through edits to approval.
pub struct ClosureService {
    pool: DbPool,
    config: AppConfig,
}

impl ClosureService {
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self { pool, config }
    }

    /// Re-ranks every group of the season and stores a fresh draft.
    ///
    /// An existing draft is replaced, manual edits included. An approved
    /// closure is returned untouched.
    pub fn preview(&self, season_id: SeasonId) -> Result<SeasonClosure, ClosureError> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        ensure_season(&tx, season_id)?;
        if let Some(SeasonClosure::Approved(approved)) = closures::load(&tx, season_id)? {
            info!("Closure of season {} is already approved", season_id);
            return Ok(SeasonClosure::Approved(approved));
        }

        info!("=== Computing closure for season {} ===", season_id);
        let season_groups = groups::list_by_season(&tx, season_id)?;
        if season_groups.is_empty() {
            return Err(ClosureError::NoGroups(season_id));
        }

        let mut standings = HashMap::new();
        for group in &season_groups {
            let ranking = recalculate_in(&tx, group.id).map_err(into_closure_error)?;
            if ranking.is_empty() {
                warn!("  Group {} has no ranked players", group.name);
            }
            standings.insert(group.id, ranking);
        }

        let draft = compute_closure(season_id, &season_groups, &standings, &self.config.league);
        closures::save_draft(&tx, &draft)?;
        tx.commit()?;

        let closure = SeasonClosure::Draft(draft);
        let summary = closure.summary();
        info!(
            "  → Draft stored: {} promotions, {} relegations, {} stays",
            summary.promotions, summary.relegations, summary.stays
        );
        Ok(closure)
    }

    pub fn get(&self, season_id: SeasonId) -> Result<Option<SeasonClosure>, ClosureError> {
        let conn = database::get_connection(&self.pool)?;
        Ok(closures::load(&conn, season_id)?)
    }

    pub fn update_entry(
        &self,
        season_id: SeasonId,
        player_id: PlayerId,
        update: EntryUpdate,
    ) -> Result<DraftClosure, ClosureError> {
        self.edit(season_id, |draft, _| draft.update_entry(player_id, update))
    }

    pub fn add_player(
        &self,
        season_id: SeasonId,
        player_id: PlayerId,
        from_group_id: GroupId,
        to_group_id: GroupId,
    ) -> Result<DraftClosure, ClosureError> {
        self.edit(season_id, |draft, conn| {
            if players::find_by_id(conn, player_id)?.is_none() {
                return Err(ClosureError::PlayerNotFound(player_id));
            }
            draft.add_player(player_id, from_group_id, to_group_id)
        })
    }

    pub fn deactivate_player(
        &self,
        season_id: SeasonId,
        player_id: PlayerId,
    ) -> Result<DraftClosure, ClosureError> {
        self.edit(season_id, |draft, _| draft.deactivate(player_id))
    }

    pub fn remove_player(
        &self,
        season_id: SeasonId,
        player_id: PlayerId,
    ) -> Result<DraftClosure, ClosureError> {
        self.edit(season_id, |draft, _| draft.remove_player(player_id).map(|_| ()))
    }

    fn edit<F>(&self, season_id: SeasonId, apply: F) -> Result<DraftClosure, ClosureError>
    where
        F: FnOnce(&mut DraftClosure, &Connection) -> Result<(), ClosureError>,
    {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut draft = match closures::load(&tx, season_id)? {
            Some(SeasonClosure::Draft(draft)) => draft,
            Some(SeasonClosure::Approved(_)) => {
                return Err(ClosureError::AlreadyApproved(season_id));
            }
            None => return Err(ClosureError::NotFound(season_id)),
        };

        apply(&mut draft, &tx)?;
        closures::save_draft(&tx, &draft)?;
        tx.commit()?;

        Ok(draft)
    }

    /// Makes the season's outcomes permanent in one transaction: current
    /// groups move, history rows are written, and the closure is flipped to
    /// APPROVED last. Any failure leaves the draft as it was. Approving an
    /// approved closure returns it unchanged.
    pub fn approve(&self, season_id: SeasonId) -> Result<ApprovedClosure, ClosureError> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let row = closures::find_by_season(&tx, season_id)?
            .ok_or(ClosureError::NotFound(season_id))?;
        let draft = match closures::load(&tx, season_id)? {
            Some(SeasonClosure::Draft(draft)) => draft,
            Some(SeasonClosure::Approved(approved)) => {
                info!("Closure of season {} was already approved", season_id);
                return Ok(approved);
            }
            None => return Err(ClosureError::NotFound(season_id)),
        };

        info!(
            "=== Approving closure of season {} ({} entries) ===",
            season_id,
            draft.entries().len()
        );
        let approved = draft.approve(Utc::now().naive_utc());
        for entry in approved.entries() {
            apply_entry(&tx, season_id, entry)?;
        }
        closures::mark_approved(&tx, row.id, approved.approved_at())?;
        tx.commit()?;

        info!("  → Closure of season {} approved", season_id);
        Ok(approved)
    }
}

fn ensure_season(conn: &Connection, season_id: SeasonId) -> Result<(), ClosureError> {
    match seasons::find_by_id(conn, season_id)? {
        Some(_) => Ok(()),
        None => Err(ClosureError::SeasonNotFound(season_id)),
    }
}

fn apply_entry(
    conn: &Connection,
    season_id: SeasonId,
    entry: &ClosureEntry,
) -> Result<(), ClosureError> {
    let destination = entry.destination();
    if groups::find_by_id(conn, destination)?.is_none() {
        return Err(ClosureError::MissingGroup {
            player_id: entry.player_id,
            group_id: destination,
        });
    }

    if !entry.active {
        players::set_current_group(conn, entry.player_id, None)?;
    } else if entry.moves_player() {
        players::set_current_group(conn, entry.player_id, Some(destination))?;
    }

    history::insert_entry(
        conn,
        entry.player_id,
        season_id,
        destination,
        entry.final_rank,
        entry.movement_type,
    )?;
    Ok(())
}

fn into_closure_error(err: anyhow::Error) -> ClosureError {
    match err.downcast::<StandingsError>() {
        Ok(standings) => ClosureError::Standings(standings),
        Err(other) => ClosureError::Storage(other),
    }
}
