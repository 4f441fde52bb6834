use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rusqlite::{Connection, TransactionBehavior};

use super::rankings::recalculate_in;
use crate::database::{self, DbPool, groups, matches, players, seasons};
use crate::domain::snapshot::MatchRecord;
use crate::domain::{LeagueSnapshot, Match};
use crate::standings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub seasons: usize,
    pub groups: usize,
    pub players: usize,
    pub matches: usize,
}

/// Loads league data exported by the match-management side.
pub struct ImportService {
    pool: DbPool,
}

impl ImportService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn import_file(&self, path: &Path) -> Result<ImportSummary> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let snapshot: LeagueSnapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        self.import(&snapshot)
    }

    /// Inserts the snapshot and ranks every imported group, all or nothing.
    pub fn import(&self, snapshot: &LeagueSnapshot) -> Result<ImportSummary> {
        let mut conn = database::get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        info!("=== Importing league snapshot ===");
        for season in &snapshot.seasons {
            seasons::insert_season(&tx, season.id, &season.name)?;
        }
        for group in &snapshot.groups {
            groups::insert_group(&tx, group.id, group.season_id, &group.name, group.tier)?;
        }
        for player in &snapshot.players {
            players::insert_player(&tx, player.id, &player.name, player.current_group_id)?;
        }
        for membership in &snapshot.memberships {
            groups::add_member(&tx, membership.group_id, membership.player_id)?;
        }
        for record in &snapshot.matches {
            insert_result(&tx, record)?;
        }
        info!(
            "  → {} seasons, {} groups, {} players, {} matches",
            snapshot.seasons.len(),
            snapshot.groups.len(),
            snapshot.players.len(),
            snapshot.matches.len()
        );

        for group in &snapshot.groups {
            let ranking = recalculate_in(&tx, group.id)?;
            info!("  → {}: {} players ranked", group.name, ranking.len());
        }
        tx.commit().context("Failed to commit import")?;

        Ok(ImportSummary {
            seasons: snapshot.seasons.len(),
            groups: snapshot.groups.len(),
            players: snapshot.players.len(),
            matches: snapshot.matches.len(),
        })
    }
}

/// Stores one result. A missing winner is derived from the score.
fn insert_result(conn: &Connection, record: &MatchRecord) -> Result<Match> {
    let winner_id = record.winner_id.or_else(|| {
        Match {
            id: 0,
            group_id: record.group_id,
            player1_id: record.player1_id,
            player2_id: record.player2_id,
            games_won1: record.games_won1,
            games_won2: record.games_won2,
            status: record.status,
            winner_id: None,
        }
        .decided_winner()
    });

    let stored = matches::insert_match(
        conn,
        record.group_id,
        record.player1_id,
        record.player2_id,
        record.games_won1,
        record.games_won2,
        record.status,
        winner_id,
    )?;
    standings::validate_result(&stored)
        .with_context(|| format!("Rejected result in group {}", record.group_id))?;
    Ok(stored)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, get_connection, setup};
    use crate::domain::PlayerId;
    use crate::errors::StandingsError;

    const SNAPSHOT: &str = r#"{
        "seasons": [{"id": 1, "name": "Autumn"}],
        "groups": [
            {"id": 10, "seasonId": 1, "name": "Group 1", "tier": 1},
            {"id": 20, "seasonId": 1, "name": "Group 2", "tier": 2}
        ],
        "players": [
            {"id": 1, "name": "Ane", "currentGroupId": 10},
            {"id": 2, "name": "Bruno", "currentGroupId": 10},
            {"id": 3, "name": "Carla", "currentGroupId": 20}
        ],
        "memberships": [
            {"groupId": 10, "playerId": 1},
            {"groupId": 10, "playerId": 2},
            {"groupId": 20, "playerId": 3}
        ],
        "matches": [
            {"groupId": 10, "player1Id": 1, "player2Id": 2, "gamesWon1": 1, "gamesWon2": 3, "status": "PLAYED"},
            {"groupId": 10, "player1Id": 2, "player2Id": 1, "status": "CANCELLED"}
        ]
    }"#;

    fn empty_pool() -> DbPool {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();
        setup::reset_database(&conn).unwrap();
        pool
    }

    fn snapshot() -> LeagueSnapshot {
        serde_json::from_str(SNAPSHOT).unwrap()
    }

    #[test]
    fn test_import_stores_and_ranks_groups() {
        let pool = empty_pool();

        let summary = ImportService::new(pool.clone()).import(&snapshot()).unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                seasons: 1,
                groups: 2,
                players: 3,
                matches: 2
            }
        );
        let conn = get_connection(&pool).unwrap();
        let positions = |group_id| -> Vec<(PlayerId, Option<i32>)> {
            groups::list_members(&conn, group_id)
                .unwrap()
                .into_iter()
                .map(|m| (m.player_id, m.ranking_position))
                .collect()
        };
        assert_eq!(positions(10), vec![(2, Some(1)), (1, Some(2))]);
        assert_eq!(positions(20), vec![(3, Some(1))]);
    }

    #[test]
    fn test_import_derives_missing_winner() {
        let pool = empty_pool();

        ImportService::new(pool.clone()).import(&snapshot()).unwrap();

        let conn = get_connection(&pool).unwrap();
        let stored = matches::list_by_group(&conn, 10).unwrap();
        assert_eq!(stored[0].winner_id, Some(2));
        assert_eq!(stored[1].winner_id, None);
    }

    #[test]
    fn test_invalid_result_rolls_back_import() {
        let pool = empty_pool();
        let mut snapshot = snapshot();
        snapshot.matches[0].games_won1 = Some(3);
        snapshot.matches[0].games_won2 = Some(3);

        let err = ImportService::new(pool.clone()).import(&snapshot).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<StandingsError>(),
            Some(StandingsError::InvalidScore { .. })
        ));
        let conn = get_connection(&pool).unwrap();
        assert!(seasons::find_by_id(&conn, 1).unwrap().is_none());
    }

    #[test]
    fn test_import_file_reports_missing_file() {
        let pool = empty_pool();

        let err = ImportService::new(pool)
            .import_file(Path::new("/nonexistent/league.json"))
            .unwrap_err();

        assert!(err.to_string().contains("Failed to read"));
    }
}
