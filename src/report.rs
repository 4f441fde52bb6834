use std::collections::HashMap;

use anyhow::Result;
use colored::Colorize;
use rusqlite::Connection;

use crate::closure::{ClosureEntry, MovementType, SeasonClosure};
use crate::database::{HistoryRow, groups, players};
use crate::domain::{Group, GroupId, PlayerId};
use crate::services::ImportSummary;
use crate::standings::Standing;

/// Display names for the ids a closure refers to.
#[derive(Debug, Default)]
pub struct Labels {
    players: HashMap<PlayerId, String>,
    groups: HashMap<GroupId, String>,
}

impl Labels {
    pub fn load(conn: &Connection, entries: &[ClosureEntry]) -> Result<Self> {
        let mut labels = Self::default();
        for entry in entries {
            if let Some(player) = players::find_by_id(conn, entry.player_id)? {
                labels.players.insert(player.id, player.name);
            }
            for group_id in [Some(entry.from_group_id), entry.to_group_id].into_iter().flatten() {
                if labels.groups.contains_key(&group_id) {
                    continue;
                }
                if let Some(group) = groups::find_by_id(conn, group_id)? {
                    labels.groups.insert(group.id, group.name);
                }
            }
        }
        Ok(labels)
    }

    fn player(&self, id: PlayerId) -> String {
        self.players
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("#{}", id))
    }

    fn group(&self, id: GroupId) -> String {
        self.groups
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("#{}", id))
    }
}

pub fn standings_table(group: &Group, table: &[Standing]) -> String {
    let mut lines = vec![
        format!("{} (tier {})", group.name.bold(), group.tier),
        format!(
            "{:>3}  {:<24} {:>3} {:>5} {:>5} {:>5}",
            "#", "Player", "W", "SW", "SL", "Diff"
        ),
    ];
    lines.extend(table.iter().enumerate().map(|(idx, s)| {
        format!(
            "{:>3}  {:<24} {:>3} {:>5} {:>5} {:>+5}",
            idx + 1,
            s.player_name,
            s.matches_won,
            s.sets_won,
            s.sets_lost,
            s.sets_differential()
        )
    }));
    join_lines(lines)
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn optional(value: Option<i32>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn movement_label(movement: MovementType) -> String {
    match movement {
        MovementType::Promotion => "▲ PROMOTION".green().to_string(),
        MovementType::Relegation => "▼ RELEGATION".red().to_string(),
        MovementType::Stay => "= STAY".normal().to_string(),
    }
}

fn entry_line(entry: &ClosureEntry, labels: &Labels) -> String {
    let mut flags = Vec::new();
    if entry.manual {
        flags.push("manual");
    }
    if !entry.active {
        flags.push("inactive");
    }
    let flags = if flags.is_empty() {
        String::new()
    } else {
        format!(" [{}]", flags.join(", ")).dimmed().to_string()
    };

    format!(
        "{:>3}  {:<24} {:>3}  {:<12} -> {:<12} {}{}",
        optional(entry.final_rank),
        labels.player(entry.player_id),
        optional(entry.matches_won),
        labels.group(entry.from_group_id),
        labels.group(entry.destination()),
        movement_label(entry.movement_type),
        flags
    )
}

pub fn closure_report(closure: &SeasonClosure, labels: &Labels) -> String {
    let mut lines = vec![format!(
        "Season {} closure: {}",
        closure.season_id(),
        closure.status().as_str().bold()
    )];
    if let SeasonClosure::Approved(approved) = closure {
        lines.push(format!("Approved at {}", approved.approved_at()));
    }
    lines.push(format!("{:>3}  {:<24} {:>3}", "#", "Player", "W"));
    lines.extend(closure.entries().iter().map(|e| entry_line(e, labels)));

    let summary = closure.summary();
    lines.push(format!(
        "{} promoted, {} relegated, {} staying, {} inactive",
        summary.promotions, summary.relegations, summary.stays, summary.inactive
    ));
    join_lines(lines)
}

pub fn history_report(player_name: &str, rows: &[HistoryRow]) -> String {
    let mut lines = vec![player_name.bold().to_string()];
    if rows.is_empty() {
        lines.push("No approved seasons yet".to_string());
    }
    lines.extend(rows.iter().map(|row| {
        let rank = row
            .final_rank
            .map(|r| format!("#{}", r))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{:<16} {:<12} {:>4}  {}",
            row.season_name,
            row.group_name,
            rank,
            movement_label(row.movement_type)
        )
    }));
    join_lines(lines)
}

pub fn import_summary(summary: &ImportSummary) -> String {
    format!(
        "Imported {} seasons, {} groups, {} players, {} matches",
        summary.seasons, summary.groups, summary.players, summary.matches
    )
}
