use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::{GroupId, PlayerId, SeasonId};
use crate::errors::ClosureError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Promotion,
    Relegation,
    Stay,
}

impl MovementType {
    pub fn as_str(&self) -> &str {
        match self {
            MovementType::Promotion => "PROMOTION",
            MovementType::Relegation => "RELEGATION",
            MovementType::Stay => "STAY",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PROMOTION" => Some(MovementType::Promotion),
            "RELEGATION" => Some(MovementType::Relegation),
            "STAY" => Some(MovementType::Stay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClosureStatus {
    Draft,
    Approved,
}

impl ClosureStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ClosureStatus::Draft => "DRAFT",
            ClosureStatus::Approved => "APPROVED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "DRAFT" => Some(ClosureStatus::Draft),
            "APPROVED" => Some(ClosureStatus::Approved),
            _ => None,
        }
    }
}

/// One player's end-of-season outcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosureEntry {
    pub player_id: PlayerId,
    pub from_group_id: GroupId,
    pub to_group_id: Option<GroupId>,
    /// `None` for players added by hand.
    pub final_rank: Option<i32>,
    /// Wins in the season's group, `None` for players added by hand.
    pub matches_won: Option<i32>,
    pub movement_type: MovementType,
    pub active: bool,
    pub manual: bool,
}

impl ClosureEntry {
    pub fn computed(
        player_id: PlayerId,
        from_group_id: GroupId,
        to_group_id: GroupId,
        final_rank: i32,
        matches_won: i32,
        movement_type: MovementType,
    ) -> Self {
        Self {
            player_id,
            from_group_id,
            to_group_id: Some(to_group_id),
            final_rank: Some(final_rank),
            matches_won: Some(matches_won),
            movement_type,
            active: true,
            manual: false,
        }
    }

    /// Group recorded in the player's history.
    pub fn destination(&self) -> GroupId {
        self.to_group_id.unwrap_or(self.from_group_id)
    }

    /// Whether approval moves the player's current group.
    pub fn moves_player(&self) -> bool {
        self.active && self.to_group_id.is_some_and(|to| to != self.from_group_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryUpdate {
    pub movement_type: MovementType,
    pub to_group_id: Option<GroupId>,
}

/// A closure under review. Entries can be edited freely until approval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftClosure {
    season_id: SeasonId,
    entries: Vec<ClosureEntry>,
}

impl DraftClosure {
    pub fn new(season_id: SeasonId, entries: Vec<ClosureEntry>) -> Self {
        Self { season_id, entries }
    }

    pub fn season_id(&self) -> SeasonId {
        self.season_id
    }

    pub fn entries(&self) -> &[ClosureEntry] {
        &self.entries
    }

    pub fn entry(&self, player_id: PlayerId) -> Option<&ClosureEntry> {
        self.entries.iter().find(|e| e.player_id == player_id)
    }

    fn entry_mut(&mut self, player_id: PlayerId) -> Result<&mut ClosureEntry, ClosureError> {
        self.entries
            .iter_mut()
            .find(|e| e.player_id == player_id)
            .ok_or(ClosureError::EntryNotFound(player_id))
    }

    /// Overwrites an entry's movement and destination. The classification
    /// rule is not re-applied.
    pub fn update_entry(
        &mut self,
        player_id: PlayerId,
        update: EntryUpdate,
    ) -> Result<(), ClosureError> {
        let entry = self.entry_mut(player_id)?;
        entry.movement_type = update.movement_type;
        entry.to_group_id = update.to_group_id;
        Ok(())
    }

    /// Adds a player who was not ranked this season. Manual entries stay
    /// with an explicit destination and carry no final rank.
    pub fn add_player(
        &mut self,
        player_id: PlayerId,
        from_group_id: GroupId,
        to_group_id: GroupId,
    ) -> Result<(), ClosureError> {
        if self.entry(player_id).is_some() {
            return Err(ClosureError::DuplicateEntry(player_id));
        }

        self.entries.push(ClosureEntry {
            player_id,
            from_group_id,
            to_group_id: Some(to_group_id),
            final_rank: None,
            matches_won: None,
            movement_type: MovementType::Stay,
            active: true,
            manual: true,
        });
        Ok(())
    }

    /// Marks a player as not continuing next season.
    pub fn deactivate(&mut self, player_id: PlayerId) -> Result<(), ClosureError> {
        self.entry_mut(player_id)?.active = false;
        Ok(())
    }

    pub fn remove_player(&mut self, player_id: PlayerId) -> Result<ClosureEntry, ClosureError> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.player_id == player_id)
            .ok_or(ClosureError::EntryNotFound(player_id))?;
        Ok(self.entries.remove(idx))
    }

    pub fn approve(self, approved_at: NaiveDateTime) -> ApprovedClosure {
        ApprovedClosure {
            season_id: self.season_id,
            entries: self.entries,
            approved_at,
        }
    }
}

/// A closure whose outcomes are final. Exposes no way to change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedClosure {
    season_id: SeasonId,
    entries: Vec<ClosureEntry>,
    approved_at: NaiveDateTime,
}

impl ApprovedClosure {
    pub(crate) fn restore(
        season_id: SeasonId,
        entries: Vec<ClosureEntry>,
        approved_at: NaiveDateTime,
    ) -> Self {
        Self {
            season_id,
            entries,
            approved_at,
        }
    }

    pub fn season_id(&self) -> SeasonId {
        self.season_id
    }

    pub fn entries(&self) -> &[ClosureEntry] {
        &self.entries
    }

    pub fn approved_at(&self) -> NaiveDateTime {
        self.approved_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeasonClosure {
    Draft(DraftClosure),
    Approved(ApprovedClosure),
}

impl SeasonClosure {
    pub fn season_id(&self) -> SeasonId {
        match self {
            SeasonClosure::Draft(d) => d.season_id(),
            SeasonClosure::Approved(a) => a.season_id(),
        }
    }

    pub fn entries(&self) -> &[ClosureEntry] {
        match self {
            SeasonClosure::Draft(d) => d.entries(),
            SeasonClosure::Approved(a) => a.entries(),
        }
    }

    pub fn status(&self) -> ClosureStatus {
        match self {
            SeasonClosure::Draft(_) => ClosureStatus::Draft,
            SeasonClosure::Approved(_) => ClosureStatus::Approved,
        }
    }

    pub fn summary(&self) -> ClosureSummary {
        ClosureSummary::from_entries(self.entries())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClosureSummary {
    pub promotions: usize,
    pub relegations: usize,
    pub stays: usize,
    pub inactive: usize,
}

impl ClosureSummary {
    pub fn from_entries(entries: &[ClosureEntry]) -> Self {
        entries.iter().fold(Self::default(), |mut acc, e| {
            match e.movement_type {
                MovementType::Promotion => acc.promotions += 1,
                MovementType::Relegation => acc.relegations += 1,
                MovementType::Stay => acc.stays += 1,
            }
            if !e.active {
                acc.inactive += 1;
            }
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> DraftClosure {
        DraftClosure::new(
            1,
            vec![
                ClosureEntry::computed(10, 2, 1, 1, 5, MovementType::Promotion),
                ClosureEntry::computed(11, 2, 2, 3, 3, MovementType::Stay),
                ClosureEntry::computed(12, 2, 3, 6, 0, MovementType::Relegation),
            ],
        )
    }

    #[test]
    fn test_update_entry_overwrites_fields() {
        let mut closure = draft();

        closure
            .update_entry(
                11,
                EntryUpdate {
                    movement_type: MovementType::Promotion,
                    to_group_id: Some(1),
                },
            )
            .unwrap();

        let entry = closure.entry(11).unwrap();
        assert_eq!(entry.movement_type, MovementType::Promotion);
        assert_eq!(entry.to_group_id, Some(1));
        assert_eq!(entry.final_rank, Some(3));
    }

    #[test]
    fn test_update_unknown_entry_fails() {
        let mut closure = draft();
        let update = EntryUpdate {
            movement_type: MovementType::Stay,
            to_group_id: None,
        };

        assert!(matches!(
            closure.update_entry(99, update),
            Err(ClosureError::EntryNotFound(99))
        ));
    }

    #[test]
    fn test_added_player_stays_with_explicit_destination() {
        let mut closure = draft();

        closure.add_player(20, 3, 2).unwrap();

        let entry = closure.entry(20).unwrap();
        assert_eq!(entry.movement_type, MovementType::Stay);
        assert_eq!(entry.to_group_id, Some(2));
        assert_eq!(entry.final_rank, None);
        assert_eq!(entry.matches_won, None);
        assert!(entry.manual);
        assert!(entry.moves_player());
        assert!(matches!(
            closure.add_player(20, 3, 2),
            Err(ClosureError::DuplicateEntry(20))
        ));
    }

    #[test]
    fn test_deactivated_entry_no_longer_moves_player() {
        let mut closure = draft();
        assert!(closure.entry(10).unwrap().moves_player());

        closure.deactivate(10).unwrap();

        assert!(!closure.entry(10).unwrap().moves_player());
        assert_eq!(ClosureSummary::from_entries(closure.entries()).inactive, 1);
    }

    #[test]
    fn test_remove_player_drops_entry() {
        let mut closure = draft();

        let removed = closure.remove_player(12).unwrap();

        assert_eq!(removed.player_id, 12);
        assert_eq!(closure.entries().len(), 2);
        assert!(closure.remove_player(12).is_err());
    }

    #[test]
    fn test_destination_falls_back_to_origin() {
        let mut entry = ClosureEntry::computed(10, 2, 2, 3, 3, MovementType::Stay);
        assert!(!entry.moves_player());

        entry.to_group_id = None;
        assert_eq!(entry.destination(), 2);
    }

    #[test]
    fn test_approve_keeps_entries() {
        let closure = draft();
        let entries = closure.entries().to_vec();
        let at = chrono::DateTime::from_timestamp(1_700_000_000, 0).unwrap().naive_utc();

        let approved = closure.approve(at);

        assert_eq!(approved.entries(), entries.as_slice());
        assert_eq!(approved.approved_at(), at);
        let summary = SeasonClosure::Approved(approved).summary();
        assert_eq!((summary.promotions, summary.relegations, summary.stays), (1, 1, 1));
    }
}
