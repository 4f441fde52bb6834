use std::collections::HashMap;

use super::types::{ClosureEntry, DraftClosure, MovementType};
use crate::config::LeagueSettings;
use crate::domain::{Group, GroupId, SeasonId};
use crate::standings::RankedPlayer;

/// Classifies every ranked player of a season into a draft closure.
///
/// `groups` must be ordered from the top tier down. Each group's ranking is
/// taken from `standings`; a group with no ranking contributes no entries.
/// Promotion is checked before relegation, so in very small groups the top
/// ranks move up even if they are also among the bottom ranks.
pub fn compute_closure(
    season_id: SeasonId,
    groups: &[Group],
    standings: &HashMap<GroupId, Vec<RankedPlayer>>,
    settings: &LeagueSettings,
) -> DraftClosure {
    let mut entries = Vec::new();

    for (idx, group) in groups.iter().enumerate() {
        let Some(ranking) = standings.get(&group.id) else {
            continue;
        };

        let above = idx.checked_sub(1).map(|i| &groups[i]);
        let below = groups.get(idx + 1);

        for (pos, ranked) in ranking.iter().enumerate() {
            let rank = pos + 1;
            let (movement_type, to_group) =
                classify(rank, ranking.len(), group, above, below, settings);
            entries.push(ClosureEntry::computed(
                ranked.player_id,
                group.id,
                to_group,
                rank as i32,
                ranked.matches_won,
                movement_type,
            ));
        }
    }

    DraftClosure::new(season_id, entries)
}

fn classify(
    rank: usize,
    group_size: usize,
    group: &Group,
    above: Option<&Group>,
    below: Option<&Group>,
    settings: &LeagueSettings,
) -> (MovementType, GroupId) {
    if let Some(above) = above.filter(|_| rank <= settings.promotion_slots) {
        return (MovementType::Promotion, above.id);
    }

    let in_bottom = rank > group_size.saturating_sub(settings.relegation_slots);
    if let Some(below) = below.filter(|_| in_bottom) {
        return (MovementType::Relegation, below.id);
    }

    (MovementType::Stay, group.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerId;

    fn group(id: GroupId, tier: i32) -> Group {
        Group {
            id,
            season_id: 1,
            name: format!("Group {}", tier),
            tier,
        }
    }

    /// Ranking in the given order; each player has one win fewer than the
    /// one above.
    fn ranked(ids: &[PlayerId]) -> Vec<RankedPlayer> {
        ids.iter()
            .enumerate()
            .map(|(idx, &player_id)| RankedPlayer {
                player_id,
                position: idx as i32 + 1,
                matches_won: (ids.len() - idx - 1) as i32,
            })
            .collect()
    }

    fn ranking(first_id: PlayerId, size: i32) -> Vec<RankedPlayer> {
        let ids: Vec<PlayerId> = (first_id..first_id + size).collect();
        ranked(&ids)
    }

    fn movements(
        closure: &DraftClosure,
        from_group: GroupId,
    ) -> Vec<(MovementType, Option<GroupId>)> {
        closure
            .entries()
            .iter()
            .filter(|e| e.from_group_id == from_group)
            .map(|e| (e.movement_type, e.to_group_id))
            .collect()
    }

    #[test]
    fn test_three_tier_boundaries() {
        use MovementType::*;

        let groups = vec![group(100, 1), group(200, 2), group(300, 3)];
        let standings = HashMap::from([
            (100, ranking(1, 6)),
            (200, ranking(11, 6)),
            (300, ranking(21, 6)),
        ]);

        let closure = compute_closure(1, &groups, &standings, &LeagueSettings::default());

        assert_eq!(closure.entries().len(), 18);
        assert_eq!(
            movements(&closure, 100),
            vec![
                (Stay, Some(100)),
                (Stay, Some(100)),
                (Stay, Some(100)),
                (Stay, Some(100)),
                (Relegation, Some(200)),
                (Relegation, Some(200)),
            ]
        );
        assert_eq!(
            movements(&closure, 200),
            vec![
                (Promotion, Some(100)),
                (Promotion, Some(100)),
                (Stay, Some(200)),
                (Stay, Some(200)),
                (Relegation, Some(300)),
                (Relegation, Some(300)),
            ]
        );
        assert_eq!(
            movements(&closure, 300),
            vec![
                (Promotion, Some(200)),
                (Promotion, Some(200)),
                (Stay, Some(300)),
                (Stay, Some(300)),
                (Stay, Some(300)),
                (Stay, Some(300)),
            ]
        );
    }

    #[test]
    fn test_entries_carry_final_rank_in_ranking_order() {
        let groups = vec![group(100, 1), group(200, 2)];
        let standings = HashMap::from([(200, ranked(&[7, 3, 9]))]);

        let closure = compute_closure(4, &groups, &standings, &LeagueSettings::default());

        let ranks: Vec<(PlayerId, Option<i32>, Option<i32>)> = closure
            .entries()
            .iter()
            .map(|e| (e.player_id, e.final_rank, e.matches_won))
            .collect();
        assert_eq!(
            ranks,
            vec![(7, Some(1), Some(2)), (3, Some(2), Some(1)), (9, Some(3), Some(0))]
        );
        assert_eq!(closure.season_id(), 4);
    }

    #[test]
    fn test_promotion_wins_in_tiny_middle_group() {
        use MovementType::*;

        let groups = vec![group(100, 1), group(200, 2), group(300, 3)];
        let standings = HashMap::from([(200, ranked(&[1, 2, 3]))]);

        let closure = compute_closure(1, &groups, &standings, &LeagueSettings::default());

        assert_eq!(
            movements(&closure, 200),
            vec![
                (Promotion, Some(100)),
                (Promotion, Some(100)),
                (Relegation, Some(300)),
            ]
        );
    }

    #[test]
    fn test_single_group_season_keeps_everyone() {
        let groups = vec![group(100, 1)];
        let standings = HashMap::from([(100, ranking(1, 5))]);

        let closure = compute_closure(1, &groups, &standings, &LeagueSettings::default());

        assert!(closure
            .entries()
            .iter()
            .all(|e| e.movement_type == MovementType::Stay && e.to_group_id == Some(100)));
    }

    #[test]
    fn test_group_without_ranking_produces_no_entries() {
        let groups = vec![group(100, 1), group(200, 2)];
        let standings = HashMap::from([(100, ranking(1, 4)), (200, Vec::new())]);

        let closure = compute_closure(1, &groups, &standings, &LeagueSettings::default());

        assert_eq!(closure.entries().len(), 4);
        assert!(movements(&closure, 200).is_empty());
    }

    #[test]
    fn test_slot_counts_come_from_settings() {
        use MovementType::*;

        let groups = vec![group(100, 1), group(200, 2), group(300, 3)];
        let standings = HashMap::from([(200, ranking(1, 6))]);
        let settings = LeagueSettings {
            promotion_slots: 1,
            relegation_slots: 3,
        };

        let closure = compute_closure(1, &groups, &standings, &settings);

        let types: Vec<MovementType> = movements(&closure, 200)
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(types, vec![Promotion, Stay, Stay, Relegation, Relegation, Relegation]);
    }
}
