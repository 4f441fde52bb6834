use std::collections::HashMap;

use super::calculator::counted_matches;
use super::types::{Standing, compare_global_differential, compare_names};
use crate::domain::{Match, PlayerId};

/// Orders one block of players that share the same number of matches won.
pub trait TieBreaker {
    fn order(&self, block: &[Standing], matches: &[&Match]) -> Vec<Standing>;
}

/// Two tied players: the one who won their meeting goes first.
pub struct HeadToHead;

/// Three or more tied players: a league restricted to their internal matches.
pub struct MiniLeague;

/// Turns standings sorted by matches won into a strict total order.
///
/// Each maximal block of equal `matches_won` is handed to the matching
/// [`TieBreaker`] and the resolved blocks are concatenated in their original
/// order.
pub fn resolve(standings: &[Standing], matches: &[Match]) -> Vec<PlayerId> {
    let counted = counted_matches(matches);

    standings
        .chunk_by(|a, b| a.matches_won == b.matches_won)
        .flat_map(|block| resolve_block(block, &counted))
        .map(|s| s.player_id)
        .collect()
}

fn resolve_block(block: &[Standing], matches: &[&Match]) -> Vec<Standing> {
    match tie_breaker_for(block.len()) {
        Some(breaker) => breaker.order(block, matches),
        None => block.to_vec(),
    }
}

fn tie_breaker_for(block_len: usize) -> Option<&'static dyn TieBreaker> {
    match block_len {
        0 | 1 => None,
        2 => Some(&HeadToHead),
        _ => Some(&MiniLeague),
    }
}

impl TieBreaker for HeadToHead {
    fn order(&self, block: &[Standing], matches: &[&Match]) -> Vec<Standing> {
        let [a, b] = block else {
            return by_global_differential(block);
        };

        match head_to_head_winner(a.player_id, b.player_id, matches) {
            Some(winner) if winner == a.player_id => vec![a.clone(), b.clone()],
            Some(_) => vec![b.clone(), a.clone()],
            None => by_global_differential(block),
        }
    }
}

/// Winner of the meeting between `a` and `b`. `None` when they never met or
/// the meeting had no winner.
fn head_to_head_winner(a: PlayerId, b: PlayerId, matches: &[&Match]) -> Option<PlayerId> {
    let (mut a_wins, mut b_wins) = (0, 0);
    for m in matches.iter().filter(|m| m.is_between(a, b)) {
        match m.winner_id {
            Some(w) if w == a => a_wins += 1,
            Some(w) if w == b => b_wins += 1,
            _ => {}
        }
    }

    match a_wins.cmp(&b_wins) {
        std::cmp::Ordering::Greater => Some(a),
        std::cmp::Ordering::Less => Some(b),
        std::cmp::Ordering::Equal => None,
    }
}

fn by_global_differential(block: &[Standing]) -> Vec<Standing> {
    let mut sorted = block.to_vec();
    sorted.sort_by(|a, b| compare_global_differential(a, b).then_with(|| compare_names(a, b)));
    sorted
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct InternalRecord {
    wins: i32,
    differential: i32,
}

impl TieBreaker for MiniLeague {
    fn order(&self, block: &[Standing], matches: &[&Match]) -> Vec<Standing> {
        let records = internal_records(block, matches);
        let record = |s: &Standing| records.get(&s.player_id).copied().unwrap_or_default();

        let mut sorted = block.to_vec();
        sorted.sort_by(|a, b| {
            let (ra, rb) = (record(a), record(b));
            rb.wins
                .cmp(&ra.wins)
                .then_with(|| rb.differential.cmp(&ra.differential))
                .then_with(|| compare_global_differential(a, b))
                .then_with(|| compare_names(a, b))
        });
        sorted
    }
}

/// Wins and set differential counting only matches between block members.
/// Pairs that never met simply add nothing.
fn internal_records(block: &[Standing], matches: &[&Match]) -> HashMap<PlayerId, InternalRecord> {
    let mut records: HashMap<PlayerId, InternalRecord> = block
        .iter()
        .map(|s| (s.player_id, InternalRecord::default()))
        .collect();

    let internal: Vec<&Match> = matches
        .iter()
        .copied()
        .filter(|m| records.contains_key(&m.player1_id) && records.contains_key(&m.player2_id))
        .collect();

    for m in internal {
        for player_id in [m.player1_id, m.player2_id] {
            let Some((won, lost)) = m.sets_for(player_id) else {
                continue;
            };
            if let Some(record) = records.get_mut(&player_id) {
                record.differential += won - lost;
                if m.winner_id == Some(player_id) {
                    record.wins += 1;
                }
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MatchStatus, Player};
    use crate::standings::compute_standings;

    fn standing(id: PlayerId, name: &str, won: i32, sets_won: i32, sets_lost: i32) -> Standing {
        Standing {
            player_id: id,
            player_name: name.to_string(),
            matches_won: won,
            sets_won,
            sets_lost,
        }
    }

    fn played(id: i32, p1: PlayerId, p2: PlayerId, g1: i32, g2: i32) -> Match {
        let mut m = Match {
            id,
            group_id: 1,
            player1_id: p1,
            player2_id: p2,
            games_won1: Some(g1),
            games_won2: Some(g2),
            status: MatchStatus::Played,
            winner_id: None,
        };
        m.winner_id = m.decided_winner();
        m
    }

    fn permutations(items: &[Standing]) -> Vec<Vec<Standing>> {
        if items.len() <= 1 {
            return vec![items.to_vec()];
        }
        let mut result = Vec::new();
        for i in 0..items.len() {
            let mut rest = items.to_vec();
            let head = rest.remove(i);
            for mut tail in permutations(&rest) {
                tail.insert(0, head.clone());
                result.push(tail);
            }
        }
        result
    }

    #[test]
    fn test_single_player_blocks_keep_win_order() {
        let standings = vec![
            standing(1, "Zuriñe", 3, 9, 1),
            standing(2, "Ane", 2, 6, 4),
            standing(3, "Bruno", 0, 0, 9),
        ];

        assert_eq!(resolve(&standings, &[]), vec![1, 2, 3]);
    }

    #[test]
    fn test_head_to_head_beats_global_differential() {
        // A and B both won 5, B has the far better differential but lost to A.
        let standings = vec![standing(2, "Bruno", 5, 15, 2), standing(1, "Ane", 5, 15, 9)];
        let matches = vec![played(1, 1, 2, 3, 1)];

        assert_eq!(resolve(&standings, &matches), vec![1, 2]);
    }

    #[test]
    fn test_head_to_head_without_meeting_uses_differential_then_name() {
        let standings = vec![standing(1, "Ane", 2, 6, 5), standing(2, "Bruno", 2, 7, 3)];
        assert_eq!(resolve(&standings, &[]), vec![2, 1]);

        let level = vec![standing(2, "bruno", 2, 6, 3), standing(1, "Ane", 2, 6, 3)];
        assert_eq!(resolve(&level, &[]), vec![1, 2]);
    }

    #[test]
    fn test_head_to_head_meeting_without_winner_falls_through() {
        let standings = vec![standing(1, "Ane", 1, 3, 3), standing(2, "Bruno", 1, 4, 3)];
        let mut meeting = played(1, 1, 2, 3, 2);
        meeting.winner_id = None;

        assert_eq!(resolve(&standings, &[meeting]), vec![2, 1]);
    }

    #[test]
    fn test_head_to_head_outside_pairs_orders_by_differential() {
        let single = vec![standing(1, "Ane", 1, 3, 3)];
        let trio = vec![
            standing(1, "Ane", 1, 3, 3),
            standing(2, "Bruno", 1, 5, 3),
            standing(3, "Carla", 1, 3, 3),
        ];

        let ordered = |block: &[Standing]| -> Vec<PlayerId> {
            HeadToHead
                .order(block, &[])
                .into_iter()
                .map(|s| s.player_id)
                .collect()
        };

        assert_eq!(ordered(&single), vec![1]);
        assert!(ordered(&[]).is_empty());
        assert_eq!(ordered(&trio), vec![2, 1, 3]);
    }

    #[test]
    fn test_mini_league_orders_by_internal_wins_first() {
        // C has the worst global record but won both internal matches.
        let standings = vec![
            standing(1, "Ane", 4, 14, 4),
            standing(2, "Bruno", 4, 13, 6),
            standing(3, "Carla", 4, 12, 8),
        ];
        let matches = vec![
            played(1, 3, 1, 3, 2),
            played(2, 3, 2, 3, 1),
            played(3, 1, 2, 3, 0),
        ];

        assert_eq!(resolve(&standings, &matches), vec![3, 1, 2]);
    }

    #[test]
    fn test_mini_league_cycle_falls_to_internal_differential() {
        // A beat B 3-0, B beat C 3-0, C beat A 3-1: one internal win each,
        // internal differentials A=+1, B=0, C=-1.
        let standings = vec![
            standing(3, "Carla", 4, 14, 6),
            standing(2, "Bruno", 4, 13, 6),
            standing(1, "Ane", 4, 12, 6),
        ];
        let matches = vec![
            played(1, 1, 2, 3, 0),
            played(2, 2, 3, 3, 0),
            played(3, 3, 1, 3, 1),
        ];

        assert_eq!(resolve(&standings, &matches), vec![1, 2, 3]);
    }

    #[test]
    fn test_mini_league_level_internally_uses_global_then_name() {
        // Perfect cycle with identical internal differentials.
        let standings = vec![
            standing(1, "ane", 4, 12, 6),
            standing(2, "Bruno", 4, 14, 6),
            standing(3, "Ander", 4, 12, 6),
        ];
        let matches = vec![
            played(1, 1, 2, 3, 0),
            played(2, 2, 3, 3, 0),
            played(3, 3, 1, 3, 0),
        ];

        assert_eq!(resolve(&standings, &matches), vec![2, 3, 1]);
    }

    #[test]
    fn test_mini_league_counts_missing_internal_pairs_as_zero() {
        // B and C never met; A lost to both.
        let standings = vec![
            standing(1, "Ane", 3, 10, 8),
            standing(2, "Bruno", 3, 9, 7),
            standing(3, "Carla", 3, 9, 5),
        ];
        let matches = vec![played(1, 2, 1, 3, 1), played(2, 3, 1, 3, 2)];

        assert_eq!(resolve(&standings, &matches), vec![2, 3, 1]);
    }

    #[test]
    fn test_mini_league_ignores_matches_against_outsiders() {
        let standings = vec![
            standing(1, "Ane", 2, 6, 0),
            standing(2, "Bruno", 2, 6, 0),
            standing(3, "Carla", 2, 6, 0),
            standing(4, "Dani", 0, 0, 6),
        ];
        // Every tied player beat Dani; nobody has played inside the block.
        let matches = vec![
            played(1, 1, 4, 3, 0),
            played(2, 2, 4, 3, 0),
            played(3, 3, 4, 3, 0),
        ];

        assert_eq!(resolve(&standings, &matches), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_no_played_matches_gives_alphabetical_order() {
        let players = vec![
            Player { id: 1, name: "zuriñe".to_string() },
            Player { id: 2, name: "Mikel".to_string() },
            Player { id: 3, name: "amaia".to_string() },
            Player { id: 4, name: "Beñat".to_string() },
        ];
        let standings = compute_standings(&players, &[]).unwrap();

        assert_eq!(resolve(&standings, &[]), vec![3, 4, 2, 1]);
    }

    #[test]
    fn test_resolution_is_a_strict_order_independent_of_input_order() {
        // Fully level block, including two players with the same name.
        let block = vec![
            standing(4, "Iker", 1, 3, 3),
            standing(2, "iker", 1, 3, 3),
            standing(7, "Iker", 1, 3, 3),
            standing(1, "Amaia", 1, 3, 3),
        ];
        let expected = vec![1, 4, 7, 2];

        for permutation in permutations(&block) {
            let order = resolve(&permutation, &[]);
            assert_eq!(order, expected);

            for pair in order.windows(2) {
                let a = block.iter().find(|s| s.player_id == pair[0]).unwrap();
                let b = block.iter().find(|s| s.player_id == pair[1]).unwrap();
                assert_eq!(compare_names(a, b), std::cmp::Ordering::Less);
            }
        }
    }

    #[test]
    fn test_resolving_twice_gives_identical_output() {
        let players: Vec<Player> = ["Ane", "Bruno", "Carla", "Dani", "Eneko"]
            .iter()
            .enumerate()
            .map(|(i, name)| Player { id: i as i32 + 1, name: name.to_string() })
            .collect();
        let matches = vec![
            played(1, 1, 2, 3, 1),
            played(2, 3, 4, 3, 2),
            played(3, 5, 1, 3, 0),
            played(4, 2, 3, 3, 1),
            played(5, 4, 5, 3, 1),
        ];

        let first = resolve(&compute_standings(&players, &matches).unwrap(), &matches);
        let second = resolve(&compute_standings(&players, &matches).unwrap(), &matches);

        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }
}
