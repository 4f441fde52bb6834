use std::collections::HashMap;

use log::debug;

use super::types::Standing;
use crate::domain::{GAMES_TO_WIN, Match, Player, PlayerId};
use crate::errors::StandingsError;

/// Aggregates a group's counted matches into standings ordered by matches won.
///
/// Players with equal wins keep their input order; splitting those ties is
/// the job of [`super::tiebreak::resolve`].
pub fn compute_standings(
    players: &[Player],
    matches: &[Match],
) -> Result<Vec<Standing>, StandingsError> {
    let mut standings: Vec<Standing> = players
        .iter()
        .map(|p| Standing::new(p.id, &p.name))
        .collect();

    let player_to_idx = index_players(&standings);
    let counted = counted_matches(matches);
    debug!(
        "Aggregating {} counted matches for {} players",
        counted.len(),
        standings.len()
    );

    for m in counted {
        validate_result(m)?;
        let idx1 = lookup(&player_to_idx, m, m.player1_id)?;
        let idx2 = lookup(&player_to_idx, m, m.player2_id)?;

        if let Some((games1, games2)) = m.score() {
            apply_sets(&mut standings[idx1], games1, games2);
            apply_sets(&mut standings[idx2], games2, games1);
        }

        match m.winner_id {
            Some(w) if w == m.player1_id => standings[idx1].matches_won += 1,
            Some(_) => standings[idx2].matches_won += 1,
            None => {}
        }
    }

    standings.sort_by(|a, b| b.matches_won.cmp(&a.matches_won));
    Ok(standings)
}

/// Matches that take part in standings: PLAYED with both game counts.
pub fn counted_matches(matches: &[Match]) -> Vec<&Match> {
    matches.iter().filter(|m| m.counts_for_standings()).collect()
}

fn index_players(standings: &[Standing]) -> HashMap<PlayerId, usize> {
    let mut idx = HashMap::new();
    for (i, s) in standings.iter().enumerate() {
        idx.entry(s.player_id).or_insert(i);
    }
    idx
}

fn lookup(
    player_to_idx: &HashMap<PlayerId, usize>,
    m: &Match,
    player_id: PlayerId,
) -> Result<usize, StandingsError> {
    player_to_idx
        .get(&player_id)
        .copied()
        .ok_or(StandingsError::UnknownPlayer {
            match_id: m.id,
            player_id,
        })
}

fn apply_sets(standing: &mut Standing, won: i32, lost: i32) {
    standing.sets_won += won;
    standing.sets_lost += lost;
}

/// A counted match must be decisive: exactly one side reached the winning
/// game count, and a recorded winner must be that side.
pub fn validate_result(m: &Match) -> Result<(), StandingsError> {
    if m.player1_id == m.player2_id {
        return Err(StandingsError::SelfMatch {
            match_id: m.id,
            player_id: m.player1_id,
        });
    }

    let Some((games1, games2)) = m.score() else {
        return Ok(());
    };

    let in_range = |g: i32| (0..=GAMES_TO_WIN).contains(&g);
    let decisive = (games1 == GAMES_TO_WIN) != (games2 == GAMES_TO_WIN);
    if !in_range(games1) || !in_range(games2) || !decisive {
        return Err(StandingsError::InvalidScore {
            match_id: m.id,
            games_won1: games1,
            games_won2: games2,
        });
    }

    if let Some(winner_id) = m.winner_id {
        if Some(winner_id) != m.decided_winner() {
            return Err(StandingsError::InconsistentWinner {
                match_id: m.id,
                winner_id,
            });
        }
    }

    Ok(())
}
