/// Random pick over a hydrated candidate list
///
/// Applies a conjunction of optional numeric constraints as an ordered
/// pipeline of named predicate stages, then selects one survivor uniformly
/// at random. A stage whose constraint is absent leaves the list untouched;
/// an empty list simply stays empty through the remaining stages.
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::models::GameCandidate;

/// Caller-supplied pick constraints.
///
/// Every field is lenient: missing, null, zero, negative, fractional, or
/// non-numeric JSON all mean "no restriction on this dimension". This
/// mirrors the search filter leniency; malformed input never errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PickConstraints {
    #[serde(default, deserialize_with = "lenient_positive")]
    pub min_age: Option<u32>,
    #[serde(default, deserialize_with = "lenient_positive")]
    pub min_playtime: Option<u32>,
    #[serde(default, deserialize_with = "lenient_positive")]
    pub max_playtime: Option<u32>,
    #[serde(default, deserialize_with = "lenient_positive")]
    pub min_players: Option<u32>,
    #[serde(default, deserialize_with = "lenient_positive")]
    pub max_players: Option<u32>,
}

/// Accepts only positive integers; everything else becomes `None`.
fn lenient_positive<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_u64)
        .filter(|&n| n > 0)
        .and_then(|n| u32::try_from(n).ok()))
}

fn retain_if(
    candidates: Vec<GameCandidate>,
    constraint: Option<u32>,
    keep: impl Fn(&GameCandidate, u32) -> bool,
) -> Vec<GameCandidate> {
    match constraint {
        Some(value) => candidates.into_iter().filter(|c| keep(c, value)).collect(),
        None => candidates,
    }
}

// The five predicate stages. Direction per dimension: a game's minimum
// recommended age and minimum player count must not exceed the caller's
// floor, while maximum player count must reach it.

fn by_min_age(candidates: Vec<GameCandidate>, limit: Option<u32>) -> Vec<GameCandidate> {
    retain_if(candidates, limit, |game, v| game.min_age <= v)
}

fn by_min_playtime(candidates: Vec<GameCandidate>, limit: Option<u32>) -> Vec<GameCandidate> {
    retain_if(candidates, limit, |game, v| game.min_playtime >= v)
}

fn by_max_playtime(candidates: Vec<GameCandidate>, limit: Option<u32>) -> Vec<GameCandidate> {
    retain_if(candidates, limit, |game, v| game.max_playtime <= v)
}

fn by_min_players(candidates: Vec<GameCandidate>, limit: Option<u32>) -> Vec<GameCandidate> {
    retain_if(candidates, limit, |game, v| game.min_players <= v)
}

fn by_max_players(candidates: Vec<GameCandidate>, limit: Option<u32>) -> Vec<GameCandidate> {
    retain_if(candidates, limit, |game, v| game.max_players >= v)
}

/// Narrows the candidate list by every supplied constraint, in fixed stage
/// order (min_age, min_playtime, max_playtime, min_players, max_players).
pub fn filter_candidates(
    candidates: Vec<GameCandidate>,
    constraints: &PickConstraints,
) -> Vec<GameCandidate> {
    let remaining = by_min_age(candidates, constraints.min_age);
    let remaining = by_min_playtime(remaining, constraints.min_playtime);
    let remaining = by_max_playtime(remaining, constraints.max_playtime);
    let remaining = by_min_players(remaining, constraints.min_players);
    by_max_players(remaining, constraints.max_players)
}

/// Picks one surviving candidate with uniform probability, or `None` when
/// nothing satisfies the constraints. An empty result is a valid outcome,
/// not an error.
pub fn pick_with<R: Rng + ?Sized>(
    candidates: Vec<GameCandidate>,
    constraints: &PickConstraints,
    rng: &mut R,
) -> Option<GameCandidate> {
    let survivors = filter_candidates(candidates, constraints);
    survivors.choose(rng).cloned()
}

/// Unseeded pick; no reproducibility guarantee. Tests inject their own rng
/// through [`pick_with`].
pub fn pick(candidates: Vec<GameCandidate>, constraints: &PickConstraints) -> Option<GameCandidate> {
    pick_with(candidates, constraints, &mut rand::thread_rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use serde_json::json;

    fn candidate(
        bg_id: u64,
        min_age: u32,
        players: (u32, u32),
        playtime: (u32, u32),
    ) -> GameCandidate {
        GameCandidate {
            bg_id,
            name: format!("Game {}", bg_id),
            image: None,
            min_age,
            min_players: players.0,
            max_players: players.1,
            min_playtime: playtime.0,
            max_playtime: playtime.1,
        }
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_no_constraints_draws_from_entire_list() {
        let candidates = vec![
            candidate(1, 8, (2, 4), (30, 60)),
            candidate(2, 12, (1, 6), (45, 90)),
            candidate(3, 14, (3, 5), (60, 120)),
        ];
        let constraints = PickConstraints::default();

        assert_eq!(
            filter_candidates(candidates.clone(), &constraints).len(),
            3
        );

        let mut rng = rng();
        for _ in 0..10 {
            let picked = pick_with(candidates.clone(), &constraints, &mut rng).unwrap();
            assert!(candidates.iter().any(|c| c.bg_id == picked.bg_id));
        }
    }

    #[test]
    fn test_min_age_keeps_games_at_or_below_floor() {
        let candidates = vec![
            candidate(1, 14, (2, 4), (30, 60)),
            candidate(2, 20, (2, 4), (30, 60)),
        ];
        let constraints = PickConstraints {
            min_age: Some(16),
            ..Default::default()
        };

        let survivors = filter_candidates(candidates, &constraints);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].bg_id, 1);
    }

    #[test]
    fn test_max_players_keeps_games_that_reach_the_bound() {
        let candidates = vec![
            candidate(1, 8, (2, 5), (30, 60)),
            candidate(2, 8, (2, 8), (30, 60)),
        ];
        let constraints = PickConstraints {
            max_players: Some(6),
            ..Default::default()
        };

        let survivors = filter_candidates(candidates, &constraints);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].bg_id, 2);
    }

    #[test]
    fn test_playtime_bounds() {
        let candidates = vec![
            candidate(1, 8, (2, 4), (20, 45)),
            candidate(2, 8, (2, 4), (45, 90)),
            candidate(3, 8, (2, 4), (60, 180)),
        ];
        let constraints = PickConstraints {
            min_playtime: Some(30),
            max_playtime: Some(120),
            ..Default::default()
        };

        let survivors = filter_candidates(candidates, &constraints);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].bg_id, 2);
    }

    #[test]
    fn test_stages_compose_as_conjunction() {
        let candidates = vec![
            candidate(1, 10, (2, 4), (30, 60)),
            candidate(2, 10, (5, 8), (30, 60)),
            candidate(3, 18, (2, 6), (30, 60)),
        ];
        let constraints = PickConstraints {
            min_age: Some(12),
            min_players: Some(3),
            max_players: Some(4),
            ..Default::default()
        };

        let survivors = filter_candidates(candidates, &constraints);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].bg_id, 1);
    }

    #[test]
    fn test_empty_survivor_set_is_none_not_error() {
        let candidates = vec![candidate(1, 20, (2, 4), (30, 60))];
        let constraints = PickConstraints {
            min_age: Some(10),
            ..Default::default()
        };

        assert_eq!(pick_with(candidates, &constraints, &mut rng()), None);
        assert_eq!(pick_with(Vec::new(), &constraints, &mut rng()), None);
    }

    #[test]
    fn test_constraint_deserialization_is_lenient() {
        let constraints: PickConstraints = serde_json::from_value(json!({
            "min_age": 12,
            "min_players": 0,
            "max_players": -4,
            "min_playtime": "abc",
            "max_playtime": 1.5,
        }))
        .unwrap();

        assert_eq!(constraints.min_age, Some(12));
        assert_eq!(constraints.min_players, None);
        assert_eq!(constraints.max_players, None);
        assert_eq!(constraints.min_playtime, None);
        assert_eq!(constraints.max_playtime, None);
    }

    #[test]
    fn test_missing_and_null_constraints_are_absent() {
        let constraints: PickConstraints =
            serde_json::from_value(json!({ "min_age": null })).unwrap();
        assert_eq!(constraints.min_age, None);
        assert_eq!(constraints.max_players, None);
    }

    #[test]
    fn test_zero_constraint_skips_stage_entirely() {
        let candidates = vec![
            candidate(1, 8, (2, 4), (30, 60)),
            candidate(2, 18, (2, 4), (30, 60)),
        ];
        let constraints: PickConstraints =
            serde_json::from_value(json!({ "min_age": 0 })).unwrap();

        assert_eq!(filter_candidates(candidates, &constraints).len(), 2);
    }
}
