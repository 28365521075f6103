use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::RatingError;

/// A single contest: a read-only mapping from player to the score they
/// achieved. Relative score magnitude, not absolute value, decides
/// win/loss/draw between any two players in the game.
///
/// Player iteration follows insertion order, which makes every
/// downstream computation deterministic for a given input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game<P: Eq + Hash> {
    scores: IndexMap<P, f64>
}

impl<P: Eq + Hash> Game<P> {
    /// Builds a game from `(player, score)` pairs. Non-finite scores are
    /// rejected up front so the engines never divide by NaN later on.
    /// A duplicated player keeps the last score supplied.
    pub fn new(scores: impl IntoIterator<Item = (P, f64)>) -> Result<Game<P>, RatingError> {
        let scores: IndexMap<P, f64> = scores.into_iter().collect();

        for score in scores.values() {
            if !score.is_finite() {
                return Err(RatingError::NonFiniteScore { score: *score });
            }
        }

        Ok(Game { scores })
    }

    pub fn players(&self) -> impl Iterator<Item = &P> {
        self.scores.keys()
    }

    pub fn score(&self, player: &P) -> Option<f64> {
        self.scores.get(player).copied()
    }

    /// Iterates `(player, score)` pairs in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = (&P, f64)> {
        self.scores.iter().map(|(p, s)| (p, *s))
    }

    pub fn player_count(&self) -> usize {
        self.scores.len()
    }
}

/// The outcome of `a` vs `b` from `a`'s perspective: 1.0 win, 0.0 loss,
/// 0.5 draw. Higher score wins.
pub fn outcome(score_a: f64, score_b: f64) -> f64 {
    if score_a > score_b {
        1.0
    } else if score_a < score_b {
        0.0
    } else {
        0.5
    }
}
