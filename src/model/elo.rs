use std::hash::Hash;

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::debug;

use crate::{
    error::RatingError,
    model::{
        constants::{DEFAULT_INITIAL_AVERAGE, ELO_SCALE},
        game::{outcome, Game},
        RatingSystem
    }
};

/// Step table mapping rating boundaries to K values.
///
/// Entries are kept sorted with the unbounded (`None`) boundary first.
/// For a given rating, the applicable K is the value of the last boundary
/// less than or equal to the rating.
#[derive(Debug, Clone)]
pub struct KFactorTable {
    entries: Vec<(Option<f64>, f64)>
}

impl Default for KFactorTable {
    /// The conventional FIDE-style ladder: K=32 for everyone, dropping to
    /// 24 at 2100 and 12 at 2401.
    fn default() -> Self {
        KFactorTable::new(vec![(None, 32.0), (Some(2100.0), 24.0), (Some(2401.0), 12.0)])
            .expect("default K-factor table is valid")
    }
}

impl KFactorTable {
    pub fn new(entries: impl IntoIterator<Item = (Option<f64>, f64)>) -> Result<KFactorTable, RatingError> {
        let mut entries: Vec<(Option<f64>, f64)> = entries.into_iter().collect();

        if entries.is_empty() {
            return Err(RatingError::EmptyKFactorTable);
        }

        // None sorts to the front, always
        entries.sort_by(|(a, _), (b, _)| match (a, b) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(a), Some(b)) => a.total_cmp(b)
        });

        if let (Some(boundary), _) = entries[0] {
            return Err(RatingError::UnboundedEntryMissing {
                lowest_boundary: boundary
            });
        }

        Ok(KFactorTable { entries })
    }

    /// The K factor for a player with the given rating: scan boundaries in
    /// order and stop at the first one strictly above the rating.
    pub fn k_for(&self, rating: f64) -> f64 {
        let mut k = self.entries[0].1;

        for (boundary, value) in &self.entries {
            if let Some(boundary) = boundary {
                if *boundary > rating {
                    break;
                }
            }
            k = *value;
        }

        k
    }
}

/// Player ratings with an explicit lazy default: a player not yet present
/// materializes at the running average of all known ratings (or the
/// configured initial value while the ledger is empty). Once materialized
/// the value is stored and never recomputed.
#[derive(Debug, Clone)]
pub struct RatingLedger<P: Eq + Hash> {
    ratings: IndexMap<P, f64>,
    initial_average: f64
}

impl<P: Eq + Hash + Clone> RatingLedger<P> {
    pub fn new(initial_average: f64) -> RatingLedger<P> {
        RatingLedger {
            ratings: IndexMap::new(),
            initial_average
        }
    }

    pub fn with_seed(initial_average: f64, seed: IndexMap<P, f64>) -> RatingLedger<P> {
        RatingLedger {
            ratings: seed,
            initial_average
        }
    }

    /// Returns the stored rating, materializing the default on first
    /// access. Materializing stores the average itself, so later
    /// first-accesses in the same state see the same frozen value.
    pub fn resolve(&mut self, player: &P) -> f64 {
        if let Some(rating) = self.ratings.get(player) {
            return *rating;
        }

        let rating = if self.ratings.is_empty() {
            self.initial_average
        } else {
            self.ratings.values().sum::<f64>() / self.ratings.len() as f64
        };

        self.ratings.insert(player.clone(), rating);
        rating
    }

    pub fn apply(&mut self, player: &P, delta: f64) {
        if let Some(rating) = self.ratings.get_mut(player) {
            *rating += delta;
        }
    }

    pub fn into_inner(self) -> IndexMap<P, f64> {
        self.ratings
    }
}

/// Elo rating engine generalized to multi-player games: every pair of
/// players within a game is an independent virtual match, and all pairwise
/// adjustments apply simultaneously once the game is fully processed.
#[derive(Debug, Clone)]
pub struct EloRating<P: Eq + Hash> {
    k_factors: KFactorTable,
    initial_average: f64,
    initial_ratings: IndexMap<P, f64>
}

impl<P: Eq + Hash> Default for EloRating<P> {
    fn default() -> Self {
        EloRating {
            k_factors: KFactorTable::default(),
            initial_average: DEFAULT_INITIAL_AVERAGE,
            initial_ratings: IndexMap::new()
        }
    }
}

impl<P: Eq + Hash + Clone> EloRating<P> {
    pub fn new(
        k_factors: KFactorTable,
        initial_average: f64,
        initial_ratings: IndexMap<P, f64>
    ) -> EloRating<P> {
        EloRating {
            k_factors,
            initial_average,
            initial_ratings
        }
    }

    /// The pairwise Elo core: given both players' current ratings and the
    /// result from player A's perspective (1.0 win, 0.0 loss, 0.5 draw),
    /// returns the rating adjustments for (A, B).
    pub fn single_match_adjustment(&self, rating_a: f64, rating_b: f64, result: f64) -> (f64, f64) {
        let expected = 1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / ELO_SCALE));

        (
            self.k_factors.k_for(rating_a) * (result - expected),
            self.k_factors.k_for(rating_b) * (expected - result)
        )
    }

    fn process(&self, games: impl IntoIterator<Item = Game<P>>) -> IndexMap<P, f64> {
        let mut ledger = RatingLedger::with_seed(self.initial_average, self.initial_ratings.clone());
        let mut n_games = 0usize;

        for game in games {
            n_games += 1;
            if game.player_count() < 2 {
                continue;
            }

            // Pre-game snapshot: every expectation and K lookup in this
            // game reads these values, never a partially updated state.
            let snapshot: Vec<(P, f64, f64)> = game
                .entries()
                .map(|(player, score)| (player.clone(), ledger.resolve(player), score))
                .collect();

            let mut adjustments: IndexMap<&P, f64> = IndexMap::new();

            for (i, j) in (0..snapshot.len()).tuple_combinations() {
                let (ref player_a, rating_a, score_a) = snapshot[i];
                let (ref player_b, rating_b, score_b) = snapshot[j];

                let result = outcome(score_a, score_b);
                let (adj_a, adj_b) = self.single_match_adjustment(rating_a, rating_b, result);

                *adjustments.entry(player_a).or_insert(0.0) += adj_a;
                *adjustments.entry(player_b).or_insert(0.0) += adj_b;
            }

            // Simultaneous update: each player's accumulated delta lands
            // exactly once, after all pairs are scored.
            for (player, delta) in adjustments {
                ledger.apply(player, delta);
            }
        }

        debug!(games = n_games, "elo calculation complete");
        ledger.into_inner()
    }
}

impl<P: Eq + Hash + Clone> RatingSystem<P> for EloRating<P> {
    type Game = Game<P>;
    type Output = IndexMap<P, f64>;

    fn calculate(&self, games: impl IntoIterator<Item = Game<P>>) -> Result<Self::Output, RatingError> {
        Ok(self.process(games))
    }
}
