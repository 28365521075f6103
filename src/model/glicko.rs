use std::{f64::consts::PI, hash::Hash};

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    error::RatingError,
    model::{
        constants::{DEFAULT_GLICKO_RATING, DEFAULT_GLICKO_RD, DEFAULT_RD_FLOOR, DEFAULT_TYPICAL_RD, Q},
        game::{outcome, Game},
        RatingSystem
    }
};

/// A player's Glicko state: rating, rating deviation and the last rating
/// period the player was active in (`None` before their first result).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlickoEntry {
    pub rating: f64,
    pub rd: f64,
    pub last_period: Option<i64>
}

/// Output of the single-period closed-form update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SinglePeriodResult {
    pub rating: f64,
    pub rd: f64
}

/// `g(RD)` de-weights results against opponents whose rating is uncertain.
pub fn g(rd: f64) -> f64 {
    1.0 / (1.0 + 3.0 * Q * Q * rd * rd / (PI * PI)).sqrt()
}

/// Expected score against an opponent of the given rating and RD.
pub fn expected_score(rating: f64, opponent_rating: f64, opponent_rd: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf(-g(opponent_rd) * (rating - opponent_rating) / 400.0))
}

/// Glicko rating engine.
///
/// Games are grouped into rating periods and applied one period at a time:
/// every player active in a period gets exactly one simultaneous update
/// built from all of their results in that period, read against the
/// period's pre-update snapshot. Between active periods a player's RD
/// inflates toward `initial_rd` at a pace set by `c_squared`.
#[derive(Debug, Clone)]
pub struct GlickoRating<P: Eq + Hash> {
    initial_rating: f64,
    initial_rd: f64,
    rd_floor: f64,
    c_squared: f64,
    clamp_rd_floor: bool,
    initial_data: IndexMap<P, GlickoEntry>
}

impl<P: Eq + Hash> Default for GlickoRating<P> {
    fn default() -> Self {
        GlickoRating {
            initial_rating: DEFAULT_GLICKO_RATING,
            initial_rd: DEFAULT_GLICKO_RD,
            rd_floor: DEFAULT_RD_FLOOR,
            c_squared: 0.0,
            clamp_rd_floor: false,
            initial_data: IndexMap::new()
        }
    }
}

impl<P: Eq + Hash + Clone> GlickoRating<P> {
    pub fn new(initial_rating: f64, initial_rd: f64, rd_floor: f64, c_squared: f64) -> GlickoRating<P> {
        GlickoRating {
            initial_rating,
            initial_rd,
            rd_floor,
            c_squared,
            clamp_rd_floor: false,
            initial_data: IndexMap::new()
        }
    }

    pub fn with_initial_data(mut self, initial_data: IndexMap<P, GlickoEntry>) -> Self {
        self.initial_data = initial_data;
        self
    }

    /// Opt-in: clamp each updated RD to `rd_floor` from below, so a long
    /// streak of results cannot freeze a player's rating in place. Off by
    /// default; the historical update leaves RD unclamped.
    pub fn with_rd_floor_clamp(mut self) -> Self {
        self.clamp_rd_floor = true;
        self
    }

    /// Derives `c_squared` so that after `t` inactive rating periods a
    /// rating with a typical RD of 50 becomes as unreliable as a new
    /// player's, and stores it on the engine.
    pub fn calc_c_squared(&mut self, t: f64) {
        self.c_squared = (self.initial_rd.powi(2) - DEFAULT_TYPICAL_RD.powi(2)) / t;
    }

    pub fn c_squared(&self) -> f64 {
        self.c_squared
    }

    /// RD after `elapsed_periods` of inactivity: grows with elapsed time,
    /// never exceeding `initial_rd`.
    pub fn calc_current_rd(&self, rd: f64, elapsed_periods: i64) -> f64 {
        (rd * rd + self.c_squared * elapsed_periods as f64)
            .sqrt()
            .min(self.initial_rd)
    }

    /// One player's closed-form update for a single rating period.
    ///
    /// `results` holds `(opponent_rating, opponent_rd, score)` triples with
    /// score 1.0 for a win, 0.5 for a draw and 0.0 for a loss. With no
    /// results the state is returned unchanged.
    pub fn calculate_single_period_rating(
        &self,
        rating: f64,
        rd: f64,
        results: &[(f64, f64, f64)]
    ) -> SinglePeriodResult {
        let mut rating_sum = 0.0;
        let mut variance_sum = 0.0;

        for &(opponent_rating, opponent_rd, score) in results {
            let g_opp = g(opponent_rd);
            let expected = expected_score(rating, opponent_rating, opponent_rd);

            rating_sum += g_opp * (score - expected);
            variance_sum += g_opp * g_opp * expected * (1.0 - expected);
        }

        if variance_sum == 0.0 {
            return SinglePeriodResult { rating, rd };
        }

        // denom = 1/RD^2 + 1/d^2, with d^2 = 1/(q^2 * variance_sum)
        let denom = 1.0 / (rd * rd) + Q * Q * variance_sum;
        let new_rating = rating + (Q / denom) * rating_sum;
        let mut new_rd = (1.0 / denom).sqrt();

        if self.clamp_rd_floor {
            new_rd = new_rd.max(self.rd_floor);
        }

        SinglePeriodResult {
            rating: new_rating,
            rd: new_rd
        }
    }

    fn default_entry(&self) -> GlickoEntry {
        GlickoEntry {
            rating: self.initial_rating,
            rd: self.initial_rd,
            last_period: None
        }
    }

    /// Applies one closed rating period to the state. All expectations in
    /// the period read the pre-period snapshot (with inactivity-adjusted
    /// RDs); every active player is then updated exactly once.
    fn apply_period(&self, state: &mut IndexMap<P, GlickoEntry>, period: i64, games: &[Game<P>]) {
        // Pre-period snapshot of every active player: rating plus
        // inactivity-adjusted RD. Players with no prior activity keep
        // their RD as-is.
        let mut snapshot: IndexMap<P, (f64, f64)> = IndexMap::new();

        for game in games {
            if game.player_count() < 2 {
                continue;
            }

            for player in game.players() {
                if snapshot.contains_key(player) {
                    continue;
                }

                let entry = state.get(player).copied().unwrap_or_else(|| self.default_entry());
                let rd = match entry.last_period {
                    None => entry.rd,
                    Some(last_period) => self.calc_current_rd(entry.rd, period - last_period)
                };

                snapshot.insert(player.clone(), (entry.rating, rd));
            }
        }

        // Each unordered pair contributes two directed observations, one
        // per player's perspective.
        let mut results: IndexMap<&P, Vec<(f64, f64, f64)>> = IndexMap::new();

        for game in games {
            if game.player_count() < 2 {
                continue;
            }

            let entries: Vec<(&P, f64)> = game.entries().collect();

            for (i, j) in (0..entries.len()).tuple_combinations() {
                let (player_a, score_a) = entries[i];
                let (player_b, score_b) = entries[j];
                let (rating_a, rd_a) = snapshot[player_a];
                let (rating_b, rd_b) = snapshot[player_b];

                results
                    .entry(player_a)
                    .or_default()
                    .push((rating_b, rd_b, outcome(score_a, score_b)));
                results
                    .entry(player_b)
                    .or_default()
                    .push((rating_a, rd_a, outcome(score_b, score_a)));
            }
        }

        for (player, observations) in &results {
            let (rating, rd) = snapshot[*player];
            let updated = self.calculate_single_period_rating(rating, rd, observations);

            trace!(
                rating_before = rating,
                rating_after = updated.rating,
                rd_after = updated.rd,
                "period update"
            );

            state.insert(
                (**player).clone(),
                GlickoEntry {
                    rating: updated.rating,
                    rd: updated.rd,
                    last_period: Some(period)
                }
            );
        }

        debug!(period, games = games.len(), players = results.len(), "rating period closed");
    }

    fn process(
        &self,
        games: impl IntoIterator<Item = (i64, Game<P>)>
    ) -> Result<IndexMap<P, GlickoEntry>, RatingError> {
        let mut state = self.initial_data.clone();

        // One open group at a time: flush exactly once at each period
        // boundary and once more at end of stream.
        let mut open_period: Option<i64> = None;
        let mut open_games: Vec<Game<P>> = Vec::new();

        for (period, game) in games {
            match open_period {
                Some(previous) if period < previous => {
                    return Err(RatingError::PeriodOrder {
                        previous,
                        current: period
                    });
                }
                Some(previous) if period > previous => {
                    self.apply_period(&mut state, previous, &open_games);
                    open_games.clear();
                    open_period = Some(period);
                }
                None => open_period = Some(period),
                _ => {}
            }

            open_games.push(game);
        }

        if let Some(period) = open_period {
            self.apply_period(&mut state, period, &open_games);
        }

        Ok(state)
    }
}

impl<P: Eq + Hash + Clone> RatingSystem<P> for GlickoRating<P> {
    type Game = (i64, Game<P>);
    type Output = IndexMap<P, GlickoEntry>;

    fn calculate(&self, games: impl IntoIterator<Item = (i64, Game<P>)>) -> Result<Self::Output, RatingError> {
        self.process(games)
    }
}
