use std::hash::Hash;

use indexmap::IndexMap;
use itertools::Itertools;
use tracing::debug;

use crate::{
    error::RatingError,
    model::{constants::DEFAULT_TALLY_TABLE, game::Game, RatingSystem}
};

/// Point-tally scoring: each game's finishers earn fixed points by finish
/// order, highest score first. The degenerate sibling of the rating
/// engines; it shares the [`Game`] contract but does no expectation math.
#[derive(Debug, Clone)]
pub struct TallyScoring {
    table: Vec<f64>
}

impl Default for TallyScoring {
    fn default() -> Self {
        TallyScoring {
            table: DEFAULT_TALLY_TABLE.to_vec()
        }
    }
}

impl TallyScoring {
    pub fn new(table: Vec<f64>) -> Result<TallyScoring, RatingError> {
        if table.is_empty() {
            return Err(RatingError::EmptyTallyTable);
        }

        Ok(TallyScoring { table })
    }

    fn tally<P: Eq + Hash + Clone>(&self, games: impl IntoIterator<Item = Game<P>>) -> IndexMap<P, f64> {
        let mut totals: IndexMap<P, f64> = IndexMap::new();

        for game in games {
            // Finish order: highest score first. Stable, so tied players
            // keep their insertion order.
            let finishers = game
                .entries()
                .sorted_by(|(_, a), (_, b)| b.total_cmp(a))
                .map(|(p, _)| p.clone())
                .collect::<Vec<_>>();

            for (player, points) in finishers.into_iter().zip(self.table.iter()) {
                *totals.entry(player).or_insert(0.0) += points;
            }
        }

        debug!(players = totals.len(), "tally scoring complete");
        totals
    }
}

impl<P: Eq + Hash + Clone> RatingSystem<P> for TallyScoring {
    type Game = Game<P>;
    type Output = IndexMap<P, f64>;

    fn calculate(&self, games: impl IntoIterator<Item = Game<P>>) -> Result<Self::Output, RatingError> {
        Ok(self.tally(games))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::test_utils::game;

    #[test]
    fn empty_table_is_a_config_error() {
        assert_eq!(TallyScoring::new(vec![]).unwrap_err(), RatingError::EmptyTallyTable);
    }

    #[test]
    fn mario_kart_sample_data() {
        // Finish positions encoded as negative placements, so first
        // place carries the highest score.
        let race_1 = game(&[("Toad", -1.0), ("Peach", -2.0), ("Donkey", -3.0), ("Mario", -4.0), ("Wario", -5.0)]);
        let race_2 = game(&[
            ("Peach", -1.0),
            ("Toad", -2.0),
            ("Mario", -3.0),
            ("Luigi", -4.0),
            ("Wario", -5.0),
            ("Donkey", -6.0), // irregular number of participants
        ]);
        let race_3 = game(&[("Wario", -1.0), ("Toad", -2.0), ("Mario", -3.0)]); // fewer competitors than points
        let race_4 = game(&[("Peach", -1.0), ("Toad", -2.0), ("Donkey", -3.0), ("Mario", -4.0), ("Wario", -5.0)]);

        let scoring = TallyScoring::new(vec![9.0, 6.0, 3.0, 1.0]).unwrap();
        let totals = scoring.calculate(vec![race_1, race_2, race_3, race_4]).unwrap();

        let expected = [
            ("Toad", 27.0),
            ("Peach", 24.0),
            ("Donkey", 6.0),
            ("Mario", 8.0),
            ("Wario", 9.0),
            ("Luigi", 1.0),
        ];

        assert_eq!(totals.len(), expected.len());
        for (player, points) in expected {
            assert_eq!(totals[&player], points, "unexpected total for {player}");
        }
    }

    #[test]
    fn players_beyond_table_earn_nothing() {
        let scoring = TallyScoring::new(vec![5.0]).unwrap();
        let totals = scoring
            .calculate(vec![game(&[("first", 2.0), ("second", 1.0)])])
            .unwrap();

        assert_eq!(totals[&"first"], 5.0);
        assert_eq!(totals.get(&"second"), None);
    }
}
