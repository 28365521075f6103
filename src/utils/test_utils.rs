use std::hash::Hash;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::game::Game;

/// Builds a game from literal `(player, score)` pairs, panicking on
/// malformed input. Test convenience only.
pub fn game<P: Eq + Hash + Clone>(entries: &[(P, f64)]) -> Game<P> {
    Game::new(entries.iter().cloned()).expect("test game must have finite scores")
}

/// Generates `n_games` random games over a pool of `n_players` players
/// with integer scores, seeded for reproducible results.
pub fn generate_games(seed: u64, n_games: usize, n_players: u32) -> Vec<Game<u32>> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut games = Vec::with_capacity(n_games);

    for _ in 0..n_games {
        let entries: Vec<(u32, f64)> = (0..n_players)
            .map(|player| (player, rng.random_range(0..1000) as f64))
            .collect();

        games.push(game(&entries));
    }

    games
}
