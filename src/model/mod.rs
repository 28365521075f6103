pub mod constants;
pub mod elo;
pub mod game;
pub mod glicko;
pub mod ranks;
pub mod tally;

use crate::error::RatingError;

/// Common entry point shared by every rating/scoring system.
///
/// Implementations consume games in temporal order and return a
/// player-keyed result map. Engines hold configuration only; each
/// `calculate` call works on its own fresh state, so one engine value
/// can be reused across independent calculations.
pub trait RatingSystem<P> {
    /// The per-contest input item. For Elo and tally scoring this is a
    /// plain [`game::Game`]; Glicko tags each game with its rating period.
    type Game;
    /// The player-keyed output mapping.
    type Output;

    fn calculate(&self, games: impl IntoIterator<Item = Self::Game>) -> Result<Self::Output, RatingError>;
}
