//! Player skill ratings from sequences of competitive game results.
//!
//! Three systems share one [`Game`] abstraction: simple point tallying,
//! Elo with multi-player round-robin generalization, and Glicko with
//! period-batched updates. [`assign_ranks`] turns any rating map into
//! tie-aware competition ranks.

pub mod error;
pub mod model;
pub mod utils;

pub use error::RatingError;
pub use model::{
    elo::{EloRating, KFactorTable, RatingLedger},
    game::Game,
    glicko::{GlickoEntry, GlickoRating, SinglePeriodResult},
    ranks::{assign_ranks, assign_ranks_by},
    tally::TallyScoring,
    RatingSystem
};
