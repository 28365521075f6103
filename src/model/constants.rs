// Elo constants
pub const DEFAULT_INITIAL_AVERAGE: f64 = 1000.0;
pub const ELO_SCALE: f64 = 400.0;

// Glicko constants
pub const DEFAULT_GLICKO_RATING: f64 = 1500.0;
pub const DEFAULT_GLICKO_RD: f64 = 350.0;
pub const DEFAULT_RD_FLOOR: f64 = 30.0;
pub const DEFAULT_TYPICAL_RD: f64 = 50.0;

/// `q = ln(10) / 400`, the Glicko scale conversion constant.
pub const Q: f64 = core::f64::consts::LN_10 / 400.0;

// Tally constants
pub const DEFAULT_TALLY_TABLE: [f64; 8] = [10.0, 8.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
