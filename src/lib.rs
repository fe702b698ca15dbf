//! Reader and plotter for Hantek 6022BE text exports.
pub mod drivers;
pub use drivers::*;
