//! Deterministic random number generation
//!
//! Uses the xorshift64* algorithm for fast, reproducible sampling.
//! Every random rider arrival in the simulator is drawn through this module.

mod xorshift;

pub use xorshift::RngManager;
