//! Opponent hand inference.
//!
//! - `tracker`: seen cards, certain and probable absence per bucket, and
//!   probable-hand reconstruction.

mod tracker;

pub use tracker::{BeliefTracker, OpponentBelief};
