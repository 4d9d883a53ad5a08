//! Capture arithmetic.
//!
//! - `sums`: totals reachable by a selection of cards
//! - `finder`: per-rank subset families and their disjoint-union closure

mod finder;
mod sums;

pub use finder::{CaptureMap, disjoint_unions, is_legal_capture};
pub use sums::{SumSet, subset_sums};
