//! Job ordering engine
//!
//! Each status column is ordered by a sparse integer `priority`, highest
//! first. Moving a job computes a key from its neighbours
//! ([`PriorityCalculator`]); when the gap is used up the whole column is
//! renumbered ([`rebalance_column`]) and the key is computed again.
//! [`ReorderService`] runs the sequence against the database.

mod calculator;
mod rebalance;
mod service;

pub use calculator::{Placement, PriorityCalculator};
pub use rebalance::rebalance_column;
pub use service::{MoveOutcome, MoveRequest, ReorderService};
