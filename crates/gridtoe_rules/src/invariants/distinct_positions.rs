//! Distinct positions invariant: no cell is played twice.

use std::collections::HashSet;

use super::Invariant;
use crate::MoveLog;

/// Invariant: Positions are pairwise distinct across the log.
pub struct DistinctPositionsInvariant;

impl Invariant<MoveLog> for DistinctPositionsInvariant {
    fn holds(log: &MoveLog) -> bool {
        let mut seen = HashSet::with_capacity(log.len());
        log.moves().iter().all(|recorded| seen.insert(recorded.position))
    }

    fn description() -> &'static str {
        "Every position is played at most once"
    }
}
