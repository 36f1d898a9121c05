//! Gapless numbering invariant: move numbers run 1, 2, 3, ... in log order.

use super::Invariant;
use crate::MoveLog;

/// Invariant: The k-th move in the log carries move number k.
pub struct GaplessNumberingInvariant;

impl Invariant<MoveLog> for GaplessNumberingInvariant {
    fn holds(log: &MoveLog) -> bool {
        log.moves()
            .iter()
            .zip(1u32..)
            .all(|(recorded, expected)| recorded.move_number == expected)
    }

    fn description() -> &'static str {
        "Move numbers start at 1 and have no gaps"
    }
}
