//! Alternating turn invariant: players alternate X, O, X, O, ...

use super::Invariant;
use crate::{MoveLog, Player};

/// Invariant: Players alternate turns.
///
/// First move is always X.
pub struct AlternatingTurnInvariant;

impl Invariant<MoveLog> for AlternatingTurnInvariant {
    fn holds(log: &MoveLog) -> bool {
        let moves = log.moves();

        if let Some(first) = moves.first() {
            if first.player != Player::X {
                return false;
            }
        }

        moves.windows(2).all(|pair| pair[0].player != pair[1].player)
    }

    fn description() -> &'static str {
        "Players alternate turns (X, O, X, O, ...)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordedMove;

    #[test]
    fn test_empty_log_holds() {
        assert!(AlternatingTurnInvariant::holds(&MoveLog::new()));
    }

    #[test]
    fn test_alternating_sequence_holds() {
        let log = MoveLog::from(vec![
            RecordedMove::new(1, 0, Player::X),
            RecordedMove::new(2, 4, Player::O),
            RecordedMove::new(3, 8, Player::X),
        ]);
        assert!(AlternatingTurnInvariant::holds(&log));
    }

    #[test]
    fn test_o_first_violates() {
        let log = MoveLog::from(vec![RecordedMove::new(1, 0, Player::O)]);
        assert!(!AlternatingTurnInvariant::holds(&log));
    }

    #[test]
    fn test_same_player_twice_violates() {
        let log = MoveLog::from(vec![
            RecordedMove::new(1, 0, Player::X),
            RecordedMove::new(2, 4, Player::X),
        ]);
        assert!(!AlternatingTurnInvariant::holds(&log));
    }
}
