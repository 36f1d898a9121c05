//! Win detection logic.
//!
//! A win is `L` consecutive cells held by one player along a row, a column,
//! a diagonal or an anti-diagonal, where `L` is the board's win length.
//! Windows never wrap across row boundaries.

use super::super::{Board, BoardSize, Player, Square};
use tracing::{debug, instrument};

/// Step between consecutive cells of a window, as `(row, col)` deltas.
const DIRECTIONS: [(usize, isize); 4] = [
    (0, 1),  // rows
    (1, 0),  // columns
    (1, 1),  // diagonals
    (1, -1), // anti-diagonals
];

/// A completed line: the player holding it and its cell indices in order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    /// Player occupying every cell of the line.
    pub player: Player,
    /// Row-major cell indices, from the start of the window.
    pub cells: Vec<usize>,
}

/// Every window of win length that fits on a board of this size.
///
/// Yields rows first, then columns, diagonals and anti-diagonals; within a
/// direction, windows are ordered by their starting cell.
pub fn windows(size: BoardSize) -> impl Iterator<Item = Vec<usize>> {
    let n = size.get();
    let len = size.win_length();
    DIRECTIONS.into_iter().flat_map(move |(dr, dc)| {
        (0..n).flat_map(move |row| {
            (0..n).filter_map(move |col| window(n, len, row, col, dr, dc))
        })
    })
}

/// Cell indices of the window starting at `(row, col)`, if it fits.
fn window(n: usize, len: usize, row: usize, col: usize, dr: usize, dc: isize) -> Option<Vec<usize>> {
    let span = len - 1;
    let end_row = row + span * dr;
    let end_col = col as isize + span as isize * dc;
    if end_row >= n || end_col < 0 || end_col >= n as isize {
        return None;
    }

    Some(
        (0..len)
            .map(|i| {
                let r = row + i * dr;
                let c = (col as isize + i as isize * dc) as usize;
                r * n + c
            })
            .collect(),
    )
}

/// Finds the first completed line, scanning in [`windows`] order.
#[instrument(skip(board), fields(size = %board.size()))]
pub fn winning_line(board: &Board) -> Option<Line> {
    let squares = board.squares();
    let line = windows(board.size()).find_map(|cells| {
        let Square::Occupied(player) = squares[cells[0]] else {
            return None;
        };
        cells[1..]
            .iter()
            .all(|&pos| squares[pos] == Square::Occupied(player))
            .then_some(Line { player, cells })
    });

    if let Some(ref line) = line {
        debug!(player = %line.player, cells = ?line.cells, "Winning line found");
    }
    line
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(player)` if the player holds a full window, `None` otherwise.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Player> {
    winning_line(board).map(|line| line.player)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(size: usize, marks: &[(usize, Player)]) -> Board {
        let mut board = Board::new(BoardSize::new(size).unwrap());
        for &(pos, player) in marks {
            board.place(pos, player).unwrap();
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new(BoardSize::DEFAULT);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_window_counts() {
        let count = |n| windows(BoardSize::new(n).unwrap()).count();
        assert_eq!(count(3), 8);
        assert_eq!(count(4), 10);
        assert_eq!(count(5), 12);
        // 6 rows × 2 + 6 columns × 2 + 4 diagonals + 4 anti-diagonals
        assert_eq!(count(6), 32);
    }

    #[test]
    fn test_windows_stay_inside_board() {
        for n in BoardSize::MIN..=BoardSize::MAX {
            let size = BoardSize::new(n).unwrap();
            for cells in windows(size) {
                assert_eq!(cells.len(), size.win_length());
                assert!(cells.iter().all(|&c| c < size.cells()));
            }
        }
    }

    #[test]
    fn test_winner_top_row() {
        let board = board_with(3, &[(0, Player::X), (1, Player::X), (2, Player::X)]);
        assert_eq!(check_winner(&board), Some(Player::X));
    }

    #[test]
    fn test_winner_column() {
        let board = board_with(3, &[(1, Player::O), (4, Player::O), (7, Player::O)]);
        assert_eq!(check_winner(&board), Some(Player::O));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = board_with(3, &[(2, Player::O), (4, Player::O), (6, Player::O)]);
        let line = winning_line(&board).unwrap();
        assert_eq!(line.player, Player::O);
        assert_eq!(line.cells, vec![2, 4, 6]);
    }

    #[test]
    fn test_row_does_not_wrap() {
        // 2, 3, 4 on a 3x3 board are the end of row 0 and start of row 1.
        let board = board_with(3, &[(2, Player::X), (3, Player::X), (4, Player::X)]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_anti_diagonal_does_not_wrap() {
        // On 5x5: 3, 7, 11, 15, 19 steps by N-1 but wraps at 15.
        let marks: Vec<_> = [3, 7, 11, 15, 19].into_iter().map(|p| (p, Player::X)).collect();
        let board = board_with(5, &marks);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = board_with(3, &[(0, Player::X), (1, Player::X)]);
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_five_in_a_row_on_large_board() {
        let marks: Vec<_> = (0..5).map(|i| (22 + i * 11, Player::O)).collect();
        let board = board_with(10, &marks);
        assert_eq!(check_winner(&board), Some(Player::O));
    }

    #[test]
    fn test_four_is_not_enough_on_large_board() {
        let marks: Vec<_> = (0..4).map(|i| (30 + i, Player::X)).collect();
        let board = board_with(7, &marks);
        assert_eq!(check_winner(&board), None);
    }
}
