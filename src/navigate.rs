use thiserror::Error;

use crate::bucket::Grid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CursorPosition {
    pub row: usize,
    pub col: usize,
}

impl CursorPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("cannot navigate an empty grid")]
    EmptyGrid,
    #[error("position ({row}, {col}) is outside the grid")]
    OutOfRange { row: usize, col: usize },
}

/// Columns wrap within a row. Rows wrap around the grid, and the column is
/// clamped (not wrapped) when the new row is shorter.
pub fn move_cursor(
    grid: &Grid,
    position: CursorPosition,
    direction: Direction,
) -> Result<CursorPosition, NavigationError> {
    if grid.is_empty() {
        return Err(NavigationError::EmptyGrid);
    }
    let out_of_range = NavigationError::OutOfRange {
        row: position.row,
        col: position.col,
    };
    let row_len = grid.row_len(position.row).ok_or(out_of_range)?;
    if position.col >= row_len {
        return Err(out_of_range);
    }

    let row_count = grid.len();
    let next = match direction {
        Direction::Right => CursorPosition::new(position.row, (position.col + 1) % row_len),
        Direction::Left => {
            CursorPosition::new(position.row, (position.col + row_len - 1) % row_len)
        }
        Direction::Down => clamp_to_row(grid, (position.row + 1) % row_count, position.col),
        Direction::Up => clamp_to_row(
            grid,
            (position.row + row_count - 1) % row_count,
            position.col,
        ),
    };
    Ok(next)
}

fn clamp_to_row(grid: &Grid, row: usize, col: usize) -> CursorPosition {
    let last_col = grid.row_len(row).unwrap_or(1).saturating_sub(1);
    CursorPosition::new(row, col.min(last_col))
}
