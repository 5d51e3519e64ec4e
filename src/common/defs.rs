use super::errors::*;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Discrete = usize;
pub type Continous = f64;

/// A `(row, col)` coordinate on the grid, 0-indexed, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Cell reached by moving one step along `action`, or `None` when that
    /// step leaves a `size x size` grid.
    pub fn neighbour(self, action: Action, size: usize) -> Option<Cell> {
        let (dr, dc) = action.delta();
        let row = self.row.checked_add_signed(dr).filter(|&r| r < size)?;
        let col = self.col.checked_add_signed(dc).filter(|&c| c < size)?;
        Some(Cell::new(row, col))
    }

    /// Like `neighbour`, but a move across the grid edge leaves the cell where
    /// it is. Every action moves along a single axis.
    pub fn bounce(self, action: Action, size: usize) -> Cell {
        self.neighbour(action, size).unwrap_or(self)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The four grid moves. Discriminants are the action indices used in `P` and `R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(usize)]
pub enum Action {
    Left = 0,
    Right = 1,
    Up = 2,
    Down = 3,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Left, Action::Right, Action::Up, Action::Down];

    pub const COUNT: usize = Self::ALL.len();

    /// `(d_row, d_col)` displacement.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Action::Left => (0, -1),
            Action::Right => (0, 1),
            Action::Up => (-1, 0),
            Action::Down => (1, 0),
        }
    }

    pub fn index(self) -> Discrete {
        self as Discrete
    }

    pub fn glyph(self) -> char {
        match self {
            Action::Left => '←',
            Action::Right => '→',
            Action::Up => '↑',
            Action::Down => '↓',
        }
    }
}

impl TryFrom<Discrete> for Action {
    type Error = GridWorldError;

    fn try_from(v: Discrete) -> Result<Self> {
        Ok(match v {
            0 => Action::Left,
            1 => Action::Right,
            2 => Action::Up,
            3 => Action::Down,
            _ => {
                return Err(GridWorldError::UnsupportedAction {
                    action: v,
                    n_a: Self::COUNT,
                })
            }
        })
    }
}

impl From<Action> for Discrete {
    fn from(a: Action) -> Self {
        a.index()
    }
}

/// Human readable view of a flat state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Cell(Cell),
    Absorbing,
}

impl Position {
    pub fn cell(&self) -> Option<Cell> {
        if let Self::Cell(c) = self {
            Some(*c)
        } else {
            None
        }
    }

    pub fn is_absorbing(&self) -> bool {
        matches!(self, Self::Absorbing)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Position::Cell(c) => c.fmt(f),
            Position::Absorbing => f.write_str("(absorbing)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn action_indices_roundtrip() {
        for i in 0..Action::COUNT {
            let a = Action::try_from(i).unwrap();
            assert_eq!(a.index(), i);
        }
        assert!(matches!(
            Action::try_from(4),
            Err(GridWorldError::UnsupportedAction { action: 4, n_a: 4 })
        ));
    }

    #[rstest]
    #[case(Cell::new(0, 0), Action::Left, Cell::new(0, 0))]
    #[case(Cell::new(0, 0), Action::Up, Cell::new(0, 0))]
    #[case(Cell::new(0, 0), Action::Right, Cell::new(0, 1))]
    #[case(Cell::new(0, 0), Action::Down, Cell::new(1, 0))]
    #[case(Cell::new(2, 2), Action::Right, Cell::new(2, 2))]
    #[case(Cell::new(2, 2), Action::Down, Cell::new(2, 2))]
    #[case(Cell::new(1, 1), Action::Up, Cell::new(0, 1))]
    fn bounce_clips_at_grid_edges(#[case] from: Cell, #[case] a: Action, #[case] to: Cell) {
        assert_eq!(from.bounce(a, 3), to);
    }

    #[test]
    fn neighbour_is_none_off_grid() {
        assert_eq!(Cell::new(0, 0).neighbour(Action::Left, 3), None);
        assert_eq!(Cell::new(2, 1).neighbour(Action::Down, 3), None);
        assert_eq!(
            Cell::new(1, 1).neighbour(Action::Left, 3),
            Some(Cell::new(1, 0))
        );
    }
}
