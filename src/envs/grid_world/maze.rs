use crate::common::{defs::*, errors::*};
use itertools::iproduct;
use std::collections::BTreeSet;

pub const WALL: char = '#';

/// Four rooms joined by a doorway in each inner wall.
pub const FOUR_ROOMS: &str = "
#########
#   #   #
#       #
#   #   #
## ### ##
#   #   #
#       #
#   #   #
#########";

/// Splits maze text into rows. Only line endings are stripped and only empty
/// lines are skipped; spaces are open cells, so a row of spaces is kept.
pub fn text_rows(text: &str) -> Vec<&str> {
    text.lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| !l.is_empty())
        .collect()
}

/// A rectangular character map split into wall and open cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    chars: Vec<Vec<char>>,
    walls: BTreeSet<Cell>,
    open: BTreeSet<Cell>,
}

impl Maze {
    /// Parses maze text, one row per line. See `text_rows`.
    pub fn parse(text: &str) -> Result<Self> {
        Self::from_rows(&text_rows(text))
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let chars = rows
            .iter()
            .map(|r| r.as_ref().chars().collect::<Vec<_>>())
            .collect::<Vec<_>>();

        let width = match chars.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(GridWorldError::MalformedMap("map is empty".into())),
        };
        if let Some((i, row)) = chars.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GridWorldError::MalformedMap(format!(
                "row {i} has {} cells, expected {width}",
                row.len()
            )));
        }

        let (walls, open): (BTreeSet<_>, BTreeSet<_>) = iproduct!(0..chars.len(), 0..width)
            .map(|(r, c)| Cell::new(r, c))
            .partition(|c| chars[c.row][c.col] == WALL);

        Ok(Self { chars, walls, open })
    }

    pub fn height(&self) -> usize {
        self.chars.len()
    }

    pub fn width(&self) -> usize {
        self.chars[0].len()
    }

    /// Side length of a square maze.
    pub fn size(&self) -> Result<usize> {
        if self.height() != self.width() {
            return Err(GridWorldError::MalformedMap(format!(
                "map is {}x{}, expected a square grid",
                self.height(),
                self.width()
            )));
        }
        Ok(self.width())
    }

    pub fn char_matrix(&self) -> &[Vec<char>] {
        &self.chars
    }

    pub fn char_at(&self, cell: Cell) -> Option<char> {
        self.chars.get(cell.row).and_then(|r| r.get(cell.col)).copied()
    }

    pub fn walls(&self) -> &BTreeSet<Cell> {
        &self.walls
    }

    pub fn open_cells(&self) -> &BTreeSet<Cell> {
        &self.open
    }

    pub fn is_wall(&self, cell: Cell) -> bool {
        self.walls.contains(&cell)
    }
}
