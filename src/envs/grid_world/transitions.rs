use super::state_coder::flat_index;
use crate::common::{defs::*, errors::*};
use itertools::iproduct;
use ndarray::{s, Array3, ArrayView3};
use std::collections::BTreeSet;
use tracing::debug;

/// Incrementally builds the `|S| x |A| x |S|` transition tensor of a square
/// grid. Call `add_grid` once, then any number of `add_wall_at` /
/// `add_terminal_at` in any order.
#[derive(Debug, Clone)]
pub struct TransitionMatrixBuilder {
    grid_size: usize,
    has_terminal_state: bool,
    p: Array3<Continous>,
    grid_added: bool,
    walls: BTreeSet<Cell>,
    terminals: BTreeSet<Cell>,
}

impl TransitionMatrixBuilder {
    pub fn new(grid_size: usize, has_terminal_state: bool) -> Self {
        let n_s = grid_size * grid_size + usize::from(has_terminal_state);
        Self {
            grid_size,
            has_terminal_state,
            p: Array3::zeros((n_s, Action::COUNT, n_s)),
            grid_added: false,
            walls: BTreeSet::new(),
            terminals: BTreeSet::new(),
        }
    }

    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    pub fn num_states(&self) -> usize {
        self.p.dim().0
    }

    pub fn absorbing_state(&self) -> Option<Discrete> {
        self.has_terminal_state.then(|| self.num_states() - 1)
    }

    pub fn walls(&self) -> &BTreeSet<Cell> {
        &self.walls
    }

    pub fn p(&self) -> ArrayView3<'_, Continous> {
        self.p.view()
    }

    pub fn into_p(self) -> Array3<Continous> {
        self.p
    }

    /// Open-grid dynamics: the chosen direction succeeds with `p_success`,
    /// the remainder is split evenly over the other three directions. Moves
    /// across the grid edge bounce back on that axis.
    pub fn add_grid(&mut self, p_success: Continous) -> Result<()> {
        if self.grid_added {
            return Err(GridWorldError::BuildOrder("add_grid was already called"));
        }
        if !(0.0..=1.0).contains(&p_success) {
            return Err(GridWorldError::InvalidProbability(p_success));
        }

        let n = self.grid_size;
        let p_slip = (1. - p_success) / (Action::COUNT - 1) as Continous;
        for (r, c, a) in iproduct!(0..n, 0..n, Action::ALL) {
            let cell = Cell::new(r, c);
            let s = flat_index(cell, n)?;
            let target = flat_index(cell.bounce(a, n), n)?;
            self.p[[s, a.index(), target]] += p_success;
            if p_success < 1. {
                for other in Action::ALL.into_iter().filter(|&o| o != a) {
                    let target = flat_index(cell.bounce(other, n), n)?;
                    self.p[[s, a.index(), target]] += p_slip;
                }
            }
        }

        if let Some(absorbing) = self.absorbing_state() {
            self.p.slice_mut(s![absorbing, .., absorbing]).fill(1.);
        }

        self.grid_added = true;
        debug!(grid_size = n, p_success, "added open grid dynamics");
        Ok(())
    }

    /// Turns `cell` into a wall: every move into it bounces back to where it
    /// came from, and the wall itself becomes a self-loop. Only row `wall` and
    /// column `wall` are touched, so walls commute.
    pub fn add_wall_at(&mut self, cell: Cell) -> Result<()> {
        if !self.grid_added {
            return Err(GridWorldError::BuildOrder("add_grid must be called before add_wall_at"));
        }
        let w = flat_index(cell, self.grid_size).map_err(|_| GridWorldError::InvalidWall {
            cell,
            reason: "outside the grid",
        })?;
        if self.walls.contains(&cell) {
            return Err(GridWorldError::InvalidWall {
                cell,
                reason: "already a wall",
            });
        }
        if self.terminals.contains(&cell) {
            return Err(GridWorldError::InvalidWall {
                cell,
                reason: "already a terminal state",
            });
        }

        let (n_s, n_a, _) = self.p.dim();
        for (s, a) in iproduct!(0..n_s, 0..n_a) {
            let mass = std::mem::take(&mut self.p[[s, a, w]]);
            self.p[[s, a, s]] += mass;
        }
        let mut own = self.p.slice_mut(s![w, .., ..]);
        own.fill(0.);
        own.slice_mut(s![.., w]).fill(1.);

        self.walls.insert(cell);
        debug!(%cell, "added wall");
        Ok(())
    }

    /// Makes `cell` terminal: every action from it leads to the absorbing state.
    pub fn add_terminal_at(&mut self, cell: Cell) -> Result<()> {
        if !self.grid_added {
            return Err(GridWorldError::BuildOrder("add_grid must be called before add_terminal_at"));
        }
        let t = flat_index(cell, self.grid_size)?;
        let absorbing = self.absorbing_state().ok_or(GridWorldError::InvalidTerminalState {
            state: t,
            reason: "builder has no absorbing state",
        })?;
        if self.walls.contains(&cell) {
            return Err(GridWorldError::InvalidTerminalState {
                state: t,
                reason: "cell is a wall",
            });
        }

        let mut row = self.p.slice_mut(s![t, .., ..]);
        row.fill(0.);
        row.slice_mut(s![.., absorbing]).fill(1.);

        self.terminals.insert(cell);
        debug!(%cell, "added terminal state");
        Ok(())
    }
}
