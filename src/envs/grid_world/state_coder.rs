use crate::common::{defs::*, errors::*};
use ndarray::{Array1, ArrayView1};

/// `size * row + col`.
pub fn flat_index(cell: Cell, size: usize) -> Result<Discrete> {
    if cell.row >= size || cell.col >= size {
        return Err(GridWorldError::OutOfBounds { cell, size });
    }
    Ok(size * cell.row + cell.col)
}

/// One-hot vector of length `total_states` for `cell`.
pub fn flatten_state(cell: Cell, size: usize, total_states: usize) -> Result<Array1<Continous>> {
    let i = flat_index(cell, size)?;
    if i >= total_states {
        return Err(GridWorldError::InvalidModel(format!(
            "{total_states} states cannot hold a {size}x{size} grid"
        )));
    }
    let mut v = Array1::zeros(total_states);
    v[i] = 1.;
    Ok(v)
}

/// Inverse of `flatten_state`. The hot entry is found by argmax; with an
/// absorbing state, index `size * size` maps to `Position::Absorbing`.
pub fn unflatten_state(
    onehot: ArrayView1<'_, Continous>,
    size: usize,
    has_absorbing_state: bool,
) -> Result<Position> {
    let i = argmax(onehot)
        .ok_or_else(|| GridWorldError::InvalidModel("empty state vector".into()))?;
    unflatten_index(i, size, has_absorbing_state)
}

pub fn unflatten_index(i: Discrete, size: usize, has_absorbing_state: bool) -> Result<Position> {
    let n = size * size;
    match i {
        _ if i < n => Ok(Position::Cell(Cell::new(i / size, i % size))),
        _ if i == n && has_absorbing_state => Ok(Position::Absorbing),
        _ => Err(GridWorldError::StateOutOfRange {
            state: i,
            n_s: n + usize::from(has_absorbing_state),
        }),
    }
}

/// First index of the largest entry.
fn argmax(v: ArrayView1<'_, Continous>) -> Option<Discrete> {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(Discrete, Continous)>, (i, &x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
}
