use crate::common::{defs::*, errors::*};
use itertools::iproduct;
use ndarray::{Array2, ArrayView2};
use std::fmt;

/// A single quiver arrow anchored at a cell centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    pub dx: Continous,
    pub dy: Continous,
    pub action: Action,
    pub positive: bool,
}

/// Renderable per-state, per-action quiver data of a square grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyPlot {
    pub title: String,
    pub size: usize,
    pub arrows: Vec<Arrow>,
    pub x_lim: (Continous, Continous),
    /// Inverted so that row 0 sits at the top.
    pub y_lim: (Continous, Continous),
    data: Array2<Continous>,
}

/// Builds the quiver plot of `data` (`|S| x 4`). Returns the suggested output
/// tag `plots/{title}` and the plot itself.
///
/// With `scale_data`, values are divided by `1.1 * max|data|` and the scale is
/// appended to the plot title. `frame = (x0, x1, y0, y1)` trims columns and
/// rows off the left/right/top/bottom of the axis limits.
pub fn plot_sa(
    title: &str,
    data: ArrayView2<'_, Continous>,
    size: usize,
    scale_data: bool,
    frame: (usize, usize, usize, usize),
) -> Result<(String, PolicyPlot)> {
    let (n_s, n_a) = data.dim();
    if n_a != Action::COUNT {
        return Err(GridWorldError::UnsupportedAction {
            action: n_a,
            n_a: Action::COUNT,
        });
    }
    if n_s < size * size {
        return Err(GridWorldError::InvalidModel(format!(
            "{n_s} rows cannot cover a {size}x{size} grid"
        )));
    }
    let (x0, x1, y0, y1) = frame;
    if x0 + x1 > size || y0 + y1 > size {
        return Err(GridWorldError::InvalidModel(format!(
            "frame {frame:?} trims more than a {size}x{size} grid"
        )));
    }

    let tag = format!("plots/{title}");
    let mut title = title.to_string();
    let mut data = data.to_owned();
    if scale_data {
        let scale = data.iter().fold(0., |m: Continous, v| m.max(v.abs()));
        if scale == 0. {
            return Err(GridWorldError::InvalidModel("cannot rescale all-zero data".into()));
        }
        data.mapv_inplace(|v| v / (scale * 1.1));
        title += &format!("_{scale:.4}");
    }

    let arrows = iproduct!(0..size, 0..size, Action::ALL)
        .filter_map(|(y, x, a)| {
            let v = data[[size * y + x, a.index()]];
            if v == 0. {
                return None;
            }
            // Plot coordinates: x grows right, y grows up.
            let (dr, dc) = a.delta();
            Some(Arrow {
                x,
                y,
                dx: dc as Continous * v.abs(),
                dy: -dr as Continous * v.abs(),
                action: a,
                positive: v > 0.,
            })
        })
        .collect();

    let lim = |lo: usize, hi: usize| (lo as Continous - 0.5, (size - hi) as Continous - 0.5);
    let (ylo, yhi) = lim(y0, y1);

    Ok((
        tag,
        PolicyPlot {
            title,
            size,
            arrows,
            x_lim: lim(x0, x1),
            y_lim: (yhi, ylo),
            data,
        },
    ))
}

impl PolicyPlot {
    /// Action with the largest value in each cell, `None` if all are zero.
    pub fn greedy_action(&self, cell: Cell) -> Option<Action> {
        let row = self.data.row(self.size * cell.row + cell.col);
        Action::ALL
            .into_iter()
            .filter(|a| row[a.index()] != 0.)
            .fold(None, |best: Option<Action>, a| match best {
                Some(b) if row[b.index()] >= row[a.index()] => best,
                _ => Some(a),
            })
    }
}

impl fmt::Display for PolicyPlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for r in 0..self.size {
            let line = (0..self.size)
                .map(|c| {
                    self.greedy_action(Cell::new(r, c))
                        .map_or('·', Action::glyph)
                })
                .collect::<String>();
            if r + 1 < self.size {
                writeln!(f, "{line}")?;
            } else {
                write!(f, "{line}")?;
            }
        }
        Ok(())
    }
}
