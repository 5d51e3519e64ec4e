use super::state_coder::flat_index;
use crate::common::{defs::*, errors::*};
use ndarray::{s, Array2, ArrayView3};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A goal cell and the reward paid for reaching it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(flatten)]
    pub cell: Cell,
    pub reward: Continous,
}

impl Goal {
    pub fn new(cell: impl Into<Cell>, reward: Continous) -> Self {
        Self {
            cell: cell.into(),
            reward,
        }
    }
}

/// `R[s, a] = sum over goals of P[s, a, goal] * reward(goal)`.
///
/// Goals are additive; two goals on the same cell are rejected. Only grid
/// cells can be goals, so moving into the absorbing state never pays.
pub fn create_reward_matrix(
    p: ArrayView3<'_, Continous>,
    grid_size: usize,
    goals: &[Goal],
) -> Result<Array2<Continous>> {
    let (n_s, n_a, _) = p.dim();
    let mut seen = HashSet::new();
    let mut r = Array2::zeros((n_s, n_a));
    for goal in goals {
        if !seen.insert(goal.cell) {
            return Err(GridWorldError::AmbiguousReward(goal.cell));
        }
        let g = flat_index(goal.cell, grid_size)?;
        r.scaled_add(goal.reward, &p.slice(s![.., .., g]));
    }
    Ok(r)
}

#[cfg(test)]
mod tests {
    use super::super::transitions::TransitionMatrixBuilder;
    use super::*;
    use float_eq::*;
    use itertools::iproduct;

    fn deterministic_3x3() -> TransitionMatrixBuilder {
        let mut b = TransitionMatrixBuilder::new(3, false);
        b.add_grid(1.).unwrap();
        b
    }

    #[test]
    fn reward_only_where_goal_is_reached() {
        let b = deterministic_3x3();
        let r = create_reward_matrix(b.p(), 3, &[Goal::new((2, 2), 1.)]).unwrap();
        let right = Action::Right.index();
        let down = Action::Down.index();
        let expected = [(5, down), (7, right), (8, right), (8, down)];
        for (s, a) in iproduct!(0..9, 0..4) {
            let want = if expected.contains(&(s, a)) { 1. } else { 0. };
            assert_eq!(r[[s, a]], want, "R[{s}, {a}]");
        }
    }

    #[test]
    fn stochastic_rewards_are_expectations() {
        let mut b = TransitionMatrixBuilder::new(3, false);
        b.add_grid(0.7).unwrap();
        let r = create_reward_matrix(b.p(), 3, &[Goal::new((1, 2), 10.)]).unwrap();
        assert_float_eq!(r[[4, Action::Right.index()]], 7., abs <= 1e-9);
        assert_float_eq!(r[[4, Action::Up.index()]], 1., abs <= 1e-9);
        assert_float_eq!(r[[0, Action::Right.index()]], 0., abs <= 1e-9);
    }

    #[test]
    fn goals_are_additive() {
        let b = deterministic_3x3();
        let r = create_reward_matrix(
            b.p(),
            3,
            &[Goal::new((0, 1), 1.), Goal::new((1, 0), -2.)],
        )
        .unwrap();
        assert_eq!(r[[0, Action::Right.index()]], 1.);
        assert_eq!(r[[0, Action::Down.index()]], -2.);
        // Each cell is entered by its three neighbours plus a bounce off the edge.
        assert_eq!(r.sum(), 4. * 1. + 4. * -2.);
    }

    #[test]
    fn duplicate_goals_are_ambiguous() {
        let b = deterministic_3x3();
        let err = create_reward_matrix(
            b.p(),
            3,
            &[Goal::new((1, 1), 1.), Goal::new((1, 1), 2.)],
        )
        .unwrap_err();
        assert!(matches!(err, GridWorldError::AmbiguousReward(c) if c == Cell::new(1, 1)));
    }

    #[test]
    fn goal_outside_grid_is_rejected() {
        let b = deterministic_3x3();
        assert!(matches!(
            create_reward_matrix(b.p(), 3, &[Goal::new((3, 3), 1.)]),
            Err(GridWorldError::OutOfBounds { .. })
        ));
    }
}
