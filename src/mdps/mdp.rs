use crate::common::{defs::*, errors::*};
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2, ArrayView3, Axis};

const ROW_SUM_TOLERANCE: f64 = 1e-6;

/// Markov Decision Process - Sutton & Barto 2018.
pub trait Mdp {
    fn n_s(&self) -> usize;

    fn n_a(&self) -> usize;

    /// `|S| x |A| x |S|` transition tensor.
    fn transition(&self) -> ArrayView3<'_, Continous>;

    /// `|S| x |A|` expected reward.
    fn reward(&self) -> ArrayView2<'_, Continous>;

    fn gamma(&self) -> Continous;
}

/// A fully specified tabular MDP: `(P, R, gamma, p0, terminal_states)`.
#[derive(Debug, Clone)]
pub struct TabularMdp {
    transition: Array3<Continous>,
    reward: Array2<Continous>,
    gamma: Continous,
    initial_state: Array1<Continous>,
    terminal_states: Vec<Discrete>,
    absorbing_state: Option<Discrete>,
}

impl TabularMdp {
    /// Checks that the tuple describes a proper MDP. The absorbing state, if
    /// any, is always the last index.
    pub fn new(
        transition: Array3<Continous>,
        reward: Array2<Continous>,
        gamma: Continous,
        initial_state: Array1<Continous>,
        terminal_states: Vec<Discrete>,
        has_absorbing_state: bool,
    ) -> Result<Self> {
        let (n_s, n_a, n_s2) = transition.dim();
        if n_s == 0 || n_a == 0 {
            return Err(invalid("empty transition tensor".into()));
        }
        if n_s != n_s2 {
            return Err(invalid(format!("P has shape {n_s}x{n_a}x{n_s2}")));
        }
        if reward.dim() != (n_s, n_a) {
            return Err(invalid(format!(
                "R has shape {:?}, expected ({n_s}, {n_a})",
                reward.dim()
            )));
        }
        if initial_state.len() != n_s {
            return Err(invalid(format!(
                "p0 has length {}, expected {n_s}",
                initial_state.len()
            )));
        }
        if !(0.0..=1.0).contains(&gamma) {
            return Err(invalid(format!("discount {gamma} is not within [0, 1]")));
        }
        if initial_state.iter().any(|&p| p < 0.) || !sums_to_one(initial_state.sum()) {
            return Err(invalid("p0 is not a probability distribution".into()));
        }
        for ((s, a), row) in transition
            .lanes(Axis(2))
            .into_iter()
            .enumerate()
            .map(|(i, row)| ((i / n_a, i % n_a), row))
        {
            if row.iter().any(|&p| p < 0.) || !sums_to_one(row.sum()) {
                return Err(invalid(format!(
                    "P[{s}, {a}, :] sums to {}, expected 1",
                    row.sum()
                )));
            }
        }
        if let Some(&t) = terminal_states.iter().find(|&&t| t >= n_s) {
            return Err(GridWorldError::InvalidTerminalState {
                state: t,
                reason: "index outside the state space",
            });
        }

        Ok(Self {
            transition,
            reward,
            gamma,
            initial_state,
            terminal_states,
            absorbing_state: has_absorbing_state.then_some(n_s - 1),
        })
    }

    pub fn initial_state(&self) -> ArrayView1<'_, Continous> {
        self.initial_state.view()
    }

    pub fn terminal_states(&self) -> &[Discrete] {
        &self.terminal_states
    }

    pub fn absorbing_state(&self) -> Option<Discrete> {
        self.absorbing_state
    }

    pub fn is_done(&self, s: Discrete) -> bool {
        self.absorbing_state == Some(s) || self.terminal_states.contains(&s)
    }
}

impl Mdp for TabularMdp {
    fn n_s(&self) -> usize {
        self.transition.dim().0
    }

    fn n_a(&self) -> usize {
        self.transition.dim().1
    }

    fn transition(&self) -> ArrayView3<'_, Continous> {
        self.transition.view()
    }

    fn reward(&self) -> ArrayView2<'_, Continous> {
        self.reward.view()
    }

    fn gamma(&self) -> Continous {
        self.gamma
    }
}

fn sums_to_one(sum: Continous) -> bool {
    (sum - 1.).abs() <= ROW_SUM_TOLERANCE
}

fn invalid(msg: String) -> GridWorldError {
    GridWorldError::InvalidModel(msg)
}
