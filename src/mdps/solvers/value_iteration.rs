use super::MdpSolver;
use crate::common::defs::*;
use crate::mdps::mdp::Mdp;
use ndarray::{s, Array1, Array2, Axis};
use std::rc::Rc;
use tracing::{info, warn};

/// Value iteration - Sutton & Barto 2018, section 4.4.
pub struct ValueIteration {
    mdp: Rc<dyn Mdp>,
    v: Array1<Continous>,
    q: Array2<Continous>,
}

impl ValueIteration {
    pub fn new(mdp: Rc<dyn Mdp>) -> Self {
        let (n_s, n_a) = (mdp.n_s(), mdp.n_a());
        Self {
            mdp,
            v: Array1::zeros(n_s),
            q: Array2::zeros((n_s, n_a)),
        }
    }

    pub fn v(&self) -> &Array1<Continous> {
        &self.v
    }

    pub fn q(&self) -> &Array2<Continous> {
        &self.q
    }

    /// `Q[s, a] = R[s, a] + gamma * sum_s' P[s, a, s'] * V[s']`.
    fn backup(&self) -> Array2<Continous> {
        let p = self.mdp.transition();
        let r = self.mdp.reward();
        let gamma = self.mdp.gamma();
        Array2::from_shape_fn(r.dim(), |(s, a)| {
            r[[s, a]] + gamma * p.slice(s![s, a, ..]).dot(&self.v)
        })
    }
}

impl MdpSolver<bool> for ValueIteration {
    fn v_star(&self, s: Discrete) -> Continous {
        self.v[s]
    }

    fn q_star(&self, s: Discrete, a: Discrete) -> Option<Continous> {
        self.q.get([s, a]).copied()
    }

    fn pi_star(&self, s: Discrete) -> Option<Discrete> {
        let row = self.q.index_axis(Axis(0), s);
        (0..row.len()).fold(None, |best: Option<Discrete>, a| match best {
            Some(b) if row[b] >= row[a] => best,
            _ => Some(a),
        })
    }

    /// Sweeps until the largest value change drops below `theta`. Returns
    /// whether it converged and the number of sweeps made.
    fn exec(&mut self, theta: Continous, num_iterations: Option<usize>) -> (bool, usize) {
        let max_iterations = num_iterations.unwrap_or(usize::MAX);
        let mut i = 0;
        while i < max_iterations {
            i += 1;
            self.q = self.backup();
            let v = self.q.map_axis(Axis(1), |row| {
                row.fold(Continous::NEG_INFINITY, |m, &x| m.max(x))
            });
            let delta = (&v - &self.v).fold(0., |m: Continous, d| m.max(d.abs()));
            self.v = v;
            if delta < theta {
                info!(iterations = i, delta, "value iteration converged");
                return (true, i);
            }
        }

        warn!(iterations = i, "value iteration hit the iteration cap");
        (false, i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envs::grid_world::{config::GridWorldConfig, rewards::Goal, GridWorldMdp};
    use crate::mdps::mdp::tests::two_state_mdp;
    use float_eq::*;

    #[test]
    fn two_state_values() {
        let mdp = Rc::new(two_state_mdp(vec![]));
        let vi = &mut ValueIteration::new(mdp);
        let (converged, n) = vi.exec(1e-10, None);
        assert!(converged);
        assert!(n > 1);

        // Flipping out of state 0 pays 0.9 and usually lands in state 1,
        // which then wants to flip straight back.
        assert_eq!(vi.pi_star(0), Some(1));
        assert_eq!(vi.pi_star(1), Some(1));
        let (v0, v1) = (vi.v_star(0), vi.v_star(1));
        assert_float_eq!(v0, 0.9 + 0.9 * (0.1 * v0 + 0.9 * v1), abs <= 1e-8);
        assert_float_eq!(v1, 0.9 * (0.9 * v0 + 0.1 * v1), abs <= 1e-8);
        assert_eq!(vi.q_star(0, 5), None);
    }

    #[test]
    fn iteration_cap_is_reported() {
        let mdp = Rc::new(two_state_mdp(vec![]));
        let vi = &mut ValueIteration::new(mdp);
        assert_eq!(vi.exec(1e-12, Some(3)), (false, 3));
    }

    #[test]
    fn corridor_policy_walks_to_the_goal() {
        let cfg = GridWorldConfig::new(
            &["#####", "     ", "#####", "#####", "#####"],
            vec![Goal::new((1, 4), 1.)],
        );
        let mdp = Rc::new(GridWorldMdp::new(&cfg).unwrap());
        let vi = &mut ValueIteration::new(mdp);
        assert!(vi.exec(1e-9, Some(1000)).0);
        for s in 5..10 {
            assert_eq!(vi.pi_star(s), Some(Action::Right.index()));
        }
        assert!(vi.v_star(5) < vi.v_star(8));
    }
}
