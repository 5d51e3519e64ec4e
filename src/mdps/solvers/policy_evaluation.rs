use crate::common::{defs::*, errors::*};
use crate::mdps::mdp::Mdp;
use ndarray::{s, Array1, Array2, ArrayView2, Axis};

/// Iterative policy evaluation of a stochastic `|S| x |A|` policy `pi`.
/// Returns `V_pi` and the number of sweeps made.
pub fn evaluate_policy(
    mdp: &dyn Mdp,
    pi: ArrayView2<'_, Continous>,
    theta: Continous,
    num_iterations: Option<usize>,
) -> Result<(Array1<Continous>, usize)> {
    let (n_s, n_a) = (mdp.n_s(), mdp.n_a());
    if pi.dim() != (n_s, n_a) {
        return Err(GridWorldError::InvalidModel(format!(
            "policy has shape {:?}, expected ({n_s}, {n_a})",
            pi.dim()
        )));
    }
    if pi
        .axis_iter(Axis(0))
        .any(|row| (row.sum() - 1.).abs() > 1e-6 || row.iter().any(|&x| x < 0.))
    {
        return Err(GridWorldError::InvalidModel(
            "policy rows must be probability distributions".into(),
        ));
    }

    let (p, r, gamma) = (mdp.transition(), mdp.reward(), mdp.gamma());
    let mut v = Array1::<Continous>::zeros(n_s);
    let max_iterations = num_iterations.unwrap_or(usize::MAX);
    let mut i = 0;
    while i < max_iterations {
        i += 1;
        let next = Array1::from_shape_fn(n_s, |st| {
            (0..n_a)
                .map(|a| pi[[st, a]] * (r[[st, a]] + gamma * p.slice(s![st, a, ..]).dot(&v)))
                .sum::<Continous>()
        });
        let delta = (&next - &v).fold(0., |m: Continous, d| m.max(d.abs()));
        v = next;
        if delta < theta {
            break;
        }
    }
    Ok((v, i))
}

/// Uniform random policy over all actions.
pub fn uniform_policy(n_s: usize, n_a: usize) -> Array2<Continous> {
    Array2::from_elem((n_s, n_a), 1. / n_a as Continous)
}
