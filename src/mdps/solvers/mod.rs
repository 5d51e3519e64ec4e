pub mod mc_methods;
pub mod policy_evaluation;
pub mod value_iteration;

use crate::common::defs::*;

pub trait MdpSolver<T> {
    fn v_star(&self, s: Discrete) -> Continous;

    fn q_star(&self, s: Discrete, a: Discrete) -> Option<Continous>;

    fn pi_star(&self, s: Discrete) -> Option<Discrete>;

    fn exec(&mut self, theta: Continous, num_iterations: Option<usize>) -> (T, usize);
}
