//! Tabular grid-world MDPs built from ASCII mazes.
//!
//! A maze is parsed into wall and open cells, turned into a `|S| x |A| x |S|`
//! transition tensor and a `|S| x |A|` reward matrix, and wrapped in a
//! simulator that can be reset and stepped.

pub mod common;
pub mod envs;
pub mod mdps;

pub use common::{defs::*, errors::*};
pub use envs::grid_world::{
    config::{GridWorldConfig, StateRef},
    maze::Maze,
    plot::{plot_sa, PolicyPlot},
    rewards::{create_reward_matrix, Goal},
    state_coder::{flat_index, flatten_state, unflatten_state},
    transitions::TransitionMatrixBuilder,
    GridWorldMdp,
};
pub use mdps::{
    mdp::{Mdp, TabularMdp},
    mdp_simulator::{MdpSimulator, RngSampler, StateSampler, StepInfo},
    solvers::{value_iteration::ValueIteration, MdpSolver},
};
