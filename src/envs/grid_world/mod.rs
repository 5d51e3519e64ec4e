//! A square grid world with walls, assembled from a textual maze.

pub mod config;
pub mod maze;
pub mod plot;
pub mod rewards;
pub mod state_coder;
pub mod transitions;

use crate::common::{defs::*, errors::*};
use crate::mdps::{mdp::*, mdp_simulator::*};
use config::*;
use maze::Maze;
use ndarray::{Array1, ArrayView1, ArrayView2, ArrayView3};
use plot::PolicyPlot;
use rewards::create_reward_matrix;
use std::collections::BTreeSet;
use tracing::info;
use transitions::TransitionMatrixBuilder;

/// A grid-world MDP together with the runtime that steps it.
///
/// With terminal states there is an extra absorbing state at index
/// `size * size`, so `|S| = size * size + 1`.
#[derive(Debug, Clone)]
pub struct GridWorldMdp<S: StateSampler = RngSampler> {
    size: usize,
    has_absorbing_state: bool,
    human_state: Option<Position>,
    maze: Maze,
    sim: MdpSimulator<S>,
}

impl GridWorldMdp<RngSampler> {
    pub fn new(config: &GridWorldConfig) -> Result<Self> {
        let sampler = RngSampler::new(config.seed);
        Self::with_sampler(config, sampler)
    }

    /// The built-in four-rooms map, deterministic moves, `+1` at `goal`.
    pub fn four_rooms(goal: impl Into<Cell>) -> Result<Self> {
        Self::new(&GridWorldConfig::four_rooms(goal))
    }
}

impl<S: StateSampler> GridWorldMdp<S> {
    pub fn with_sampler(config: &GridWorldConfig, sampler: S) -> Result<Self> {
        let maze = Maze::from_rows(config.maze.as_slice())?;
        let size = maze.size()?;
        if maze.open_cells().is_empty() {
            return Err(GridWorldError::NoOpenCells);
        }

        let terminal_states = config
            .terminal_states
            .iter()
            .map(|t| terminal_index(&maze, size, *t))
            .collect::<Result<Vec<_>>>()?;
        let has_absorbing_state = !terminal_states.is_empty();

        let mut builder = TransitionMatrixBuilder::new(size, has_absorbing_state);
        builder.add_grid(config.p_success)?;
        for &wall in maze.walls() {
            builder.add_wall_at(wall)?;
        }
        for &t in terminal_states.iter().collect::<BTreeSet<_>>() {
            builder.add_terminal_at(Cell::new(t / size, t % size))?;
        }

        if let Some(goal) = config.goals.iter().find(|g| maze.is_wall(g.cell)) {
            return Err(GridWorldError::GoalOnWall(goal.cell));
        }
        let reward = create_reward_matrix(builder.p(), size, &config.goals)?;

        let n_s = builder.num_states();
        let mut p0 = Array1::zeros(n_s);
        let weight = 1. / maze.open_cells().len() as Continous;
        for &cell in maze.open_cells() {
            p0[state_coder::flat_index(cell, size)?] = weight;
        }

        let mdp = TabularMdp::new(
            builder.into_p(),
            reward,
            config.discount,
            p0,
            terminal_states,
            has_absorbing_state,
        )?;
        info!(
            size,
            n_s,
            walls = maze.walls().len(),
            goals = config.goals.len(),
            has_absorbing_state,
            "built grid world"
        );

        Ok(Self {
            size,
            has_absorbing_state,
            human_state: None,
            maze,
            sim: MdpSimulator::new(mdp, sampler),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn has_absorbing_state(&self) -> bool {
        self.has_absorbing_state
    }

    /// Current state as a coordinate, `None` before the first reset.
    pub fn human_state(&self) -> Option<Position> {
        self.human_state
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn num_states(&self) -> usize {
        self.sim.mdp().n_s()
    }

    pub fn initial_state(&self) -> ArrayView1<'_, Continous> {
        self.sim.mdp().initial_state()
    }

    pub fn terminal_states(&self) -> &[Discrete] {
        self.sim.mdp().terminal_states()
    }

    pub fn current_state(&self) -> Option<Discrete> {
        self.sim.current_state()
    }

    pub fn simulator(&self) -> &MdpSimulator<S> {
        &self.sim
    }

    pub fn into_simulator(self) -> MdpSimulator<S> {
        self.sim
    }

    pub fn reset(&mut self) -> Result<Array1<Continous>> {
        let state = self.sim.reset()?;
        self.human_state = Some(self.unflatten_state(state.view())?);
        Ok(state)
    }

    pub fn step(&mut self, action: impl Into<Discrete>) -> Result<StepInfo> {
        let si = self.sim.step(action.into())?;
        self.human_state = Some(self.unflatten_state(si.state.view())?);
        Ok(si)
    }

    pub fn set_current_state_to(&mut self, cell: Cell) -> Result<()> {
        let s = state_coder::flat_index(cell, self.size)?;
        self.sim.set_current_state_to(s)?;
        self.human_state = Some(Position::Cell(cell));
        Ok(())
    }

    /// One-hot vector for `cell`.
    pub fn flatten_state(&self, cell: Cell) -> Result<Array1<Continous>> {
        state_coder::flatten_state(cell, self.size, self.num_states())
    }

    pub fn unflatten_state(&self, onehot: ArrayView1<'_, Continous>) -> Result<Position> {
        state_coder::unflatten_state(onehot, self.size, self.has_absorbing_state)
    }

    pub fn plot_sa(
        &self,
        title: &str,
        data: ArrayView2<'_, Continous>,
        scale_data: bool,
        frame: (usize, usize, usize, usize),
    ) -> Result<(String, PolicyPlot)> {
        plot::plot_sa(title, data, self.size, scale_data, frame)
    }

    /// The maze with the agent drawn as `A` on top of it.
    pub fn render(&self) -> String {
        let agent = self.human_state.and_then(|p| p.cell());
        self.maze
            .char_matrix()
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, &ch)| {
                        if agent == Some(Cell::new(r, c)) {
                            'A'
                        } else {
                            ch
                        }
                    })
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<S: StateSampler> Mdp for GridWorldMdp<S> {
    fn n_s(&self) -> usize {
        self.sim.mdp().n_s()
    }

    fn n_a(&self) -> usize {
        self.sim.mdp().n_a()
    }

    fn transition(&self) -> ArrayView3<'_, Continous> {
        self.sim.mdp().transition()
    }

    fn reward(&self) -> ArrayView2<'_, Continous> {
        self.sim.mdp().reward()
    }

    fn gamma(&self) -> Continous {
        self.sim.mdp().gamma()
    }
}

fn terminal_index(maze: &Maze, size: usize, t: StateRef) -> Result<Discrete> {
    let cell = match t {
        StateRef::Cell(cell) => cell,
        StateRef::Index(i) if i < size * size => Cell::new(i / size, i % size),
        StateRef::Index(i) => {
            return Err(GridWorldError::InvalidTerminalState {
                state: i,
                reason: "index is not a grid cell",
            })
        }
    };
    let s = state_coder::flat_index(cell, size)?;
    if maze.is_wall(cell) {
        return Err(GridWorldError::InvalidTerminalState {
            state: s,
            reason: "cell is a wall",
        });
    }
    Ok(s)
}
