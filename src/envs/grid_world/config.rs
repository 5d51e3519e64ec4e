use super::{
    maze::{text_rows, FOUR_ROOMS},
    rewards::Goal,
};
use crate::common::{defs::*, errors::*};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A terminal state given either as a grid cell or as a raw flat index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StateRef {
    Index(Discrete),
    Cell(Cell),
}

impl From<Cell> for StateRef {
    fn from(c: Cell) -> Self {
        Self::Cell(c)
    }
}

/// Everything needed to assemble a `GridWorldMdp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridWorldConfig {
    /// Maze rows; `#` marks a wall, anything else is open.
    pub maze: Vec<String>,
    pub goals: Vec<Goal>,
    #[serde(default = "default_p_success")]
    pub p_success: Continous,
    #[serde(default = "default_discount")]
    pub discount: Continous,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default)]
    pub terminal_states: Vec<StateRef>,
}

fn default_p_success() -> Continous {
    1.
}

fn default_discount() -> Continous {
    0.9
}

fn default_seed() -> u64 {
    1337
}

impl GridWorldConfig {
    pub fn new<S: AsRef<str>>(maze: &[S], goals: Vec<Goal>) -> Self {
        Self {
            maze: maze.iter().map(|r| r.as_ref().to_string()).collect(),
            goals,
            p_success: default_p_success(),
            discount: default_discount(),
            seed: default_seed(),
            terminal_states: vec![],
        }
    }

    /// Four-rooms map with a single `+1` goal.
    pub fn four_rooms(goal: impl Into<Cell>) -> Self {
        Self::new(&text_rows(FOUR_ROOMS), vec![Goal::new(goal, 1.)])
    }

    pub fn with_p_success(mut self, p_success: Continous) -> Self {
        self.p_success = p_success;
        self
    }

    pub fn with_discount(mut self, discount: Continous) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_terminal_states(mut self, terminal_states: Vec<StateRef>) -> Self {
        self.terminal_states = terminal_states;
        self
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let cfg = GridWorldConfig::from_json_str(
            r####"{ "maze": ["###", "# #", "###"], "goals": [{ "row": 1, "col": 1, "reward": 2.5 }] }"####,
        )
        .unwrap();
        assert_eq!(cfg.p_success, 1.);
        assert_eq!(cfg.discount, 0.9);
        assert_eq!(cfg.seed, 1337);
        assert!(cfg.terminal_states.is_empty());
        assert_eq!(cfg.goals, vec![Goal::new((1, 1), 2.5)]);
    }

    #[test]
    fn terminal_states_accept_cells_and_indices() {
        let cfg = GridWorldConfig::from_json_str(
            r#"{ "maze": ["  ", "  "], "goals": [], "terminal_states": [3, { "row": 0, "col": 1 }] }"#,
        )
        .unwrap();
        assert_eq!(
            cfg.terminal_states,
            vec![StateRef::Index(3), StateRef::Cell(Cell::new(0, 1))]
        );
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            GridWorldConfig::from_json_str("{ \"maze\": 3 }"),
            Err(GridWorldError::InvalidConfig(_))
        ));
    }

    #[test]
    fn four_rooms_has_nine_rows() {
        let cfg = GridWorldConfig::four_rooms((7, 7));
        assert_eq!(cfg.maze.len(), 9);
        assert!(cfg.maze.iter().all(|r| r.len() == 9));
        assert_eq!(cfg.goals, vec![Goal::new((7, 7), 1.)]);
    }
}
