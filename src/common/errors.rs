use super::defs::Cell;

pub type Result<T> = std::result::Result<T, GridWorldError>;

/// Everything that can go wrong while building or stepping a grid world.
#[derive(thiserror::Error, Debug)]
pub enum GridWorldError {
    #[error("malformed map: {0}")]
    MalformedMap(String),

    #[error("coordinate {cell} is outside a {size}x{size} grid")]
    OutOfBounds { cell: Cell, size: usize },

    #[error("state index {state} is outside a {n_s} state space")]
    StateOutOfRange { state: usize, n_s: usize },

    #[error("invalid wall at {cell}: {reason}")]
    InvalidWall { cell: Cell, reason: &'static str },

    #[error("more than one reward configured for goal {0}")]
    AmbiguousReward(Cell),

    #[error("action {action} is not one of the {n_a} supported actions")]
    UnsupportedAction { action: usize, n_a: usize },

    #[error("invalid terminal state {state}: {reason}")]
    InvalidTerminalState { state: usize, reason: &'static str },

    #[error("goal {0} is a wall and can never be reached")]
    GoalOnWall(Cell),

    #[error("map has no open cells")]
    NoOpenCells,

    #[error("probability {0} is not within [0, 1]")]
    InvalidProbability(f64),

    #[error("builder misuse: {0}")]
    BuildOrder(&'static str),

    #[error("inconsistent model: {0}")]
    InvalidModel(String),

    #[error("reset() must be called before step()")]
    NotReset,

    #[error("invalid config: {0}")]
    InvalidConfig(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
