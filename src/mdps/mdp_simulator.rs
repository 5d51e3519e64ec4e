use super::mdp::*;
use crate::common::{defs::*, errors::*};
use ndarray::{s, Array1, ArrayView1};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde_json::{json, Value};

/// Something that can draw an index from a row of probabilities.
pub trait StateSampler {
    fn sample(&mut self, weights: ArrayView1<'_, Continous>) -> Result<Discrete>;
}

/// Seeded `StdRng` backed sampler.
#[derive(Debug, Clone)]
pub struct RngSampler {
    rng: StdRng,
}

impl RngSampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl StateSampler for RngSampler {
    fn sample(&mut self, weights: ArrayView1<'_, Continous>) -> Result<Discrete> {
        pick_next(&mut self.rng, weights)
    }
}

pub fn pick_next<R: Rng>(rng: &mut R, weights: ArrayView1<'_, Continous>) -> Result<Discrete> {
    let dist = WeightedIndex::new(weights.iter().copied())
        .map_err(|e| GridWorldError::InvalidModel(format!("cannot sample row: {e}")))?;
    Ok(dist.sample(rng))
}

#[derive(Debug, Clone)]
pub struct StepInfo {
    /// One-hot encoding of the state reached.
    pub state: Array1<Continous>,
    pub reward: Continous,
    pub done: bool,
    pub info: Value,
}

/// Runs a `TabularMdp`: owns the current state and draws transitions from `P`.
#[derive(Debug, Clone)]
pub struct MdpSimulator<S: StateSampler = RngSampler> {
    mdp: TabularMdp,
    sampler: S,
    current_state: Option<Discrete>,
}

impl MdpSimulator<RngSampler> {
    pub fn seeded(mdp: TabularMdp, seed: u64) -> Self {
        Self::new(mdp, RngSampler::new(seed))
    }
}

impl<S: StateSampler> MdpSimulator<S> {
    pub fn new(mdp: TabularMdp, sampler: S) -> Self {
        Self {
            mdp,
            sampler,
            current_state: None,
        }
    }

    pub fn mdp(&self) -> &TabularMdp {
        &self.mdp
    }

    pub fn current_state(&self) -> Option<Discrete> {
        self.current_state
    }

    pub fn one_hot(&self, s: Discrete) -> Array1<Continous> {
        let mut v = Array1::zeros(self.mdp.n_s());
        v[s] = 1.;
        v
    }

    pub fn reset(&mut self) -> Result<Array1<Continous>> {
        let s = self.sampler.sample(self.mdp.initial_state())?;
        self.current_state = Some(s);
        Ok(self.one_hot(s))
    }

    pub fn step(&mut self, action: Discrete) -> Result<StepInfo> {
        let cur = self.current_state.ok_or(GridWorldError::NotReset)?;
        if action >= self.mdp.n_a() {
            return Err(GridWorldError::UnsupportedAction {
                action,
                n_a: self.mdp.n_a(),
            });
        }

        let reward = self.mdp.reward()[[cur, action]];
        let next = self
            .sampler
            .sample(self.mdp.transition().slice(s![cur, action, ..]))?;
        self.current_state = Some(next);

        Ok(StepInfo {
            state: self.one_hot(next),
            reward,
            done: self.mdp.is_done(next),
            info: json!({ "gamma": self.mdp.gamma(), "state": next }),
        })
    }

    pub fn set_current_state_to(&mut self, s: Discrete) -> Result<()> {
        if s >= self.mdp.n_s() {
            return Err(GridWorldError::InvalidModel(format!(
                "state {s} is outside a {} state MDP",
                self.mdp.n_s()
            )));
        }
        self.current_state = Some(s);
        Ok(())
    }
}
