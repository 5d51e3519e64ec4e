use crate::common::{defs::*, errors::*};
use crate::mdps::mdp::*;
use crate::mdps::mdp_simulator::*;
use rand::prelude::*;
use std::iter::zip;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeEvent {
    pub s: Discrete,
    /// Reward received on entering `s`.
    pub r: Continous,
}

pub trait EpisodeGenerator {
    fn generate(&self, n: usize, seed: Option<u64>) -> Result<Vec<Vec<EpisodeEvent>>>;
}

/// Rolls out the uniform random policy on a `TabularMdp`, cutting episodes
/// off after `max_steps` transitions.
pub struct SimulatorEpisodeGenerator {
    mdp: TabularMdp,
    max_steps: usize,
}

impl SimulatorEpisodeGenerator {
    pub fn new(mdp: TabularMdp, max_steps: usize) -> Self {
        Self { mdp, max_steps }
    }
}

impl EpisodeGenerator for SimulatorEpisodeGenerator {
    fn generate(&self, n: usize, seed: Option<u64>) -> Result<Vec<Vec<EpisodeEvent>>> {
        let seed = seed.unwrap_or_default();
        let rng = &mut StdRng::seed_from_u64(seed.wrapping_add(1));
        let mut sim = MdpSimulator::seeded(self.mdp.clone(), seed);
        let n_a = self.mdp.n_a();

        let mut eps = Vec::with_capacity(n);
        for _ in 0..n {
            sim.reset()?;
            let mut ep = vec![EpisodeEvent {
                s: sim.current_state().ok_or(GridWorldError::NotReset)?,
                r: Default::default(),
            }];
            for _ in 0..self.max_steps {
                let si = sim.step(rng.gen_range(0..n_a))?;
                ep.push(EpisodeEvent {
                    s: sim.current_state().ok_or(GridWorldError::NotReset)?,
                    r: si.reward,
                });
                if si.done {
                    break;
                }
            }
            eps.push(ep);
        }

        Ok(eps)
    }
}

/// Ref: https://youtu.be/P0ZvxeQqv0A?si=RLKdOUTNEfKXE63C
pub fn mc_first_visit(
    ep_gen: Rc<dyn EpisodeGenerator>,
    gamma: Continous,
    n_s: usize,
    n_ep: usize,
    seed: Option<u64>,
) -> Result<Vec<Continous>> {
    mc_core(ep_gen, gamma, n_s, n_ep, seed, is_first_visit)
}

/// Ref: https://youtu.be/P0ZvxeQqv0A?si=RLKdOUTNEfKXE63C
pub fn mc_every_visit(
    ep_gen: Rc<dyn EpisodeGenerator>,
    gamma: Continous,
    n_s: usize,
    n_ep: usize,
    seed: Option<u64>,
) -> Result<Vec<Continous>> {
    mc_core(ep_gen, gamma, n_s, n_ep, seed, |_, _, _| true)
}

fn mc_core(
    ep_gen: Rc<dyn EpisodeGenerator>,
    gamma: Continous,
    n_s: usize,
    n_ep: usize,
    seed: Option<u64>,
    counts: fn(&[EpisodeEvent], usize, Discrete) -> bool,
) -> Result<Vec<Continous>> {
    let returns = &mut vec![0 as Continous; n_s];
    let visits = &mut vec![0usize; n_s];

    let eps = ep_gen.generate(n_ep, seed)?;
    for ep in eps.iter().take(n_ep).filter(|ep| !ep.is_empty()) {
        let mut g = 0.;
        for t in (0..(ep.len() - 1)).rev() {
            g = gamma * g + ep[t + 1].r;
            if counts(ep, t, ep[t].s) {
                returns[ep[t].s] += g;
                visits[ep[t].s] += 1;
            }
        }
    }

    Ok(zip(returns, visits)
        .map(|(&mut r, &mut v)| if v == 0 { 0. } else { r / (v as Continous) })
        .collect())
}

fn is_first_visit(ep: &[EpisodeEvent], t: usize, s: Discrete) -> bool {
    if t == 0 {
        return true;
    }

    !ep.iter().take(t).any(|x| x.s == s)
}
