use gridworld::*;
use itertools::Itertools;
use std::rc::Rc;
use tracing::info;

const MAX_EPISODE_STEPS: usize = 100;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => GridWorldConfig::from_path(path)?,
        None => GridWorldConfig::four_rooms((7, 7)),
    };

    let mdp = Rc::new(GridWorldMdp::new(&config)?);
    let size = mdp.size();
    let theta = 1e-8;
    let vi = &mut ValueIteration::new(Rc::clone(&mdp) as Rc<dyn Mdp>);
    let ret = vi.exec(theta, Some(10_000));
    println!(
        "Theta: {}, Converged: {}, Number of iterations: {}",
        theta, ret.0, ret.1
    );

    let v_star = (0..size)
        .map(|r| {
            (0..size)
                .map(|c| format!("{:6.2}", vi.v_star(size * r + c)))
                .join(" ")
        })
        .join("\n");
    println!("{v_star}");

    let (tag, plot) = mdp.plot_sa("q_star", vi.q().view(), true, (0, 0, 0, 0))?;
    println!("{tag}\n{plot}");

    let mut env = (*mdp).clone();
    env.reset()?;
    let mut tot_reward = 0.;
    for _ in 0..MAX_EPISODE_STEPS {
        let s = env.current_state().ok_or(GridWorldError::NotReset)?;
        let a = vi.pi_star(s).unwrap_or_default();
        let si = env.step(a)?;
        tot_reward += si.reward;
        if si.done {
            break;
        }
    }
    info!(
        final_state = ?env.human_state(),
        tot_reward,
        "finished greedy episode"
    );
    println!("{}", env.render());

    Ok(())
}
