use float_eq::*;
use gridworld::*;
use ndarray::{s, ArrayView3, Axis};

#[allow(dead_code)]
pub fn open_maze(size: usize) -> Vec<String> {
    vec![" ".repeat(size); size]
}

#[allow(dead_code)]
pub fn grid_world(maze: &[&str], goals: Vec<Goal>, p_success: f64) -> GridWorldMdp {
    let config = GridWorldConfig::new(maze, goals).with_p_success(p_success);
    GridWorldMdp::new(&config).unwrap()
}

#[allow(dead_code)]
pub fn assert_row_stochastic(p: ArrayView3<'_, f64>) {
    for (i, row) in p.lanes(Axis(2)).into_iter().enumerate() {
        assert_float_eq!(row.sum(), 1., abs <= 1e-9, "row {i}");
    }
}

#[allow(dead_code)]
pub fn target_of(p: ArrayView3<'_, f64>, s: usize, a: Action) -> usize {
    let row = p.slice(s![s, a.index(), ..]);
    let hot = row.iter().filter(|&&x| x != 0.).count();
    assert_eq!(hot, 1, "P[{s}, {a:?}, :] is not deterministic");
    row.iter().position(|&x| x == 1.).unwrap()
}
