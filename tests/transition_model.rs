mod common;

use common::*;
use gridworld::*;
use itertools::iproduct;
use rstest::rstest;

#[rstest]
#[case(&["   ", "   ", "   "], 1.)]
#[case(&["   ", "   ", "   "], 0.6)]
#[case(&[" # ", "   ", "#  "], 1.)]
#[case(&[" # ", "   ", "#  "], 0.3)]
#[case(&["#########", "#   #   #", "#       #", "#   #   #", "## ### ##", "#   #   #", "#       #", "#   #   #", "#########"], 0.8)]
fn transition_rows_are_distributions(#[case] maze: &[&str], #[case] p_success: f64) {
    let mdp = grid_world(maze, vec![], p_success);
    assert_row_stochastic(mdp.transition());
}

#[test]
fn open_grid_with_certain_success_is_deterministic() {
    let mdp = grid_world(&["   ", "   ", "   "], vec![], 1.);
    let p = mdp.transition();
    for (s, a) in iproduct!(0..9, Action::ALL) {
        let cell = Cell::new(s / 3, s % 3);
        let next = cell.bounce(a, 3);
        assert_eq!(target_of(p, s, a), flat_index(next, 3).unwrap());
    }
    assert_eq!(p[[0, Action::Right.index(), 1]], 1.);
}

#[test]
fn moving_into_a_wall_bounces() {
    let mdp = grid_world(&[" # ", "   ", "   "], vec![], 1.);
    let p = mdp.transition();
    assert_eq!(p[[0, Action::Right.index(), 0]], 1.);
    assert_eq!(p[[0, Action::Right.index(), 1]], 0.);
}

#[rstest]
#[case(&[" # ", "   ", "#  "])]
#[case(&["## ", "   ", " ##"])]
#[case(&["#########", "#   #   #", "#       #", "#   #   #", "## ### ##", "#   #   #", "#       #", "#   #   #", "#########"])]
fn walls_are_unreachable_from_open_cells(#[case] maze: &[&str]) {
    let mdp = grid_world(maze, vec![], 1.);
    let p = mdp.transition();
    let size = mdp.size();
    let walls = mdp.maze().walls();
    for (&open, a, &wall) in iproduct!(mdp.maze().open_cells(), Action::ALL, walls) {
        let s = flat_index(open, size).unwrap();
        let w = flat_index(wall, size).unwrap();
        assert_eq!(p[[s, a.index(), w]], 0., "{open} -> {wall} via {a:?}");
    }
}

#[test]
fn goal_reward_matches_deterministic_targets() {
    let mdp = grid_world(&["   ", "   ", "   "], vec![Goal::new((2, 2), 1.)], 1.);
    let p = mdp.transition();
    let r = mdp.reward();
    for (s, a) in iproduct!(0..9, Action::ALL) {
        let want = if target_of(p, s, a) == 8 { 1. } else { 0. };
        assert_eq!(r[[s, a.index()]], want);
    }
}

#[test]
fn overlapping_goals_abort_construction() {
    let config = GridWorldConfig::new(
        &["   ", "   ", "   "],
        vec![Goal::new((2, 2), 1.), Goal::new((2, 2), -1.)],
    );
    assert!(matches!(
        GridWorldMdp::new(&config),
        Err(GridWorldError::AmbiguousReward(_))
    ));
}

#[test]
fn builder_reports_invalid_walls() {
    let mut b = TransitionMatrixBuilder::new(3, false);
    b.add_grid(1.).unwrap();
    b.add_wall_at(Cell::new(1, 1)).unwrap();
    assert!(matches!(
        b.add_wall_at(Cell::new(1, 1)),
        Err(GridWorldError::InvalidWall { .. })
    ));
    assert!(matches!(
        b.add_wall_at(Cell::new(0, 7)),
        Err(GridWorldError::InvalidWall { .. })
    ));
    assert_row_stochastic(b.p());
}
