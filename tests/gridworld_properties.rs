//! Property-style checks of the grid environment

mod common;

use common::{open_world, world_with};
use pingouin::{
    Error,
    gridworld::{Action, GridWorld, HazardLayout, Position, Signal},
};
use rstest::rstest;

#[rstest]
#[case(Position::new(0, 0), &[Action::Down, Action::Right])]
#[case(Position::new(4, 0), &[Action::Down, Action::Left])]
#[case(Position::new(0, 4), &[Action::Up, Action::Right])]
#[case(Position::new(4, 4), &[Action::Up, Action::Left])]
#[case(Position::new(2, 0), &[Action::Down, Action::Left, Action::Right])]
#[case(Position::new(0, 2), &[Action::Up, Action::Down, Action::Right])]
#[case(Position::new(2, 2), &[Action::Up, Action::Down, Action::Left, Action::Right])]
fn legal_actions_follow_grid_edges(#[case] cell: Position, #[case] expected: &[Action]) {
    let world = open_world(5);
    assert_eq!(world.legal_actions(cell), expected);
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(6)]
fn legal_moves_never_leave_the_grid(#[case] size: usize) {
    let world = open_world(size);
    for cell in world.cells() {
        let legal = world.legal_actions(cell);
        assert!(legal.len() >= 2 && legal.len() <= 4);
        for action in legal {
            let next = cell.step(action, size);
            assert!(next.within(size));
            assert_ne!(next, cell, "{action} from {cell} should move");
        }
    }
}

#[rstest]
#[case(Action::Up)]
#[case(Action::Left)]
fn clamped_move_stays_in_place(#[case] action: Action) {
    let mut world = open_world(4);
    let transition = world.apply(action);
    assert_eq!(transition.landing, Position::ORIGIN);
    assert_eq!(transition.signal, Signal::Clear);
    assert_eq!(world.agent(), Position::ORIGIN);
}

#[test]
fn hazard_sends_agent_home_but_reports_landing() {
    let mut world = world_with(4, &[(1, 0)]);
    let transition = world.apply(Action::Right);
    assert_eq!(transition.signal, Signal::Hazard);
    assert_eq!(transition.landing, Position::new(1, 0));
    assert_eq!(world.agent(), Position::ORIGIN);
}

#[test]
fn goal_sends_agent_home() {
    let mut world = open_world(2);
    world.apply(Action::Right);
    let transition = world.apply(Action::Down);
    assert_eq!(transition.signal, Signal::Goal);
    assert_eq!(transition.landing, Position::new(1, 1));
    assert_eq!(world.agent(), Position::ORIGIN);
}

#[rstest]
#[case(4)]
#[case(6)]
#[case(10)]
fn random_layouts_respect_invariants(#[case] size: usize) {
    let layout = HazardLayout::Random { min: 1, max: 3 };
    for seed in 0..50 {
        let mut world = GridWorld::with_layout(size, layout.clone())
            .unwrap()
            .with_seed(seed);
        for _ in 0..5 {
            world.reset();
            assert_eq!(world.agent(), Position::ORIGIN);
            assert_eq!(world.goal(), Position::new(size - 1, size - 1));
            assert!(world.hazards().len() <= 3);
            assert!(!world.is_hazard(Position::ORIGIN));
            assert!(!world.is_hazard(world.goal()));
            assert!(world.hazards().iter().all(|cell| cell.within(size)));
        }
    }
}

#[test]
fn return_to_start_keeps_layout() {
    let mut world = GridWorld::new(6).unwrap().with_seed(11);
    let hazards = world.hazards().clone();
    world.apply(Action::Down);
    world.return_to_start();
    assert_eq!(world.agent(), Position::ORIGIN);
    assert_eq!(world.hazards(), &hazards);
}

#[test]
fn seeded_worlds_agree() {
    let a = GridWorld::new(6).unwrap().with_seed(5);
    let b = GridWorld::new(6).unwrap().with_seed(5);
    assert_eq!(a.hazards(), b.hazards());
    assert_eq!(a.rng_seed(), Some(5));
}

#[rstest]
#[case(&[(0, 0)])]
#[case(&[(3, 3)])]
#[case(&[(4, 1)])]
fn fixed_layout_rejects_bad_cells(#[case] cells: &[(usize, usize)]) {
    let result = GridWorld::with_hazards(4, cells.iter().map(|&(c, r)| Position::new(c, r)));
    assert!(matches!(result, Err(Error::InvalidHazard { .. })));
}

#[test]
fn too_small_grid_is_rejected() {
    assert!(matches!(
        GridWorld::with_hazards(1, []),
        Err(Error::GridTooSmall { size: 1 })
    ));
    assert!(matches!(
        GridWorld::with_hazards(0, []),
        Err(Error::GridTooSmall { size: 0 })
    ));
}

#[test]
fn display_marks_agent_goal_and_hazards() {
    let mut world = world_with(3, &[(1, 1)]);
    assert_eq!(world.to_string(), "P..\n.~.\n..G\n");
    world.apply(Action::Right);
    assert_eq!(world.to_string(), ".P.\n.~.\n..G\n");
}
