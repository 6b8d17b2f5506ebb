//! End-to-end tests driving the simulation state directly with synthetic
//! timestamps, the same way the tick thread does.

use std::collections::BTreeMap;

use approx::assert_relative_eq;

use stickman_server::game::animation::{JumpPhase, Mode};
use stickman_server::game::frame::FrameLibrary;
use stickman_server::game::movement::BASE_SPEED;
use stickman_server::game::player::{PlayerInput, PlayerRenderState, PLAYER_HEIGHT};
use stickman_server::game::tile::TileGrid;
use stickman_server::io::asset_path;
use stickman_server::server::sim_state::{SimCommand, SimState, SimUpdate};
use stickman_server::server::FRAMETIME;

const T0: u64 = 1_000_000;

fn library() -> FrameLibrary {
    FrameLibrary::load(&asset_path("animation_frames.json")).unwrap()
}

fn open_grid() -> TileGrid {
    TileGrid::new(64., 16., vec![])
}

fn walk_input(target_x: f32) -> PlayerInput {
    PlayerInput {
        target_x: Some(target_x),
        ..Default::default()
    }
}

fn snapshot(sim: &mut SimState, now: u64) -> BTreeMap<u32, PlayerRenderState> {
    match sim.postframe(now) {
        Some(SimUpdate::State(state)) => state,
        None => panic!("expected a snapshot"),
    }
}

#[test]
fn walking_player_advances_monotonically_with_bounded_steps() {
    let mut sim = SimState::new(open_grid(), library());
    sim.add_player(1, 0., PLAYER_HEIGHT);
    sim.preframe(
        T0,
        std::iter::once(SimCommand::Input {
            id: 1,
            input: walk_input(5.),
        }),
    );

    let max_step = BASE_SPEED * FRAMETIME as f32 / 1_000_000.;
    let mut now = T0;
    let mut prev_x = 0.;
    for _ in 0..10 {
        sim.step(now, FRAMETIME);
        now += FRAMETIME;

        let state = snapshot(&mut sim, now);
        let player = &state[&1];
        assert!(player.x > prev_x);
        assert!(player.x - prev_x <= max_step + 1e-3);
        assert_relative_eq!(player.y, PLAYER_HEIGHT);
        prev_x = player.x;
    }

    // 10 walking ticks at base speed fall just short of the target.
    assert!(prev_x > 4.9 && prev_x < 5.);

    let state = snapshot(&mut sim, now);
    let diag = &state[&1].animation;
    assert_eq!(diag.current, Mode::Moving);
    assert!(diag.is_moving);
    assert!(!diag.is_running);
    assert!((0. ..1.).contains(&diag.cycle_progress));
}

#[test]
fn jump_command_lifts_the_player_and_gravity_brings_it_back() {
    let mut sim = SimState::new(open_grid(), library());
    sim.add_player(1, 10., PLAYER_HEIGHT);
    sim.preframe(
        T0,
        std::iter::once(SimCommand::Input {
            id: 1,
            input: PlayerInput {
                jump: true,
                ..Default::default()
            },
        }),
    );

    let mut now = T0;
    sim.step(now, FRAMETIME);
    now += FRAMETIME;

    let state = snapshot(&mut sim, now);
    let player = &state[&1];
    assert!(player.y > PLAYER_HEIGHT);
    assert!(player.animation.is_jumping);
    assert_eq!(player.animation.jump_phase, Some(JumpPhase::Start));

    // One second of ticks covers the whole flight and the pose window.
    let mut peak = player.y;
    for _ in 0..60 {
        sim.step(now, FRAMETIME);
        now += FRAMETIME;
        let state = snapshot(&mut sim, now);
        peak = peak.max(state[&1].y);
    }

    let state = snapshot(&mut sim, now);
    let player = &state[&1];
    assert!(peak > PLAYER_HEIGHT + 0.3);
    assert_relative_eq!(player.y, PLAYER_HEIGHT);
    assert!(!player.animation.is_jumping);
    assert_eq!(player.animation.jump_phase, None);
}

#[test]
fn later_input_wins_but_a_queued_jump_survives_the_overwrite() {
    let mut sim = SimState::new(open_grid(), library());
    sim.add_player(1, 0., PLAYER_HEIGHT);
    sim.preframe(
        T0,
        vec![
            SimCommand::Input {
                id: 1,
                input: PlayerInput {
                    target_x: Some(50.),
                    jump: true,
                    ..Default::default()
                },
            },
            SimCommand::Input {
                id: 1,
                input: walk_input(3.),
            },
        ]
        .into_iter(),
    );

    sim.step(T0, FRAMETIME);

    let state = snapshot(&mut sim, T0 + FRAMETIME);
    let player = &state[&1];
    // The jump from the first command fired even though the second
    // overwrote the rest of the intent.
    assert!(player.y > PLAYER_HEIGHT);
    // The second command's target governed the horizontal step.
    assert!(player.x > 0.4 && player.x < 1.);
}

#[test]
fn crouch_walking_commits_the_crouch_and_keeps_the_gait_going() {
    let mut sim = SimState::new(open_grid(), library());
    sim.add_player(1, 0., PLAYER_HEIGHT);
    sim.preframe(
        T0,
        std::iter::once(SimCommand::Input {
            id: 1,
            input: PlayerInput {
                target_x: Some(30.),
                crouching: true,
                ..Default::default()
            },
        }),
    );

    let mut now = T0;
    for _ in 0..30 {
        sim.step(now, FRAMETIME);
        now += FRAMETIME;
    }

    let state = snapshot(&mut sim, now);
    let player = &state[&1];
    assert!(player.crouching);
    assert_relative_eq!(player.speed, BASE_SPEED);
    let diag = &player.animation;
    assert!(diag.is_crouching);
    assert_relative_eq!(diag.crouch_blend_factor, 1.);
    assert_eq!(diag.current, Mode::Moving);
}

#[test]
fn players_join_and_leave_through_commands() {
    let mut sim = SimState::new(open_grid(), library());
    assert!(sim.postframe(T0).is_none());

    sim.preframe(
        T0,
        std::iter::once(SimCommand::AddPlayer {
            id: 7,
            x: 3.,
            y: PLAYER_HEIGHT,
        }),
    );
    assert_eq!(sim.player_count(), 1);

    sim.step(T0, FRAMETIME);
    let state = snapshot(&mut sim, T0 + FRAMETIME);
    assert!(state.contains_key(&7));
    assert!(!state[&7].pivot_points.is_empty());

    sim.preframe(
        T0 + FRAMETIME,
        std::iter::once(SimCommand::RemovePlayer { id: 7 }),
    );
    assert_eq!(sim.player_count(), 0);
    assert!(sim.postframe(T0 + FRAMETIME).is_none());
}

#[test]
fn spawning_below_the_ground_snaps_up_to_it() {
    let mut sim = SimState::new(open_grid(), library());
    sim.add_player(1, 0., -5.);
    sim.step(T0, FRAMETIME);

    let state = snapshot(&mut sim, T0 + FRAMETIME);
    assert_relative_eq!(state[&1].y, PLAYER_HEIGHT);
}

#[test]
fn stop_command_marks_the_simulation_for_shutdown() {
    let mut sim = SimState::new(open_grid(), library());
    assert!(!sim.kill);
    sim.preframe(T0, std::iter::once(SimCommand::Stop));
    assert!(sim.kill);
}
