use log::warn;
use serde::Serialize;

use crate::game::blend::{hermite, linear};
use crate::game::frame::{Frame, FrameLibrary};
use crate::game::player::Direction;

// Gait cycle distances (world units per full stride):
pub const WALK_CYCLE_DISTANCE: f32 = 0.4;
pub const RUN_CYCLE_DISTANCE: f32 = 2.5;
pub const CROUCH_CYCLE_DISTANCE: f32 = 0.85;

// Transition durations (seconds):
pub const IDLE_TRANSITION_DURATION: f32 = 0.2;
pub const WALK_RUN_TRANSITION_DURATION: f32 = 0.5;
pub const TURN_DURATION: f32 = 0.1;
pub const TURN_EXIT_DURATION: f32 = 0.2;
pub const JUMP_START_DURATION: f32 = 0.1;
pub const JUMP_APEX_DURATION: f32 = 0.2;
pub const JUMP_LAND_DURATION: f32 = 0.1;
pub const CROUCH_TRANSITION_DURATION: f32 = 0.2;

/// Smallest per-tick travel that counts as movement.
pub const MOVEMENT_EPSILON: f32 = 0.001;

const JUMP_TOTAL_DURATION: f32 = JUMP_START_DURATION + JUMP_APEX_DURATION + JUMP_LAND_DURATION;
// Fraction of the jump spent blending in from the pre-jump pose.
const JUMP_BLEND_IN: f32 = 0.3;

/// Base locomotion mode. Transition overlays (crouch, idle, turn exit,
/// jump landing) blend on top of these rather than being modes.
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    Idle,
    Crouching,
    Moving,
    Jumping,
    Turning,
}

#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum JumpPhase {
    Start,
    Apex,
    Land,
}

#[derive(Clone, Debug)]
pub struct CrouchTransition {
    pub start: u64,
    pub start_frame: Frame,
    pub end_frame: Frame,
}

#[derive(Clone, Debug)]
pub struct Turn {
    pub start: u64,
    pub start_frame: Frame,
    pub from: Direction,
    pub target: Direction,
}

#[derive(Clone, Debug)]
pub struct TurnExit {
    pub start: u64,
    pub start_frame: Frame,
}

#[derive(Clone, Debug)]
pub struct Jump {
    pub start: u64,
    pub start_frame: Frame,
}

#[derive(Clone, Debug)]
pub struct JumpEnd {
    pub start: u64,
    pub end_frame: Frame,
}

/// Per-player animation record. Created when the player joins, dropped
/// with the player; transition anchors are plain data and need no
/// teardown.
#[derive(Clone, Debug)]
pub struct AnimationState {
    pub mode: Mode,
    /// Last committed travel direction.
    pub direction: Direction,
    /// Updates immediately while moving; drives frame mirroring.
    pub facing_direction: Direction,
    pub is_moving: bool,
    /// Committed running state; the input flag ramps the blend first.
    pub is_running: bool,
    pub is_crouching: bool,
    pub last_x: Option<f32>,
    /// Gait cycle phase in [0,1).
    pub cycle_progress: f32,
    pub walk_run_blend_factor: f32,
    pub crouch_blend_factor: f32,
    pub walk_run_transition_start: Option<u64>,
    pub idle_transition_start: Option<u64>,
    pub last_movement_frame: Option<Frame>,
    pub crouch_transition: Option<CrouchTransition>,
    pub turn: Option<Turn>,
    pub turn_exit: Option<TurnExit>,
    pub jump: Option<Jump>,
    pub jump_end: Option<JumpEnd>,
}

impl AnimationState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Idle,
            direction: Direction::Forward,
            facing_direction: Direction::Forward,
            is_moving: false,
            is_running: false,
            is_crouching: false,
            last_x: None,
            cycle_progress: 0.,
            walk_run_blend_factor: 0.,
            crouch_blend_factor: 0.,
            walk_run_transition_start: None,
            idle_transition_start: None,
            last_movement_frame: None,
            crouch_transition: None,
            turn: None,
            turn_exit: None,
            jump: None,
            jump_end: None,
        }
    }
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Diagnostic snapshot of the animation state, broadcast alongside the
/// resolved frame.
#[derive(Serialize, Clone, Debug)]
pub struct AnimationDiagnostics {
    pub current: Mode,
    pub direction: Direction,
    pub is_moving: bool,
    pub is_running: bool,
    pub is_jumping: bool,
    pub is_crouching: bool,
    pub jump_phase: Option<JumpPhase>,
    pub cycle_progress: f32,
    pub walk_run_blend_factor: f32,
    pub crouch_blend_factor: f32,
    pub is_turning: bool,
    pub turn_progress: f32,
    pub jump_progress: f32,
}

/// Advances one player's animation for a tick and resolves the blended
/// frame. `x` is the collision-corrected position after movement;
/// `jumping` is the movement pass's jump window. Transition priority:
/// crouch change, then jump, then turn, then plain locomotion.
pub fn update_animation(
    state: &mut AnimationState,
    library: &FrameLibrary,
    x: f32,
    running: bool,
    jumping: bool,
    crouching: bool,
    now: u64,
) -> Frame {
    let last_x = state.last_x.unwrap_or(x);
    let distance_traveled = (x - last_x).abs();
    let was_moving = state.is_moving;
    state.is_moving = distance_traveled > MOVEMENT_EPSILON;

    let new_direction = if state.is_moving {
        let d = if x > last_x {
            Direction::Forward
        } else {
            Direction::Backward
        };
        state.facing_direction = d;
        d
    } else {
        state.direction
    };
    let direction_changed = new_direction != state.direction;

    let base_frame = library.idle(state.facing_direction, crouching);
    let mut current = base_frame.clone();

    // A crouch-state change resolves before anything else, and an
    // in-flight crouch transition suppresses turn/jump/idle handling
    // until the player has finished crouching or standing.
    if crouching != state.is_crouching && state.crouch_transition.is_none() {
        let (start_frame, end_frame) = if state.is_moving {
            let start = state.last_movement_frame.clone().unwrap_or_else(|| {
                cycle_frame(
                    library,
                    state.cycle_progress,
                    state.walk_run_blend_factor,
                    state.facing_direction,
                    !crouching,
                )
            });
            let end = crouch_cycle_frame(library, state.cycle_progress, state.facing_direction);
            (start, end)
        } else {
            (
                library.idle(state.facing_direction, !crouching),
                library.idle(state.facing_direction, crouching),
            )
        };
        state.crouch_transition = Some(CrouchTransition {
            start: now,
            start_frame,
            end_frame,
        });
    }

    if let Some(transition) = state.crouch_transition.clone() {
        let progress = seconds_since(transition.start, now) / CROUCH_TRANSITION_DURATION;
        state.crouch_blend_factor = progress.min(1.);
        if progress >= 1. {
            state.crouch_transition = None;
            state.is_crouching = crouching;
            current = transition.end_frame;
        } else {
            current = linear(
                &transition.start_frame,
                &transition.end_frame,
                state.crouch_blend_factor,
            );
        }
    } else {
        // A grounded reversal anchors a turn; a pending jump anchors a
        // jump. When both land on the same tick the jump renders and the
        // turn stays queued behind it.
        if direction_changed && state.turn.is_none() && state.jump.is_none() && !crouching {
            let start_frame = state
                .last_movement_frame
                .clone()
                .unwrap_or_else(|| fetch(library, "TURN_PASS", state.direction));
            state.turn = Some(Turn {
                start: now,
                start_frame,
                from: state.direction,
                target: new_direction,
            });
        }
        if jumping && state.jump.is_none() {
            let start_frame = state
                .last_movement_frame
                .clone()
                .unwrap_or_else(|| base_frame.clone());
            state.jump = Some(Jump {
                start: now,
                start_frame,
            });
        }

        if let Some(jump) = state.jump.clone() {
            let progress = seconds_since(jump.start, now) / JUMP_TOTAL_DURATION;
            if progress >= 1. {
                state.jump = None;
                state.jump_end = Some(JumpEnd {
                    start: now,
                    end_frame: jump_frame(library, 1., state.direction, crouching),
                });
            } else {
                let pose = jump_frame(library, progress, state.direction, crouching);
                current = if progress < JUMP_BLEND_IN {
                    hermite(&jump.start_frame, &pose, progress / JUMP_BLEND_IN)
                } else {
                    pose
                };
                state.mode = Mode::Jumping;
            }
        } else if let Some(jump_end) = state.jump_end.clone() {
            let progress = seconds_since(jump_end.start, now) / JUMP_LAND_DURATION;
            let resume = if state.is_moving {
                cycle_frame(
                    library,
                    0.,
                    state.walk_run_blend_factor,
                    state.direction,
                    crouching,
                )
            } else {
                base_frame.clone()
            };
            if progress >= 1. {
                state.jump_end = None;
                current = resume;
            } else {
                current = hermite(&jump_end.end_frame, &resume, progress);
            }
        } else if let Some(turn) = state.turn.clone() {
            let progress = seconds_since(turn.start, now) / TURN_DURATION;
            if progress >= 1. {
                let end_frame = turn_frame(library, 1., turn.from, turn.target, crouching);
                state.turn = None;
                state.turn_exit = Some(TurnExit {
                    start: now,
                    start_frame: end_frame.clone(),
                });
                state.direction = turn.target;
                current = end_frame;
            } else {
                let pose = turn_frame(library, progress, turn.from, turn.target, crouching);
                current = hermite(&turn.start_frame, &pose, progress);
            }
            state.mode = Mode::Turning;
        } else if let Some(exit) = state.turn_exit.clone() {
            let progress = seconds_since(exit.start, now) / TURN_EXIT_DURATION;
            let resume = if state.is_moving {
                cycle_frame(
                    library,
                    0.,
                    state.walk_run_blend_factor,
                    state.direction,
                    crouching,
                )
            } else {
                base_frame.clone()
            };
            if progress >= 1. {
                state.turn_exit = None;
                current = resume;
            } else {
                current = hermite(&exit.start_frame, &resume, progress);
            }
        } else {
            current = update_locomotion(
                state,
                library,
                running,
                crouching,
                was_moving,
                distance_traveled,
                &base_frame,
                now,
            );
        }
    }

    if state.is_moving {
        state.direction = new_direction;
        state.facing_direction = new_direction;
    }
    state.last_x = Some(x);
    current
}

/// Walk/run blending, gait cycle advance, and the idle transition.
#[allow(clippy::too_many_arguments)]
fn update_locomotion(
    state: &mut AnimationState,
    library: &FrameLibrary,
    running: bool,
    crouching: bool,
    was_moving: bool,
    distance_traveled: f32,
    base_frame: &Frame,
    now: u64,
) -> Frame {
    // The blend factor ramps whenever the requested flag differs from
    // the committed one; the flag commits when the ramp completes.
    if state.is_running != running && !crouching {
        if state.walk_run_transition_start.is_none() {
            state.walk_run_transition_start = Some(now);
        }
    } else {
        state.walk_run_transition_start = None;
    }

    if let Some(start) = state.walk_run_transition_start {
        let progress = seconds_since(start, now) / WALK_RUN_TRANSITION_DURATION;
        state.walk_run_blend_factor = if running {
            progress.min(1.)
        } else {
            (1. - progress).max(0.)
        };
        if progress >= 1. {
            state.walk_run_transition_start = None;
            state.is_running = running;
        }
    } else {
        state.walk_run_blend_factor = if running { 1. } else { 0. };
    }

    if state.is_moving {
        state.idle_transition_start = None;

        let cycle_distance = if crouching {
            CROUCH_CYCLE_DISTANCE
        } else {
            RUN_CYCLE_DISTANCE * state.walk_run_blend_factor
                + WALK_CYCLE_DISTANCE * (1. - state.walk_run_blend_factor)
        };
        state.cycle_progress = (state.cycle_progress + distance_traveled / cycle_distance) % 1.;

        let current = if state.crouch_blend_factor > 0. && state.crouch_blend_factor < 1. {
            // Mid crouch-transition: cross-fade the standing and crouch
            // gait streams at matching phase.
            let standing = cycle_frame(
                library,
                state.cycle_progress,
                state.walk_run_blend_factor,
                state.facing_direction,
                false,
            );
            let crouched =
                crouch_cycle_frame(library, state.cycle_progress, state.facing_direction);
            linear(&standing, &crouched, state.crouch_blend_factor)
        } else if crouching {
            crouch_cycle_frame(library, state.cycle_progress, state.facing_direction)
        } else {
            cycle_frame(
                library,
                state.cycle_progress,
                state.walk_run_blend_factor,
                state.facing_direction,
                false,
            )
        };

        state.mode = Mode::Moving;
        state.last_movement_frame = Some(current.clone());
        current
    } else {
        if was_moving {
            state.idle_transition_start = Some(now);
        }

        state.mode = if crouching { Mode::Crouching } else { Mode::Idle };

        if let Some(start) = state.idle_transition_start {
            let progress = (seconds_since(start, now) / IDLE_TRANSITION_DURATION).min(1.);
            let from = state
                .last_movement_frame
                .clone()
                .unwrap_or_else(|| base_frame.clone());

            let standing_idle = library.idle(state.facing_direction, false);
            let crouching_idle = library.idle(state.facing_direction, true);
            let idle_frame =
                if state.crouch_blend_factor > 0. && state.crouch_blend_factor < 1. {
                    linear(&standing_idle, &crouching_idle, state.crouch_blend_factor)
                } else if crouching {
                    crouching_idle
                } else {
                    standing_idle
                };

            let current = hermite(&from, &idle_frame, progress);
            if progress >= 1. {
                state.idle_transition_start = None;
                state.last_movement_frame = None;
            }
            current
        } else {
            base_frame.clone()
        }
    }
}

pub fn animation_diagnostics(state: &AnimationState, now: u64) -> AnimationDiagnostics {
    let jump_phase = state.jump.as_ref().map(|jump| {
        let t = seconds_since(jump.start, now);
        if t < JUMP_START_DURATION {
            JumpPhase::Start
        } else if t < JUMP_START_DURATION + JUMP_APEX_DURATION {
            JumpPhase::Apex
        } else {
            JumpPhase::Land
        }
    });

    AnimationDiagnostics {
        current: state.mode,
        direction: state.direction,
        is_moving: state.is_moving,
        is_running: state.is_running,
        is_jumping: state.jump.is_some(),
        is_crouching: state.is_crouching,
        jump_phase,
        cycle_progress: state.cycle_progress,
        walk_run_blend_factor: state.walk_run_blend_factor,
        crouch_blend_factor: state.crouch_blend_factor,
        is_turning: state.turn.is_some(),
        turn_progress: state
            .turn
            .as_ref()
            .map(|turn| seconds_since(turn.start, now) / TURN_DURATION)
            .unwrap_or(1.),
        jump_progress: state
            .jump
            .as_ref()
            .map(|jump| seconds_since(jump.start, now) / JUMP_TOTAL_DURATION)
            .unwrap_or(0.),
    }
}

/// Gait pose for the current phase: the crouch stride, or the walk and
/// run strides blended by the walk/run factor.
pub fn cycle_frame(
    library: &FrameLibrary,
    progress: f32,
    blend_factor: f32,
    direction: Direction,
    crouching: bool,
) -> Frame {
    if crouching {
        crouch_cycle_frame(library, progress, direction)
    } else {
        let walk = half_cycle(library, "WALK_PASS", "WALK_REACH", progress, direction);
        let run = half_cycle(library, "RUN_PASS", "RUN_REACH", progress, direction);
        linear(&walk, &run, blend_factor)
    }
}

pub fn crouch_cycle_frame(library: &FrameLibrary, progress: f32, direction: Direction) -> Frame {
    half_cycle(library, "CROUCH_PASS", "CROUCH_REACH", progress, direction)
}

fn turn_frame(
    library: &FrameLibrary,
    progress: f32,
    from: Direction,
    to: Direction,
    crouching: bool,
) -> Frame {
    let (start, end) = if crouching {
        (
            fetch(library, "CROUCH_IDLE", from),
            fetch(library, "CROUCH_IDLE", to),
        )
    } else {
        (
            fetch(library, "TURN_PASS", from),
            fetch(library, "TURN_REACH", to),
        )
    };
    hermite(&start, &end, progress)
}

fn jump_frame(library: &FrameLibrary, progress: f32, direction: Direction, crouching: bool) -> Frame {
    if crouching {
        return fetch(library, "CROUCH_IDLE", direction);
    }
    let (start, end, t) = if progress < 0.5 {
        ("JUMP_START_END", "JUMP_APEX", progress * 2.)
    } else {
        ("JUMP_APEX", "JUMP_START_END", (progress - 0.5) * 2.)
    };
    hermite(&fetch(library, start, direction), &fetch(library, end, direction), t)
}

// PASS for the first half of the cycle, REACH for the second, Hermite
// eased within each half.
fn half_cycle(
    library: &FrameLibrary,
    pass: &str,
    reach: &str,
    progress: f32,
    direction: Direction,
) -> Frame {
    let (start, end, t) = if progress < 0.5 {
        (pass, reach, progress * 2.)
    } else {
        (reach, pass, (progress - 0.5) * 2.)
    };
    hermite(&fetch(library, start, direction), &fetch(library, end, direction), t)
}

// A missing pose is fatal for this tick's resolution only; substitute
// the idle pose and keep the simulation going.
fn fetch(library: &FrameLibrary, name: &str, direction: Direction) -> Frame {
    match library.get(name, direction) {
        Ok(frame) => frame,
        Err(e) => {
            warn!("{e}, substituting idle pose");
            library.idle(direction, false)
        }
    }
}

fn seconds_since(start: u64, now: u64) -> f32 {
    now.saturating_sub(start) as f32 / 1_000_000.
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::Vector2;
    use std::collections::BTreeMap;

    const TICK: u64 = 16_666;

    fn test_library() -> FrameLibrary {
        let names = [
            "IDLE",
            "CROUCH_IDLE",
            "WALK_PASS",
            "WALK_REACH",
            "RUN_PASS",
            "RUN_REACH",
            "CROUCH_PASS",
            "CROUCH_REACH",
            "TURN_PASS",
            "TURN_REACH",
            "JUMP_START_END",
            "JUMP_APEX",
        ];
        let mut frames = BTreeMap::new();
        for (i, name) in names.iter().enumerate() {
            let mut frame = Frame::default();
            frame.set("neck", Vector2::new(0.1 + i as f32 * 0.05, 0.4));
            frame.set("pelvis", Vector2::new(0.5, 1.2));
            frames.insert(name.to_string(), frame);
        }
        FrameLibrary::from_frames(frames).unwrap()
    }

    fn tick(
        state: &mut AnimationState,
        library: &FrameLibrary,
        x: f32,
        running: bool,
        jumping: bool,
        crouching: bool,
        now: u64,
    ) -> Frame {
        update_animation(state, library, x, running, jumping, crouching, now)
    }

    #[test]
    fn walking_enters_moving_and_advances_the_phase() {
        let library = test_library();
        let mut state = AnimationState::new();

        tick(&mut state, &library, 0., false, false, false, 0);
        assert_eq!(state.mode, Mode::Idle);

        let mut now = TICK;
        let mut x = 0.;
        let mut prev = state.cycle_progress;
        for _ in 0..3 {
            x += 0.1;
            tick(&mut state, &library, x, false, false, false, now);
            assert_eq!(state.mode, Mode::Moving);
            assert_eq!(state.direction, Direction::Forward);
            assert!(state.cycle_progress > prev);
            prev = state.cycle_progress;
            now += TICK;
        }
        // 0.1 per tick against a 0.4 walk cycle.
        assert_relative_eq!(state.cycle_progress, 0.75, epsilon = 1e-5);
    }

    #[test]
    fn phase_wraps_after_exactly_one_cycle_distance() {
        let library = test_library();
        let mut state = AnimationState::new();

        tick(&mut state, &library, 0., false, false, false, 0);
        let mut now = TICK;
        let mut x = 0.;
        for _ in 0..2 {
            x += WALK_CYCLE_DISTANCE / 2.;
            tick(&mut state, &library, x, false, false, false, now);
            now += TICK;
        }
        assert_eq!(state.cycle_progress, 0.);
    }

    #[test]
    fn stopping_plays_an_idle_transition_then_clears_it() {
        let library = test_library();
        let mut state = AnimationState::new();

        tick(&mut state, &library, 0., false, false, false, 0);
        tick(&mut state, &library, 0.2, false, false, false, TICK);
        assert!(state.last_movement_frame.is_some());

        // First stationary tick anchors the transition.
        tick(&mut state, &library, 0.2, false, false, false, 2 * TICK);
        assert_eq!(state.mode, Mode::Idle);
        assert!(state.idle_transition_start.is_some());

        // Past the transition duration the anchors clear.
        let after = 2 * TICK + (IDLE_TRANSITION_DURATION * 1_000_000.) as u64 + TICK;
        let frame = tick(&mut state, &library, 0.2, false, false, false, after);
        assert!(state.idle_transition_start.is_none());
        assert!(state.last_movement_frame.is_none());
        assert_eq!(frame, library.idle(Direction::Forward, false));
    }

    #[test]
    fn reversal_turns_then_resumes_moving() {
        let library = test_library();
        let mut state = AnimationState::new();

        let mut now = 0;
        let mut x = 0.;
        tick(&mut state, &library, x, false, false, false, now);
        for _ in 0..4 {
            now += TICK;
            x += 0.1;
            tick(&mut state, &library, x, false, false, false, now);
        }
        assert_eq!(state.mode, Mode::Moving);

        // Reverse: the turn renders before normal gait resumes.
        now += TICK;
        x -= 0.1;
        tick(&mut state, &library, x, false, false, false, now);
        assert_eq!(state.mode, Mode::Turning);
        assert!(state.turn.is_some());

        // Keep moving backward through the turn and its blend-out.
        let exit_ticks =
            ((TURN_DURATION + TURN_EXIT_DURATION) / (TICK as f32 / 1_000_000.)) as u32 + 2;
        for _ in 0..exit_ticks {
            now += TICK;
            x -= 0.1;
            tick(&mut state, &library, x, false, false, false, now);
        }
        assert_eq!(state.direction, Direction::Backward);
        assert!(state.turn.is_none() && state.turn_exit.is_none());

        // The first tick past the blend-out runs plain gait again.
        now += TICK;
        x -= 0.1;
        tick(&mut state, &library, x, false, false, false, now);
        assert_eq!(state.mode, Mode::Moving);
    }

    #[test]
    fn crouch_transition_suppresses_jump_handling() {
        let library = test_library();
        let mut state = AnimationState::new();

        tick(&mut state, &library, 0., false, false, false, 0);
        tick(&mut state, &library, 0., false, false, true, TICK);
        assert!(state.crouch_transition.is_some());

        // A jump arriving mid-transition is not anchored.
        tick(&mut state, &library, 0., false, true, true, 2 * TICK);
        assert!(state.jump.is_none());

        // Transition completes and commits the crouch.
        let after = TICK + (CROUCH_TRANSITION_DURATION * 1_000_000.) as u64 + TICK;
        tick(&mut state, &library, 0., false, false, true, after);
        assert!(state.crouch_transition.is_none());
        assert!(state.is_crouching);

        tick(&mut state, &library, 0., false, false, true, after + TICK);
        assert_eq!(state.mode, Mode::Crouching);
    }

    #[test]
    fn crouch_blend_factor_stays_clamped() {
        let library = test_library();
        let mut state = AnimationState::new();

        let mut now = 0;
        tick(&mut state, &library, 0., false, false, false, now);
        for _ in 0..30 {
            now += TICK;
            tick(&mut state, &library, 0., false, false, true, now);
            assert!(state.crouch_blend_factor >= 0. && state.crouch_blend_factor <= 1.);
        }
        assert_relative_eq!(state.crouch_blend_factor, 1.);
    }

    #[test]
    fn jump_runs_its_window_then_blends_out() {
        let library = test_library();
        let mut state = AnimationState::new();

        tick(&mut state, &library, 0., false, false, false, 0);
        tick(&mut state, &library, 0., false, true, false, TICK);
        assert_eq!(state.mode, Mode::Jumping);
        assert!(state.jump.is_some());

        let diag = animation_diagnostics(&state, TICK);
        assert!(diag.is_jumping);
        assert_eq!(diag.jump_phase, Some(JumpPhase::Start));

        // Past the full window the jump gives way to the landing blend.
        let after = TICK + (JUMP_TOTAL_DURATION * 1_000_000.) as u64 + TICK;
        tick(&mut state, &library, 0., false, false, false, after);
        assert!(state.jump.is_none());
        assert!(state.jump_end.is_some());

        // And the landing blend clears on its own.
        let land = after + (JUMP_LAND_DURATION * 1_000_000.) as u64 + TICK;
        tick(&mut state, &library, 0., false, false, false, land);
        assert!(state.jump_end.is_none());

        tick(&mut state, &library, 0., false, false, false, land + TICK);
        assert_eq!(state.mode, Mode::Idle);
    }

    #[test]
    fn walk_run_blend_ramps_and_commits() {
        let library = test_library();
        let mut state = AnimationState::new();

        let mut now = 0;
        let mut x = 0.;
        tick(&mut state, &library, x, false, false, false, now);

        // Ramp up over the transition duration.
        let ramp_ticks = (WALK_RUN_TRANSITION_DURATION / (TICK as f32 / 1_000_000.)) as u32 + 2;
        let mut prev = 0.;
        for _ in 0..ramp_ticks {
            now += TICK;
            x += 0.2;
            tick(&mut state, &library, x, true, false, false, now);
            assert!(state.walk_run_blend_factor >= prev);
            prev = state.walk_run_blend_factor;
        }
        assert_relative_eq!(state.walk_run_blend_factor, 1.);
        assert!(state.is_running);
    }

    #[test]
    fn missing_poses_fall_back_to_idle_without_panicking() {
        let mut frames = BTreeMap::new();
        let mut idle = Frame::default();
        idle.set("neck", Vector2::new(0.5, 0.4));
        frames.insert(String::from("IDLE"), idle);
        let library = FrameLibrary::from_frames(frames).unwrap();

        let mut state = AnimationState::new();
        tick(&mut state, &library, 0., false, false, false, 0);
        let frame = tick(&mut state, &library, 0.2, true, false, false, TICK);
        assert_eq!(state.mode, Mode::Moving);
        assert!(!frame.is_empty());
    }
}
