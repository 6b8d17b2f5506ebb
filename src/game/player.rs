use serde::Serialize;

use crate::game::animation::AnimationDiagnostics;
use crate::game::frame::Frame;

pub const PLAYER_WIDTH: f32 = 1.;
pub const PLAYER_HEIGHT: f32 = 2.;

/// Horizontal travel direction. Forward faces +x; backward lookups in the
/// frame library mirror the pose.
#[derive(Serialize, Copy, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

/// Physical state of one player, owned by its slot in the simulation and
/// mutated only by the movement pass.
#[derive(Copy, Clone, Debug)]
pub struct PlayerPhysics {
    /// Top-of-head height above the world floor; resting on ground means
    /// y == ground + PLAYER_HEIGHT.
    pub y: f32,
    pub x: f32,
    /// Vertical velocity, positive up.
    pub vy: f32,
    pub speed: f32,
    /// Banking angle in degrees, signed by travel direction.
    pub angle: f32,
    /// Last committed travel sign: -1, 0, +1.
    pub direction: i8,
    pub crouching: bool,
    /// Timestamp (us) of the jump in flight, if any. Goes stale rather
    /// than being cleared; jump queries are time-windowed.
    pub jump_start: Option<u64>,
}

impl PlayerPhysics {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vy: 0.,
            speed: crate::game::movement::BASE_SPEED,
            angle: 0.,
            direction: 0,
            crouching: false,
            jump_start: None,
        }
    }
}

/// Stored per-player intent, overwritten by the transport collaborator;
/// the last write before a tick boundary wins.
#[derive(Copy, Clone, Debug, Default)]
pub struct PlayerInput {
    pub target_x: Option<f32>,
    /// Edge-triggered; consumed by the tick that honors it.
    pub jump: bool,
    pub running: bool,
    pub crouching: bool,
}

/// Per-player record emitted to the broadcast collaborator each tick.
#[derive(Serialize, Clone, Debug)]
pub struct PlayerRenderState {
    pub x: f32,
    pub y: f32,
    pub pivot_points: Frame,
    pub speed: f32,
    pub angle: f32,
    pub direction: Direction,
    pub crouching: bool,
    pub animation: AnimationDiagnostics,
}
