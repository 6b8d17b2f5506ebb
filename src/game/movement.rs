use log::warn;

use crate::game::collision::resolve_tile_collision;
use crate::game::player::{PlayerPhysics, PLAYER_HEIGHT, PLAYER_WIDTH};
use crate::game::tile::TileGrid;

// Locomotion (world units per second):
pub const BASE_SPEED: f32 = 30.;
pub const MAX_SPEED: f32 = 150.;
pub const ACCELERATION_RATE: f32 = 100.;
pub const DECELERATION_RATE: f32 = 200.;

// Banking:
pub const MAX_TILT_ANGLE: f32 = 7.; // Degrees.
pub const TILT_SPEED: f32 = 180.; // Degrees per second.
pub const MIN_SPEED_FOR_TILT: f32 = 1.;

// Vertical:
pub const GRAVITY: f32 = -37.;
pub const JUMP_VELOCITY: f32 = 6.5;
pub const JUMP_DURATION: f32 = 0.4; // Seconds.

/// Advances one player's horizontal movement for a tick: direction
/// intent, acceleration-limited speed, banking angle, and the collision-
/// corrected displacement.
pub fn update_player_movement(
    physics: &mut PlayerPhysics,
    grid: &TileGrid,
    target_x: Option<f32>,
    running: bool,
    crouching: bool,
    dt: f32,
) {
    let target_x = target_x.map(|x| clamp_target_x(grid, physics, x));

    // Intent sign, and whether it reverses a committed direction.
    let mut direction_changed = false;
    let new_direction = match target_x {
        Some(tx) => {
            let d = if tx > physics.x {
                1
            } else if tx < physics.x {
                -1
            } else {
                0
            };
            if physics.direction != 0 && d != physics.direction {
                direction_changed = true;
            }
            physics.direction = d;
            d
        }
        None => 0,
    };

    let new_speed = if direction_changed {
        // Hard stop on reversal.
        0.
    } else if crouching {
        // Crouching caps speed at the base.
        BASE_SPEED
    } else if running && new_direction != 0 {
        (physics.speed + ACCELERATION_RATE * dt).min(MAX_SPEED)
    } else {
        (physics.speed - DECELERATION_RATE * dt).max(BASE_SPEED)
    };
    physics.speed = new_speed;

    // Bank into the movement once meaningfully above base speed.
    let target_angle = if (new_speed - BASE_SPEED).abs() > MIN_SPEED_FOR_TILT && new_direction != 0
    {
        new_direction as f32 * MAX_TILT_ANGLE * (new_speed - BASE_SPEED) / (MAX_SPEED - BASE_SPEED)
    } else {
        0.
    };
    let angle_change = TILT_SPEED * dt;
    if (target_angle - physics.angle).abs() <= angle_change {
        physics.angle = target_angle;
    } else {
        physics.angle += angle_change.copysign(target_angle - physics.angle);
    }

    if let Some(tx) = target_x {
        let max_distance = new_speed * dt;
        let desired_distance = (tx - physics.x).abs();
        let actual_distance = desired_distance.min(max_distance);
        let new_x = physics.x + new_direction as f32 * actual_distance;
        let new_y = physics.y;
        resolve_tile_collision(physics, grid, new_x, new_y);
    }
}

/// Integrates gravity for one tick and clamps to the ground beneath the
/// player, zeroing vertical velocity on landing.
pub fn update_player_gravity(physics: &mut PlayerPhysics, grid: &TileGrid, dt: f32) {
    physics.vy += GRAVITY * dt;
    let mut new_y = physics.y + physics.vy * dt;

    let ground = grid.ground_height(physics.x);
    if new_y <= ground + PLAYER_HEIGHT {
        new_y = ground + PLAYER_HEIGHT;
        physics.vy = 0.;
    }
    physics.y = new_y;
}

/// Honors a jump request only while resting exactly on the ground and
/// not already inside a jump window.
pub fn try_player_jump(physics: &mut PlayerPhysics, grid: &TileGrid, now: u64) {
    let ground = grid.ground_height(physics.x);
    if physics.y == ground + PLAYER_HEIGHT && !is_jumping(physics, now) {
        physics.vy = JUMP_VELOCITY;
        physics.jump_start = Some(now);
    }
}

/// Whether the fixed jump window is still open. The anchor goes stale
/// rather than being cleared, so this is purely time-windowed.
pub fn is_jumping(physics: &PlayerPhysics, now: u64) -> bool {
    match physics.jump_start {
        Some(start) => (now.saturating_sub(start) as f32) / 1_000_000. < JUMP_DURATION,
        None => false,
    }
}

// Out-of-range or non-finite target coordinates are clamped into the
// map's valid x domain rather than rejected.
fn clamp_target_x(grid: &TileGrid, physics: &PlayerPhysics, x: f32) -> f32 {
    if !x.is_finite() {
        warn!("non-finite target x {x}, holding position");
        return physics.x;
    }
    x.clamp(0., grid.width() - PLAYER_WIDTH)
}
