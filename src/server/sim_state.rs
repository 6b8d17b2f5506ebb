use log::info;
use std::collections::BTreeMap;

use crate::game::animation::*;
use crate::game::frame::{Frame, FrameLibrary};
use crate::game::movement::*;
use crate::game::player::*;
use crate::game::tile::TileGrid;

/// Commands from the transport collaborator. Input overwrites the
/// player's stored intent; the last write before a tick boundary wins.
#[derive(Clone, Debug)]
pub enum SimCommand {
    AddPlayer { id: u32, x: f32, y: f32 },
    RemovePlayer { id: u32 },
    Input { id: u32, input: PlayerInput },
    Stop,
}

/// One full snapshot per tick for the broadcast collaborator.
#[derive(Clone, Debug)]
pub enum SimUpdate {
    State(BTreeMap<u32, PlayerRenderState>),
}

struct PlayerSlot {
    physics: PlayerPhysics,
    animation: AnimationState,
    input: PlayerInput,
    pivot_points: Frame,
}

/// The whole mutable simulation: every player's paired physics and
/// animation record, owned exclusively by the tick thread.
pub struct SimState {
    pub kill: bool,
    grid: TileGrid,
    library: FrameLibrary,
    players: BTreeMap<u32, PlayerSlot>,
}

impl SimState {
    pub fn new(grid: TileGrid, library: FrameLibrary) -> Self {
        Self {
            kill: false,
            grid,
            library,
            players: BTreeMap::new(),
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Creates the paired physics/animation records for a joining
    /// player, with the initial y snapped to at least the ground.
    pub fn add_player(&mut self, id: u32, x: f32, y: f32) {
        let ground = self.grid.ground_height(x);
        let physics = PlayerPhysics::new(x, y.max(ground));
        let pivot_points = self.library.idle(Direction::Forward, false);
        self.players.insert(
            id,
            PlayerSlot {
                physics,
                animation: AnimationState::new(),
                input: PlayerInput::default(),
                pivot_points,
            },
        );
        info!("player added: id={id}, x={x}");
    }

    pub fn remove_player(&mut self, id: u32) {
        if self.players.remove(&id).is_some() {
            info!("player removed: id={id}");
        }
    }

    /// Applies everything the transport delivered since the last tick
    /// boundary.
    pub fn preframe(&mut self, _timestamp: u64, commands: impl Iterator<Item = SimCommand>) {
        for command in commands {
            match command {
                SimCommand::AddPlayer { id, x, y } => self.add_player(id, x, y),
                SimCommand::RemovePlayer { id } => self.remove_player(id),
                SimCommand::Input { id, input } => {
                    if let Some(slot) = self.players.get_mut(&id) {
                        // A jump request already queued must survive an
                        // overwrite until a tick consumes it.
                        let pending_jump = slot.input.jump;
                        slot.input = input;
                        slot.input.jump |= pending_jump;
                    }
                }
                SimCommand::Stop => self.kill = true,
            }
        }
    }

    /// One full physics + animation pass for every player.
    pub fn step(&mut self, timestamp: u64, frametime: u64) {
        let dt = frametime as f32 / 1_000_000.;

        for slot in self.players.values_mut() {
            let input = slot.input;
            slot.physics.crouching = input.crouching;

            if input.jump {
                try_player_jump(&mut slot.physics, &self.grid, timestamp);
                slot.input.jump = false;
            }

            update_player_gravity(&mut slot.physics, &self.grid, dt);
            update_player_movement(
                &mut slot.physics,
                &self.grid,
                input.target_x,
                input.running,
                input.crouching,
                dt,
            );

            // The loop derives the running flag from actual speed, so a
            // hard stop drops out of the run blend even with the flag
            // held.
            let running = slot.physics.speed > BASE_SPEED;
            let jumping = is_jumping(&slot.physics, timestamp);
            slot.pivot_points = update_animation(
                &mut slot.animation,
                &self.library,
                slot.physics.x,
                running,
                jumping,
                input.crouching,
                timestamp,
            );
        }
    }

    /// Snapshot of every player for the broadcast collaborator; None
    /// when there is nobody to broadcast.
    pub fn postframe(&mut self, timestamp: u64) -> Option<SimUpdate> {
        if self.players.is_empty() {
            return None;
        }

        let state = self
            .players
            .iter()
            .map(|(&id, slot)| {
                (
                    id,
                    PlayerRenderState {
                        x: slot.physics.x,
                        y: slot.physics.y,
                        pivot_points: slot.pivot_points.clone(),
                        speed: slot.physics.speed,
                        angle: slot.physics.angle,
                        direction: slot.animation.direction,
                        crouching: slot.physics.crouching,
                        animation: animation_diagnostics(&slot.animation, timestamp),
                    },
                )
            })
            .collect();
        Some(SimUpdate::State(state))
    }
}
