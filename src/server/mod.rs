pub mod sim_state;

use crossbeam_channel::{Receiver, Sender};
use log::info;

use self::sim_state::*;
use crate::game::frame::FrameLibrary;
use crate::game::tile::TileGrid;
use crate::service::Service;
use crate::time::*;

pub const FRAMETIME: u64 = 16_666; // us; logical 60 Hz.

/// Spawns the simulation on its own thread. Commands go in through the
/// service; one state snapshot per tick comes back out.
pub fn launch_simulation(grid: TileGrid, library: FrameLibrary) -> Service<SimCommand, SimUpdate> {
    Service::new("simulation_update_thread", move |commands, updates| {
        simulation_update_thread(grid, library, commands, updates)
    })
}

fn simulation_update_thread(
    grid: TileGrid,
    library: FrameLibrary,
    commands: Receiver<SimCommand>,
    updates: Sender<SimUpdate>,
) {
    info!("simulation thread start");
    let mut timestamp = get_microseconds_as_u64();

    let mut sim_state = SimState::new(grid, library);

    while !sim_state.kill {
        // Wait until enough has passed for at least 1 frame.
        let next_timestamp = wait(timestamp + FRAMETIME);

        sim_state.preframe(timestamp, commands.try_iter());

        // Simulate the time between timestamp and next_timestamp.
        let frames = (next_timestamp - timestamp) / FRAMETIME;
        for _ in 0..frames {
            sim_state.step(timestamp, FRAMETIME);
            timestamp += FRAMETIME;
        }

        if let Some(update) = sim_state.postframe(timestamp) {
            let _ = updates.send(update);
        }
    }

    info!("simulation thread closed");
}
