use log::info;

use stickman_server::game::frame::FrameLibrary;
use stickman_server::game::player::PlayerInput;
use stickman_server::game::tile::{MapTile, TileGrid};
use stickman_server::io;
use stickman_server::server::launch_simulation;
use stickman_server::server::sim_state::{SimCommand, SimUpdate};

fn main() {
    env_logger::init();

    let library = FrameLibrary::load(&io::asset_path("animation_frames.json"))
        .expect("frame library must load at startup");

    // A 64x16 demo map: solid floor along the bottom plus one platform.
    let mut tiles = Vec::new();
    for x in 0..64 {
        tiles.push(MapTile {
            x: x as f32,
            y: 15.,
            layer: 1,
        });
    }
    for x in 20..24 {
        tiles.push(MapTile {
            x: x as f32,
            y: 11.,
            layer: 1,
        });
    }
    let grid = TileGrid::new(64., 16., tiles);

    // Run a short scripted session: one player walks right, jumps once,
    // then the simulation is stopped.
    let mut simulation = launch_simulation(grid, library);
    simulation.send(SimCommand::AddPlayer {
        id: 1,
        x: 2.,
        y: 2.,
    });

    for tick in 0..300u32 {
        simulation.send(SimCommand::Input {
            id: 1,
            input: PlayerInput {
                target_x: Some(40.),
                jump: tick == 120,
                running: true,
                crouching: false,
            },
        });

        std::thread::sleep(std::time::Duration::from_millis(16));

        for update in simulation.recv() {
            let SimUpdate::State(state) = update;
            if tick % 60 == 0 {
                if let Some(player) = state.get(&1) {
                    info!(
                        "tick {tick}: x={:.2} y={:.2} speed={:.1} state={:?}",
                        player.x, player.y, player.speed, player.animation.current
                    );
                }
            }
        }
    }

    simulation.send(SimCommand::Stop);
    simulation.join();
    info!("simulation stopped");
}
