use serde::Deserialize;

use crate::game::player::PLAYER_WIDTH;

pub const TILE_WIDTH: f32 = 1.; // Tile size (in world units).
pub const TILE_HEIGHT: f32 = 1.;

/// Tolerance subtracted from the feet position so vertical checks don't
/// false-negative while resting on a surface.
pub const COLLISION_BUFFER: f32 = 0.1;

/// One map tile in grid coordinates; y grows downward from the top of the
/// map. Only layer-1 tiles are solid.
#[derive(Deserialize, Copy, Clone, Debug)]
pub struct MapTile {
    pub x: f32,
    pub y: f32,
    pub layer: u8,
}

/// Static world geometry, read-only for the lifetime of a simulation.
#[derive(Clone, Debug)]
pub struct TileGrid {
    width: f32,
    height: f32,
    tiles: Vec<MapTile>,
}

impl TileGrid {
    pub fn new(width: f32, height: f32, tiles: Vec<MapTile>) -> Self {
        Self {
            width,
            height,
            tiles,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn solid(&self) -> impl Iterator<Item = &MapTile> {
        self.tiles.iter().filter(|tile| tile.layer == 1)
    }

    /// Height of the highest solid tile top beneath the player's
    /// horizontal extent at `x`, or 0 (the world floor) when nothing is
    /// below.
    pub fn ground_height(&self, x: f32) -> f32 {
        let player_left = x;
        let player_right = x + PLAYER_WIDTH;

        let mut highest_ground = 0.;
        for tile in self.solid() {
            let tile_left = tile.x;
            let tile_right = tile.x + TILE_WIDTH;
            let tile_top = self.height - tile.y - 1.;
            if player_left < tile_right
                && player_right > tile_left
                && highest_ground + COLLISION_BUFFER <= tile_top
            {
                highest_ground = tile_top - TILE_HEIGHT;
            }
        }
        highest_ground
    }
}
