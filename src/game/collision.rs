pub use crate::game::player::*;
pub use crate::game::tile::*;

/// Resolves a requested movement against the tile grid, horizontal axis
/// first, then vertical at the already-corrected x. Horizontal-first is
/// authoritative for diagonal/corner ambiguity; changing the order
/// changes observable gameplay. Vertical hits zero the vertical
/// velocity.
pub fn resolve_tile_collision(physics: &mut PlayerPhysics, grid: &TileGrid, new_x: f32, new_y: f32) {
    let corrected_x = resolve_collision_x(grid, physics.x, physics.y, new_x);
    let (corrected_y, hit) = resolve_collision_y(grid, corrected_x, physics.y, new_y);
    physics.x = corrected_x;
    physics.y = corrected_y;
    if hit {
        physics.vy = 0.;
    }
}

/// Corrects a horizontal move against solid tiles at the player's current
/// vertical extent. On overlap the player snaps to the tile's near edge,
/// picked by which side the prior x sat on.
pub fn resolve_collision_x(grid: &TileGrid, prev_x: f32, y: f32, new_x: f32) -> f32 {
    let player_left = new_x;
    let player_right = new_x + PLAYER_WIDTH;
    let player_top = grid.height() - y - PLAYER_HEIGHT;
    let player_bottom = grid.height() - y;

    for tile in grid.solid() {
        let tile_left = tile.x;
        let tile_right = tile.x + TILE_WIDTH;
        let tile_top = tile.y;
        let tile_bottom = tile.y + TILE_HEIGHT;

        if boxes_overlap(
            player_left,
            player_right,
            player_top,
            player_bottom,
            tile_left,
            tile_right,
            tile_top,
            tile_bottom,
        ) {
            if prev_x < tile_left {
                // Coming from the left.
                return tile_left - PLAYER_WIDTH;
            } else {
                // Coming from the right.
                return tile_right;
            }
        }
    }

    new_x
}

/// Corrects a vertical move against solid tiles, with a small buffer
/// beneath the feet. Falling snaps to rest on the tile; rising snaps to
/// just below it. Returns the corrected y and whether a tile was hit.
pub fn resolve_collision_y(grid: &TileGrid, x: f32, prev_y: f32, new_y: f32) -> (f32, bool) {
    let player_left = x;
    let player_right = x + PLAYER_WIDTH;
    let player_bottom = grid.height() - new_y;
    let player_top = player_bottom - PLAYER_HEIGHT;
    let collision_point = player_bottom - COLLISION_BUFFER;

    for tile in grid.solid() {
        let tile_left = tile.x;
        let tile_right = tile.x + TILE_WIDTH;
        let tile_top = tile.y;
        let tile_bottom = tile.y + TILE_HEIGHT;

        if player_left < tile_right
            && player_right > tile_left
            && player_top < tile_bottom
            && collision_point > tile_top
        {
            if prev_y > new_y {
                // Falling; rest on top of the tile.
                return (grid.height() - tile_bottom + COLLISION_BUFFER, true);
            } else {
                // Rising into a ceiling; stop just below it.
                return (grid.height() - tile_top - PLAYER_HEIGHT, true);
            }
        }
    }

    (new_y, false)
}

fn boxes_overlap(
    a_left: f32,
    a_right: f32,
    a_top: f32,
    a_bottom: f32,
    b_left: f32,
    b_right: f32,
    b_top: f32,
    b_bottom: f32,
) -> bool {
    a_left < b_right && a_right > b_left && a_top < b_bottom && a_bottom > b_top
}
