pub mod animation;
pub mod blend;
pub mod collision;
pub mod frame;
pub mod movement;
pub mod player;
pub mod tile;
