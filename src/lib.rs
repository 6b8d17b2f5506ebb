//! Server-authoritative simulation core for a multiplayer side-scrolling
//! stickman game: fixed-tick physics, tile collision, and a pose-blending
//! locomotion state machine.

pub mod game;
pub mod io;
pub mod server;
pub mod service;
pub mod time;
