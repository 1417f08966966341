pub mod audio;
pub mod behavior;
pub mod collision;
pub mod compute;
pub mod config;
pub mod entities;
pub mod error;
pub mod feedback;
pub mod game;
pub mod highscore;
pub mod input;
pub mod session;
pub mod spawn;
pub mod vector;
