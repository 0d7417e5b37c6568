//! Playback infrastructure
//!
//! - Player: mpv/VLC processes behind the overlay's backend contract

pub mod player;

pub use player::{LocalPlayer, PlayerBackend, PlayerError, PlayerHandle, PlayerSession, PlayerType};
