//! Local Player - mpv/VLC playback of catalog videos
//!
//! The video overlay does not embed a player. Each open spawns a local
//! player process on the video's watch URL; closing the overlay kills it.

use serde::{Deserialize, Serialize};
use std::process::Stdio;
use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::watch_url;

/// Supported local players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerType {
    /// mpv media player (default, plays YouTube URLs through yt-dlp)
    #[default]
    Mpv,
    /// VLC media player
    Vlc,
}

impl PlayerType {
    /// Get the command name for this player
    pub fn command(&self) -> &'static str {
        match self {
            PlayerType::Vlc => {
                // On macOS, VLC is an app bundle
                #[cfg(target_os = "macos")]
                if std::path::Path::new("/Applications/VLC.app").exists() {
                    return "/Applications/VLC.app/Contents/MacOS/VLC";
                }
                "vlc"
            }
            PlayerType::Mpv => "mpv",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PlayerType::Vlc => "VLC",
            PlayerType::Mpv => "mpv",
        }
    }

    /// Arguments for playing `url`
    pub fn args(&self, url: &str) -> Vec<String> {
        match self {
            PlayerType::Mpv => vec!["--force-window=immediate".to_string(), url.to_string()],
            PlayerType::Vlc => vec![url.to_string(), "--no-video-title-show".to_string()],
        }
    }
}

impl std::fmt::Display for PlayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for PlayerType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mpv" => Ok(PlayerType::Mpv),
            "vlc" => Ok(PlayerType::Vlc),
            other => Err(format!("unknown player '{}' (expected mpv or vlc)", other)),
        }
    }
}

/// Errors from local player operations
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("Player '{0}' not found. Install it first.")]
    NotFound(String),
    #[error("Failed to start player: {0}")]
    StartFailed(#[from] std::io::Error),
    #[error("Player is not ready yet")]
    NotReady,
}

// ═══════════════════════════════════════════════════════════════════════════
// BACKEND CONTRACT
// ═══════════════════════════════════════════════════════════════════════════

/// A live player instance
pub trait PlayerHandle {
    fn session_id(&self) -> Uuid;
    fn video_id(&self) -> &str;
    /// Tear the player down. Consumes the handle so it cannot be destroyed twice.
    fn destroy(self);
}

/// Creates players for the video overlay
pub trait PlayerBackend {
    type Handle: PlayerHandle;

    /// Whether `create` may be called yet
    fn is_ready(&self) -> bool;

    fn create(&mut self, video_id: &str) -> Result<Self::Handle, PlayerError>;
}

// ═══════════════════════════════════════════════════════════════════════════
// LOCAL PROCESS BACKEND
// ═══════════════════════════════════════════════════════════════════════════

/// A running player process
#[derive(Debug)]
pub struct PlayerSession {
    id: Uuid,
    video_id: String,
    child: Child,
}

impl PlayerSession {
    pub fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    /// Wait for the user to quit the player
    pub async fn wait(mut self) -> Result<(), PlayerError> {
        self.child.wait().await?;
        Ok(())
    }
}

impl PlayerHandle for PlayerSession {
    fn session_id(&self) -> Uuid {
        self.id
    }

    fn video_id(&self) -> &str {
        &self.video_id
    }

    fn destroy(mut self) {
        if let Err(e) = self.child.start_kill() {
            // Already exited
            debug!(session = %self.id, error = %e, "player: kill skipped");
        }
        info!(session = %self.id, video_id = %self.video_id, "player: destroyed");
    }
}

/// Local player backend
#[derive(Debug)]
pub struct LocalPlayer {
    player_type: PlayerType,
    ready: bool,
}

impl LocalPlayer {
    /// Create a local player. It is not ready until [`LocalPlayer::mark_ready`]
    /// is called, normally after [`LocalPlayer::is_available`] succeeded.
    pub fn new(player_type: PlayerType) -> Self {
        Self {
            player_type,
            ready: false,
        }
    }

    pub fn player_type(&self) -> PlayerType {
        self.player_type
    }

    pub fn mark_ready(&mut self) {
        self.ready = true;
    }

    /// Check if the player is available on the system
    pub async fn is_available(&self) -> bool {
        probe(self.player_type).await
    }

    /// Spawn the player on a video's watch URL
    pub fn spawn(&self, video_id: &str) -> Result<PlayerSession, PlayerError> {
        let url = watch_url(video_id);
        let mut cmd = Command::new(self.player_type.command());
        cmd.args(self.player_type.args(&url))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlayerError::NotFound(self.player_type.command().to_string())
            } else {
                PlayerError::StartFailed(e)
            }
        })?;

        let session = PlayerSession {
            id: Uuid::new_v4(),
            video_id: video_id.to_string(),
            child,
        };
        info!(
            session = %session.id,
            player = %self.player_type,
            %video_id,
            "player: started"
        );
        Ok(session)
    }
}

impl PlayerBackend for LocalPlayer {
    type Handle = PlayerSession;

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn create(&mut self, video_id: &str) -> Result<PlayerSession, PlayerError> {
        if !self.ready {
            return Err(PlayerError::NotReady);
        }
        self.spawn(video_id)
    }
}

/// Whether a player binary can be found
pub async fn probe(player_type: PlayerType) -> bool {
    let cmd = player_type.command();

    // Full path (macOS app bundle)
    if cmd.starts_with('/') {
        return std::path::Path::new(cmd).exists();
    }

    let found = Command::new("which")
        .arg(cmd)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|s| s.success())
        .unwrap_or(false);
    if !found {
        warn!(player = %player_type, "player: binary not found on PATH");
    }
    found
}
