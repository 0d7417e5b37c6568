//! Video overlay controller
//!
//! One overlay, reused for every open. Opening while a video is showing
//! destroys the previous player first, so at most one player is ever alive.
//! When the backend is not ready yet the video id is parked and the player
//! is created on [`VideoOverlay::on_backend_ready`].

use ratatui::layout::Rect;
use tracing::{debug, info, warn};

use crate::stream::player::{PlayerBackend, PlayerHandle};

/// What closed the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseButton,
    Backdrop,
    Escape,
}

impl std::fmt::Display for CloseTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CloseTrigger::CloseButton => write!(f, "close-button"),
            CloseTrigger::Backdrop => write!(f, "backdrop"),
            CloseTrigger::Escape => write!(f, "escape"),
        }
    }
}

#[derive(Debug)]
enum Slot<H> {
    Closed,
    /// Open, waiting for the backend
    Pending(String),
    Playing(H),
    Failed { video_id: String, message: String },
}

/// Read-only view of the overlay for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayStatus<'a> {
    Closed,
    Waiting { video_id: &'a str },
    Playing { video_id: &'a str, session: String },
    Failed { video_id: &'a str, message: &'a str },
}

/// Screen geometry of the overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayLayout {
    /// The video panel; clicks inside it do nothing
    pub video: Rect,
    /// `[✕]` in the panel's top border
    pub close_button: Rect,
}

pub const CLOSE_BUTTON_LABEL: &str = "[✕]";

impl OverlayLayout {
    /// Centered panel covering most of the screen
    pub fn for_screen(screen: Rect) -> Self {
        // Widened so very large terminals cannot overflow u16
        let width = ((u32::from(screen.width) * 4 / 5) as u16).max(screen.width.min(40));
        let height = ((u32::from(screen.height) * 3 / 5) as u16).max(screen.height.min(9));
        let video = Rect {
            x: screen.x + (screen.width.saturating_sub(width)) / 2,
            y: screen.y + (screen.height.saturating_sub(height)) / 2,
            width,
            height,
        };
        let button_width = CLOSE_BUTTON_LABEL.chars().count() as u16;
        let close_button = Rect {
            x: (video.x + video.width).saturating_sub(button_width + 1),
            y: video.y,
            width: button_width.min(video.width),
            height: 1.min(video.height),
        };
        Self {
            video,
            close_button,
        }
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x && column < rect.x + rect.width && row >= rect.y && row < rect.y + rect.height
}

pub struct VideoOverlay<B: PlayerBackend> {
    backend: B,
    slot: Slot<B::Handle>,
}

impl<B: PlayerBackend> VideoOverlay<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            slot: Slot::Closed,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.slot, Slot::Closed)
    }

    /// Video currently shown (or waiting to be shown)
    pub fn video_id(&self) -> Option<&str> {
        match &self.slot {
            Slot::Closed => None,
            Slot::Pending(id) => Some(id),
            Slot::Playing(handle) => Some(handle.video_id()),
            Slot::Failed { video_id, .. } => Some(video_id),
        }
    }

    /// The live player, if one exists
    pub fn player(&self) -> Option<&B::Handle> {
        match &self.slot {
            Slot::Playing(handle) => Some(handle),
            _ => None,
        }
    }

    pub fn status(&self) -> OverlayStatus<'_> {
        match &self.slot {
            Slot::Closed => OverlayStatus::Closed,
            Slot::Pending(id) => OverlayStatus::Waiting { video_id: id },
            Slot::Playing(handle) => OverlayStatus::Playing {
                video_id: handle.video_id(),
                session: handle.session_id().to_string(),
            },
            Slot::Failed { video_id, message } => OverlayStatus::Failed { video_id, message },
        }
    }

    /// Show the overlay for `video_id`
    pub fn open(&mut self, video_id: &str) {
        if self.is_open() {
            debug!("overlay: reusing open overlay");
        }
        self.teardown();
        info!(%video_id, "overlay: open");

        if self.backend.is_ready() {
            self.create(video_id.to_string());
        } else {
            debug!(%video_id, "overlay: backend not ready, deferring player");
            self.slot = Slot::Pending(video_id.to_string());
        }
    }

    /// The backend became ready. Creates the deferred player if the overlay
    /// is still open.
    pub fn on_backend_ready(&mut self) {
        if let Slot::Pending(_) = self.slot {
            if let Slot::Pending(video_id) = std::mem::replace(&mut self.slot, Slot::Closed) {
                self.create(video_id);
            }
        }
    }

    /// The backend will never become ready. A waiting overlay shows the reason.
    pub fn on_backend_unavailable(&mut self, message: impl Into<String>) {
        if let Slot::Pending(video_id) = &self.slot {
            let video_id = video_id.clone();
            self.slot = Slot::Failed {
                video_id,
                message: message.into(),
            };
        }
    }

    /// Hide the overlay and destroy its player. Returns false when the
    /// overlay was already closed.
    pub fn close(&mut self, trigger: CloseTrigger) -> bool {
        if !self.is_open() {
            return false;
        }
        self.teardown();
        info!(%trigger, "overlay: closed");
        true
    }

    /// Route a mouse click. The close button and the backdrop close the
    /// overlay; clicks on the video panel are ignored.
    pub fn click(&mut self, screen: Rect, column: u16, row: u16) -> Option<CloseTrigger> {
        if !self.is_open() {
            return None;
        }
        let layout = OverlayLayout::for_screen(screen);
        let trigger = if contains(layout.close_button, column, row) {
            CloseTrigger::CloseButton
        } else if !contains(layout.video, column, row) {
            CloseTrigger::Backdrop
        } else {
            return None;
        };
        self.close(trigger);
        Some(trigger)
    }

    fn create(&mut self, video_id: String) {
        match self.backend.create(&video_id) {
            Ok(handle) => self.slot = Slot::Playing(handle),
            Err(e) => {
                warn!(%video_id, error = %e, "overlay: player creation failed");
                self.slot = Slot::Failed {
                    video_id,
                    message: e.to_string(),
                };
            }
        }
    }

    fn teardown(&mut self) {
        if let Slot::Playing(handle) = std::mem::replace(&mut self.slot, Slot::Closed) {
            handle.destroy();
        }
    }
}

impl<B: PlayerBackend> Drop for VideoOverlay<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::player::PlayerError;
    use std::cell::Cell;
    use std::rc::Rc;
    use uuid::Uuid;

    struct FakeHandle {
        id: Uuid,
        video_id: String,
        live: Rc<Cell<usize>>,
    }

    impl PlayerHandle for FakeHandle {
        fn session_id(&self) -> Uuid {
            self.id
        }

        fn video_id(&self) -> &str {
            &self.video_id
        }

        fn destroy(self) {
            self.live.set(self.live.get() - 1);
        }
    }

    #[derive(Default)]
    struct FakeBackend {
        ready: bool,
        fail: bool,
        live: Rc<Cell<usize>>,
        created: usize,
    }

    impl PlayerBackend for FakeBackend {
        type Handle = FakeHandle;

        fn is_ready(&self) -> bool {
            self.ready
        }

        fn create(&mut self, video_id: &str) -> Result<FakeHandle, PlayerError> {
            if self.fail {
                return Err(PlayerError::NotFound("mpv".into()));
            }
            self.created += 1;
            self.live.set(self.live.get() + 1);
            Ok(FakeHandle {
                id: Uuid::new_v4(),
                video_id: video_id.to_string(),
                live: Rc::clone(&self.live),
            })
        }
    }

    fn ready_overlay() -> (VideoOverlay<FakeBackend>, Rc<Cell<usize>>) {
        let backend = FakeBackend {
            ready: true,
            ..Default::default()
        };
        let live = Rc::clone(&backend.live);
        (VideoOverlay::new(backend), live)
    }

    fn screen() -> Rect {
        Rect::new(0, 0, 100, 40)
    }

    #[test]
    fn test_open_creates_one_player() {
        let (mut overlay, live) = ready_overlay();
        overlay.open("abc123");
        assert!(overlay.is_open());
        assert_eq!(overlay.video_id(), Some("abc123"));
        assert_eq!(live.get(), 1);
    }

    #[test]
    fn test_reopen_replaces_player() {
        let (mut overlay, live) = ready_overlay();
        overlay.open("first1");
        overlay.open("second");
        assert_eq!(live.get(), 1);
        assert_eq!(overlay.backend().created, 2);
        assert_eq!(overlay.player().map(|p| p.video_id()), Some("second"));
    }

    #[test]
    fn test_every_trigger_closes() {
        for trigger in [
            CloseTrigger::CloseButton,
            CloseTrigger::Backdrop,
            CloseTrigger::Escape,
        ] {
            let (mut overlay, live) = ready_overlay();
            overlay.open("abc123");
            assert!(overlay.close(trigger));
            assert!(!overlay.is_open());
            assert_eq!(live.get(), 0);
        }
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let (mut overlay, live) = ready_overlay();
        assert!(!overlay.close(CloseTrigger::Escape));
        overlay.open("abc123");
        assert!(overlay.close(CloseTrigger::Escape));
        assert!(!overlay.close(CloseTrigger::Escape));
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_open_deferred_until_ready() {
        let mut overlay = VideoOverlay::new(FakeBackend::default());
        overlay.open("abc123");
        assert!(overlay.is_open());
        assert!(overlay.player().is_none());
        assert_eq!(
            overlay.status(),
            OverlayStatus::Waiting { video_id: "abc123" }
        );

        overlay.backend_mut().ready = true;
        overlay.on_backend_ready();
        assert_eq!(overlay.player().map(|p| p.video_id()), Some("abc123"));
    }

    #[test]
    fn test_ready_after_close_creates_nothing() {
        let mut overlay = VideoOverlay::new(FakeBackend::default());
        overlay.open("abc123");
        overlay.close(CloseTrigger::Backdrop);
        overlay.backend_mut().ready = true;
        overlay.on_backend_ready();
        assert_eq!(overlay.backend().created, 0);
        assert!(!overlay.is_open());
    }

    #[test]
    fn test_backend_unavailable_shows_reason() {
        let mut overlay = VideoOverlay::new(FakeBackend::default());
        overlay.open("abc123");
        overlay.on_backend_unavailable("mpv not found");
        assert_eq!(
            overlay.status(),
            OverlayStatus::Failed {
                video_id: "abc123",
                message: "mpv not found"
            }
        );
        assert!(overlay.close(CloseTrigger::Escape));
    }

    #[test]
    fn test_create_failure_keeps_overlay_open() {
        let backend = FakeBackend {
            ready: true,
            fail: true,
            ..Default::default()
        };
        let mut overlay = VideoOverlay::new(backend);
        overlay.open("abc123");
        assert!(overlay.is_open());
        assert!(matches!(overlay.status(), OverlayStatus::Failed { .. }));
    }

    #[test]
    fn test_click_routing() {
        let (mut overlay, live) = ready_overlay();
        let layout = OverlayLayout::for_screen(screen());

        overlay.open("abc123");
        assert_eq!(
            overlay.click(screen(), layout.video.x + 2, layout.video.y + 2),
            None
        );
        assert!(overlay.is_open());

        assert_eq!(
            overlay.click(screen(), layout.close_button.x, layout.close_button.y),
            Some(CloseTrigger::CloseButton)
        );
        assert_eq!(live.get(), 0);

        overlay.open("abc123");
        assert_eq!(overlay.click(screen(), 0, 0), Some(CloseTrigger::Backdrop));
        assert_eq!(live.get(), 0);

        assert_eq!(overlay.click(screen(), 0, 0), None);
    }

    #[test]
    fn test_layout_inside_screen() {
        let layout = OverlayLayout::for_screen(screen());
        assert_eq!(layout.video, Rect::new(10, 8, 80, 24));
        assert_eq!(layout.close_button, Rect::new(86, 8, 3, 1));

        let tiny = OverlayLayout::for_screen(Rect::new(0, 0, 20, 5));
        assert!(tiny.video.width <= 20 && tiny.video.height <= 5);
    }

    #[test]
    fn test_layout_on_huge_screen() {
        let huge = Rect {
            x: 0,
            y: 0,
            width: 40_000,
            height: 30_000,
        };
        let layout = OverlayLayout::for_screen(huge);
        assert_eq!(layout.video, Rect { x: 4_000, y: 6_000, width: 32_000, height: 18_000 });
        assert_eq!(layout.close_button.x, 35_996);
    }

    #[test]
    fn test_drop_destroys_player() {
        let (mut overlay, live) = ready_overlay();
        overlay.open("abc123");
        drop(overlay);
        assert_eq!(live.get(), 0);
    }
}
