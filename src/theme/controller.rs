//! Theme controller
//!
//! Resolves the active mode (explicit choice > OS preference > light),
//! exposes the toggle control's icon and label, and decides whether an OS
//! change may switch the mode.

use tracing::{info, warn};

use crate::models::ThemeMode;
use crate::theme::store::PreferenceStore;
use crate::ui::theme::Theme;

#[derive(Debug)]
pub struct ThemeController<S: PreferenceStore> {
    store: S,
    mode: ThemeMode,
    explicit: bool,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Resolve the initial mode from the store and the OS preference
    pub fn init(store: S, system_prefers_dark: Option<bool>) -> Self {
        let persisted = store.load_theme();
        let mode = persisted
            .or(system_prefers_dark.map(ThemeMode::from_prefers_dark))
            .unwrap_or_default();
        info!(
            %mode,
            explicit = persisted.is_some(),
            system = ?system_prefers_dark,
            "theme: applied"
        );
        Self {
            store,
            mode,
            explicit: persisted.is_some(),
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn palette(&self) -> &'static Theme {
        Theme::for_mode(self.mode)
    }

    pub fn has_explicit_preference(&self) -> bool {
        self.explicit
    }

    /// Icon for the toggle: what pressing it switches to
    pub fn toggle_icon(&self) -> &'static str {
        match self.mode {
            ThemeMode::Dark => "☀",
            ThemeMode::Light => "☾",
        }
    }

    pub fn toggle_label(&self) -> &'static str {
        match self.mode {
            ThemeMode::Dark => "Switch to light mode",
            ThemeMode::Light => "Switch to dark mode",
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Flip the mode and persist it as an explicit choice
    pub fn toggle(&mut self) -> ThemeMode {
        self.set(self.mode.opposite());
        self.mode
    }

    /// Apply and persist an explicit choice
    pub fn set(&mut self, mode: ThemeMode) {
        self.mode = mode;
        self.explicit = true;
        if let Err(e) = self.store.save_theme(mode) {
            warn!(error = %e, "theme: could not persist preference");
        }
        info!(%mode, "theme: applied (explicit)");
    }

    /// OS preference changed. Ignored once the user has chosen a mode.
    /// Returns whether the applied mode changed.
    pub fn on_system_change(&mut self, prefers_dark: bool) -> bool {
        if self.explicit {
            return false;
        }
        let mode = ThemeMode::from_prefers_dark(prefers_dark);
        if mode == self.mode {
            return false;
        }
        self.mode = mode;
        info!(%mode, "theme: applied (system)");
        true
    }

    /// Forget the explicit choice and follow the OS again
    pub fn clear_preference(&mut self, system_prefers_dark: Option<bool>) {
        if let Err(e) = self.store.clear_theme() {
            warn!(error = %e, "theme: could not clear preference");
        }
        self.explicit = false;
        self.mode = system_prefers_dark
            .map(ThemeMode::from_prefers_dark)
            .unwrap_or_default();
        info!(mode = %self.mode, "theme: following system");
    }
}
