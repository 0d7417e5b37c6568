//! Light and dark palettes for LectureTUI
//!
//! The dark palette is the neon-on-black look; the light palette keeps the
//! same roles with ink colors on paper. Views never hard-code colors: they ask
//! the active [`Theme`] for a style.

use ratatui::style::{Color, Modifier, Style};

use crate::models::ThemeMode;

/// A complete color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub mode: ThemeMode,
    pub background: Color,
    /// Slightly raised panels and cards
    pub surface: Color,
    pub surface_hover: Color,
    pub primary: Color,
    pub secondary: Color,
    pub accent: Color,
    pub highlight: Color,
    pub text: Color,
    pub dim: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub border: Color,
    pub border_focused: Color,
}

static DARK: Theme = Theme::DARK;
static LIGHT: Theme = Theme::LIGHT;

impl Theme {
    // ═══════════════════════════════════════════════════════════════════════
    // PALETTES
    // ═══════════════════════════════════════════════════════════════════════

    pub const DARK: Theme = Theme {
        mode: ThemeMode::Dark,
        background: Color::Rgb(0x0a, 0x0a, 0x0f),
        surface: Color::Rgb(0x14, 0x14, 0x1e),
        surface_hover: Color::Rgb(0x1e, 0x1e, 0x2d),
        primary: Color::Rgb(0x00, 0xff, 0xf2),
        secondary: Color::Rgb(0xff, 0x00, 0xff),
        accent: Color::Rgb(0xff, 0xff, 0x00),
        highlight: Color::Rgb(0xff, 0x00, 0x80),
        text: Color::Rgb(0xe0, 0xe0, 0xe0),
        dim: Color::Rgb(0x40, 0x40, 0x50),
        success: Color::Rgb(0x00, 0xff, 0x00),
        warning: Color::Rgb(0xff, 0xaa, 0x00),
        error: Color::Rgb(0xff, 0x00, 0x40),
        border: Color::Rgb(0x00, 0x80, 0x78),
        border_focused: Color::Rgb(0x00, 0xff, 0xf2),
    };

    pub const LIGHT: Theme = Theme {
        mode: ThemeMode::Light,
        background: Color::Rgb(0xfa, 0xfa, 0xf7),
        surface: Color::Rgb(0xec, 0xec, 0xf0),
        surface_hover: Color::Rgb(0xe0, 0xe0, 0xe8),
        primary: Color::Rgb(0x00, 0x6d, 0x77),
        secondary: Color::Rgb(0xa0, 0x00, 0x7a),
        accent: Color::Rgb(0x8a, 0x5a, 0x00),
        highlight: Color::Rgb(0xc2, 0x18, 0x5b),
        text: Color::Rgb(0x1e, 0x1e, 0x28),
        dim: Color::Rgb(0x6b, 0x6b, 0x78),
        success: Color::Rgb(0x1b, 0x7f, 0x2a),
        warning: Color::Rgb(0x9a, 0x5b, 0x00),
        error: Color::Rgb(0xb0, 0x00, 0x20),
        border: Color::Rgb(0x7a, 0x9e, 0xa2),
        border_focused: Color::Rgb(0x00, 0x6d, 0x77),
    };

    /// Palette for a mode
    pub fn for_mode(mode: ThemeMode) -> &'static Theme {
        match mode {
            ThemeMode::Dark => &DARK,
            ThemeMode::Light => &LIGHT,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    /// Inverted with the primary color
    pub fn highlighted(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn success(&self) -> Style {
        Style::default()
            .fg(self.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn warning(&self) -> Style {
        Style::default()
            .fg(self.warning)
            .add_modifier(Modifier::BOLD)
    }

    /// Title/header style
    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn secondary(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused(&self) -> Style {
        Style::default()
            .fg(self.border_focused)
            .add_modifier(Modifier::BOLD)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // COMPONENT STYLES
    // ═══════════════════════════════════════════════════════════════════════

    pub fn list_item(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub fn list_item_selected(&self) -> Style {
        Style::default()
            .fg(self.text)
            .bg(self.surface_hover)
            .add_modifier(Modifier::BOLD)
    }

    pub fn input(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub fn keybind(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn keybind_desc(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn status_bar(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    pub fn loading(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Publish date on a card
    pub fn date(&self) -> Style {
        Style::default().fg(self.secondary)
    }

    pub fn topic_badge(&self) -> Style {
        Style::default().fg(self.primary)
    }

    pub fn tag_badge(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn rank_badge(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Active filter in the filter panel
    pub fn filter_active(&self) -> Style {
        Style::default()
            .fg(self.success)
            .add_modifier(Modifier::BOLD)
    }

    /// Video overlay body
    pub fn overlay(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance of a color (used in contrast ratio)
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Contrast ratio between two colors, from 1 (same color) to 21 (black/white).
/// WCAG AA requires >= 4.5:1 for normal text, >= 3:1 for large text.
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

pub fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// RGB tuple of a ratatui color (only the Rgb variant)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
