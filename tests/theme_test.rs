//! Theme persistence tests
//!
//! Runs the theme controller against a real state file in a temp directory.

use std::path::PathBuf;

use lecturetui::models::ThemeMode;
use lecturetui::theme::{PreferenceStore, StateFile, ThemeController};
use lecturetui::ui::Theme;

fn state_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("lecturetui-theme-{}", uuid::Uuid::new_v4()))
        .join("state.toml")
}

#[test]
fn test_first_run_follows_system_without_writing() {
    let path = state_path();

    let controller = ThemeController::init(StateFile::at(&path), Some(true));
    assert_eq!(controller.mode(), ThemeMode::Dark);
    assert!(!controller.has_explicit_preference());
    assert!(!path.exists(), "resolving the initial mode must not persist it");
}

#[test]
fn test_no_preference_anywhere_is_light() {
    let controller = ThemeController::init(StateFile::at(state_path()), None);
    assert_eq!(controller.mode(), ThemeMode::Light);
    assert_eq!(controller.palette(), &Theme::LIGHT);
}

#[test]
fn test_toggle_survives_restart() {
    let path = state_path();

    let mut controller = ThemeController::init(StateFile::at(&path), Some(false));
    assert_eq!(controller.toggle(), ThemeMode::Dark);
    drop(controller);

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("theme = \"dark\""), "unexpected state file: {}", raw);

    // The saved choice beats the OS preference on the next start
    let controller = ThemeController::init(StateFile::at(&path), Some(false));
    assert_eq!(controller.mode(), ThemeMode::Dark);
    assert!(controller.has_explicit_preference());
}

#[test]
fn test_explicit_choice_ignores_os_changes() {
    let path = state_path();
    let mut controller = ThemeController::init(StateFile::at(&path), Some(true));

    // Still following the OS
    assert!(controller.on_system_change(false));
    assert_eq!(controller.mode(), ThemeMode::Light);

    controller.set(ThemeMode::Dark);
    assert!(!controller.on_system_change(false));
    assert_eq!(controller.mode(), ThemeMode::Dark);
}

#[test]
fn test_clear_preference_returns_to_system() {
    let path = state_path();
    let mut controller = ThemeController::init(StateFile::at(&path), Some(true));
    controller.set(ThemeMode::Light);
    assert_eq!(controller.store().load_theme(), Some(ThemeMode::Light));

    controller.clear_preference(Some(true));
    assert_eq!(controller.mode(), ThemeMode::Dark);
    assert_eq!(controller.store().load_theme(), None);

    let controller = ThemeController::init(StateFile::at(&path), Some(false));
    assert!(!controller.has_explicit_preference());
    assert_eq!(controller.mode(), ThemeMode::Light);
}

#[test]
fn test_corrupt_state_file_is_ignored() {
    let path = state_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "theme = 42").unwrap();

    let mut controller = ThemeController::init(StateFile::at(&path), Some(true));
    assert_eq!(controller.mode(), ThemeMode::Dark);
    assert!(!controller.has_explicit_preference());

    // Saving replaces the unreadable file
    controller.set(ThemeMode::Light);
    assert_eq!(StateFile::at(&path).load_theme(), Some(ThemeMode::Light));
}

#[test]
fn test_toggle_control_describes_next_mode() {
    let mut controller = ThemeController::init(StateFile::at(state_path()), None);
    assert_eq!(controller.toggle_icon(), "☾");
    assert_eq!(controller.toggle_label(), "Switch to dark mode");
    controller.toggle();
    assert_eq!(controller.toggle_icon(), "☀");
    assert_eq!(controller.toggle_label(), "Switch to light mode");
}
