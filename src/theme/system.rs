//! Operating-system color-scheme preference
//!
//! Sources, first answer wins:
//! 1. `LECTURETUI_COLOR_SCHEME` (`dark` / `light`)
//! 2. macOS: `defaults read -g AppleInterfaceStyle`
//! 3. GNOME: `gsettings get org.gnome.desktop.interface color-scheme`
//! 4. The terminal's `COLORFGBG`
//!
//! There is no push notification from the OS, so [`spawn_watcher`] polls and
//! forwards changes over a channel.

use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Environment override for the OS preference
pub const ENV_OVERRIDE: &str = "LECTURETUI_COLOR_SCHEME";

/// How often the watcher re-checks the OS preference
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// `dark` / `light` (case-insensitive)
pub fn parse_scheme_name(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "dark" => Some(true),
        "light" => Some(false),
        _ => None,
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`). Background colors
/// 0-6 and 8 are dark; 7 and 9-15 are light.
pub fn parse_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    match bg {
        0..=6 | 8 => Some(true),
        7 | 9..=15 => Some(false),
        _ => None,
    }
}

/// `gsettings` prints a quoted enum value, e.g. `'prefer-dark'`
pub fn parse_gsettings(stdout: &str) -> Option<bool> {
    match stdout.trim().trim_matches('\'') {
        "prefer-dark" => Some(true),
        "prefer-light" | "default" => Some(false),
        _ => None,
    }
}

/// macOS only sets `AppleInterfaceStyle` in dark mode; the read fails otherwise
pub fn parse_apple_interface_style(success: bool, stdout: &str) -> bool {
    success && stdout.trim().eq_ignore_ascii_case("dark")
}

async fn run(cmd: &str, args: &[&str]) -> Option<(bool, String)> {
    let output = Command::new(cmd)
        .args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .await
        .ok()?;
    Some((
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
    ))
}

/// Detect whether the OS prefers a dark color scheme. `None` when no source
/// has an opinion.
pub async fn detect() -> Option<bool> {
    if let Some(dark) = std::env::var(ENV_OVERRIDE)
        .ok()
        .and_then(|v| parse_scheme_name(&v))
    {
        return Some(dark);
    }

    if cfg!(target_os = "macos") {
        if let Some((success, stdout)) =
            run("defaults", &["read", "-g", "AppleInterfaceStyle"]).await
        {
            return Some(parse_apple_interface_style(success, &stdout));
        }
    } else if let Some((true, stdout)) = run(
        "gsettings",
        &["get", "org.gnome.desktop.interface", "color-scheme"],
    )
    .await
    {
        if let Some(dark) = parse_gsettings(&stdout) {
            return Some(dark);
        }
    }

    std::env::var("COLORFGBG")
        .ok()
        .and_then(|v| parse_colorfgbg(&v))
}

/// Poll [`detect`] every `interval` and send each change. `initial` is the
/// value the receiver already knows about.
pub fn spawn_watcher(
    initial: Option<bool>,
    interval: Duration,
    tx: mpsc::Sender<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut last = initial;
        let mut ticker = tokio::time::interval(interval);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let current = detect().await;
            if current.is_some() && current != last {
                debug!(?current, "system scheme changed");
                last = current;
                if let Some(dark) = current {
                    if tx.send(dark).await.is_err() {
                        break;
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scheme_name() {
        assert_eq!(parse_scheme_name("Dark"), Some(true));
        assert_eq!(parse_scheme_name(" light "), Some(false));
        assert_eq!(parse_scheme_name("auto"), None);
    }

    #[test]
    fn test_parse_colorfgbg() {
        assert_eq!(parse_colorfgbg("15;0"), Some(true));
        assert_eq!(parse_colorfgbg("0;15"), Some(false));
        assert_eq!(parse_colorfgbg("0;default;7"), Some(false));
        assert_eq!(parse_colorfgbg("12;8"), Some(true));
        assert_eq!(parse_colorfgbg("garbage"), None);
        assert_eq!(parse_colorfgbg("0;200"), None);
    }

    #[test]
    fn test_parse_gsettings() {
        assert_eq!(parse_gsettings("'prefer-dark'\n"), Some(true));
        assert_eq!(parse_gsettings("'default'"), Some(false));
        assert_eq!(parse_gsettings("'prefer-light'"), Some(false));
        assert_eq!(parse_gsettings(""), None);
    }

    #[test]
    fn test_parse_apple_interface_style() {
        assert!(parse_apple_interface_style(true, "Dark\n"));
        assert!(!parse_apple_interface_style(false, ""));
        assert!(!parse_apple_interface_style(true, "Light"));
    }
}
