//! CLI - Command Line Interface for LectureTUI
//!
//! Every search the TUI can run is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Search the catalog
//! lecturetui search "sicilian" --topic Openings --sort rank --json
//!
//! # Follow pagination to the end
//! lecturetui search "" --tag beginner --all
//!
//! # Theme preference
//! lecturetui theme toggle
//!
//! # Play a lecture's video
//! lecturetui watch https://youtu.be/dQw4w9WgXcQ
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::{FilterKind, SortKey, ThemeMode};
use crate::stream::player::PlayerType;

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error (catalog unreachable)
    NetworkError = 3,
    /// Search matched nothing
    NoResults = 4,
    /// Local player missing or failed to start
    PlayerFailed = 5,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// LectureTUI - terminal client for a lecture catalog
///
/// Run without arguments to launch interactive TUI.
/// Use subcommands for scriptable automation.
#[derive(Parser, Debug)]
#[command(
    name = "lecturetui",
    version,
    about = "Search, filter and watch lectures from the terminal",
    long_about = "A terminal client for a lecture catalog: live search with topic, \
                  tag and rank filters, incremental pagination, light and dark \
                  themes, and video playback in mpv or VLC.\n\n\
                  Run without arguments to launch the interactive TUI.\n\
                  Use subcommands for automation and scripting.",
    after_help = "EXAMPLES:\n\
                  lecturetui                              Launch interactive TUI\n\
                  lecturetui --topic Endgames             Launch TUI with a topic selected\n\
                  lecturetui search \"rook\" --sort rank    Search from the shell\n\
                  lecturetui theme set dark               Persist a theme choice\n\
                  lecturetui watch dQw4w9WgXcQ            Play a video"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Catalog server URL (overrides config and LECTURETUI_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Filters selected when the TUI starts
    #[command(flatten)]
    pub preselect: FilterArgs,

    /// Subcommand to run (omit for TUI mode)
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Check if running in CLI mode (has subcommand)
    pub fn is_cli_mode(&self) -> bool {
        self.command.is_some()
    }

    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

/// Topic/tag/rank selection, by display name or id
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Topic to filter by (repeatable)
    #[arg(long, short = 't')]
    pub topic: Vec<String>,

    /// Tag to filter by (repeatable)
    #[arg(long, short = 'g')]
    pub tag: Vec<String>,

    /// Rank to filter by
    #[arg(long, short = 'r')]
    pub rank: Option<String>,
}

impl FilterArgs {
    /// Every selection as (kind, value) pairs
    pub fn selections(&self) -> Vec<(FilterKind, &str)> {
        self.topic
            .iter()
            .map(|v| (FilterKind::Topic, v.as_str()))
            .chain(self.tag.iter().map(|v| (FilterKind::Tag, v.as_str())))
            .chain(self.rank.iter().map(|v| (FilterKind::Rank, v.as_str())))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.topic.is_empty() && self.tag.is_empty() && self.rank.is_none()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search the lecture catalog
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Show or change the light/dark theme
    Theme(ThemeCmd),

    /// Play a lecture video in a local player
    #[command(visible_alias = "w")]
    Watch(WatchCmd),

    /// List the configured topic, tag and rank filters
    #[command(visible_alias = "f")]
    Filters(FiltersCmd),
}

// =============================================================================
// Search Command
// =============================================================================

/// Search lectures by free text and filters
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search text (title, keywords); empty matches everything
    #[arg(default_value = "")]
    pub query: String,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Sort order
    #[arg(long, short = 's', value_enum, default_value = "date")]
    pub sort: SortArg,

    /// Number of pages to fetch
    #[arg(long, short = 'p', default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Keep loading pages until the server reports no more
    #[arg(long, short = 'a', conflicts_with = "pages")]
    pub all: bool,
}

/// Sort order for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum SortArg {
    /// Newest first
    #[default]
    Date,
    /// By rank
    Rank,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => SortKey::Date,
            SortArg::Rank => SortKey::Rank,
        }
    }
}

// =============================================================================
// Theme Command
// =============================================================================

/// Show or change the theme preference
#[derive(Args, Debug)]
pub struct ThemeCmd {
    #[command(subcommand)]
    pub action: Option<ThemeAction>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ThemeAction {
    /// Print the active mode and where it came from (default)
    Show,
    /// Switch to the other mode and remember it
    Toggle,
    /// Remember a specific mode
    Set {
        #[arg(value_enum)]
        mode: ModeArg,
    },
    /// Forget the stored choice and follow the OS
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Light,
    Dark,
}

impl From<ModeArg> for ThemeMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Light => ThemeMode::Light,
            ModeArg::Dark => ThemeMode::Dark,
        }
    }
}

// =============================================================================
// Watch Command
// =============================================================================

/// Play a video by id or YouTube URL
#[derive(Args, Debug)]
pub struct WatchCmd {
    /// Video id, youtu.be link or youtube.com/watch URL
    #[arg(required = true)]
    pub video: String,

    /// Player to use (overrides config)
    #[arg(long, value_enum)]
    pub player: Option<PlayerChoice>,

    /// Return as soon as the player started instead of waiting for it to exit
    #[arg(long, short = 'd')]
    pub detach: bool,
}

/// Local player choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerChoice {
    /// mpv media player
    Mpv,
    /// VLC media player
    Vlc,
}

impl From<PlayerChoice> for PlayerType {
    fn from(choice: PlayerChoice) -> Self {
        match choice {
            PlayerChoice::Mpv => PlayerType::Mpv,
            PlayerChoice::Vlc => PlayerType::Vlc,
        }
    }
}

// =============================================================================
// Filters Command
// =============================================================================

/// List filter options from the config file
#[derive(Args, Debug)]
pub struct FiltersCmd {
    /// Only list one kind
    #[arg(value_enum)]
    pub kind: Option<KindArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Topic,
    Tag,
    Rank,
}

impl From<KindArg> for FilterKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Topic => FilterKind::Topic,
            KindArg::Tag => FilterKind::Tag,
            KindArg::Rank => FilterKind::Rank,
        }
    }
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            success: false,
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Search response
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub sort: String,
    /// Last page fetched
    pub page: u32,
    pub has_next: bool,
    pub lectures: Vec<crate::models::Lecture>,
}

/// Theme status response
#[derive(Debug, Serialize, Deserialize)]
pub struct ThemeStatus {
    pub mode: ThemeMode,
    /// A stored choice is in effect
    pub explicit: bool,
    /// OS preference, if detectable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<ThemeMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_file: Option<String>,
}

/// Watch response
#[derive(Debug, Serialize)]
pub struct WatchResponse {
    pub status: &'static str,
    pub video_id: String,
    pub url: String,
    pub player: String,
    pub session: String,
    /// Process id, so a detached player can be stopped later
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            // For non-JSON, caller should handle formatting
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_args_is_tui_mode() {
        let cli = Cli::parse_from(["lecturetui"]);
        assert!(!cli.is_cli_mode());
        assert!(cli.preselect.is_empty());
    }

    #[test]
    fn test_tui_preselect() {
        let cli = Cli::parse_from(["lecturetui", "--topic", "Openings", "-g", "beginner"]);
        assert!(!cli.is_cli_mode());
        assert_eq!(
            cli.preselect.selections(),
            vec![(FilterKind::Topic, "Openings"), (FilterKind::Tag, "beginner")]
        );
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from([
            "lecturetui", "search", "rook", "-t", "1", "-t", "2", "--rank", "gm", "--sort", "rank",
        ]);
        assert!(cli.is_cli_mode());
        if let Some(Command::Search(cmd)) = cli.command {
            assert_eq!(cmd.query, "rook");
            assert_eq!(cmd.filters.topic, vec!["1", "2"]);
            assert_eq!(cmd.filters.rank.as_deref(), Some("gm"));
            assert_eq!(SortKey::from(cmd.sort), SortKey::Rank);
            assert_eq!(cmd.pages, 1);
            assert!(!cmd.all);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_search_empty_query_allowed() {
        let cli = Cli::parse_from(["lecturetui", "s", "--all"]);
        if let Some(Command::Search(cmd)) = cli.command {
            assert_eq!(cmd.query, "");
            assert!(cmd.all);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_search_rejects_zero_pages() {
        assert!(Cli::try_parse_from(["lecturetui", "search", "x", "--pages", "0"]).is_err());
        assert!(Cli::try_parse_from(["lecturetui", "search", "x", "-p", "2", "--all"]).is_err());
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from([
            "lecturetui",
            "--json",
            "--quiet",
            "--base-url",
            "http://catalog.test",
            "search",
            "test",
        ]);
        assert!(cli.json);
        assert!(cli.quiet);
        assert_eq!(cli.base_url.as_deref(), Some("http://catalog.test"));
    }

    #[test]
    fn test_theme_actions() {
        let cli = Cli::parse_from(["lecturetui", "theme"]);
        assert!(matches!(cli.command, Some(Command::Theme(ThemeCmd { action: None }))));

        let cli = Cli::parse_from(["lecturetui", "theme", "set", "dark"]);
        if let Some(Command::Theme(cmd)) = cli.command {
            assert_eq!(
                cmd.action,
                Some(ThemeAction::Set {
                    mode: ModeArg::Dark
                })
            );
        } else {
            panic!("Expected Theme command");
        }

        assert!(Cli::try_parse_from(["lecturetui", "theme", "set", "purple"]).is_err());
    }

    #[test]
    fn test_watch_command() {
        let cli = Cli::parse_from(["lecturetui", "watch", "abc123", "--player", "vlc", "-d"]);
        if let Some(Command::Watch(cmd)) = cli.command {
            assert_eq!(cmd.video, "abc123");
            assert_eq!(cmd.player.map(PlayerType::from), Some(PlayerType::Vlc));
            assert!(cmd.detach);
        } else {
            panic!("Expected Watch command");
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NoResults), 4);
        assert_eq!(i32::from(ExitCode::PlayerFailed), 5);
    }

    #[test]
    fn test_json_error_shape() {
        let out = JsonOutput::<()>::error_msg("boom", ExitCode::NetworkError);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["error"], "boom");
        assert_eq!(json["exit_code"], 3);
        assert_eq!(json["success"], false);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_watch_response_pid() {
        let mut response = WatchResponse {
            status: "playing",
            video_id: "abc123".into(),
            url: "https://www.youtube.com/watch?v=abc123".into(),
            player: "mpv".into(),
            session: "s".into(),
            pid: Some(4242),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["pid"], 4242);

        response.pid = None;
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("pid").is_none());
    }

    #[test]
    fn test_filters_kind_is_positional() {
        let cli = Cli::parse_from(["lecturetui", "filters", "tag"]);
        if let Some(Command::Filters(cmd)) = cli.command {
            assert_eq!(cmd.kind, Some(KindArg::Tag));
        } else {
            panic!("Expected Filters command");
        }
    }
}
