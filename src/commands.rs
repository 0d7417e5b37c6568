//! CLI Command Handlers
//!
//! Implements all CLI commands by driving the same controllers the TUI uses.
//! Each handler takes CLI args, the resolved config and Output, returns ExitCode.

use tracing::warn;

use crate::api::CatalogClient;
use crate::cli::{
    ExitCode, FiltersCmd, Output, SearchCmd, SearchResponse, ThemeAction, ThemeCmd, ThemeStatus,
    WatchCmd, WatchResponse,
};
use crate::config::Config;
use crate::models::{extract_video_id, watch_url, FilterKind, FilterOption, ThemeMode};
use crate::search::card::{LectureCard, NO_RESULTS_MESSAGE};
use crate::search::{Debouncer, SearchController, SearchOutcome, SearchRequest};
use crate::stream::{LocalPlayer, PlayerBackend, PlayerHandle, PlayerType};
use crate::theme::system;
use crate::theme::{PreferenceStore, StateFile, ThemeController};

/// Upper bound for `search --all`
pub const MAX_PAGES: u32 = 200;

// =============================================================================
// Search Command
// =============================================================================

/// Run one request and report whether a failure was a network failure
async fn fetch(
    client: &CatalogClient,
    controller: &mut SearchController,
    request: SearchRequest,
) -> (SearchOutcome, bool) {
    let result = client.search(&request.query).await;
    let network = matches!(&result, Err(e) if e.is_network());
    (controller.finish_search(&request, result), network)
}

fn failure(output: &Output, message: String, network: bool) -> ExitCode {
    let code = if network {
        ExitCode::NetworkError
    } else {
        ExitCode::Error
    };
    output.error(format!("Search failed: {}", message), code)
}

pub async fn search_cmd(cmd: SearchCmd, config: &Config, output: &Output) -> ExitCode {
    let client = CatalogClient::new(&config.base_url);
    let mut controller =
        SearchController::new(config.filters.clone(), Debouncer::new(config.debounce()));

    controller.set_term(cmd.query.trim());
    controller.set_sort(cmd.sort.into());
    for (kind, value) in cmd.filters.selections() {
        controller.preselect(kind, value);
    }

    output.info(format!("Searching {} for: {}", client.base_url(), cmd.query));

    let Some(request) = controller.begin_search(true) else {
        return output.error("A search is already running", ExitCode::Error);
    };
    match fetch(&client, &mut controller, request).await {
        (SearchOutcome::Empty, _) => {
            return output.error(NO_RESULTS_MESSAGE, ExitCode::NoResults);
        }
        (SearchOutcome::Errored(message), network) => {
            return failure(output, message, network);
        }
        _ => {}
    }

    let limit = if cmd.all { MAX_PAGES } else { cmd.pages };
    let mut fetched = 1;
    while fetched < limit {
        let Some(request) = controller.load_more() else {
            break;
        };
        output.info(format!("Loading page {}...", request.query.page));
        if let (SearchOutcome::Errored(message), network) =
            fetch(&client, &mut controller, request).await
        {
            return failure(output, message, network);
        }
        fetched += 1;
    }
    if cmd.all && controller.load_more_visible() {
        warn!(pages = MAX_PAGES, "search: stopped following pagination");
    }

    let response = SearchResponse {
        query: controller.query().term.clone(),
        sort: controller.query().sort.as_str().to_string(),
        page: controller.page(),
        has_next: controller.load_more_visible(),
        lectures: controller.lectures().to_vec(),
    };

    if output.json {
        if let Err(e) = output.print(&response) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        for card in controller.view().cards() {
            println!("{}", format_card_line(card));
        }
        if response.has_next {
            output.info(format!(
                "More results after page {}. Use --pages N or --all to load them.",
                response.page
            ));
        }
    }
    ExitCode::Success
}

/// One line of plain-text search output
pub fn format_card_line(card: &LectureCard) -> String {
    let mut line = format!("{:<13} {}", card.date_label, card.title);
    if let Some(rank) = &card.rank {
        line.push_str(&format!(" [{}]", rank.label));
    }
    if !card.badges.is_empty() {
        let labels: Vec<&str> = card.badges.iter().map(|b| b.label.as_str()).collect();
        line.push_str(&format!("  #{}", labels.join(" #")));
    }
    line.push_str(&format!("  {}", watch_url(&card.video_id)));
    line
}

// =============================================================================
// Theme Command
// =============================================================================

pub async fn theme_cmd(cmd: ThemeCmd, output: &Output) -> ExitCode {
    let system = system::detect().await;
    let mut controller = ThemeController::init(StateFile::open(), system);

    let action = cmd.action.unwrap_or(ThemeAction::Show);
    match &action {
        ThemeAction::Show => {}
        ThemeAction::Toggle => {
            controller.toggle();
        }
        ThemeAction::Set { mode } => controller.set((*mode).into()),
        ThemeAction::Clear => controller.clear_preference(system),
    }

    let persisted = controller.store().load_theme();
    let saved = match action {
        ThemeAction::Toggle | ThemeAction::Set { .. } => persisted == Some(controller.mode()),
        ThemeAction::Clear => persisted.is_none(),
        ThemeAction::Show => true,
    };
    if !saved {
        return output.error(
            "Could not save the theme preference (see log for details)",
            ExitCode::Error,
        );
    }

    let status = ThemeStatus {
        mode: controller.mode(),
        explicit: controller.has_explicit_preference(),
        system: system.map(ThemeMode::from_prefers_dark),
        state_file: controller
            .store()
            .path()
            .map(|p| p.display().to_string()),
    };

    if output.json {
        if let Err(e) = output.print(&status) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    } else {
        let source = if status.explicit {
            "saved preference"
        } else if status.system.is_some() {
            "following system"
        } else {
            "default"
        };
        println!("{} ({})", status.mode, source);
    }
    ExitCode::Success
}

// =============================================================================
// Watch Command
// =============================================================================

pub async fn watch_cmd(cmd: WatchCmd, config: &Config, output: &Output) -> ExitCode {
    let Some(video_id) = extract_video_id(&cmd.video) else {
        return output.error(
            format!("Not a video id or YouTube URL: {}", cmd.video),
            ExitCode::InvalidArgs,
        );
    };

    let player_type = cmd.player.map(PlayerType::from).unwrap_or(config.player);
    let mut player = LocalPlayer::new(player_type);
    if !player.is_available().await {
        return output.error(
            format!(
                "{} not found. Install it first.",
                player_type.display_name()
            ),
            ExitCode::PlayerFailed,
        );
    }
    player.mark_ready();

    output.info(format!(
        "Playing {} in {}...",
        video_id,
        player_type.display_name()
    ));
    let session = match player.create(&video_id) {
        Ok(session) => session,
        Err(e) => return output.error(e.to_string(), ExitCode::PlayerFailed),
    };

    let response = WatchResponse {
        status: "playing",
        url: watch_url(&video_id),
        video_id,
        player: player_type.to_string(),
        session: session.session_id().to_string(),
        pid: session.pid(),
    };
    if output.json {
        if let Err(e) = output.print(&response) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
    }

    if cmd.detach {
        return ExitCode::Success;
    }
    match session.wait().await {
        Ok(()) => {
            output.info("Player closed");
            ExitCode::Success
        }
        Err(e) => output.error(e.to_string(), ExitCode::PlayerFailed),
    }
}

// =============================================================================
// Filters Command
// =============================================================================

pub fn filters_cmd(cmd: FiltersCmd, config: &Config, output: &Output) -> ExitCode {
    let kinds: Vec<FilterKind> = match cmd.kind {
        Some(kind) => vec![kind.into()],
        None => vec![FilterKind::Topic, FilterKind::Tag, FilterKind::Rank],
    };

    if output.json {
        let listed: Vec<ListedFilter> = kinds
            .iter()
            .flat_map(|kind| {
                config
                    .filters
                    .options(*kind)
                    .iter()
                    .map(move |o| ListedFilter::new(*kind, o))
            })
            .collect();
        if let Err(e) = output.print(&listed) {
            return output.error(format!("Failed to serialize: {}", e), ExitCode::Error);
        }
        return ExitCode::Success;
    }

    let mut any = false;
    for kind in kinds {
        for option in config.filters.options(kind) {
            any = true;
            println!("{:<6} {:<8} {}", kind.to_string(), option.id, option.name);
        }
    }
    if !any {
        let path = Config::path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "config.toml".to_string());
        output.info(format!("No filters configured. Add them to {}", path));
    }
    ExitCode::Success
}

#[derive(Debug, serde::Serialize)]
struct ListedFilter {
    kind: String,
    id: String,
    name: String,
}

impl ListedFilter {
    fn new(kind: FilterKind, option: &FilterOption) -> Self {
        Self {
            kind: kind.to_string(),
            id: option.id.clone(),
            name: option.name.clone(),
        }
    }
}
