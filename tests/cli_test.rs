//! CLI Command Tests
//!
//! Runs the command handlers against a mocked catalog and checks exit codes.
//! Argument parsing itself is covered by the unit tests in `cli.rs`.

use clap::Parser;
use mockito::{Matcher, Server};

use lecturetui::cli::{Cli, Command, ExitCode, Output, SearchCmd, WatchCmd};
use lecturetui::commands;
use lecturetui::config::Config;
use lecturetui::models::{FilterCatalog, FilterOption};

fn quiet() -> Output {
    Output {
        json: false,
        quiet: true,
    }
}

fn config(base_url: String) -> Config {
    Config {
        base_url,
        filters: FilterCatalog {
            topics: vec![FilterOption::new("2", "Endgames")],
            ..FilterCatalog::default()
        },
        ..Config::default()
    }
}

fn search_cmd(args: &[&str]) -> SearchCmd {
    let argv = ["lecturetui", "search"].iter().chain(args.iter()).copied();
    match Cli::parse_from(argv).command {
        Some(Command::Search(cmd)) => cmd,
        _ => panic!("Expected Search command"),
    }
}

fn watch_cmd(args: &[&str]) -> WatchCmd {
    let argv = ["lecturetui", "watch"].iter().chain(args.iter()).copied();
    match Cli::parse_from(argv).command {
        Some(Command::Watch(cmd)) => cmd,
        _ => panic!("Expected Watch command"),
    }
}

fn page_json(count: usize, has_next: bool) -> String {
    let lectures: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "title": format!("Lecture {}", i),
                "youtube_id": format!("video{:06}", i),
            })
        })
        .collect();
    serde_json::json!({ "lectures": lectures, "has_next": has_next }).to_string()
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_success() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("q".into(), "rook".into()),
            Matcher::UrlEncoded("sort".into(), "rank".into()),
            // Topic given by label, sent by id
            Matcher::UrlEncoded("topics[]".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(page_json(2, false))
        .create_async()
        .await;

    let cmd = search_cmd(&["rook", "--sort", "rank", "--topic", "endgames"]);
    let code = commands::search_cmd(cmd, &config(server.url()), &quiet()).await;

    assert_eq!(code, ExitCode::Success);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_search_follows_pages() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(page_json(2, true))
        .create_async()
        .await;
    let second = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(page_json(1, true))
        .create_async()
        .await;
    let third = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("page".into(), "3".into()))
        .expect(0)
        .create_async()
        .await;

    let cmd = search_cmd(&["--pages", "2"]);
    let code = commands::search_cmd(cmd, &config(server.url()), &quiet()).await;

    assert_eq!(code, ExitCode::Success);
    first.assert_async().await;
    second.assert_async().await;
    third.assert_async().await;
}

#[tokio::test]
async fn test_search_all_stops_at_last_page() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
        .with_status(200)
        .with_body(page_json(1, true))
        .create_async()
        .await;
    let last = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
        .with_status(200)
        .with_body(page_json(1, false))
        .expect(1)
        .create_async()
        .await;

    let code = commands::search_cmd(search_cmd(&["--all"]), &config(server.url()), &quiet()).await;

    assert_eq!(code, ExitCode::Success);
    first.assert_async().await;
    last.assert_async().await;
}

#[tokio::test]
async fn test_search_no_results() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(page_json(0, false))
        .create_async()
        .await;

    let code =
        commands::search_cmd(search_cmd(&["zugzwang"]), &config(server.url()), &quiet()).await;
    assert_eq!(code, ExitCode::NoResults);
}

#[tokio::test]
async fn test_search_server_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let code = commands::search_cmd(search_cmd(&[]), &config(server.url()), &quiet()).await;
    assert_eq!(code, ExitCode::Error);
}

#[tokio::test]
async fn test_search_unreachable() {
    let code = commands::search_cmd(
        search_cmd(&[]),
        &config("http://127.0.0.1:1".to_string()),
        &quiet(),
    )
    .await;
    assert_eq!(code, ExitCode::NetworkError);
}

// =============================================================================
// Watch
// =============================================================================

#[tokio::test]
async fn test_watch_rejects_bad_video() {
    let code = commands::watch_cmd(
        watch_cmd(&["not a video"]),
        &Config::default(),
        &quiet(),
    )
    .await;
    assert_eq!(code, ExitCode::InvalidArgs);
}

// =============================================================================
// Filters
// =============================================================================

#[test]
fn test_filters_lists_config() {
    let code = commands::filters_cmd(
        lecturetui::cli::FiltersCmd { kind: None },
        &config("http://unused".to_string()),
        &quiet(),
    );
    assert_eq!(code, ExitCode::Success);
}
