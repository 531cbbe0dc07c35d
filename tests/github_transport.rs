// tests/github_transport.rs
//
// GitHubClient against an in-process axum server that mimics the
// `contents` and `commits` endpoints.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

use latest_pdf::github::GitHubClient;
use latest_pdf::history::{HistoryDateResolver, HistoryService};
use latest_pdf::listing::ListingSource;
use latest_pdf::pipeline;
use latest_pdf::render::{HtmlPage, PageState};
use latest_pdf::{HistoryLookupError, RepoConfig, ResolveError, Tier};

async fn contents(Path(dir): Path<String>, Query(q): Query<HashMap<String, String>>) -> Response {
    if q.get("ref").map(String::as_str) != Some("main") {
        return (StatusCode::BAD_REQUEST, "missing ref").into_response();
    }
    match dir.as_str() {
        "assets" => Json(json!([
            { "name": "cv.pdf", "path": "assets/cv.pdf", "size": 100,
              "download_url": "http://raw.test/assets/cv.pdf", "type": "file" },
            { "name": "cv-old.pdf", "path": "assets/cv-old.pdf", "size": 900,
              "download_url": "http://raw.test/assets/cv-old.pdf", "type": "file" },
            { "name": "photo.png", "path": "assets/photo.png", "size": 5,
              "download_url": "http://raw.test/assets/photo.png", "type": "file" }
        ]))
        .into_response(),
        "missing" => (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Not Found", "documentation_url": "https://docs.github.com" })),
        )
            .into_response(),
        "sparse" => Json(json!([
            { "name": "cv.pdf", "path": "sparse/cv.pdf", "size": null,
              "download_url": "http://raw.test/sparse/cv.pdf", "type": "file" },
            "not-an-object"
        ]))
        .into_response(),
        "broken" => (StatusCode::INTERNAL_SERVER_ERROR, "<html>oops</html>").into_response(),
        "file" => Json(json!({ "name": "cv.pdf", "type": "file" })).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn commits(Query(q): Query<HashMap<String, String>>) -> Response {
    if q.get("per_page").map(String::as_str) != Some("1") || q.get("sha").is_none() {
        return (StatusCode::BAD_REQUEST, "bad query").into_response();
    }
    match q.get("path").map(String::as_str) {
        Some("assets/cv.pdf") => Json(json!([
            { "sha": "abc", "commit": {
                "author": { "date": "2024-05-01T08:00:00Z" },
                "committer": { "date": "2024-05-02T08:00:00Z" } } }
        ]))
        .into_response(),
        Some("assets/cv-old.pdf") => Json(json!([
            { "sha": "def", "commit": { "committer": { "date": "2019-01-01T00:00:00Z" } } }
        ]))
        .into_response(),
        Some("assets/empty.pdf") => Json(json!([])).into_response(),
        _ => (StatusCode::BAD_GATEWAY, "upstream").into_response(),
    }
}

async fn spawn_mock() -> String {
    let app = Router::new()
        .route("/repos/o/r/contents/{dir}", get(contents))
        .route("/repos/o/r/commits", get(commits));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });
    format!("http://{addr}")
}

fn cfg(base: &str, dir: &str) -> RepoConfig {
    RepoConfig {
        owner: "o".into(),
        repo: "r".into(),
        dir: dir.into(),
        api_base: base.into(),
        ..RepoConfig::default()
    }
}

#[tokio::test]
async fn listing_returns_all_entries() {
    let base = spawn_mock().await;
    let gh = GitHubClient::new(cfg(&base, "assets")).unwrap();

    let entries = gh.list().await.expect("listing ok");
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].name_str(), Some("cv.pdf"));
    assert_eq!(entries[1].size, 900);
}

#[tokio::test]
async fn listing_keeps_entry_with_null_size() {
    let base = spawn_mock().await;
    let gh = GitHubClient::new(cfg(&base, "sparse")).unwrap();

    let entries = gh.list().await.expect("listing ok");
    assert_eq!(entries.len(), 1, "only the non-object item is skipped");
    assert_eq!(entries[0].name_str(), Some("cv.pdf"));
    assert_eq!(entries[0].size, 0);
}

#[tokio::test]
async fn listing_error_uses_remote_message() {
    let base = spawn_mock().await;
    let gh = GitHubClient::new(cfg(&base, "missing")).unwrap();

    let err = gh.list().await.unwrap_err();
    assert_eq!(
        err,
        ResolveError::Transport {
            status: Some(404),
            message: "Not Found".into()
        }
    );
}

#[tokio::test]
async fn listing_error_without_json_uses_status() {
    let base = spawn_mock().await;
    let gh = GitHubClient::new(cfg(&base, "broken")).unwrap();

    let err = gh.list().await.unwrap_err();
    assert_eq!(err.user_message(), "HTTP 500");
}

#[tokio::test]
async fn listing_object_body_is_malformed() {
    let base = spawn_mock().await;
    let gh = GitHubClient::new(cfg(&base, "file")).unwrap();

    let err = gh.list().await.unwrap_err();
    assert!(matches!(err, ResolveError::MalformedResponse { ref dir, .. } if dir == "file"));
}

#[tokio::test]
async fn unreachable_host_is_transport_error() {
    // nothing listens on port 9 locally
    let gh = GitHubClient::new(cfg("http://127.0.0.1:9", "assets")).unwrap();
    let err = gh.list().await.unwrap_err();
    assert!(matches!(err, ResolveError::Transport { status: None, .. }));
}

#[tokio::test]
async fn commit_lookup_variants() {
    let base = spawn_mock().await;
    let gh = GitHubClient::new(cfg(&base, "assets")).unwrap();
    let resolver = HistoryDateResolver::new(&gh);

    assert_eq!(
        resolver.resolve("assets/cv.pdf").await,
        Ok(Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())),
        "author date preferred"
    );
    assert_eq!(
        resolver.resolve("assets/cv-old.pdf").await,
        Ok(Some(Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap())),
        "committer date as fallback"
    );
    assert_eq!(resolver.resolve("assets/empty.pdf").await, Ok(None));
    assert_eq!(
        gh.latest_entries("assets/unknown.pdf").await,
        Err(HistoryLookupError::Status(502))
    );
}

#[tokio::test]
async fn end_to_end_picks_by_commit_date() {
    let base = spawn_mock().await;
    let config = cfg(&base, "assets");
    let gh = Arc::new(GitHubClient::new(config.clone()).unwrap());
    let page = HtmlPage::new("cv");

    let res = pipeline::run(gh.as_ref(), gh.clone(), &page, &config)
        .await
        .expect("resolved");

    // cv-old.pdf is bigger, but cv.pdf has the newer commit
    assert_eq!(res.tier, Tier::History);
    assert_eq!(res.file.path, "assets/cv.pdf");
    assert_eq!(
        page.state(),
        PageState::Embedded("http://raw.test/assets/cv.pdf".into())
    );
}
