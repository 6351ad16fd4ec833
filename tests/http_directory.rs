// HTTP directory tests against a mock matching service

use match_deck::core::{DeckOptions, MatchDeck};
use match_deck::models::{CardKey, FilterSpec, Interest, MatchLink, VerdictState};
use match_deck::services::{
    DirectoryError, HttpDirectoryOptions, HttpMatchDirectory, MatchDirectory, RecordingNavigator,
    RetryPolicy, SessionStore, UserDirectory,
};
use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;

fn directory(server: &Server, token: Option<&str>) -> HttpMatchDirectory {
    HttpMatchDirectory::new(
        server.url(),
        token.map(str::to_string),
        HttpDirectoryOptions::default(),
    )
    .unwrap()
}

#[tokio::test]
async fn test_current_user_sends_bearer_token() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/users/current")
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"photoUrl":"null","firstName":"Ada"}"#)
        .create_async()
        .await;

    let user = directory(&server, Some("secret")).get_current_user().await.unwrap();

    assert_eq!(user.id, 1);
    assert!(user.has_missing_photo());
    assert_eq!(user.extra["firstName"], "Ada");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_links_resolved_and_cached() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/matches/1")
        .with_status(200)
        .with_body(r#"[{"href":"/users/10"},{"href":"/users/11"}]"#)
        .create_async()
        .await;
    let resolve = server
        .mock("GET", "/users/10")
        .with_status(200)
        .with_body(r#"{"id":10,"photoUrl":"http://cdn.test/10.png"}"#)
        .expect(1)
        .create_async()
        .await;

    let directory = directory(&server, None);
    let links = directory.get_matching_drivers(1).await.unwrap();
    assert_eq!(links.len(), 2);

    let first = directory.get_from_link(&links[0]).await.unwrap();
    let again = directory.get_from_link(&links[0]).await.unwrap();
    assert_eq!(first, again);
    assert_eq!(first.id, 10);
    resolve.assert_async().await;
}

#[tokio::test]
async fn test_absolute_link_used_as_is() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/elsewhere/users/12")
        .with_status(200)
        .with_body(r#"{"id":12}"#)
        .create_async()
        .await;

    let directory = HttpMatchDirectory::new(
        "http://unused.invalid/api",
        None,
        HttpDirectoryOptions::default(),
    )
    .unwrap();
    let link = MatchLink::new(format!("{}/elsewhere/users/12", server.url()));

    assert_eq!(directory.get_from_link(&link).await.unwrap().id, 12);
}

#[tokio::test]
async fn test_verdict_write_routes() {
    let mut server = Server::new_async().await;
    let like = server.mock("POST", "/matches/1/likes/2").with_status(201).create_async().await;
    let unlike = server.mock("DELETE", "/matches/1/likes/2").with_status(204).create_async().await;
    let dislike = server.mock("POST", "/matches/1/dislikes/2").with_status(201).create_async().await;
    let undislike = server.mock("DELETE", "/matches/1/dislikes/2").with_status(204).create_async().await;

    let directory = directory(&server, None);
    directory.like_driver(1, 2).await.unwrap();
    directory.unlike_driver(1, 2).await.unwrap();
    directory.dislike_driver(1, 2).await.unwrap();
    directory.undislike_driver(1, 2).await.unwrap();

    like.assert_async().await;
    unlike.assert_async().await;
    dislike.assert_async().await;
    undislike.assert_async().await;
}

#[tokio::test]
async fn test_filtered_drivers_posts_spec() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/matches/1/filter")
        .match_body(Matcher::Json(json!({
            "batchEndChange": true,
            "dayStartChange": false,
            "distanceChange": true
        })))
        .with_status(200)
        .with_body(r#"[{"id":20},{"id":21,"photoUrl":""}]"#)
        .create_async()
        .await;

    let filter = FilterSpec {
        by_batch_end: true,
        by_day_start: false,
        by_distance: true,
    };
    let profiles = directory(&server, None).get_filtered_drivers(1, &filter).await.unwrap();

    assert_eq!(profiles.len(), 2);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_status_mapping() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/users/current").with_status(401).create_async().await;
    server.mock("GET", "/users/404").with_status(404).create_async().await;
    server.mock("GET", "/users/500").with_status(500).with_body("boom").create_async().await;
    server.mock("GET", "/users/7").with_status(200).with_body("not json").create_async().await;

    let directory = directory(&server, None);

    assert!(matches!(directory.get_current_user().await, Err(DirectoryError::Unauthorized)));
    assert!(matches!(directory.get_user(404).await, Err(DirectoryError::NotFound(_))));
    assert!(matches!(directory.get_user(500).await, Err(DirectoryError::Api(_))));
    assert!(matches!(directory.get_user(7).await, Err(DirectoryError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_deck_over_http() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/users/current")
        .with_status(200)
        .with_body(r#"{"id":1}"#)
        .create_async()
        .await;
    server
        .mock("GET", "/matches/1")
        .with_status(200)
        .with_body(r#"[{"href":"/users/10"},{"href":"/users/11"},{"href":"/users/12"}]"#)
        .create_async()
        .await;
    server.mock("GET", "/users/10").with_status(200).with_body(r#"{"id":10}"#).create_async().await;
    server.mock("GET", "/users/11").with_status(503).create_async().await;
    server.mock("GET", "/users/12").with_status(200).with_body(r#"{"id":12}"#).create_async().await;
    let undislike = server.mock("DELETE", "/matches/1/dislikes/12").with_status(204).create_async().await;
    let like = server.mock("POST", "/matches/1/likes/12").with_status(201).create_async().await;

    let mut deck = MatchDeck::with_directory(
        Arc::new(directory(&server, Some("t"))),
        Arc::new(RecordingNavigator::new()),
        DeckOptions::default(),
        RetryPolicy::no_retry(),
    );
    let mut session = SessionStore::new();
    session.insert("token", "t");

    let report = deck.populate(&session).await.unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(deck.len(), 2);

    deck.apply_verdict(CardKey(12), Interest::Like).unwrap();
    assert_eq!(deck.get(CardKey(12)).unwrap().verdict, VerdictState::Liked);

    let outbox = deck.shutdown().await.unwrap();
    assert_eq!(outbox.delivered, 2);
    undislike.assert_async().await;
    like.assert_async().await;
}
