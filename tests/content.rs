//! Serving document bytes: visibility, folders, and derivative sizes.

mod common;

use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use shelf::database::models::Document;
use shelf::http_server::api::files::content::{handler, ContentQuery};
use shelf::upload::{ingest, UploadRequest};
use shelf::AppState;

async fn upload_file(state: &AppState, user: &shelf::database::models::User, name: &str) -> Document {
    ingest(
        user,
        UploadRequest {
            name: Some(name.to_string()),
            kind: Some("file".to_string()),
            data: Some(common::base64_of(b"contents")),
            ..Default::default()
        },
        state.database(),
        state.content(),
        state.jobs(),
    )
    .await
    .unwrap()
}

async fn fetch(state: &AppState, token: Option<&str>, id: &str, size: Option<u32>) -> Response {
    let mut headers = HeaderMap::new();
    if let Some(token) = token {
        headers.insert("x-token", token.parse().unwrap());
    }
    match handler(
        State(state.clone()),
        headers,
        Path(id.to_string()),
        Query(ContentQuery { size }),
    )
    .await
    {
        Ok(ok) => ok.into_response(),
        Err(err) => err.into_response(),
    }
}

async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn error_message(response: Response) -> String {
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    body["error"].as_str().unwrap().to_string()
}

fn login(state: &AppState, token: &str, user: &shelf::database::models::User) {
    state
        .sessions()
        .put(token, *user.id, Duration::from_secs(60));
}

#[tokio::test]
async fn owner_reads_private_content_with_mime_type() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    let user = common::create_user(&state, "u@test.io").await;
    login(&state, "tok", &user);

    let file = upload_file(&state, &user, "report.txt").await;

    let response = fetch(&state, Some("tok"), &file.id.to_string(), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let mime = response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(mime.starts_with("text/plain"), "unexpected mime: {mime}");
    assert_eq!(body_bytes(response).await, b"contents");
}

#[tokio::test]
async fn folder_content_is_a_bad_request() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    let user = common::create_user(&state, "u@test.io").await;
    login(&state, "tok", &user);

    let folder = ingest(
        &user,
        UploadRequest {
            name: Some("docs".to_string()),
            kind: Some("folder".to_string()),
            ..Default::default()
        },
        state.database(),
        state.content(),
        state.jobs(),
    )
    .await
    .unwrap();

    let response = fetch(&state, Some("tok"), &folder.id.to_string(), None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "A folder doesn't have content");
}

#[tokio::test]
async fn private_content_reads_like_a_missing_document_for_everyone_else() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    let alice = common::create_user(&state, "alice@test.io").await;
    let bob = common::create_user(&state, "bob@test.io").await;
    login(&state, "alice-tok", &alice);
    login(&state, "bob-tok", &bob);

    let file = upload_file(&state, &alice, "secret.txt").await;
    let id = file.id.to_string();
    let absent = Uuid::new_v4().to_string();

    // Another user, no token, a document that does not exist, and a
    // malformed id must all be indistinguishable.
    for (token, target) in [
        (Some("bob-tok"), id.as_str()),
        (None, id.as_str()),
        (Some("alice-tok"), absent.as_str()),
        (Some("alice-tok"), "not-an-id"),
    ] {
        let response = fetch(&state, token, target, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(response).await, "Not found");
    }
}

#[tokio::test]
async fn public_content_needs_no_token() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    let user = common::create_user(&state, "u@test.io").await;

    let file = upload_file(&state, &user, "open.txt").await;
    Document::set_visibility(*file.id, *user.id, true, state.database())
        .await
        .unwrap()
        .unwrap();

    let response = fetch(&state, None, &file.id.to_string(), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"contents");
}

#[tokio::test]
async fn size_selects_a_derivative_and_rejects_anything_else() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    let user = common::create_user(&state, "u@test.io").await;
    login(&state, "tok", &user);

    let file = upload_file(&state, &user, "photo.png").await;
    let local_path = file.local_path.as_deref().unwrap();
    state
        .content()
        .write_derivative(local_path, 250, b"small")
        .await
        .unwrap();
    let id = file.id.to_string();

    let response = fetch(&state, Some("tok"), &id, Some(250)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"small");

    // A generated width whose derivative has not landed yet.
    let response = fetch(&state, Some("tok"), &id, Some(100)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "Not found");

    // A width that is never generated.
    let response = fetch(&state, Some("tok"), &id, Some(123)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(response).await, "Invalid size");
}

#[tokio::test]
async fn row_without_content_is_not_found() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    let user = common::create_user(&state, "u@test.io").await;
    login(&state, "tok", &user);

    // Metadata committed but the content write never happened.
    let doc = Document::create(
        *user.id,
        "stub.txt",
        shelf::database::DocumentKind::File,
        None,
        false,
        state.database(),
    )
    .await
    .unwrap();

    let response = fetch(&state, Some("tok"), &doc.id.to_string(), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_message(response).await, "Not found");
}
