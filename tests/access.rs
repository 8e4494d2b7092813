//! Token resolution and the visibility rule.

mod common;

use std::time::Duration;

use shelf::access::{can_view, resolve_user};
use shelf::database::models::Document;
use shelf::database::DocumentKind;

#[tokio::test]
async fn resolves_a_live_session() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    let user = common::create_user(&state, "u@test.io").await;

    state
        .sessions()
        .put("tok", *user.id, Duration::from_secs(60));

    let resolved = resolve_user(Some("tok"), state.sessions(), state.database())
        .await
        .unwrap()
        .expect("session should resolve");
    assert_eq!(resolved.id, user.id);
    assert_eq!(resolved.email, "u@test.io");
}

#[tokio::test]
async fn missing_or_unknown_token_is_unauthenticated() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    common::create_user(&state, "u@test.io").await;

    let resolved = resolve_user(None, state.sessions(), state.database())
        .await
        .unwrap();
    assert!(resolved.is_none());

    let resolved = resolve_user(Some("never-issued"), state.sessions(), state.database())
        .await
        .unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn expired_token_is_unauthenticated() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    let user = common::create_user(&state, "u@test.io").await;

    state
        .sessions()
        .put("tok", *user.id, Duration::from_millis(50));
    tokio::time::sleep(Duration::from_millis(150)).await;

    let resolved = resolve_user(Some("tok"), state.sessions(), state.database())
        .await
        .unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn token_for_deleted_user_is_unauthenticated() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    let user = common::create_user(&state, "u@test.io").await;

    state
        .sessions()
        .put("tok", *user.id, Duration::from_secs(60));

    sqlx::query("DELETE FROM users WHERE id = ?1")
        .bind(user.id)
        .execute(&**state.database())
        .await
        .unwrap();

    // The stale cache entry must not surface as an error.
    let resolved = resolve_user(Some("tok"), state.sessions(), state.database())
        .await
        .unwrap();
    assert!(resolved.is_none());
}

#[tokio::test]
async fn can_view_truth_table() {
    let (state, _rx, _temp) = common::setup_test_env().await;
    let owner = common::create_user(&state, "owner@test.io").await;
    let other = common::create_user(&state, "other@test.io").await;

    let private = Document::create(
        *owner.id,
        "secret.txt",
        DocumentKind::File,
        None,
        false,
        state.database(),
    )
    .await
    .unwrap();
    let public = Document::create(
        *owner.id,
        "open.txt",
        DocumentKind::File,
        None,
        true,
        state.database(),
    )
    .await
    .unwrap();

    // Private: owner only.
    assert!(can_view(&private, Some(&owner)));
    assert!(!can_view(&private, Some(&other)));
    assert!(!can_view(&private, None));

    // Public: everyone, authenticated or not.
    assert!(can_view(&public, Some(&owner)));
    assert!(can_view(&public, Some(&other)));
    assert!(can_view(&public, None));
}
