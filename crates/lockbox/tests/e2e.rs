// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests over the full HTTP stack.
//!
//! Each test builds a [`TestHarness`] (temp SQLite, real router) and drives
//! it with in-process requests.

use std::sync::Arc;

use axum::http::StatusCode;
use lockbox_auth::Claims;
use lockbox_core::{UserId, VaultStore};
use lockbox_test_utils::TestHarness;

async fn logged_in(harness: &TestHarness, email: &str) -> String {
    harness.signup_and_login(email, "correct horse").await.unwrap()
}

#[tokio::test]
async fn new_user_reads_404_then_writes_then_reads_back() {
    let harness = TestHarness::new().await.unwrap();
    let token = logged_in(&harness, "new@example.com").await;

    let missing = harness.get_vault(&token).await.unwrap();
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.json()["error"], "no vault");

    let put = harness.put_vault(&token, b"B1".to_vec(), None).await.unwrap();
    assert_eq!(put.status, StatusCode::OK);
    assert!(put.body.is_empty());
    let e1 = put.etag().unwrap();
    assert!(e1.starts_with("W/\"") && e1.ends_with('"'));

    let read = harness.get_vault(&token).await.unwrap();
    assert_eq!(read.status, StatusCode::OK);
    assert_eq!(&read.body[..], b"B1");
    assert_eq!(read.etag().unwrap(), e1);
}

#[tokio::test]
async fn advance_then_stale_write_conflicts() {
    let harness = TestHarness::new().await.unwrap();
    let token = logged_in(&harness, "stale@example.com").await;

    let mut etag = harness
        .put_vault(&token, b"v1".to_vec(), None)
        .await
        .unwrap()
        .etag()
        .unwrap();
    for blob in [b"v2", b"v3"] {
        etag = harness
            .put_vault(&token, blob.to_vec(), Some(&etag))
            .await
            .unwrap()
            .etag()
            .unwrap();
    }
    let e3 = etag;

    let to_v4 = harness.put_vault(&token, b"v4".to_vec(), Some(&e3)).await.unwrap();
    assert_eq!(to_v4.status, StatusCode::OK);
    let e4 = to_v4.etag().unwrap();
    assert_ne!(e3, e4);

    let stale = harness.put_vault(&token, b"v5".to_vec(), Some(&e3)).await.unwrap();
    assert_eq!(stale.status, StatusCode::CONFLICT);
    assert_eq!(stale.json()["error"], "etag mismatch");

    let read = harness.get_vault(&token).await.unwrap();
    assert_eq!(&read.body[..], b"v4");
    assert_eq!(read.etag().unwrap(), e4);

    let record = harness.storage.read_vault(UserId(1)).await.unwrap();
    assert_eq!(record.version, 4);
}

#[tokio::test]
async fn write_without_if_match_on_existing_vault_conflicts() {
    let harness = TestHarness::new().await.unwrap();
    let token = logged_in(&harness, "noif@example.com").await;

    let e1 = harness
        .put_vault(&token, b"keep".to_vec(), None)
        .await
        .unwrap()
        .etag()
        .unwrap();

    let blind = harness.put_vault(&token, b"clobber".to_vec(), None).await.unwrap();
    assert_eq!(blind.status, StatusCode::CONFLICT);

    let read = harness.get_vault(&token).await.unwrap();
    assert_eq!(&read.body[..], b"keep");
    assert_eq!(read.etag().unwrap(), e1);
}

#[tokio::test]
async fn if_match_must_match_exactly() {
    let harness = TestHarness::new().await.unwrap();
    let token = logged_in(&harness, "exact@example.com").await;

    let e1 = harness
        .put_vault(&token, b"x".to_vec(), None)
        .await
        .unwrap()
        .etag()
        .unwrap();

    // Strong form of the same digest is a different validator.
    let strong = e1.trim_start_matches("W/").to_string();
    let response = harness.put_vault(&token, b"y".to_vec(), Some(&strong)).await.unwrap();
    assert_eq!(response.status, StatusCode::CONFLICT);

    let response = harness.put_vault(&token, b"y".to_vec(), Some("*")).await.unwrap();
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn concurrent_writes_with_same_etag_have_one_winner() {
    let harness = Arc::new(TestHarness::new().await.unwrap());
    let token = logged_in(&harness, "race@example.com").await;

    let e1 = harness
        .put_vault(&token, b"base".to_vec(), None)
        .await
        .unwrap()
        .etag()
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..6 {
        let harness = harness.clone();
        let token = token.clone();
        let e1 = e1.clone();
        handles.push(tokio::spawn(async move {
            harness
                .put_vault(&token, format!("writer-{i}").into_bytes(), Some(&e1))
                .await
                .unwrap()
                .status
        }));
    }

    let mut ok = 0;
    let mut conflict = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            other => panic!("unexpected status {other}"),
        }
    }
    assert_eq!(ok, 1);
    assert_eq!(conflict, 5);

    let user = harness
        .storage
        .read_vault(UserId(1))
        .await
        .unwrap();
    assert_eq!(user.version, 2);
}

#[tokio::test]
async fn vaults_are_isolated_per_user() {
    let harness = TestHarness::new().await.unwrap();
    let alice = logged_in(&harness, "alice@example.com").await;
    let bob = logged_in(&harness, "bob@example.com").await;

    let alice_etag = harness
        .put_vault(&alice, b"alice-secret".to_vec(), None)
        .await
        .unwrap()
        .etag()
        .unwrap();

    assert_eq!(harness.get_vault(&bob).await.unwrap().status, StatusCode::NOT_FOUND);

    // Bob's first write is unconditional for Bob and leaves Alice untouched.
    let bob_put = harness
        .put_vault(&bob, b"bob-secret".to_vec(), Some(&alice_etag))
        .await
        .unwrap();
    assert_eq!(bob_put.status, StatusCode::OK);

    let alice_read = harness.get_vault(&alice).await.unwrap();
    assert_eq!(&alice_read.body[..], b"alice-secret");
    assert_eq!(alice_read.etag().unwrap(), alice_etag);
}

#[tokio::test]
async fn binary_blobs_round_trip_unchanged() {
    let harness = TestHarness::new().await.unwrap();
    let token = logged_in(&harness, "bin@example.com").await;

    let blob: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    harness.put_vault(&token, blob.clone(), None).await.unwrap();

    let read = harness.get_vault(&token).await.unwrap();
    assert_eq!(read.body.to_vec(), blob);
}

#[tokio::test]
async fn empty_blob_is_a_valid_vault() {
    let harness = TestHarness::new().await.unwrap();
    let token = logged_in(&harness, "empty@example.com").await;

    let put = harness.put_vault(&token, Vec::new(), None).await.unwrap();
    assert_eq!(put.status, StatusCode::OK);

    let read = harness.get_vault(&token).await.unwrap();
    assert_eq!(read.status, StatusCode::OK);
    assert!(read.body.is_empty());
}

#[tokio::test]
async fn configured_etag_length_reaches_clients() {
    let harness = TestHarness::builder()
        .with_etag_hex_len(40)
        .build()
        .await
        .unwrap();
    let token = logged_in(&harness, "long@example.com").await;

    let etag = harness
        .put_vault(&token, b"x".to_vec(), None)
        .await
        .unwrap()
        .etag()
        .unwrap();
    assert_eq!(etag.len(), "W/\"\"".len() + 40);
}

#[tokio::test]
async fn oversized_vault_is_rejected() {
    let harness = TestHarness::builder()
        .with_max_body_bytes(1024)
        .build()
        .await
        .unwrap();
    let token = logged_in(&harness, "big@example.com").await;

    let response = harness.put_vault(&token, vec![7u8; 4096], None).await.unwrap();
    assert_eq!(response.status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(harness.get_vault(&token).await.unwrap().status, StatusCode::NOT_FOUND);
}

// Accounts

#[tokio::test]
async fn duplicate_signup_is_ok_and_keeps_original_password() {
    let harness = TestHarness::new().await.unwrap();

    let first = harness.signup("dup@example.com", "original").await.unwrap();
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.json(), serde_json::json!({ "ok": true }));

    let second = harness.signup("dup@example.com", "replacement").await.unwrap();
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.json(), serde_json::json!({ "ok": true }));

    assert_eq!(
        harness.login("dup@example.com", "original").await.unwrap().status,
        StatusCode::OK
    );
    assert_eq!(
        harness.login("dup@example.com", "replacement").await.unwrap().status,
        StatusCode::UNAUTHORIZED
    );
}

#[tokio::test]
async fn bad_login_is_401() {
    let harness = TestHarness::new().await.unwrap();
    harness.signup("user@example.com", "right").await.unwrap();

    let wrong = harness.login("user@example.com", "wrong").await.unwrap();
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json()["error"], "invalid credentials");

    let unknown = harness.login("ghost@example.com", "right").await.unwrap();
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.json()["error"], "invalid credentials");
}

#[tokio::test]
async fn invalid_email_is_422() {
    let harness = TestHarness::new().await.unwrap();
    let response = harness.signup("not-an-email", "pw").await.unwrap();
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    let response = harness.login("not-an-email", "pw").await.unwrap();
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
}

// Credentials

#[tokio::test]
async fn missing_or_malformed_token_is_401() {
    let harness = TestHarness::new().await.unwrap();

    let response = harness.get_vault("garbage").await.unwrap();
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = harness.put_vault("", b"x".to_vec(), None).await.unwrap();
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_401() {
    let harness = TestHarness::new().await.unwrap();
    logged_in(&harness, "exp@example.com").await;

    let now = unix_now();
    let expired = harness
        .gate
        .encode(&Claims::new(UserId(1), now - 3600, 60))
        .unwrap();
    let response = harness.get_vault(&expired).await.unwrap();
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"], "token expired");
}

#[tokio::test]
async fn tampered_token_is_401() {
    let harness = TestHarness::new().await.unwrap();
    let token = logged_in(&harness, "tamper@example.com").await;

    // Swap the payload for one claiming another user, keeping the signature.
    let parts: Vec<&str> = token.split('.').collect();
    let other = harness
        .gate
        .encode(&Claims::new(UserId(2), unix_now(), 3600))
        .unwrap();
    let other_payload = other.split('.').nth(1).unwrap();
    let forged = format!("{}.{}.{}", parts[0], other_payload, parts[2]);

    let response = harness.get_vault(&forged).await.unwrap();
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_is_public() {
    let harness = TestHarness::new().await.unwrap();
    let response = harness
        .send(
            axum::http::Request::get("/health")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}
