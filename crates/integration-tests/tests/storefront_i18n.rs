//! Integration tests for per-request language selection.

use axum::http::{Method, StatusCode};
use serde_json::json;

use lustre_core::UserId;
use lustre_integration_tests::TestContext;
use lustre_storefront::middleware::shopper::USER_ID_HEADER;

async fn choose(ctx: &TestContext, user: Option<&str>, language: &str) -> StatusCode {
    ctx.send(
        Method::PUT,
        "/i18n/language",
        user,
        Some(json!({ "language": language })),
    )
    .await
    .status
}

#[tokio::test]
async fn test_defaults_to_english() {
    let ctx = TestContext::demo().await;
    let resp = ctx.get("/i18n").await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["language"], "en");
    assert_eq!(resp.body["table"]["nav.home"], "Home");
    assert_eq!(resp.body["languages"].as_array().map(Vec::len), Some(7));
}

#[tokio::test]
async fn test_lang_parameter_translates_home() {
    let ctx = TestContext::demo().await;

    let resp = ctx.get("/i18n?lang=hi").await;
    assert_eq!(resp.body["language"], "hi");
    assert_eq!(resp.body["table"]["nav.home"], "होम");

    let home = ctx.get("/?mode=gifts&lang=hi").await;
    assert_ne!(home.body["sections"][1]["title"], "Shop by Category");

    let home = ctx.get("/?mode=gifts").await;
    assert_eq!(home.body["sections"][1]["title"], "Shop by Category");
}

#[tokio::test]
async fn test_accept_language_is_honoured() {
    let ctx = TestContext::demo().await;
    let resp = ctx
        .send_with_headers(
            Method::GET,
            "/i18n",
            &[("accept-language", "hi-IN,hi;q=0.9,en;q=0.8")],
            None,
        )
        .await;
    assert_eq!(resp.body["language"], "hi");
}

#[tokio::test]
async fn test_anonymous_choice_does_not_leak() {
    let ctx = TestContext::demo().await;

    assert_eq!(choose(&ctx, None, "ta").await, StatusCode::OK);
    let resp = ctx.get("/i18n").await;
    assert_eq!(resp.body["language"], "en");
}

#[tokio::test]
async fn test_shoppers_hold_different_languages() {
    let ctx = TestContext::demo().await;

    assert_eq!(choose(&ctx, Some("u-1"), "hi").await, StatusCode::OK);
    assert_eq!(choose(&ctx, Some("u-2"), "ta").await, StatusCode::OK);

    let first = ctx.send(Method::GET, "/i18n", Some("u-1"), None).await;
    let second = ctx.send(Method::GET, "/i18n", Some("u-2"), None).await;
    let anonymous = ctx.get("/i18n").await;

    assert_eq!(first.body["language"], "hi");
    assert_eq!(first.body["table"]["nav.home"], "होम");
    assert_eq!(second.body["language"], "ta");
    assert_eq!(anonymous.body["language"], "en");

    // An explicit parameter still wins for a signed-in shopper
    let resp = ctx
        .send_with_headers(Method::GET, "/i18n?lang=en", &[(USER_ID_HEADER, "u-1")], None)
        .await;
    assert_eq!(resp.body["language"], "en");
}

#[tokio::test]
async fn test_unknown_language_is_rejected() {
    let ctx = TestContext::demo().await;
    let resp = ctx
        .send(
            Method::PUT,
            "/i18n/language",
            Some("u-7"),
            Some(json!({ "language": "xx" })),
        )
        .await;

    assert_eq!(resp.status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.body["message"], "Unsupported language: xx");
    assert!(ctx.backend.user(&UserId::new("u-7")).is_none());
}

#[tokio::test]
async fn test_signed_in_choice_is_stored_on_profile() {
    let ctx = TestContext::demo().await;
    assert_eq!(choose(&ctx, Some("u-7"), "TA").await, StatusCode::OK);

    let stored = ctx.backend.user(&UserId::new("u-7"));
    assert_eq!(stored.and_then(|p| p.language).as_deref(), Some("ta"));
}

#[tokio::test]
async fn test_profile_write_failure_keeps_device_choice() {
    let ctx = TestContext::demo().await;
    ctx.backend.set_failing(true);

    let resp = ctx
        .send(
            Method::PUT,
            "/i18n/language",
            Some("u-7"),
            Some(json!({ "language": "bn" })),
        )
        .await;

    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["language"], "bn");
}
