use crate::{
    api::{router, AppContext},
    login360::sign,
    store::memory::MemoryStore,
};
use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use regex::Regex;
use secrecy::SecretString;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

const LOGIN_KEY: &str = "test-login-key";

fn app(store: Arc<MemoryStore>) -> Router {
    let ctx = AppContext::new(store, SecretString::from(LOGIN_KEY), "360".to_string());
    router("360", ctx)
}

fn key() -> SecretString {
    SecretString::from(LOGIN_KEY)
}

async fn get(app: Router, uri: &str) -> Result<(StatusCode, String)> {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty())?)
        .await?;
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(body.to_vec())?))
}

async fn get_json(app: Router, uri: &str) -> Result<Value> {
    let (status, body) = get(app, uri).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(serde_json::from_str(&body)?)
}

fn login_uri(qid: i64, time: i64, server_id: &str, sign: &str) -> String {
    format!("/360/login?qid={qid}&time={time}&isAdult=1&server_id={server_id}&sign={sign}")
}

#[tokio::test]
/// A correctly signed login returns errno 0 with every session field populated.
async fn login_issues_session() -> Result<()> {
    let sign = sign::login_sign(42, 1_700_000_000, "s2", &key());
    let before = Utc::now().timestamp();
    let body = get_json(
        app(Arc::default()),
        &login_uri(42, 1_700_000_000, "s2", &sign),
    )
    .await?;
    let after = Utc::now().timestamp();

    assert_eq!(body["errno"], 0);
    assert_eq!(body["data"]["uid"], "42");
    assert_eq!(body["data"]["zone"], 0);

    let auth_key = body["data"]["auth_key"].as_str().unwrap_or_default();
    assert!(Regex::new(r"^[0-9a-f]{24}$")?.is_match(auth_key));

    let extra: i64 = body["data"]["extraInfo"]
        .as_str()
        .unwrap_or_default()
        .parse()?;
    assert!(extra >= before && extra <= after);
    Ok(())
}

#[tokio::test]
/// Repeated logins for the same player never reuse a token.
async fn login_tokens_differ_across_requests() -> Result<()> {
    let sign = sign::login_sign(42, 1_700_000_000, "s2", &key());
    let uri = login_uri(42, 1_700_000_000, "s2", &sign);
    let store: Arc<MemoryStore> = Arc::default();

    let first = get_json(app(store.clone()), &uri).await?;
    let second = get_json(app(store), &uri).await?;
    assert_ne!(first["data"]["auth_key"], second["data"]["auth_key"]);
    Ok(())
}

#[tokio::test]
async fn login_with_bad_signature_is_rejected() -> Result<()> {
    let sign = sign::login_sign(42, 1_700_000_000, "s2", &key());

    for uri in [
        login_uri(43, 1_700_000_000, "s2", &sign),
        login_uri(42, 1_700_000_001, "s2", &sign),
        login_uri(42, 1_700_000_000, "s3", &sign),
        login_uri(42, 1_700_000_000, "s2", &sign.to_uppercase()),
    ] {
        let body = get_json(app(Arc::default()), &uri).await?;
        assert_eq!(
            body,
            serde_json::json!({"errno": -1, "errmsg": "signature error", "data": {}})
        );
    }
    Ok(())
}

#[tokio::test]
/// Parameter validation runs before the signature check.
async fn login_with_missing_parameters_is_parameter_error() -> Result<()> {
    let sign = sign::login_sign(42, 1_700_000_000, "s2", &key());
    let uris = [
        "/360/login".to_string(),
        format!("/360/login?time=1700000000&isAdult=1&server_id=s2&sign={sign}"),
        format!("/360/login?qid=42&time=1700000000&server_id=s2&sign={sign}"),
        format!("/360/login?qid=42&time=1700000000&isAdult=1&sign={sign}"),
        "/360/login?qid=42&time=1700000000&isAdult=1&server_id=s2".to_string(),
        format!("/360/login?qid=abc&time=1700000000&isAdult=1&server_id=s2&sign={sign}"),
        format!("/360/login?qid=42&time=soon&isAdult=1&server_id=s2&sign={sign}"),
    ];

    for uri in uris {
        let body = get_json(app(Arc::default()), &uri).await?;
        assert_eq!(body["errno"], -2, "{uri}");
        assert_eq!(body["errmsg"], "parameter error");
        assert_eq!(body["data"], serde_json::json!({}));
    }
    Ok(())
}

#[tokio::test]
async fn login_responds_with_json() -> Result<()> {
    let response = app(Arc::default())
        .oneshot(Request::builder().uri("/360/login").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    Ok(())
}

#[tokio::test]
/// Walks one player through not-activated, activated and a forged signature.
async fn active_reflects_store_contents() -> Result<()> {
    let store: Arc<MemoryStore> = Arc::default();
    let sign = sign::active_sign(1001, "s1", &key());
    let uri = format!("/360/active?qid=1001&server_id=s1&sign={sign}");

    assert_eq!(
        get(app(store.clone()), &uri).await?,
        (StatusCode::OK, "0".to_string())
    );

    store.insert("360_1001");
    assert_eq!(
        get(app(store.clone()), &uri).await?,
        (StatusCode::OK, "1".to_string())
    );

    assert_eq!(
        get(
            app(store.clone()),
            "/360/active?qid=1001&server_id=s1&sign=wrong"
        )
        .await?,
        (StatusCode::OK, "-1".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn active_reports_store_errors() -> Result<()> {
    let store: Arc<MemoryStore> = Arc::default();
    store.set_unreachable(true);
    let sign = sign::active_sign(1001, "s1", &key());

    let (status, body) = get(
        app(store),
        &format!("/360/active?qid=1001&server_id=s1&sign={sign}"),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "-2");
    Ok(())
}

#[tokio::test]
/// Rejected requests never reach the store.
async fn active_rejects_before_lookup() -> Result<()> {
    let store: Arc<MemoryStore> = Arc::default();
    let sign = sign::active_sign(1001, "s1", &key());

    for uri in [
        "/360/active".to_string(),
        format!("/360/active?server_id=s1&sign={sign}"),
        format!("/360/active?qid=1001&sign={sign}"),
        "/360/active?qid=1001&server_id=s1".to_string(),
        format!("/360/active?qid=1001.0&server_id=s1&sign={sign}"),
        format!("/360/active?qid=1002&server_id=s1&sign={sign}"),
        format!("/360/active?qid=1001&server_id=s2&sign={sign}"),
    ] {
        assert_eq!(
            get(app(store.clone()), &uri).await?,
            (StatusCode::OK, "-1".to_string()),
            "{uri}"
        );
    }
    assert_eq!(store.lookups(), 0);
    Ok(())
}

#[tokio::test]
async fn routes_live_under_namespace() -> Result<()> {
    let (status, _) = get(app(Arc::default()), "/login").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let ctx = AppContext::new(
        Arc::new(MemoryStore::default()),
        key(),
        "360".to_string(),
    );
    let (status, body) = get(router("game", ctx), "/game/active").await?;
    assert_eq!((status, body.as_str()), (StatusCode::OK, "-1"));
    Ok(())
}

#[tokio::test]
async fn request_id_is_generated_and_propagated() -> Result<()> {
    let response = app(Arc::default())
        .oneshot(Request::builder().uri("/360/active").body(Body::empty())?)
        .await?;
    assert!(response.headers().contains_key("x-request-id"));

    let response = app(Arc::default())
        .oneshot(
            Request::builder()
                .uri("/360/active")
                .header("x-request-id", "req-1")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("req-1")
    );
    Ok(())
}

#[tokio::test]
async fn health_reports_store_status() -> Result<()> {
    let store: Arc<MemoryStore> = Arc::default();

    let body = get_json(app(store.clone()), "/health").await?;
    assert_eq!(body["store"], "ok");
    assert_eq!(body["name"], env!("CARGO_PKG_NAME"));

    store.set_unreachable(true);
    let (status, body) = get(app(store.clone()), "/health").await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&body)?;
    assert_eq!(body["store"], "error");

    let response = app(store)
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/health")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response.headers().contains_key("X-App"));
    let body = to_bytes(response.into_body(), usize::MAX).await?;
    assert!(body.is_empty());
    Ok(())
}
