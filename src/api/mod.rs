use crate::store::ActivationStore;
use anyhow::Result;
use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    routing::get,
    Extension, Router,
};
use secrecy::SecretString;
use std::{
    fmt,
    net::{Ipv6Addr, SocketAddr},
    sync::Arc,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::PropagateRequestIdLayer,
    set_header::SetRequestHeaderLayer,
    trace::TraceLayer,
};
use tracing::{debug_span, info, Span};
use ulid::Ulid;

pub mod handlers;
mod openapi;
pub use self::openapi::openapi;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Process-scoped state shared by every request.
#[derive(Clone)]
pub struct AppContext {
    store: Arc<dyn ActivationStore>,
    login_key: SecretString,
    key_prefix: String,
}

impl AppContext {
    #[must_use]
    pub fn new(store: Arc<dyn ActivationStore>, login_key: SecretString, key_prefix: String) -> Self {
        Self {
            store,
            login_key,
            key_prefix,
        }
    }

    #[must_use]
    pub fn store(&self) -> &dyn ActivationStore {
        self.store.as_ref()
    }

    #[must_use]
    pub fn login_key(&self) -> &SecretString {
        &self.login_key
    }

    #[must_use]
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("login_key", &self.login_key)
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}

/// Path of an endpoint under the route namespace, e.g. `/360/login`.
#[must_use]
pub fn namespaced(namespace: &str, endpoint: &str) -> String {
    let namespace = namespace.trim_matches('/');
    if namespace.is_empty() {
        format!("/{endpoint}")
    } else {
        format!("/{namespace}/{endpoint}")
    }
}

/// Build the application router.
#[must_use]
pub fn router(namespace: &str, ctx: AppContext) -> Router {
    Router::new()
        .route(&namespaced(namespace, "login"), get(handlers::login))
        .route(&namespaced(namespace, "active"), get(handlers::active))
        .route(
            "/health",
            get(handlers::health).options(handlers::health),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestHeaderLayer::if_not_present(
                    HeaderName::from_static(REQUEST_ID_HEADER),
                    |_req: &_| HeaderValue::from_str(Ulid::new().to_string().as_str()).ok(),
                ))
                .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
                    REQUEST_ID_HEADER,
                )))
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(CatchPanicLayer::new())
                .layer(Extension(ctx)),
        )
}

/// Serve until SIGINT/SIGTERM, then drain in-flight requests.
///
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails
pub async fn new(port: u16, namespace: &str, ctx: AppContext) -> Result<()> {
    let app = router(namespace, ctx);

    let addr = SocketAddr::from((Ipv6Addr::UNSPECIFIED, port));
    let listener = TcpListener::bind(addr).await?;

    info!("Listening on [::]:{}", port);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Gracefully shutdown");
}

// span
fn make_span(request: &Request<Body>) -> Span {
    let headers = request.headers();
    let path = request.uri().path();
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|val| val.to_str().ok())
        .unwrap_or("none");

    debug_span!("http-request", path, request_id)
}
