use crate::{
    api::{self, AppContext},
    cli::telemetry,
    store::MongoStore,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::info;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub store_uri: SecretString,
    pub database: String,
    pub collection: String,
    pub login_key: SecretString,
    pub namespace: String,
    pub key_prefix: String,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the activation store cannot be reached at startup or the server fails.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    // No retry: an unreachable store must keep the listener from ever binding.
    let store = MongoStore::connect(
        args.store_uri.expose_secret(),
        &args.database,
        &args.collection,
    )
    .await
    .context("Could not connect to the activation store")?;

    let ctx = AppContext::new(Arc::new(store.clone()), args.login_key, args.key_prefix);

    let served = api::new(args.port, &args.namespace, ctx).await;

    store.shutdown().await;
    info!("Activation store disconnected");
    telemetry::shutdown_tracer();

    served
}

fn log_startup_args(args: &Args) {
    let entries = [
        ("listen", format!("tcp:{}", args.port)),
        ("store_uri", redact_uri(args.store_uri.expose_secret())),
        ("database", args.database.clone()),
        ("collection", args.collection.clone()),
        ("routes", api::namespaced(&args.namespace, "{login,active}")),
        ("key_prefix", format!("{}_<qid>", args.key_prefix)),
        (
            "login_key_set",
            (!args.login_key.expose_secret().is_empty()).to_string(),
        ),
    ];
    log_entries("Startup configuration", &entries);
}

fn redact_uri(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("REDACTED"));
            }
            parsed.to_string()
        }
        Err(_) => "invalid-uri".to_string(),
    }
}

fn log_entries(title: &str, entries: &[(&str, String)]) {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{}\n\n{title}:", banner());
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    info!("{message}");
}

fn banner() -> String {
    BANNER.replace(
        "{VERSION}",
        &format!(
            " - {} - {}",
            env!("CARGO_PKG_VERSION"),
            short_commit(crate::GIT_COMMIT_HASH)
        ),
    )
}

fn short_commit(hash: &str) -> String {
    let trimmed = hash.trim();
    if trimmed.len() > 7 {
        trimmed[..7].to_string()
    } else {
        trimmed.to_string()
    }
}

const BANNER: &str = r"
  _             _       _____  __    ___
 | | ___   __ _(_)_ __ |___ / / /_  / _ \
 | |/ _ \ / _` | | '_ \  |_ \| '_ \| | | |
 | | (_) | (_| | | | | |___) | (_) | |_| |
 |_|\___/ \__, |_|_| |_|____/ \___/ \___/ {VERSION}
          |___/";
