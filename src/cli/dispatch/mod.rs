use crate::cli::{
    actions::{server::Args, Action},
    commands::{self, store},
};
use anyhow::{Context, Result};
use secrecy::SecretString;

fn required(matches: &clap::ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(1323);

    Ok(Action::Server(Args {
        port,
        store_uri: SecretString::from(required(matches, store::ARG_STORE_URI)?),
        database: required(matches, store::ARG_DATABASE)?,
        collection: required(matches, store::ARG_COLLECTION)?,
        login_key: SecretString::from(required(matches, commands::ARG_LOGIN_KEY)?),
        namespace: required(matches, commands::ARG_NAMESPACE)?,
        key_prefix: required(matches, commands::ARG_KEY_PREFIX)?,
    }))
}
