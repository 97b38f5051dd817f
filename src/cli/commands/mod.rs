pub mod logging;
pub mod store;

use crate::login360::DEFAULT_NAMESPACE;
use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_LOGIN_KEY: &str = "login-key";
pub const ARG_NAMESPACE: &str = "namespace";
pub const ARG_KEY_PREFIX: &str = "key-prefix";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("login360")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("1323")
                .env("LOGIN360_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_LOGIN_KEY)
                .long("login-key")
                .help("Shared secret the platform signs requests with")
                .env("LOGIN360_LOGIN_KEY")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_NAMESPACE)
                .long("namespace")
                .help("Route prefix for the login and active endpoints")
                .default_value(DEFAULT_NAMESPACE)
                .env("LOGIN360_NAMESPACE"),
        )
        .arg(
            Arg::new(ARG_KEY_PREFIX)
                .long("key-prefix")
                .help("Prefix of activation record keys (<prefix>_<qid>)")
                .default_value(DEFAULT_NAMESPACE)
                .env("LOGIN360_KEY_PREFIX"),
        );

    let command = store::with_args(command);
    logging::with_args(command)
}
