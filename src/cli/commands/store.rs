use clap::{Arg, Command};

pub const ARG_STORE_URI: &str = "uri";
pub const ARG_DATABASE: &str = "database";
pub const ARG_COLLECTION: &str = "collection";

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_STORE_URI)
                .short('u')
                .long("uri")
                .help("MongoDB connection URI of the activation store")
                .long_help(
                    "MongoDB connection URI of the activation store, example: mongodb+srv://<user>:<password>@<cluster>/?w=majority",
                )
                .env("LOGIN360_STORE_URI")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_DATABASE)
                .short('d')
                .long("database")
                .help("Database holding the activation records")
                .env("LOGIN360_DATABASE")
                .required(true),
        )
        .arg(
            Arg::new(ARG_COLLECTION)
                .short('c')
                .long("collection")
                .help("Collection holding the activation records")
                .env("LOGIN360_COLLECTION")
                .required(true),
        )
}
