//! `MongoDB` backed activation store.

use super::{Activation, ActivationStore, StoreError, StoreFuture};
use anyhow::{Context, Result};
use mongodb::{
    bson::{doc, Document},
    options::{ClientOptions, ReadPreference, SelectionCriteria},
    Client, Collection, Database,
};
use std::{future::IntoFuture, time::Duration};
use tokio::time::timeout;
use tracing::{debug, info_span, Instrument};

/// Upper bound for connecting and pinging the primary at startup.
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct MongoStore {
    client: Client,
    database: Database,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Connect and verify the primary answers a `ping` within [`STARTUP_TIMEOUT`].
    ///
    /// # Errors
    /// Returns an error if the URI is invalid, the deadline passes, or the ping fails.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> Result<Self> {
        timeout(STARTUP_TIMEOUT, Self::connect_and_ping(uri, database, collection))
            .await
            .context("Timed out connecting to the activation store")?
    }

    async fn connect_and_ping(uri: &str, database: &str, collection: &str) -> Result<Self> {
        let mut options = ClientOptions::parse(uri)
            .await
            .context("Failed to parse store URI")?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
        options.connect_timeout.get_or_insert(STARTUP_TIMEOUT);
        options.server_selection_timeout.get_or_insert(STARTUP_TIMEOUT);

        let client = Client::with_options(options).context("Failed to build store client")?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .selection_criteria(SelectionCriteria::ReadPreference(ReadPreference::Primary))
            .into_future()
            .instrument(info_span!(
                "db.ping",
                db.system = "mongodb",
                db.operation = "ping"
            ))
            .await
            .context("Failed to ping the activation store primary")?;

        debug!("Connected to activation store");

        Ok(Self::from_client(client, database, collection))
    }

    /// Wrap an already connected client.
    #[must_use]
    pub fn from_client(client: Client, database: &str, collection: &str) -> Self {
        let database = client.database(database);
        let collection = database.collection::<Document>(collection);
        Self {
            client,
            database,
            collection,
        }
    }

    #[must_use]
    pub fn collection(&self) -> &Collection<Document> {
        &self.collection
    }

    /// Close pooled connections.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

impl ActivationStore for MongoStore {
    fn lookup<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Activation> {
        let span = info_span!(
            "db.query",
            db.system = "mongodb",
            db.operation = "findOne",
            db.collection = %self.collection.name(),
        );
        Box::pin(
            async move {
                let found = self.collection.find_one(doc! { "_id": key }).await?;
                Ok(if found.is_some() {
                    Activation::Present
                } else {
                    Activation::Absent
                })
            }
            .instrument(span),
        )
    }

    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.database
                .run_command(doc! { "ping": 1 })
                .await
                .map(|_| ())
                .map_err(StoreError::from)
        })
    }
}
