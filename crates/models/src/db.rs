use configs::DatabaseConfig;
use mongodb::{
    bson::{doc, Document},
    options::ClientOptions,
    Client, Collection,
};
use tracing::info;

use crate::errors::ModelError;

/// Live connection to the document database.
///
/// Cheap to clone; the driver pools connections internally. Call
/// [`Database::shutdown`] once at process exit.
#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    db: mongodb::Database,
    collection: String,
}

/// Connect and ping, bounded by `connect_timeout_secs` overall.
pub async fn connect(cfg: &DatabaseConfig) -> Result<Database, ModelError> {
    let timeout = cfg.connect_timeout();
    let attempt = async {
        let mut opts = ClientOptions::parse(&cfg.uri).await?;
        opts.connect_timeout = Some(timeout);
        opts.server_selection_timeout = Some(timeout);
        opts.app_name = Some("people_api".to_string());
        let client = Client::with_options(opts)?;
        let db = client.database(&cfg.name);
        db.run_command(doc! { "ping": 1 }).await?;
        Ok::<_, mongodb::error::Error>((client, db))
    };

    let (client, db) = tokio::time::timeout(timeout, attempt)
        .await
        .map_err(|_| {
            ModelError::Db(format!(
                "timed out after {}s connecting to database",
                cfg.connect_timeout_secs
            ))
        })??;

    info!(database = %cfg.name, collection = %cfg.collection, "connected to MongoDB");
    Ok(Database { client, db, collection: cfg.collection.clone() })
}

impl Database {
    pub fn collection(&self) -> Collection<Document> {
        self.db.collection::<Document>(&self.collection)
    }

    pub async fn ping(&self) -> Result<(), ModelError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    /// Release pooled connections. Consumes the handle.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("database connection closed");
    }
}
