//storage holds the MongoDB save schema & async CRUD for worlds

pub mod error;
pub mod models;

use std::time::Duration;

use bson::doc;
use futures_util::stream::TryStreamExt;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, IndexModel};

pub use crate::error::{Result, StorageError};
use crate::models::{SaveDoc, SaveSummary};

pub const DEFAULT_URI: &str = "mongodb://localhost:27017";
pub const DEFAULT_DB: &str = "terrain_db";
pub const DEFAULT_COLLECTION: &str = "worlds";
pub const DEFAULT_SAVE_NAME: &str = "autosave";

// Fail fast when no server is reachable
const SERVER_TIMEOUT: Duration = Duration::from_secs(3);

// Environment override for the connection string
pub const URI_ENV: &str = "TERRAIN_MONGO_URI";

// Connection string from the environment, falling back to localhost
pub fn uri_from_env() -> String {
    std::env::var(URI_ENV).unwrap_or_else(|_| DEFAULT_URI.to_string())
}

pub struct WorldStorage {
    col: Collection<SaveDoc>,
}

impl WorldStorage {
    // Initialize the MongoDB collection
    pub async fn init(uri: &str, db_name: &str, col_name: &str) -> Result<Self> {
        let mut opts = ClientOptions::parse(uri).await?;
        opts.app_name = Some("TerrainWorlds".to_string());
        opts.server_selection_timeout = Some(SERVER_TIMEOUT);
        let client = Client::with_options(opts)?;
        let col = client.database(db_name).collection(col_name);

        // One save per name
        let index_model = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        col.create_index(index_model).await?;

        log::info!("storage ready: {}/{}", db_name, col_name);
        Ok(Self { col })
    }

    // Write a save, replacing any previous save with the same name.
    // The timestamp is refreshed here.
    pub async fn save(&self, mut doc_obj: SaveDoc) -> Result<()> {
        doc_obj.id = None;
        doc_obj.saved_at = bson::DateTime::now();
        self.col
            .replace_one(doc! { "name": &doc_obj.name }, &doc_obj)
            .upsert(true)
            .await?;
        log::info!(
            "saved world '{}' ({}x{})",
            doc_obj.name,
            doc_obj.width,
            doc_obj.height
        );
        Ok(())
    }

    pub async fn load(&self, name: &str) -> Result<Option<SaveDoc>> {
        let found = self.col.find_one(doc! { "name": name }).await?;
        if found.is_none() {
            log::info!("no save named '{}'", name);
        }
        Ok(found)
    }

    // Names and timestamps, newest first
    pub async fn list_saves(&self) -> Result<Vec<SaveSummary>> {
        let mut cursor = self
            .col
            .clone_with_type::<SaveSummary>()
            .find(doc! {})
            .projection(doc! { "_id": 0, "name": 1, "saved_at": 1 })
            .sort(doc! { "saved_at": -1 })
            .await?;
        let mut saves = Vec::new();
        while let Some(summary) = cursor.try_next().await? {
            saves.push(summary);
        }
        Ok(saves)
    }

    // Whether a save was actually removed
    pub async fn delete(&self, name: &str) -> Result<bool> {
        let res = self.col.delete_one(doc! { "name": name }).await?;
        Ok(res.deleted_count > 0)
    }

    // Most recently written save, if any
    pub async fn latest(&self) -> Result<Option<SaveDoc>> {
        let found = self
            .col
            .find_one(doc! {})
            .sort(doc! { "saved_at": -1 })
            .await?;
        Ok(found)
    }
}
