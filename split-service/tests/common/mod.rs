#![allow(dead_code)]

use secrecy::Secret;
use service_core::config::Config as CoreConfig;
use split_service::config::{MongoConfig, SplitConfig, StoreKind};
use split_service::services::{InMemorySplitStore, MongoSplitStore, SplitStore};
use split_service::Application;
use std::sync::Arc;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

pub fn test_config(store: StoreKind, database: &str) -> SplitConfig {
    SplitConfig {
        common: CoreConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            ..CoreConfig::default()
        },
        mongodb: MongoConfig {
            uri: Some(Secret::new(
                std::env::var("TEST_MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            )),
            database: database.to_string(),
            collection: "splits".to_string(),
        },
        store,
    }
}

impl TestApp {
    /// Spawns the service on a random port backed by a fresh in-memory store.
    pub async fn spawn() -> (Self, InMemorySplitStore) {
        let store = InMemorySplitStore::new();
        let app = Self::spawn_with_store(Arc::new(store.clone())).await;
        (app, store)
    }

    pub async fn spawn_with_store(store: Arc<dyn SplitStore>) -> Self {
        let config = test_config(StoreKind::Memory, "unused");
        let app = Application::build_with_store(config, store)
            .await
            .expect("Failed to build test application");
        Self::run(app).await
    }

    /// Spawns the service against the MongoDB at `TEST_MONGODB_URI`, using a
    /// throwaway database.
    pub async fn spawn_mongo(database: &str) -> (Self, MongoSplitStore) {
        let config = test_config(StoreKind::Mongo, database);
        let uri = std::env::var("TEST_MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let store = MongoSplitStore::connect(&uri, database, "splits")
            .await
            .expect("Failed to connect to MongoDB");
        store
            .init_indexes()
            .await
            .expect("Failed to create indexes");

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        (Self::run(app).await, store)
    }

    async fn run(app: Application) -> Self {
        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn create_split(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/splits/create", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn list_splits(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/api/splits/all", self.address))
            .send()
            .await
            .expect("Failed to execute request")
    }
}

pub fn trip_body() -> serde_json::Value {
    serde_json::json!({
        "groupName": "Trip",
        "people": ["A", "B"],
        "amounts": [10, 20],
        "selectedIndices": [0],
        "transactions": [{ "from": "B", "to": "A", "amount": 5 }]
    })
}
