use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::Kitten;

/// Storage collaborator for the kitten table.
///
/// Every method is a single call against the backing table. All failures are
/// reported as one generic error; handlers map them to a 500.
#[async_trait]
pub trait KittenStore: Send + Sync {
    /// Write the kitten keyed by its name, overwriting any existing record
    async fn put(&self, kitten: Kitten) -> Result<()>;

    /// Read every record, in whatever order the backing table yields them
    async fn scan(&self) -> Result<Vec<Kitten>>;

    /// Read one record; `Ok(None)` when no record has this name
    async fn get(&self, name: &str) -> Result<Option<Kitten>>;

    /// Set `age` on the record keyed by `name`.
    ///
    /// No existence check is made; a missing record is written with the given age.
    async fn update_age(&self, name: &str, age: JsonValue) -> Result<()>;

    /// Remove the record; removing a missing name is not an error
    async fn delete(&self, name: &str) -> Result<()>;

    /// Verify the backing table is reachable
    async fn health_check(&self) -> Result<()>;
}

/// Process-local store, used for `KITTEN_STORE=memory` and in tests.
#[derive(Default)]
pub struct InMemoryKittenStore {
    kittens: RwLock<BTreeMap<String, Kitten>>,
}

impl InMemoryKittenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KittenStore for InMemoryKittenStore {
    async fn put(&self, kitten: Kitten) -> Result<()> {
        tracing::debug!("Upserted kitten: {}", kitten.name);
        self.kittens.write().await.insert(kitten.name.clone(), kitten);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Kitten>> {
        Ok(self.kittens.read().await.values().cloned().collect())
    }

    async fn get(&self, name: &str) -> Result<Option<Kitten>> {
        Ok(self.kittens.read().await.get(name).cloned())
    }

    async fn update_age(&self, name: &str, age: JsonValue) -> Result<()> {
        let mut kittens = self.kittens.write().await;
        match kittens.get_mut(name) {
            Some(kitten) => kitten.age = age,
            None => {
                kittens.insert(
                    name.to_string(),
                    Kitten {
                        name: name.to_string(),
                        age,
                    },
                );
            }
        }
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.kittens.write().await.remove(name);
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
