//! Key-value storage for event records.

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client as DynamoClient;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::attribute::{from_item, to_item};
use crate::{Config, Error, Record, Result};

/// Single-table record storage keyed by `id`.
///
/// Each call is one store operation; implementations provide whatever
/// atomicity the backend offers for a single key and nothing more.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or replace a record.
    async fn put(&self, record: Record) -> Result<()>;

    /// Fetch a record by id.
    async fn get(&self, id: &str) -> Result<Option<Record>>;

    /// Delete a record if it exists. Returns `false` when nothing was stored under `id`.
    async fn delete(&self, id: &str) -> Result<bool>;
}

/// DynamoDB-backed record store.
pub struct DynamoRecordStore {
    client: DynamoClient,
    table_name: String,
}

impl DynamoRecordStore {
    /// Create a store over an existing client.
    pub fn new(client: DynamoClient, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Load AWS configuration for the configured region and build a store.
    pub async fn connect(config: &Config) -> Self {
        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.aws_region.clone()))
            .load()
            .await;

        Self::new(DynamoClient::new(&sdk_config), config.table_name.clone())
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn key(id: &str) -> AttributeValue {
        AttributeValue::S(id.to_string())
    }
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn put(&self, record: Record) -> Result<()> {
        debug!("put_item id={} table={}", record.id(), self.table_name);

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_item(&record)))
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to put item: {}", e)))?;

        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Record>> {
        debug!("get_item id={} table={}", id, self.table_name);

        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", Self::key(id))
            .send()
            .await
            .map_err(|e| Error::Aws(format!("Failed to get item: {}", e)))?;

        output.item.map(from_item).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        debug!("delete_item id={} table={}", id, self.table_name);

        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", Self::key(id))
            .condition_expression("attribute_exists(id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(e)
                if e.as_service_error()
                    .is_some_and(|se| se.is_conditional_check_failed_exception()) =>
            {
                Ok(false)
            }
            Err(e) => Err(Error::Aws(format!("Failed to delete item: {}", e))),
        }
    }
}

/// Process-local record store.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<String, Record>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put(&self, record: Record) -> Result<()> {
        let mut records = self.records.write().await;
        records.insert(record.id().to_string(), record);
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<Record>> {
        let records = self.records.read().await;
        Ok(records.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let mut records = self.records.write().await;
        Ok(records.remove(id).is_some())
    }
}
