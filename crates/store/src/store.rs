use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::item::{Item, ItemId};

/// Identifier assignment strategy for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScheme {
    /// Integer ids assigned as `collection length + 1` at insert time. Ids
    /// are not tracked across deletes; uniqueness holds by construction on
    /// an append-only collection, not by validation.
    Sequential,
    /// Fresh v4 UUIDs rendered as strings.
    Uuid,
}

impl IdScheme {
    /// Parse a raw path segment into an identifier for this scheme.
    pub fn parse_id(&self, raw: &str) -> Result<ItemId, StoreError> {
        match self {
            IdScheme::Sequential => raw
                .parse::<u64>()
                .map(ItemId::Int)
                .map_err(|_| StoreError::InvalidId(raw.to_string())),
            IdScheme::Uuid if raw.is_empty() => Err(StoreError::InvalidId(raw.to_string())),
            IdScheme::Uuid => Ok(ItemId::Uid(raw.to_string())),
        }
    }

    fn next(&self, existing: usize) -> Value {
        match self {
            IdScheme::Sequential => Value::from(existing as u64 + 1),
            IdScheme::Uuid => Value::from(Uuid::new_v4().to_string()),
        }
    }
}

/// In-memory ordered item collection.
///
/// All access goes through a single `RwLock`: reads take snapshots, mutations
/// hold the write lock for the whole assign-and-append (or filter) step, so
/// concurrent requests cannot observe a half-applied mutation. Cloning the
/// store shares the underlying collection.
#[derive(Clone)]
pub struct ItemStore {
    inner: Arc<RwLock<Vec<Item>>>,
    scheme: IdScheme,
}

impl ItemStore {
    pub fn new(scheme: IdScheme) -> Self {
        Self { inner: Arc::new(RwLock::new(Vec::new())), scheme }
    }

    /// Store pre-populated with one `{id, name}` record per name, ids
    /// assigned by the scheme in order.
    pub fn seeded(scheme: IdScheme, names: &[&str]) -> Self {
        let items = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut map = Map::new();
                map.insert("id".to_string(), scheme.next(i));
                map.insert("name".to_string(), Value::from(*name));
                Item(map)
            })
            .collect();
        Self { inner: Arc::new(RwLock::new(items)), scheme }
    }

    pub fn scheme(&self) -> IdScheme {
        self.scheme
    }

    /// Snapshot of the collection in insertion order.
    pub async fn list(&self) -> Vec<Item> {
        self.inner.read().await.clone()
    }

    /// First item whose `id` equals the identifier.
    pub async fn get(&self, id: &ItemId) -> Result<Item, StoreError> {
        let items = self.inner.read().await;
        items
            .iter()
            .find(|it| it.matches(id))
            .cloned()
            .ok_or_else(|| StoreError::not_found("item"))
    }

    /// Assign a fresh id (overwriting any caller-supplied one), append, and
    /// return the stored record.
    pub async fn create(&self, mut fields: Map<String, Value>) -> Item {
        let mut items = self.inner.write().await;
        fields.insert("id".to_string(), self.scheme.next(items.len()));
        let item = Item(fields);
        items.push(item.clone());
        item
    }

    /// Drop every item matching the identifier; returns whether anything was
    /// removed. Removing an absent id is a no-op, not an error.
    pub async fn remove(&self, id: &ItemId) -> bool {
        let mut items = self.inner.write().await;
        let before = items.len();
        items.retain(|it| !it.matches(id));
        items.len() != before
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}
