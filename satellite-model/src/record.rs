use crate::schema::{ITEMS_TABLE, OTHER_ITEMS_TABLE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A typed row bound to one table of the registry.
///
/// Typed records serialize to payloads that validate against their table;
/// the data-access layer still validates every payload, so untyped JSON
/// can be written through the same path.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the table in [`db_schema`](crate::db_schema).
    const TABLE: &'static str;

    /// The record's primary key.
    fn id(&self) -> &str;
}

/// Random (v4) primary key for a record created by this client.
fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

/// A row of the `items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_text_null: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_text_null_default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intvalue_null: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intvalue_null_default: Option<i64>,
}

impl Item {
    /// Creates an item with a fresh random id and no optional fields.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(new_record_id(), content)
    }

    pub fn with_id(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            content_text_null: None,
            content_text_null_default: None,
            intvalue_null: None,
            intvalue_null_default: None,
        }
    }
}

impl Record for Item {
    const TABLE: &'static str = ITEMS_TABLE;

    fn id(&self) -> &str {
        &self.id
    }
}

/// A row of the `other_items` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OtherItem {
    pub id: String,
    pub content: String,
}

impl OtherItem {
    /// Creates an other-item with a fresh random id.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(new_record_id(), content)
    }

    pub fn with_id(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

impl Record for OtherItem {
    const TABLE: &'static str = OTHER_ITEMS_TABLE;

    fn id(&self) -> &str {
        &self.id
    }
}
