use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// An equality filter over declared fields.
///
/// A record matches when every listed field equals the given value. The
/// empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filter(BTreeMap<String, Value>);

impl Filter {
    /// The empty filter.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Adds an equality condition, replacing any previous one on the field.
    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Shorthand for `Filter::all().eq("content", content)`.
    #[must_use]
    pub fn content(content: &str) -> Self {
        Self::all().eq("content", content)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates conditions in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}
