use crate::error::{ValidationError, ValidationReason, ValidationResult};
use crate::Filter;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

/// Table holding [`Item`](crate::Item) records.
pub const ITEMS_TABLE: &str = "items";

/// Table holding [`OtherItem`](crate::OtherItem) records.
pub const OTHER_ITEMS_TABLE: &str = "other_items";

/// Column every table uses as its primary key.
pub const PRIMARY_KEY: &str = "id";

static DB_SCHEMA: LazyLock<DbSchema> = LazyLock::new(|| {
    DbSchema::new()
        .with_table(TableSchema::new(
            ITEMS_TABLE,
            vec![
                FieldRule::text(PRIMARY_KEY),
                FieldRule::text("content"),
                FieldRule::optional_text("content_text_null"),
                FieldRule::optional_text("content_text_null_default"),
                FieldRule::optional_integer("intvalue_null"),
                FieldRule::optional_integer("intvalue_null_default"),
            ],
        ))
        .with_table(TableSchema::new(
            OTHER_ITEMS_TABLE,
            vec![FieldRule::text(PRIMARY_KEY), FieldRule::text("content")],
        ))
});

/// Returns the schema registry for the replicated tables.
///
/// Built once on first use and never mutated afterwards.
pub fn db_schema() -> &'static DbSchema {
    &DB_SCHEMA
}

/// The named mapping of table name to [`TableSchema`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbSchema {
    tables: BTreeMap<String, TableSchema>,
}

impl DbSchema {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table, replacing any table of the same name.
    #[must_use]
    pub fn with_table(mut self, table: TableSchema) -> Self {
        self.tables.insert(table.name.clone(), table);
        self
    }

    /// Looks up a table by name.
    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.get(name)
    }

    /// Iterates over all tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.values()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Describes the exact set of fields a table accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,
    pub fields: Vec<FieldRule>,
}

/// A declared field and its type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldRule {
    pub name: String,
    pub field_type: FieldType,
    /// Optional fields may be absent or null.
    pub optional: bool,
}

impl FieldRule {
    fn simple(name: &str, field_type: FieldType, optional: bool) -> Self {
        Self {
            name: name.into(),
            field_type,
            optional,
        }
    }

    /// Shorthand for a required string field.
    pub fn text(name: &str) -> Self {
        Self::simple(name, FieldType::Text, false)
    }

    /// Shorthand for an optional, nullable string field.
    pub fn optional_text(name: &str) -> Self {
        Self::simple(name, FieldType::Text, true)
    }

    /// Shorthand for an optional, nullable integer field.
    pub fn optional_integer(name: &str) -> Self {
        Self::simple(name, FieldType::Integer, true)
    }

    /// Checks a single present value against this rule.
    fn check(&self, table: &str, value: &Value) -> ValidationResult<()> {
        if value.is_null() {
            return if self.optional {
                Ok(())
            } else {
                Err(ValidationError::new(
                    table,
                    &self.name,
                    ValidationReason::NullNotAllowed,
                ))
            };
        }
        if self.field_type.accepts(value) {
            Ok(())
        } else {
            Err(ValidationError::new(
                table,
                &self.name,
                ValidationReason::WrongType {
                    expected: self.field_type,
                },
            ))
        }
    }
}

/// Primitive type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    /// Whole numbers that fit in an `i64`. Floats with no fractional part,
    /// such as `1.0`, count as whole numbers.
    Integer,
}

// 2^63; `i64::MAX as f64` rounds up to it.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.fract() == 0.0 && f >= -I64_BOUND && f < I64_BOUND).then_some(f as i64)
}

impl FieldType {
    /// Returns true if a non-null JSON value has this type.
    #[must_use]
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::Text => value.is_string(),
            Self::Integer => whole_number(value).is_some(),
        }
    }

    /// Rewrites an accepted value into its stored form: integral floats
    /// become plain integers. Other values are returned unchanged.
    #[must_use]
    pub fn normalize(&self, value: Value) -> Value {
        match self {
            Self::Integer if !value.is_i64() => whole_number(&value).map_or(value, Value::from),
            _ => value,
        }
    }

    /// SQLite column affinity for this type.
    #[must_use]
    pub fn sql_type(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Integer => "INTEGER",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "a string"),
            Self::Integer => write!(f, "an integer"),
        }
    }
}

impl TableSchema {
    pub fn new(name: &str, fields: Vec<FieldRule>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Looks up a declared field.
    pub fn field(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared field names, in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Validates a full record payload.
    ///
    /// Rejects non-objects, undeclared fields, missing or null required
    /// fields, and values of the wrong type. Unknown fields are reported
    /// before anything else.
    pub fn validate(&self, payload: &Value) -> ValidationResult<()> {
        let object = payload.as_object().ok_or_else(|| {
            ValidationError::new(&self.name, "$", ValidationReason::NotAnObject)
        })?;

        if let Some(unknown) = object.keys().find(|k| self.field(k).is_none()) {
            return Err(ValidationError::new(
                &self.name,
                unknown,
                ValidationReason::UnknownField,
            ));
        }

        for rule in &self.fields {
            match object.get(&rule.name) {
                Some(value) => rule.check(&self.name, value)?,
                None if rule.optional => {}
                None => {
                    return Err(ValidationError::new(
                        &self.name,
                        &rule.name,
                        ValidationReason::MissingField,
                    ));
                }
            }
        }
        Ok(())
    }

    /// Validates a payload and returns its fields in stored form.
    pub fn validate_into(&self, payload: Value) -> ValidationResult<Map<String, Value>> {
        self.validate(&payload)?;
        match payload {
            Value::Object(fields) => Ok(fields
                .into_iter()
                .map(|(name, value)| {
                    let value = match self.field(&name) {
                        Some(rule) => rule.field_type.normalize(value),
                        None => value,
                    };
                    (name, value)
                })
                .collect()),
            _ => Err(ValidationError::new(&self.name, "$", ValidationReason::NotAnObject)),
        }
    }

    /// Validates an equality filter and returns it in stored form.
    ///
    /// Every filtered field must be declared; values follow the same type
    /// rules as payloads, so null is only allowed on optional fields.
    pub fn validate_filter(&self, filter: &Filter) -> ValidationResult<Filter> {
        let mut normalized = Filter::all();
        for (name, value) in filter.iter() {
            let rule = self.field(name).ok_or_else(|| {
                ValidationError::new(&self.name, name, ValidationReason::UnknownField)
            })?;
            rule.check(&self.name, value)?;
            normalized = normalized.eq(name, rule.field_type.normalize(value.clone()));
        }
        Ok(normalized)
    }
}
