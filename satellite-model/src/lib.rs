//! Schema registry and typed records for the satellite test client.
//!
//! Defines the shape of the two replicated tables and the strict validator
//! applied to every write:
//! - [`TableSchema`]: the exact set of fields a table accepts, with types
//! - [`DbSchema`]: the named mapping of tables, see [`db_schema`]
//! - [`Filter`]: equality filters over declared fields
//! - [`Record`]: typed rows ([`Item`], [`OtherItem`]) bound to their table
//!
//! The registry is consumed twice: the data-access layer validates payloads
//! against it before they reach storage, and the store creates its tables
//! from it on bootstrap.

mod error;
mod filter;
mod record;
mod schema;

pub use error::{ValidationError, ValidationReason, ValidationResult};
pub use filter::Filter;
pub use record::{Item, OtherItem, Record};
pub use schema::{
    db_schema, DbSchema, FieldRule, FieldType, TableSchema, ITEMS_TABLE, OTHER_ITEMS_TABLE,
    PRIMARY_KEY,
};
