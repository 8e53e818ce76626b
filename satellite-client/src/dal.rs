//! Typed data-access façade.
//!
//! One [`Table`] per record kind. Every write is validated against the
//! table's schema before the store sees it; every committed write is then
//! announced as a potential change, replicated, and announced again as a
//! confirmed change once acknowledged.

use crate::error::{ClientError, ClientResult, ConfigError};
use crate::notifier::Notifier;
use crate::replication::Replicator;
use satellite_model::{db_schema, Filter, Record, TableSchema, PRIMARY_KEY};
use satellite_storage::RecordStore;
use satellite_types::{Change, DataChangeNotification, PotentialChangeNotification};
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Collaborators shared by every table of one database handle.
pub(crate) struct DalContext {
    pub(crate) db_name: String,
    pub(crate) store: RecordStore,
    pub(crate) notifier: Arc<Notifier>,
    pub(crate) replicator: Arc<dyn Replicator>,
}

/// CRUD operations over the table of record kind `T`.
pub struct Table<T: Record> {
    schema: &'static TableSchema,
    ctx: Arc<DalContext>,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> Table<T> {
    pub(crate) fn new(ctx: Arc<DalContext>) -> ClientResult<Self> {
        let schema = db_schema()
            .table(T::TABLE)
            .ok_or_else(|| ConfigError::UnknownTable(T::TABLE.to_string()))?;
        Ok(Self {
            schema,
            ctx,
            _record: PhantomData,
        })
    }

    /// The table name.
    pub fn name(&self) -> &str {
        &self.schema.name
    }

    /// The schema every write is validated against.
    pub fn schema(&self) -> &TableSchema {
        self.schema
    }

    /// Returns every record matching `filter`, in insertion order.
    ///
    /// `Filter::all()` returns the whole table.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] if the filter names an undeclared field or
    /// has a value of the wrong type; [`ClientError::Storage`] on store faults.
    pub async fn find_many(&self, filter: Filter) -> ClientResult<Vec<T>> {
        let filter = self.schema.validate_filter(&filter)?;

        let store = self.ctx.store.clone();
        let schema = self.schema;
        let rows = tokio::task::spawn_blocking(move || store.select_rows(schema, &filter)).await??;

        rows.into_iter()
            .map(|row| serde_json::from_value(Value::Object(row)).map_err(ClientError::from))
            .collect()
    }

    /// Validates and writes `records`.
    ///
    /// Accepts typed records or raw JSON. All records are validated before
    /// anything is written, and the batch is written in one transaction, so
    /// a validation or storage error stores nothing. Replication happens
    /// after the commit: a replication error is returned with the rows
    /// already stored, and retrying the same batch fails on duplicate ids.
    /// Returns the number of records created.
    ///
    /// # Errors
    ///
    /// [`ClientError::Validation`] naming the first offending field;
    /// [`ClientError::Storage`] (e.g. duplicate id) from the store;
    /// [`ClientError::Replication`] if the committed change is not
    /// acknowledged.
    pub async fn create_many<R: Serialize>(&self, records: &[R]) -> ClientResult<usize> {
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            rows.push(self.schema.validate_into(serde_json::to_value(record)?)?);
        }
        if rows.is_empty() {
            return Ok(0);
        }

        let ids: Vec<String> = rows
            .iter()
            .filter_map(|row| row.get(PRIMARY_KEY).and_then(Value::as_str))
            .map(str::to_string)
            .collect();

        let store = self.ctx.store.clone();
        let schema = self.schema;
        let created =
            tokio::task::spawn_blocking(move || store.insert_rows(schema, &rows)).await??;

        debug!("Created {} records in {}", created, self.name());
        self.publish(Change::insert(self.name(), ids)).await?;
        Ok(created)
    }

    /// Removes every record matching `filter` and returns how many were
    /// removed. Matching nothing is not an error. As with
    /// [`Table::create_many`], a replication error leaves the deletion
    /// committed.
    ///
    /// # Errors
    ///
    /// Same as [`Table::find_many`], plus [`ClientError::Replication`] if the
    /// deletion is not acknowledged.
    pub async fn delete_many(&self, filter: Filter) -> ClientResult<usize> {
        let filter = self.schema.validate_filter(&filter)?;

        let store = self.ctx.store.clone();
        let schema = self.schema;
        let removed =
            tokio::task::spawn_blocking(move || store.delete_rows(schema, &filter)).await??;

        let count = removed.len();
        if count > 0 {
            debug!("Deleted {} records from {}", count, self.name());
            self.publish(Change::delete(self.name(), removed)).await?;
        }
        Ok(count)
    }

    async fn publish(&self, change: Change) -> ClientResult<()> {
        let ctx = &self.ctx;
        ctx.notifier.potential_data_changed(&PotentialChangeNotification {
            db_name: ctx.db_name.clone(),
            tables: vec![change.table.clone()],
        });

        ctx.replicator.replicate(std::slice::from_ref(&change)).await?;

        ctx.notifier.data_changed(&DataChangeNotification {
            db_name: ctx.db_name.clone(),
            changes: vec![change],
        });
        Ok(())
    }
}
