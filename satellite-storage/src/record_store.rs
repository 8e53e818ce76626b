//! Record tables, migration ledger and replica metadata in one SQLite file.

use crate::error::{StorageError, StorageResult};
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use satellite_model::{DbSchema, Filter, TableSchema, PRIMARY_KEY};
use satellite_types::{ClientId, MigrationDescriptor};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

/// A record as stored: declared column name to JSON value.
pub type Row = Map<String, Value>;

const CLIENT_ID_KEY: &str = "client_id";

/// Key under which migration descriptors may carry SQL to execute.
const MIGRATION_BODY_KEY: &str = "satellite_body";

/// Local store for the replicated tables, backed by SQLite.
///
/// Cloning is cheap and every clone shares the same connection.
#[derive(Clone)]
pub struct RecordStore {
    conn: Arc<Mutex<Connection>>,
}

impl RecordStore {
    /// Opens (or creates) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("Opened record store at {}", path.display());
        Self::with_connection(conn)
    }

    /// Opens an in-memory store (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn init_schema(&self) -> StorageResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS _satellite_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS _satellite_migrations (
                position INTEGER PRIMARY KEY,
                descriptor TEXT NOT NULL,
                applied_at INTEGER NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    // ── Bootstrap ────────────────────────────────────────────────

    /// Creates every table of the registry that does not exist yet.
    ///
    /// Tables a migration already created are left as they are.
    pub fn bootstrap(&self, schema: &DbSchema) -> StorageResult<()> {
        let conn = self.lock()?;
        for table in schema.tables() {
            if table_exists(&conn, &table.name)? {
                debug!("Table {} already present", table.name);
                continue;
            }
            conn.execute_batch(&create_table_sql(table))?;
            debug!("Bootstrapped table {}", table.name);
        }
        Ok(())
    }

    /// Returns true if a table with this name exists.
    ///
    /// Inspection helper for tests and diagnostics; the client never calls it.
    pub fn table_exists(&self, name: &str) -> StorageResult<bool> {
        let conn = self.lock()?;
        table_exists(&conn, name)
    }

    /// Applies migrations not yet recorded in the ledger.
    ///
    /// Migrations are identified by their position in the list. A descriptor
    /// whose `satellite_body` is an array of SQL strings has those statements
    /// executed; any other descriptor is only recorded. All new migrations
    /// commit together or not at all.
    ///
    /// Returns the number of migrations applied by this call.
    pub fn apply_migrations(&self, migrations: &[MigrationDescriptor]) -> StorageResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let mut applied = 0;

        for (position, migration) in migrations.iter().enumerate() {
            let position = position as i64;
            let recorded: Option<i64> = tx
                .query_row(
                    "SELECT position FROM _satellite_migrations WHERE position = ?1",
                    params![position],
                    |row| row.get(0),
                )
                .optional()?;
            if recorded.is_some() {
                continue;
            }

            for statement in migration_statements(migration)? {
                tx.execute_batch(statement).map_err(|e| {
                    StorageError::Migration(format!("migration {position} failed: {e}"))
                })?;
            }
            tx.execute(
                "INSERT INTO _satellite_migrations (position, descriptor, applied_at)
                 VALUES (?1, ?2, ?3)",
                params![
                    position,
                    serde_json::to_string(migration)?,
                    chrono::Utc::now().timestamp(),
                ],
            )?;
            applied += 1;
        }

        tx.commit()?;
        if applied > 0 {
            info!("Applied {} of {} migrations", applied, migrations.len());
        }
        Ok(applied)
    }

    /// Returns the recorded migrations in application order.
    ///
    /// Inspection helper for tests and diagnostics; the client never calls it.
    pub fn applied_migrations(&self) -> StorageResult<Vec<MigrationDescriptor>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT descriptor FROM _satellite_migrations ORDER BY position")?;
        let raw = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        raw.iter()
            .map(|json| serde_json::from_str(json).map_err(StorageError::from))
            .collect()
    }

    /// Returns this replica's client id, generating and persisting one on
    /// first use.
    pub fn client_id(&self) -> StorageResult<ClientId> {
        let conn = self.lock()?;
        let stored: Option<String> = conn
            .query_row(
                "SELECT value FROM _satellite_meta WHERE key = ?1",
                params![CLIENT_ID_KEY],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(value) = stored {
            return ClientId::parse(&value)
                .map_err(|e| StorageError::InvalidData(format!("stored client id: {e}")));
        }

        let id = ClientId::generate();
        conn.execute(
            "INSERT INTO _satellite_meta (key, value) VALUES (?1, ?2)",
            params![CLIENT_ID_KEY, id.to_string()],
        )?;
        debug!("Generated client id {}", id);
        Ok(id)
    }

    // ── Records ──────────────────────────────────────────────────

    /// Inserts rows in a single transaction.
    ///
    /// Either every row is written or none is; a duplicate primary key fails
    /// the whole batch.
    pub fn insert_rows(&self, table: &TableSchema, rows: &[Row]) -> StorageResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for row in rows {
            let mut columns = Vec::with_capacity(row.len());
            let mut values = Vec::with_capacity(row.len());
            for (column, value) in row {
                check_column(table, column)?;
                columns.push(quote_ident(column));
                values.push(to_sql_value(table, column, value)?);
            }
            let placeholders = (1..=values.len())
                .map(|i| format!("?{i}"))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                quote_ident(&table.name),
                columns.join(", "),
                placeholders
            );
            tx.execute(&sql, params_from_iter(values.iter()))?;
        }
        tx.commit()?;

        debug!("Inserted {} rows into {}", rows.len(), table.name);
        Ok(rows.len())
    }

    /// Returns rows matching the filter, in insertion order.
    pub fn select_rows(&self, table: &TableSchema, filter: &Filter) -> StorageResult<Vec<Row>> {
        let conn = self.lock()?;
        query_rows(&conn, table, filter)
    }

    /// Deletes rows matching the filter and returns their ids.
    pub fn delete_rows(&self, table: &TableSchema, filter: &Filter) -> StorageResult<Vec<String>> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let ids: Vec<String> = query_rows(&tx, table, filter)?
            .into_iter()
            .filter_map(|row| match row.get(PRIMARY_KEY) {
                Some(Value::String(id)) => Some(id.clone()),
                _ => None,
            })
            .collect();

        if !ids.is_empty() {
            let (where_sql, values) = where_clause(table, filter)?;
            let sql = format!("DELETE FROM {}{}", quote_ident(&table.name), where_sql);
            tx.execute(&sql, params_from_iter(values.iter()))?;
        }
        tx.commit()?;

        debug!("Deleted {} rows from {}", ids.len(), table.name);
        Ok(ids)
    }
}

fn query_rows(conn: &Connection, table: &TableSchema, filter: &Filter) -> StorageResult<Vec<Row>> {
    let columns: Vec<&str> = table.field_names().collect();
    let (where_sql, values) = where_clause(table, filter)?;
    let sql = format!(
        "SELECT {} FROM {}{} ORDER BY rowid",
        columns
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", "),
        quote_ident(&table.name),
        where_sql
    );

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(params_from_iter(values.iter()))?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        let mut record = Row::new();
        for (i, column) in columns.iter().enumerate() {
            let value = from_sql_value(table, column, row.get_ref(i)?)?;
            record.insert((*column).to_string(), value);
        }
        records.push(record);
    }
    Ok(records)
}

fn table_exists(conn: &Connection, name: &str) -> StorageResult<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Builds ` WHERE a = ?1 AND b IS NULL` (or an empty string) for a filter.
fn where_clause(table: &TableSchema, filter: &Filter) -> StorageResult<(String, Vec<SqlValue>)> {
    let mut clauses = Vec::with_capacity(filter.len());
    let mut values = Vec::with_capacity(filter.len());
    for (column, value) in filter.iter() {
        check_column(table, column)?;
        if value.is_null() {
            clauses.push(format!("{} IS NULL", quote_ident(column)));
        } else {
            values.push(to_sql_value(table, column, value)?);
            clauses.push(format!("{} = ?{}", quote_ident(column), values.len()));
        }
    }

    if clauses.is_empty() {
        Ok((String::new(), values))
    } else {
        Ok((format!(" WHERE {}", clauses.join(" AND ")), values))
    }
}

fn create_table_sql(table: &TableSchema) -> String {
    let columns: Vec<String> = table
        .fields
        .iter()
        .map(|field| {
            let mut column = format!(
                "{} {}",
                quote_ident(&field.name),
                field.field_type.sql_type()
            );
            if field.name == PRIMARY_KEY {
                column.push_str(" PRIMARY KEY NOT NULL");
            } else if !field.optional {
                column.push_str(" NOT NULL");
            }
            column
        })
        .collect();
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({});",
        quote_ident(&table.name),
        columns.join(", ")
    )
}

fn migration_statements(migration: &MigrationDescriptor) -> StorageResult<Vec<&str>> {
    match migration.as_value().get(MIGRATION_BODY_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(statements)) => statements
            .iter()
            .map(|s| {
                s.as_str().ok_or_else(|| {
                    StorageError::Migration(format!("{MIGRATION_BODY_KEY} entries must be strings"))
                })
            })
            .collect(),
        Some(_) => Err(StorageError::Migration(format!(
            "{MIGRATION_BODY_KEY} must be an array"
        ))),
    }
}

fn check_column(table: &TableSchema, column: &str) -> StorageResult<()> {
    if table.field(column).is_none() {
        return Err(StorageError::UnknownColumn {
            table: table.name.clone(),
            column: column.to_string(),
        });
    }
    Ok(())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn to_sql_value(table: &TableSchema, column: &str, value: &Value) -> StorageResult<SqlValue> {
    match value {
        Value::Null => Ok(SqlValue::Null),
        Value::String(s) => Ok(SqlValue::Text(s.clone())),
        Value::Number(n) => n.as_i64().map(SqlValue::Integer).ok_or_else(|| {
            StorageError::InvalidData(format!("{}.{column}: {n} is not an integer", table.name))
        }),
        other => Err(StorageError::InvalidData(format!(
            "{}.{column}: unsupported value {other}",
            table.name
        ))),
    }
}

/// Reads a stored value back as JSON. Text and blobs must be valid UTF-8.
fn from_sql_value(table: &TableSchema, column: &str, value: ValueRef<'_>) -> StorageResult<Value> {
    match value {
        ValueRef::Null => Ok(Value::Null),
        ValueRef::Integer(i) => Ok(Value::from(i)),
        ValueRef::Real(f) => Ok(serde_json::Number::from_f64(f).map_or(Value::Null, Value::Number)),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => std::str::from_utf8(bytes)
            .map(|s| Value::String(s.to_owned()))
            .map_err(|e| {
                StorageError::InvalidData(format!("{}.{column}: not UTF-8: {e}", table.name))
            }),
    }
}
