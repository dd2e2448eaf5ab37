use crate::models::dump_target::DumpTarget;
use crate::models::error::{LogDataError, Result};
use crate::models::extracted_message::FieldMap;
use crate::models::page::PageRequest;
use crate::service::paged_reader::LogStore;
use log::{debug, info};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::ValueRef;
use serde_json::Value;
use std::sync::Arc;

pub type DbPool = Pool<SqliteConnectionManager>;

/// Log storage backed by a pooled SQLite database
#[derive(Clone)]
pub struct SqliteRepo {
    pool: Arc<DbPool>,
}

impl SqliteRepo {
    /// Open (or create) the database. An empty path or `:memory:` gives a
    /// private in-memory database.
    pub fn open(db_file: &str) -> Result<Self> {
        let db_file = if db_file.is_empty() { ":memory:" } else { db_file };
        info!("Initializing database connection pool: {}", db_file);

        // Every connection to plain ":memory:" is its own database, so that
        // case is limited to a single connection that is never recycled
        let is_private_memory = db_file == ":memory:";
        let is_in_memory = is_private_memory || db_file.starts_with("file::memory:");
        let use_wal = !is_in_memory;

        let manager = SqliteConnectionManager::file(db_file).with_init(move |conn| {
            let mut pragmas = String::from(
                "PRAGMA busy_timeout = 5000;
                 PRAGMA synchronous = NORMAL;",
            );

            if use_wal {
                pragmas.push_str(" PRAGMA journal_mode = WAL;");
            }

            conn.execute_batch(&pragmas)
        });

        let mut builder = r2d2::Pool::builder();
        let pool_size = if is_private_memory {
            builder = builder.idle_timeout(None).max_lifetime(None);
            1
        } else {
            // Pool size: num_physical_cpus + 7 for good mix of reads/writes
            num_cpus::get_physical() as u32 + 7
        };

        let pool = builder
            .max_size(pool_size)
            .build(manager)
            .map_err(|cause| LogDataError::DatabaseConnection {
                path: db_file.to_string(),
                cause,
            })?;

        info!("Database pool created with {} connections", pool_size);

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    fn get_connection(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    pub fn setup_database(&self) -> Result<()> {
        info!("Initializing database schema");
        let setup_queries = "BEGIN;
        PRAGMA ENCODING = 'UTF-8';

        CREATE TABLE IF NOT EXISTS ErrorLog(
            ID            integer not null
                constraint ErrorLog_ID_pk
                    primary key autoincrement,
            BackupID      integer,
            Message       TEXT    not null,
            Exception     TEXT,
            Timestamp     integer not null);

        CREATE INDEX IF NOT EXISTS ErrorLog_Timestamp_index
                on ErrorLog (Timestamp DESC);

        COMMIT;";

        let conn = self.get_connection()?;
        conn.execute_batch(setup_queries)
            .map_err(|cause| LogDataError::DatabaseQuery {
                operation: "create tables".to_string(),
                cause,
            })?;
        info!("Database schema initialized successfully");
        Ok(())
    }

    /// Insert an ErrorLog row stamped with the current time
    pub fn insert_error_log(
        &self,
        backup_id: Option<i64>,
        message: &str,
        exception: Option<&str>,
    ) -> Result<i64> {
        let timestamp = chrono::Utc::now().timestamp();
        self.insert_error_log_at(backup_id, message, exception, timestamp)
    }

    pub fn insert_error_log_at(
        &self,
        backup_id: Option<i64>,
        message: &str,
        exception: Option<&str>,
        timestamp: i64,
    ) -> Result<i64> {
        let conn = self.get_connection()?;
        conn.query_row(
            "INSERT INTO ErrorLog (BackupID, Message, Exception, Timestamp)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING ID",
            (backup_id, message, exception, timestamp),
            |row| row.get(0),
        )
        .map_err(|cause| LogDataError::DatabaseInsert {
            table: "ErrorLog".to_string(),
            cause,
        })
    }
}

/// Build the page query. The cursor is the only bound parameter; table and
/// field names come from the allow-list.
fn build_dump_query(target: &DumpTarget, page: &PageRequest) -> (String, Option<i64>) {
    let mut query = format!("SELECT * FROM \"{}\"", target.table().name());
    let mut cursor = None;

    if let (Some(field), Some(offset)) = (target.paging_field(), page.offset) {
        query.push_str(&format!(" WHERE \"{}\" < ?1", field));
        cursor = Some(offset);
    }

    if let Some(field) = target.paging_field() {
        query.push_str(&format!(" ORDER BY \"{}\" DESC", field));
    }

    query.push_str(&format!(" LIMIT {}", page.page_size));
    (query, cursor)
}

fn value_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(hex::encode(bytes)),
    }
}

impl LogStore for SqliteRepo {
    fn dump_table(&self, target: &DumpTarget, page: &PageRequest) -> Result<Vec<FieldMap>> {
        let (query, cursor) = build_dump_query(target, page);
        debug!("Dump query: {}", query);

        let operation = format!("dump {}", target.table().name());
        let query_err = |cause| LogDataError::DatabaseQuery {
            operation: operation.clone(),
            cause,
        };

        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&query).map_err(query_err)?;
        let names: Vec<String> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(cursor.iter()))
            .map_err(query_err)?;

        let mut result = Vec::new();
        while let Some(row) = rows.next().map_err(query_err)? {
            let mut fields = FieldMap::new();
            for (idx, name) in names.iter().enumerate() {
                let value = row.get_ref(idx).map_err(query_err)?;
                fields.insert(name.clone(), value_to_json(value));
            }
            result.push(fields);
        }

        Ok(result)
    }
}
