#![forbid(unsafe_code)]

use crate::{KeyValueStore, StoreError, sha256_hex};
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use time::OffsetDateTime;

const DB_FILE_NAME: &str = "check_matrix.db";
const SCHEMA_VERSION: i64 = 1;

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: PathBuf,
}

/// One persisted entry as stored on disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KvRow {
    pub key: String,
    pub value: String,
    pub digest: String,
    pub updated_at_ms: i64,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&storage_dir)?;

        let conn = Connection::open(storage_dir.join(DB_FILE_NAME))?;
        conn.busy_timeout(Duration::from_secs(5))?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;

        Ok(Self { conn, storage_dir })
    }

    pub fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage_dir.join(DB_FILE_NAME)
    }

    pub fn row(&self, key: &str) -> Result<Option<KvRow>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT key, value, digest, updated_at_ms FROM kv WHERE key=?1",
                params![key],
                |row| {
                    Ok(KvRow {
                        key: row.get(0)?,
                        value: row.get(1)?,
                        digest: row.get(2)?,
                        updated_at_ms: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let Some(row) = self.row(key)? else {
            return Ok(None);
        };
        if sha256_hex(row.value.as_bytes()) != row.digest {
            return Err(StoreError::InvalidInput("stored value digest mismatch"));
        }
        Ok(Some(row.value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO kv(key, value, digest, updated_at_ms) VALUES (?1, ?2, ?3, ?4) \
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, digest=excluded.digest, \
             updated_at_ms=excluded.updated_at_ms",
            params![key, value, sha256_hex(value.as_bytes()), now_ms()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.conn
            .execute("DELETE FROM kv WHERE key=?1", params![key])?;
        Ok(())
    }
}

fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    let required: BTreeSet<&str> = ["meta", "kv"].into_iter().collect();
    if tables
        .iter()
        .any(|table| !required.contains(table.as_str()))
    {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }

    let version = if tables.contains("meta") {
        conn.query_row(
            "SELECT value FROM meta WHERE key='schema_version'",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?
    } else {
        None
    };

    match version.as_deref().map(str::parse::<i64>) {
        Some(Ok(v)) if v == SCHEMA_VERSION => Ok(()),
        None => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema version mismatch",
        )),
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS kv (
          key TEXT PRIMARY KEY,
          value TEXT NOT NULL,
          digest TEXT NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );
        "#,
    )?;
    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION.to_string()],
    )?;
    Ok(())
}

fn now_ms() -> i64 {
    let ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000i128;
    i64::try_from(ms.max(0)).unwrap_or(i64::MAX)
}
