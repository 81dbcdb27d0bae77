//! Append-only record table.
//!
//! A [`MetadataStore`] owns its sqlite connection for its whole lifetime. Records
//! can be added and read back; there is no update or delete path, and the
//! schema installs triggers that abort either statement.

use crate::app_error::{AppError, AppResult};
use crate::db::open_db;
use crate::hashing::{digest, validate_metadata_hash};
use crate::normalize::CanonicalMetadata;
use crate::types::MetadataHash;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const RECORD_COLUMNS: &str = "id, filename, metadata, hash, created_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub filename: String,
    pub metadata_json: String,
    pub hash: MetadataHash,
    pub created_at: String,
}

impl Record {
    pub fn metadata(&self) -> AppResult<CanonicalMetadata> {
        CanonicalMetadata::from_json(&self.metadata_json)
    }

    /// Recomputes the digest of the stored metadata and compares it with the stored hash.
    pub fn verify_integrity(&self) -> AppResult<bool> {
        Ok(digest(&self.metadata()?) == self.hash)
    }
}

pub struct MetadataStore {
    conn: Connection,
    db_path: PathBuf,
}

fn record_from_row(row: &Row<'_>) -> rusqlite::Result<Record> {
    Ok(Record {
        id: row.get(0)?,
        filename: row.get(1)?,
        metadata_json: row.get(2)?,
        hash: MetadataHash(row.get(3)?),
        created_at: row.get(4)?,
    })
}

fn query_failed(message: &str, e: rusqlite::Error) -> AppError {
    AppError::persistence(message, serde_json::json!({ "error": e.to_string() }))
}

impl MetadataStore {
    /// Opens (and on first use creates) the store at `db_path`.
    pub fn open(db_path: &Path) -> AppResult<Self> {
        let conn = open_db(db_path)?;
        tracing::debug!(path = %db_path.display(), "opened metadata store");
        Ok(Self {
            conn,
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    pub fn save(
        &self,
        filename: &str,
        canonical: &CanonicalMetadata,
        hash: &MetadataHash,
    ) -> AppResult<Record> {
        self.save_at(filename, canonical, hash, Utc::now())
    }

    /// Same as [`MetadataStore::save`] with an explicit creation time.
    pub fn save_at(
        &self,
        filename: &str,
        canonical: &CanonicalMetadata,
        hash: &MetadataHash,
        created_at: DateTime<Utc>,
    ) -> AppResult<Record> {
        validate_metadata_hash(hash.as_str())?;
        let computed = digest(canonical);
        if &computed != hash {
            return Err(AppError::new(
                "DM_HASH_MISMATCH",
                "store",
                "hash does not match the canonical metadata",
                false,
                serde_json::json!({ "computed": computed.0, "supplied": hash.0 }),
            ));
        }

        let metadata_json = canonical.to_json()?;
        let created_at = created_at.to_rfc3339_opts(SecondsFormat::Millis, true);

        self.conn
            .execute(
                "INSERT INTO records (filename, metadata, hash, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![filename, metadata_json, hash.0, created_at],
            )
            .map_err(|e| {
                AppError::persistence(
                    "failed to insert record",
                    serde_json::json!({ "error": e.to_string(), "filename": filename }),
                )
            })?;

        let id = self.conn.last_insert_rowid();
        tracing::info!(id, filename, hash = %hash, "saved metadata record");

        Ok(Record {
            id,
            filename: filename.to_string(),
            metadata_json,
            hash: hash.clone(),
            created_at,
        })
    }

    /// `Ok(None)` is the not-found outcome; it is not an error.
    pub fn get(&self, id: i64) -> AppResult<Option<Record>> {
        self.conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id=?1"),
                params![id],
                record_from_row,
            )
            .optional()
            .map_err(|e| query_failed("failed to load record", e))
    }

    /// All records, newest first. Each call reads a fresh snapshot.
    pub fn list_all(&self) -> AppResult<Vec<Record>> {
        self.query_records(
            &format!("SELECT {RECORD_COLUMNS} FROM records ORDER BY id DESC"),
            params![],
        )
    }

    /// Records saved under `filename`, newest first.
    pub fn history(&self, filename: &str) -> AppResult<Vec<Record>> {
        self.query_records(
            &format!("SELECT {RECORD_COLUMNS} FROM records WHERE filename=?1 ORDER BY id DESC"),
            params![filename],
        )
    }

    pub fn find_by_hash(&self, hash: &MetadataHash) -> AppResult<Vec<Record>> {
        self.query_records(
            &format!("SELECT {RECORD_COLUMNS} FROM records WHERE hash=?1 ORDER BY id DESC"),
            params![hash.0],
        )
    }

    pub fn count(&self) -> AppResult<i64> {
        self.conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))
            .map_err(|e| query_failed("failed to count records", e))
    }

    pub fn close(self) -> AppResult<()> {
        self.conn
            .close()
            .map_err(|(_, e)| query_failed("failed to close metadata store", e))
    }

    fn query_records(&self, sql: &str, args: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| query_failed("failed to prepare record query", e))?;
        let rows = stmt
            .query_map(args, record_from_row)
            .map_err(|e| query_failed("failed to query records", e))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row.map_err(|e| query_failed("failed to decode record row", e))?);
        }
        Ok(out)
    }
}
