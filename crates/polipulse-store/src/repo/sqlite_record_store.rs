//! SQLite implementation of the `RecordStore` port
//!
//! Text columns are written as NULL when the value is empty and read back
//! as empty strings. Each call runs as its own statement; there is no
//! transaction spanning an import run.

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use polipulse_core::errors::{ExError, ExErrorKind};
use polipulse_core::model::{Policy, PolicyRecord};
use polipulse_core::ops::record_store::{RecordStore, StoreResult};
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

use crate::db;
use crate::errors::{from_rusqlite, policy_not_found, Result};
use crate::migrations::apply_migrations;

/// Keys per `IN (...)` query
const KEY_CHUNK: usize = 500;

const SELECT_COLUMNS: &str = "id, client_name, nominee_name, dob, phone_no, email, address, \
     client_type, business_type, purchase_date, policy_no, company_name, policy_type, premium, \
     renewal_date, remarks";

pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    /// Wrap an already-migrated connection
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Open (or create) the database at `path`, configure it and migrate
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut conn = db::open(path)?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self::new(conn))
    }

    /// Fresh migrated in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = db::open_in_memory()?;
        db::configure(&conn)?;
        apply_migrations(&mut conn)?;
        Ok(Self::new(conn))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal).with_message("sqlite connection lock poisoned")
        })
    }
}

fn nullable(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<PolicyRecord> {
    Ok(PolicyRecord {
        id: row.get(0)?,
        policy: Policy {
            client_name: text(row, 1)?,
            nominee_name: text(row, 2)?,
            dob: text(row, 3)?,
            phone_no: text(row, 4)?,
            email: text(row, 5)?,
            address: text(row, 6)?,
            client_type: text(row, 7)?,
            business_type: text(row, 8)?,
            purchase_date: text(row, 9)?,
            policy_no: text(row, 10)?,
            company_name: text(row, 11)?,
            policy_type: text(row, 12)?,
            premium: row.get(13)?,
            renewal_date: text(row, 14)?,
            remarks: text(row, 15)?,
        },
    })
}

fn select_where_keys(conn: &Connection, keys: &[String]) -> Result<Vec<PolicyRecord>> {
    let mut records = Vec::new();
    for chunk in keys.chunks(KEY_CHUNK) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM policies WHERE policy_no IN ({}) ORDER BY created_at, rowid",
            SELECT_COLUMNS, placeholders
        );
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params_from_iter(chunk.iter()), row_to_record)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        records.extend(rows);
    }
    Ok(records)
}

fn select_one(conn: &Connection, key: &str) -> Result<Option<PolicyRecord>> {
    conn.query_row(
        &format!("SELECT {} FROM policies WHERE policy_no = ?1", SELECT_COLUMNS),
        [key],
        row_to_record,
    )
    .optional()
    .map_err(from_rusqlite)
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn find_by_keys(&self, keys: &[String]) -> StoreResult<Vec<PolicyRecord>> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.lock()?;
        select_where_keys(&conn, keys).map_err(|e| e.with_op("find_by_keys"))
    }

    async fn insert(&self, policy: &Policy) -> StoreResult<PolicyRecord> {
        let policy = policy.normalized();
        let id = Uuid::now_v7().to_string();
        let now = chrono::Utc::now().timestamp_millis();

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO policies (id, client_name, nominee_name, dob, phone_no, email, address,
                client_type, business_type, purchase_date, policy_no, company_name, policy_type,
                premium, renewal_date, remarks, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?17)",
            rusqlite::params![
                id,
                nullable(&policy.client_name),
                nullable(&policy.nominee_name),
                nullable(&policy.dob),
                nullable(&policy.phone_no),
                nullable(&policy.email),
                nullable(&policy.address),
                nullable(&policy.client_type),
                nullable(&policy.business_type),
                nullable(&policy.purchase_date),
                policy.key(),
                nullable(&policy.company_name),
                nullable(&policy.policy_type),
                policy.premium,
                nullable(&policy.renewal_date),
                nullable(&policy.remarks),
                now,
            ],
        )
        .map_err(|e| from_rusqlite(e).with_op("insert").with_key(policy.key()))?;

        select_one(&conn, policy.key())?.ok_or_else(|| {
            ExError::new(ExErrorKind::Internal)
                .with_op("insert")
                .with_key(policy.key())
                .with_message("inserted policy could not be read back")
        })
    }

    async fn update(&self, key: &str, policy: &Policy) -> StoreResult<PolicyRecord> {
        let key = key.trim();
        let policy = policy.normalized();
        let now = chrono::Utc::now().timestamp_millis();

        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE policies SET client_name = ?1, nominee_name = ?2, dob = ?3, phone_no = ?4,
                    email = ?5, address = ?6, client_type = ?7, business_type = ?8,
                    purchase_date = ?9, company_name = ?10, policy_type = ?11, premium = ?12,
                    renewal_date = ?13, remarks = ?14, updated_at = ?15
                 WHERE policy_no = ?16",
                rusqlite::params![
                    nullable(&policy.client_name),
                    nullable(&policy.nominee_name),
                    nullable(&policy.dob),
                    nullable(&policy.phone_no),
                    nullable(&policy.email),
                    nullable(&policy.address),
                    nullable(&policy.client_type),
                    nullable(&policy.business_type),
                    nullable(&policy.purchase_date),
                    nullable(&policy.company_name),
                    nullable(&policy.policy_type),
                    policy.premium,
                    nullable(&policy.renewal_date),
                    nullable(&policy.remarks),
                    now,
                    key,
                ],
            )
            .map_err(|e| from_rusqlite(e).with_op("update").with_key(key))?;

        if changed == 0 {
            return Err(policy_not_found(key));
        }

        select_one(&conn, key)?.ok_or_else(|| policy_not_found(key))
    }

    async fn select_all(&self) -> StoreResult<Vec<PolicyRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM policies ORDER BY created_at, rowid",
                SELECT_COLUMNS
            ))
            .map_err(from_rusqlite)?;
        let records = stmt
            .query_map([], row_to_record)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        Ok(records)
    }
}
