//! Host repository

use anyhow::{anyhow, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::types::HostRecord;

/// Repository for host records
pub struct HostRepository<'a> {
    conn: &'a Connection,
}

impl<'a> HostRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a host and return its id
    pub fn add(&self, name: &str, owner: &str, notes: &str) -> Result<i64> {
        self.conn
            .execute(
                "INSERT INTO hosts (name, owner, notes) VALUES (?1, ?2, ?3)",
                params![name, owner, notes],
            )
            .map_err(|e| anyhow!("Failed to insert host '{}': {}", name, e))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All hosts in insertion order
    pub fn list(&self) -> Result<Vec<HostRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, owner, notes FROM hosts ORDER BY id")
            .map_err(|e| anyhow!("Failed to prepare host query: {}", e))?;
        let rows = stmt
            .query_map([], row_to_host)
            .map_err(|e| anyhow!("Failed to query hosts: {}", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow!("Failed to read host row: {}", e))
    }

    /// Hosts whose name contains the given substring
    pub fn search_by_name(&self, query: &str) -> Result<Vec<HostRecord>> {
        let pattern = format!("%{}%", query);
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, owner, notes FROM hosts WHERE name LIKE ?1 ORDER BY id")
            .map_err(|e| anyhow!("Failed to prepare host search: {}", e))?;
        let rows = stmt
            .query_map([pattern], row_to_host)
            .map_err(|e| anyhow!("Failed to search hosts: {}", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow!("Failed to read host row: {}", e))
    }

    /// Look up a host by exact name
    pub fn get_by_name(&self, name: &str) -> Result<Option<HostRecord>> {
        self.conn
            .query_row(
                "SELECT id, name, owner, notes FROM hosts WHERE name = ?1",
                [name],
                row_to_host,
            )
            .optional()
            .map_err(|e| anyhow!("Failed to look up host '{}': {}", name, e))
    }
}

fn row_to_host(row: &rusqlite::Row<'_>) -> rusqlite::Result<HostRecord> {
    Ok(HostRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        owner: row.get(2)?,
        notes: row.get(3)?,
    })
}
