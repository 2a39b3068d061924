//! Subnet repository

use anyhow::{anyhow, Result};
use rusqlite::{params, Connection};

use super::types::{SubnetRecord, SubnetSummary};
use crate::field::{FieldKind, ValidationError};
use crate::filters::NetworkFilter;

/// Repository for managed subnets
pub struct SubnetRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SubnetRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Validate, canonicalize, and insert a subnet; returns its id
    ///
    /// The network-kind codec is strict: a bare address is widened to a
    /// full-width host network, anything unparsable is rejected here.
    pub fn add(&self, owner: &str, network: &str, notes: &str) -> Result<i64> {
        let canonical = FieldKind::Network
            .canonicalize(network)
            .map_err(|e: ValidationError| anyhow!("invalid network: {}", e))?;
        self.conn
            .execute(
                "INSERT INTO subnets (owner, network, notes) VALUES (?1, ?2, ?3)",
                params![owner, canonical, notes],
            )
            .map_err(|e| anyhow!("Failed to insert subnet '{}': {}", network, e))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All subnets in insertion order
    pub fn list(&self) -> Result<Vec<SubnetRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, owner, network, notes FROM subnets ORDER BY id")
            .map_err(|e| anyhow!("Failed to prepare subnet query: {}", e))?;
        let rows = stmt
            .query_map([], row_to_subnet)
            .map_err(|e| anyhow!("Failed to query subnets: {}", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow!("Failed to read subnet row: {}", e))
    }

    /// Listing rows with the derived min/max/host-count columns
    pub fn list_summaries(&self) -> Result<Vec<SubnetSummary>> {
        Ok(self.list()?.iter().map(SubnetRecord::summarize).collect())
    }

    /// Subnets lying entirely inside the target network
    pub fn in_network(&self, target: &str) -> Result<Vec<SubnetRecord>> {
        let filter = NetworkFilter::parse("network", FieldKind::Network, target)
            .map_err(|e| anyhow!("invalid target network: {}", e))?;
        let records = self.list()?;
        Ok(filter.apply(records).collect())
    }
}

fn row_to_subnet(row: &rusqlite::Row<'_>) -> rusqlite::Result<SubnetRecord> {
    Ok(SubnetRecord {
        id: row.get(0)?,
        owner: row.get(1)?,
        network: row.get(2)?,
        notes: row.get(3)?,
    })
}
