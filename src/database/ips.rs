//! IP assignment repository
//!
//! The `ip` column is plain text, so the storage level can only answer exact
//! and `IN` comparisons on canonical-encoded literals. Containment lookups
//! (`in_network`) scan the table and narrow the stream through
//! [`crate::filters::NetworkFilter`]; rows whose stored text no longer parses
//! are skipped, never raised.

use anyhow::{anyhow, Result};
use rusqlite::{params, params_from_iter, Connection};
use tracing::debug;

use super::types::IpAssignmentRecord;
use crate::field::{FieldKind, ValidationError};
use crate::filters::NetworkFilter;

const SELECT_ASSIGNMENTS: &str = "
    SELECT a.id, a.host_id, h.name, a.ip, a.fqdn, a.auto_dns
    FROM ip_assignments a JOIN hosts h ON h.id = a.host_id
";

/// Repository for IP address assignments
pub struct IpRepository<'a> {
    conn: &'a Connection,
}

impl<'a> IpRepository<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Validate, canonicalize, and insert an assignment; returns its id
    ///
    /// User input goes through the address-kind validator first, so only
    /// canonical text (or empty) is ever written by this path.
    pub fn add(&self, host_id: i64, ip: &str, fqdn: &str, auto_dns: bool) -> Result<i64> {
        let canonical = FieldKind::Address
            .canonicalize(ip)
            .map_err(|e: ValidationError| anyhow!("invalid IP address: {}", e))?;
        self.conn
            .execute(
                "INSERT INTO ip_assignments (host_id, ip, fqdn, auto_dns) VALUES (?1, ?2, ?3, ?4)",
                params![host_id, canonical, fqdn, auto_dns],
            )
            .map_err(|e| anyhow!("Failed to insert IP assignment '{}': {}", ip, e))?;
        Ok(self.conn.last_insert_rowid())
    }

    /// All assignments in insertion order
    pub fn scan(&self) -> Result<Vec<IpAssignmentRecord>> {
        let sql = format!("{} ORDER BY a.id", SELECT_ASSIGNMENTS);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| anyhow!("Failed to prepare assignment scan: {}", e))?;
        let rows = stmt
            .query_map([], row_to_assignment)
            .map_err(|e| anyhow!("Failed to scan assignments: {}", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow!("Failed to read assignment row: {}", e))
    }

    /// Assignments belonging to one host, in insertion order
    pub fn list_for_host(&self, host_id: i64) -> Result<Vec<IpAssignmentRecord>> {
        let sql = format!("{} WHERE a.host_id = ?1 ORDER BY a.id", SELECT_ASSIGNMENTS);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| anyhow!("Failed to prepare per-host query: {}", e))?;
        let rows = stmt
            .query_map([host_id], row_to_assignment)
            .map_err(|e| anyhow!("Failed to query host assignments: {}", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow!("Failed to read assignment row: {}", e))
    }

    /// Exact-match lookup on the canonical-encoded text
    pub fn find_exact(&self, ip: &str) -> Result<Vec<IpAssignmentRecord>> {
        let value = FieldKind::Address
            .decode(ip)
            .map_err(|e| anyhow!("invalid lookup value: {}", e))?;
        let needle = FieldKind::Address.prep_exact(&value);
        let sql = format!("{} WHERE a.ip = ?1 ORDER BY a.id", SELECT_ASSIGNMENTS);
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| anyhow!("Failed to prepare exact lookup: {}", e))?;
        let rows = stmt
            .query_map([needle], row_to_assignment)
            .map_err(|e| anyhow!("Failed to run exact lookup: {}", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow!("Failed to read assignment row: {}", e))
    }

    /// Membership lookup: assignments whose text equals any candidate
    ///
    /// Each candidate is canonical-encoded before comparison, the same way
    /// stored values were encoded on write.
    pub fn find_in(&self, ips: &[&str]) -> Result<Vec<IpAssignmentRecord>> {
        if ips.is_empty() {
            return Ok(Vec::new());
        }
        let values = ips
            .iter()
            .map(|ip| FieldKind::Address.decode(ip))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow!("invalid lookup value: {}", e))?;
        let needles = FieldKind::Address.prep_in(&values);

        let placeholders = (1..=needles.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "{} WHERE a.ip IN ({}) ORDER BY a.id",
            SELECT_ASSIGNMENTS, placeholders
        );
        let mut stmt = self
            .conn
            .prepare(&sql)
            .map_err(|e| anyhow!("Failed to prepare IN lookup: {}", e))?;
        let rows = stmt
            .query_map(params_from_iter(needles.iter()), row_to_assignment)
            .map_err(|e| anyhow!("Failed to run IN lookup: {}", e))?;
        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow!("Failed to read assignment row: {}", e))
    }

    /// Assignments whose address falls inside the target network
    ///
    /// The target parses eagerly, failing before any row is read. This is a
    /// full-table scan narrowed in memory, not an indexed range query.
    pub fn in_network(&self, target: &str) -> Result<Vec<IpAssignmentRecord>> {
        let filter = NetworkFilter::parse("ip", FieldKind::Address, target)
            .map_err(|e| anyhow!("invalid target network: {}", e))?;
        let records = self.scan()?;
        let total = records.len();
        let matched: Vec<_> = filter.apply(records).collect();
        debug!(
            "in_network {}: {} of {} assignments matched",
            filter.target(),
            matched.len(),
            total
        );
        Ok(matched)
    }
}

fn row_to_assignment(row: &rusqlite::Row<'_>) -> rusqlite::Result<IpAssignmentRecord> {
    Ok(IpAssignmentRecord {
        id: row.get(0)?,
        host_id: row.get(1)?,
        host: row.get(2)?,
        ip: row.get(3)?,
        fqdn: row.get(4)?,
        auto_dns: row.get(5)?,
    })
}
