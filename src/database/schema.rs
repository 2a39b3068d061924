//! Inventory schema definitions
//!
//! IP columns are plain text sized to the field codec's column contract:
//! `VARCHAR(42)` for host addresses, `VARCHAR(45)` for `address/prefix`
//! literals. SQLite has no INET type, so containment queries are answered
//! post-fetch by [`crate::filters`], never at the SQL level.

use anyhow::{anyhow, Result};
use rusqlite::Connection;

/// SQL schema definitions for the inventory tables
pub struct InventorySchema;

impl InventorySchema {
    pub const HOSTS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS hosts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            owner TEXT NOT NULL DEFAULT '',
            notes TEXT NOT NULL DEFAULT ''
        );
    "#;

    pub const IP_ASSIGNMENTS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS ip_assignments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            host_id INTEGER NOT NULL REFERENCES hosts(id) ON DELETE CASCADE,
            ip VARCHAR(42) NOT NULL DEFAULT '',
            fqdn TEXT NOT NULL DEFAULT '',
            auto_dns INTEGER NOT NULL DEFAULT 1
        );
    "#;

    pub const SUBNETS_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS subnets (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            owner TEXT NOT NULL DEFAULT '',
            network VARCHAR(45) NOT NULL,
            notes TEXT NOT NULL DEFAULT ''
        );
    "#;

    pub const INDEXES: &'static [&'static str] = &[
        "CREATE INDEX IF NOT EXISTS idx_ip_assignments_host ON ip_assignments(host_id)",
        "CREATE INDEX IF NOT EXISTS idx_ip_assignments_ip ON ip_assignments(ip)",
        "CREATE INDEX IF NOT EXISTS idx_subnets_network ON subnets(network)",
    ];

    /// Create all inventory tables and indexes if they do not exist
    pub fn initialize(conn: &Connection) -> Result<()> {
        for table_sql in [
            Self::HOSTS_TABLE,
            Self::IP_ASSIGNMENTS_TABLE,
            Self::SUBNETS_TABLE,
        ] {
            conn.execute(table_sql, [])
                .map_err(|e| anyhow!("Failed to create inventory table: {}", e))?;
        }
        for index_sql in Self::INDEXES {
            conn.execute(index_sql, [])
                .map_err(|e| anyhow!("Failed to create inventory index: {}", e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InventoryConn;
    use crate::field::FieldKind;

    #[test]
    fn test_initialize() {
        let db = InventoryConn::open_in_memory().unwrap();
        InventorySchema::initialize(&db.conn).unwrap();
        assert!(db.table_exists("hosts").unwrap());
        assert!(db.table_exists("ip_assignments").unwrap());
        assert!(db.table_exists("subnets").unwrap());
        // idempotent
        InventorySchema::initialize(&db.conn).unwrap();
    }

    #[test]
    fn test_columns_match_field_contract() {
        assert!(InventorySchema::IP_ASSIGNMENTS_TABLE
            .contains(FieldKind::Address.column_type()));
        assert!(InventorySchema::SUBNETS_TABLE.contains(FieldKind::Network.column_type()));
    }
}
