//! Inventory database
//!
//! SQLite-backed storage for the inventory: hosts, their IP address
//! assignments, and managed subnets. IP columns hold canonical text produced
//! by the field codec ([`crate::field`]); SQLite answers only exact and `IN`
//! comparisons on them, while containment queries are served post-fetch by
//! [`crate::filters`].
//!
//! ```text
//! database/
//! ├── connection   # SQLite wrapper (pragmas, in-memory support)
//! ├── schema       # Table and index definitions
//! ├── types        # Record structs and derived display rows
//! ├── hosts        # Host repository
//! ├── ips          # IP assignment repository
//! └── subnets      # Subnet repository
//! ```

pub mod connection;
pub mod hosts;
pub mod ips;
pub mod schema;
pub mod subnets;
pub mod types;

use anyhow::Result;
use rusqlite::Connection;

pub use connection::InventoryConn;
pub use hosts::HostRepository;
pub use ips::IpRepository;
pub use schema::InventorySchema;
pub use subnets::SubnetRepository;
pub use types::{HostRecord, IpAssignmentRecord, SubnetRecord, SubnetSummary};

/// Top-level handle over the inventory database
///
/// Opening initializes the schema, so a fresh path is immediately usable.
pub struct InventoryDatabase {
    conn: InventoryConn,
}

impl InventoryDatabase {
    /// Open (or create) the inventory database at the given path
    pub fn open(path: &str) -> Result<Self> {
        let conn = InventoryConn::open_path(path)?;
        InventorySchema::initialize(&conn.conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory inventory database (used by tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = InventoryConn::open_in_memory()?;
        InventorySchema::initialize(&conn.conn)?;
        Ok(Self { conn })
    }

    pub fn conn(&self) -> &Connection {
        &self.conn.conn
    }

    pub fn hosts(&self) -> HostRepository<'_> {
        HostRepository::new(&self.conn.conn)
    }

    pub fn ips(&self) -> IpRepository<'_> {
        IpRepository::new(&self.conn.conn)
    }

    pub fn subnets(&self) -> SubnetRepository<'_> {
        SubnetRepository::new(&self.conn.conn)
    }
}
