#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! Netinv - a network inventory toolkit
//!
//! Netinv tracks hosts, their IP address assignments, and managed subnets in
//! a SQLite database, and can be used as both a command-line application and
//! a library.
//!
//! IP addresses and CIDR networks are stored as canonical text in plain
//! `VARCHAR` columns. The storage layer can therefore only answer exact and
//! membership (`IN`) comparisons; containment queries ("every assignment
//! inside 10.0.0.0/24") are answered by lazily re-filtering a fetched record
//! stream, not by an indexed range predicate.
//!
//! # Architecture
//!
//! - **[`ip`]**: the IP value type - parsing, canonical rendering,
//!   containment, reverse DNS names.
//! - **[`field`]**: the field codec adapting IP values to the stored-as-text
//!   column contract (decode/encode/validate, widget defaults).
//! - **[`filters`]**: the network-containment filter over record streams.
//! - **[`database`]**: the SQLite-backed inventory store (hosts, IP
//!   assignments, subnets).
//! - **[`config`]**: configuration management.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use netinv::database::InventoryDatabase;
//!
//! let db = InventoryDatabase::open("~/.netinv/netinv.sqlite3")?;
//! let host_id = db.hosts().add("web01", "alice", "")?;
//! db.ips().add(host_id, "10.0.0.5", "web01.example.net", true)?;
//!
//! // containment query: post-fetch narrowing over the assignment scan
//! for a in db.ips().in_network("10.0.0.0/24")? {
//!     println!("{} -> {}", a.host, a.ip);
//! }
//! ```

pub mod config;
pub mod database;
pub mod field;
pub mod filters;
pub mod ip;

pub use config::NetinvConfig;

pub use ip::{contains, network_bounds, reverse_dns, IpParseError, IpValue, UnsupportedFamily};

pub use field::{DecodeError, FieldKind, FieldValue, ValidationError, WidgetSpec};

pub use filters::{FieldRecord, NetworkFilter, NetworkFiltered};

pub use database::{
    HostRecord, HostRepository, InventoryConn, InventoryDatabase, InventorySchema,
    IpAssignmentRecord, IpRepository, SubnetRecord, SubnetRepository, SubnetSummary,
};
