pub mod host;
pub mod ip;
pub mod subnet;

use anyhow::Result;
use netinv::database::InventoryDatabase;
use netinv::NetinvConfig;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

pub(crate) fn open_db(config: &NetinvConfig) -> Result<InventoryDatabase> {
    InventoryDatabase::open(&config.sqlite_path())
}

/// Print rows as a markdown table, a rounded table, or JSON
pub(crate) fn print_records<T: Tabled + Serialize>(
    records: &[T],
    json: bool,
    pretty: bool,
) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(records)?);
    } else if pretty {
        println!("{}", Table::new(records).with(Style::rounded()));
    } else {
        println!("{}", Table::new(records).with(Style::markdown()));
    }
    Ok(())
}
