use anyhow::Result;
use clap::{Args, Subcommand};
use netinv::NetinvConfig;
use serde::Serialize;
use tabled::Tabled;

use super::{open_db, print_records};

#[derive(Subcommand)]
pub enum HostCommand {
    /// Add a host to the inventory
    Add(HostAddArgs),
    /// List hosts with their assigned IPs
    List(HostListArgs),
}

#[derive(Args)]
pub struct HostAddArgs {
    /// Host name, must be unique
    pub name: String,

    /// Owner of the host
    #[clap(short, long, default_value = "")]
    pub owner: String,

    /// Free-form notes
    #[clap(short, long, default_value = "")]
    pub notes: String,
}

#[derive(Args)]
pub struct HostListArgs {
    /// Name substring to search for
    pub query: Option<String>,

    /// Output to pretty table, default markdown table
    #[clap(short, long)]
    pub pretty: bool,
}

/// Host listing row with the assigned addresses joined in
#[derive(Tabled, Serialize)]
struct HostRow {
    id: i64,
    name: String,
    owner: String,
    ips: String,
    notes: String,
}

pub fn run(config: &NetinvConfig, command: HostCommand, json_output: bool) -> Result<()> {
    let db = open_db(config)?;

    match command {
        HostCommand::Add(args) => {
            let id = db.hosts().add(&args.name, &args.owner, &args.notes)?;
            if json_output {
                println!(
                    "{}",
                    serde_json::json!({"id": id, "name": args.name, "owner": args.owner})
                );
            } else {
                println!("added host '{}' with id {}", args.name, id);
            }
        }
        HostCommand::List(args) => {
            let hosts = match &args.query {
                Some(query) => db.hosts().search_by_name(query)?,
                None => db.hosts().list()?,
            };

            let mut rows = Vec::with_capacity(hosts.len());
            for host in hosts {
                let ips = db
                    .ips()
                    .list_for_host(host.id)?
                    .iter()
                    .map(|a| a.ip.clone())
                    .collect::<Vec<_>>()
                    .join(", ");
                rows.push(HostRow {
                    id: host.id,
                    name: host.name,
                    owner: host.owner,
                    ips,
                    notes: host.notes,
                });
            }
            print_records(&rows, json_output, args.pretty)?;
        }
    }

    Ok(())
}
