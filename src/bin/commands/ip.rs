use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};
use netinv::database::{InventoryDatabase, IpAssignmentRecord};
use netinv::{FieldKind, NetinvConfig, NetworkFilter};
use serde::Serialize;
use tabled::Tabled;

use super::{open_db, print_records};

#[derive(Subcommand)]
pub enum IpCommand {
    /// Assign an IP address to a host
    Add(IpAddArgs),
    /// List assignments, optionally narrowed to a network
    List(IpListArgs),
}

#[derive(Args)]
pub struct IpAddArgs {
    /// Host name the address belongs to
    pub host: String,

    /// IP address (IPv4 or IPv6)
    pub ip: String,

    /// Fully qualified domain name
    #[clap(short, long, default_value = "")]
    pub fqdn: String,

    /// Do not generate DNS records for this assignment
    #[clap(long)]
    pub no_auto_dns: bool,
}

#[derive(Args)]
pub struct IpListArgs {
    /// Only show assignments inside this network (CIDR or bare address)
    ///
    /// This narrows the scan in memory; text columns cannot answer CIDR
    /// range predicates at the storage level.
    #[clap(short, long)]
    pub network: Option<String>,

    /// Only show assignments of this host
    #[clap(long)]
    pub host: Option<String>,

    /// Exact address to look up
    #[clap(short, long)]
    pub exact: Option<String>,

    /// Include reverse DNS names (IPv4 only, dash otherwise)
    #[clap(short, long)]
    pub reverse: bool,

    /// Output to pretty table, default markdown table
    #[clap(short, long)]
    pub pretty: bool,
}

#[derive(Tabled, Serialize)]
struct IpRow {
    id: i64,
    host: String,
    ip: String,
    fqdn: String,
    auto_dns: bool,
}

#[derive(Tabled, Serialize)]
struct IpReverseRow {
    id: i64,
    host: String,
    ip: String,
    reverse: String,
    fqdn: String,
    auto_dns: bool,
}

pub fn run(config: &NetinvConfig, command: IpCommand, json_output: bool) -> Result<()> {
    let db = open_db(config)?;

    match command {
        IpCommand::Add(args) => {
            let host = db
                .hosts()
                .get_by_name(&args.host)?
                .ok_or_else(|| anyhow!("no host named '{}'", args.host))?;
            let id = db
                .ips()
                .add(host.id, &args.ip, &args.fqdn, !args.no_auto_dns)?;
            if json_output {
                println!(
                    "{}",
                    serde_json::json!({"id": id, "host": args.host, "ip": args.ip})
                );
            } else {
                println!("assigned {} to host '{}' (id {})", args.ip, args.host, id);
            }
        }
        IpCommand::List(args) => {
            let records = fetch(&db, &args)?;
            if args.reverse {
                let rows: Vec<_> = records.into_iter().map(to_reverse_row).collect();
                print_records(&rows, json_output, args.pretty)?;
            } else {
                let rows: Vec<_> = records
                    .into_iter()
                    .map(|a| IpRow {
                        id: a.id,
                        host: a.host,
                        ip: a.ip,
                        fqdn: a.fqdn,
                        auto_dns: a.auto_dns,
                    })
                    .collect();
                print_records(&rows, json_output, args.pretty)?;
            }
        }
    }

    Ok(())
}

fn fetch(db: &InventoryDatabase, args: &IpListArgs) -> Result<Vec<IpAssignmentRecord>> {
    if let Some(exact) = &args.exact {
        return db.ips().find_exact(exact);
    }
    let mut records = match &args.host {
        Some(name) => {
            let host = db
                .hosts()
                .get_by_name(name)?
                .ok_or_else(|| anyhow!("no host named '{}'", name))?;
            db.ips().list_for_host(host.id)?
        }
        None => db.ips().scan()?,
    };
    if let Some(network) = &args.network {
        let filter = NetworkFilter::parse("ip", FieldKind::Address, network)
            .map_err(|e| anyhow!("invalid network filter: {}", e))?;
        records = filter.apply(records).collect();
    }
    Ok(records)
}

fn to_reverse_row(a: IpAssignmentRecord) -> IpReverseRow {
    let reverse = a.reverse_dns_display();
    IpReverseRow {
        id: a.id,
        host: a.host,
        ip: a.ip,
        reverse,
        fqdn: a.fqdn,
        auto_dns: a.auto_dns,
    }
}
