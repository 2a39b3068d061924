use anyhow::Result;
use clap::{Args, Subcommand};
use netinv::database::SubnetRecord;
use netinv::NetinvConfig;

use super::{open_db, print_records};

#[derive(Subcommand)]
pub enum SubnetCommand {
    /// Add a managed subnet
    Add(SubnetAddArgs),
    /// List subnets with their derived address ranges
    List(SubnetListArgs),
}

#[derive(Args)]
pub struct SubnetAddArgs {
    /// Network in CIDR notation, e.g. 10.0.0.0/24 or 2001:db8::/32
    pub network: String,

    /// Owner of the subnet
    #[clap(short, long, default_value = "")]
    pub owner: String,

    /// Free-form notes
    #[clap(short, long, default_value = "")]
    pub notes: String,
}

#[derive(Args)]
pub struct SubnetListArgs {
    /// Only show subnets lying entirely inside this network
    #[clap(short = 'N', long)]
    pub within: Option<String>,

    /// Output to pretty table, default markdown table
    #[clap(short, long)]
    pub pretty: bool,
}

pub fn run(config: &NetinvConfig, command: SubnetCommand, json_output: bool) -> Result<()> {
    let db = open_db(config)?;

    match command {
        SubnetCommand::Add(args) => {
            let id = db.subnets().add(&args.owner, &args.network, &args.notes)?;
            if json_output {
                println!(
                    "{}",
                    serde_json::json!({"id": id, "network": args.network})
                );
            } else {
                println!("added subnet {} with id {}", args.network, id);
            }
        }
        SubnetCommand::List(args) => {
            let records = match &args.within {
                Some(target) => db.subnets().in_network(target)?,
                None => db.subnets().list()?,
            };
            let rows: Vec<_> = records.iter().map(SubnetRecord::summarize).collect();
            print_records(&rows, json_output, args.pretty)?;
        }
    }

    Ok(())
}
