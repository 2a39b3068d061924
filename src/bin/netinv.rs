use clap::{Parser, Subcommand};
use netinv::NetinvConfig;
use tracing::Level;

mod commands;

use commands::{host, ip, subnet};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.netinv/netinv.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output as JSON instead of tables
    #[clap(long)]
    json: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tracked hosts
    Host {
        #[clap(subcommand)]
        command: host::HostCommand,
    },
    /// Manage IP address assignments
    Ip {
        #[clap(subcommand)]
        command: ip::IpCommand,
    },
    /// Manage subnets
    Subnet {
        #[clap(subcommand)]
        command: subnet::SubnetCommand,
    },
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt().with_max_level(Level::DEBUG).init();
    }

    let config = match NetinvConfig::new(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Host { command } => host::run(&config, command, cli.json),
        Commands::Ip { command } => ip::run(&config, command, cli.json),
        Commands::Subnet { command } => subnet::run(&config, command, cli.json),
    };

    if let Err(e) = result {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
