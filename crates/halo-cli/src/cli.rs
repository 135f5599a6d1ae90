//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::{config, copy, create, delete, get, list, resources, update};

/// Explore and edit a hypermedia REST service from the command line.
#[derive(Parser, Debug)]
#[command(name = "halo")]
#[command(author, version = env!("HALO_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overrides for the stored configuration.
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// Service root URL
    #[arg(long, env = "HALO_URL", global = true)]
    pub url: Option<String>,

    /// Extra header sent with every request (repeatable)
    #[arg(long = "header", value_name = "NAME=VALUE", value_parser = parse_key_value, global = true)]
    pub headers: Vec<(String, String)>,

    /// Allow cached responses instead of sending Cache-Control: no-cache
    #[arg(long, global = true)]
    pub cache: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the resources the service advertises
    Resources(resources::ResourcesArgs),

    /// List the items of a resource
    List(list::ListArgs),

    /// Fetch a single item
    Get(get::GetArgs),

    /// Create a new item
    Create(create::CreateArgs),

    /// Apply fields to an existing item
    Update(update::UpdateArgs),

    /// Delete an item
    Delete(delete::DeleteArgs),

    /// Copy an item into another resource
    Copy(copy::CopyArgs),

    /// Show or change the stored configuration
    Config(config::ConfigCommand),
}

/// Parse a `NAME=VALUE` pair.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
