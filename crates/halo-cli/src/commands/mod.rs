//! Subcommand implementations.

pub mod config;
pub mod copy;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod resources;
pub mod update;

use std::io::{self, Read};

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};

use crate::cli::{Commands, ConnectionArgs};

pub fn handle(command: Commands, connection: &ConnectionArgs) -> Result<()> {
    match command {
        Commands::Resources(args) => resources::run(args, connection),
        Commands::List(args) => list::run(args, connection),
        Commands::Get(args) => get::run(args, connection),
        Commands::Create(args) => create::run(args, connection),
        Commands::Update(args) => update::run(args, connection),
        Commands::Delete(args) => delete::run(args, connection),
        Commands::Copy(args) => copy::run(args, connection),
        Commands::Config(cmd) => config::handle(cmd, connection),
    }
}

/// Read a JSON object from a file, or from stdin when `path` is `-`.
/// No path means an empty object.
fn read_fields(path: Option<&str>) -> Result<Map<String, Value>> {
    let value: Value = match path {
        Some("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            serde_json::from_str(&buf).context("Invalid JSON from stdin")?
        }
        Some(path) => {
            let content = std::fs::read_to_string(path).context("Failed to read JSON file")?;
            serde_json::from_str(&content).context("Invalid JSON in file")?
        }
        None => return Ok(Map::new()),
    };

    match value {
        Value::Object(map) => Ok(map),
        other => bail!("Expected a JSON object, got {other}"),
    }
}
