//! Config subcommand implementations.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use halo_core::ServiceUrl;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::settings;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Print the effective configuration
    Show,

    /// Store the service root URL
    SetUrl(SetUrlArgs),

    /// Store a header sent with every request
    SetHeader(SetHeaderArgs),
}

#[derive(Args, Debug)]
pub struct SetUrlArgs {
    /// Service root URL (e.g., http://localhost:5000/v1)
    pub url: String,
}

#[derive(Args, Debug)]
pub struct SetHeaderArgs {
    /// Header name
    pub name: String,

    /// Header value; omit to remove the header
    pub value: Option<String>,
}

pub fn handle(cmd: ConfigCommand, connection: &ConnectionArgs) -> Result<()> {
    match cmd.command {
        ConfigSubcommand::Show => show(connection),
        ConfigSubcommand::SetUrl(args) => set_url(args),
        ConfigSubcommand::SetHeader(args) => set_header(args),
    }
}

fn show(connection: &ConnectionArgs) -> Result<()> {
    output::json_pretty(&settings::effective(connection)?)
}

fn set_url(args: SetUrlArgs) -> Result<()> {
    let url = ServiceUrl::new(&args.url).context("Invalid service URL")?;

    let mut stored = settings::load()?;
    stored.url = Some(url.to_string());
    let path = settings::save(&stored)?;

    output::success(&format!("Service URL set to {} ({})", url, path.display()));
    Ok(())
}

fn set_header(args: SetHeaderArgs) -> Result<()> {
    let mut stored = settings::load()?;
    let message = match args.value {
        Some(value) => {
            stored.http.headers.insert(args.name.clone(), value);
            format!("Header {} set", args.name)
        }
        None => {
            stored.http.headers.remove(&args.name);
            format!("Header {} removed", args.name)
        }
    };
    settings::save(&stored)?;

    output::success(&message);
    Ok(())
}
