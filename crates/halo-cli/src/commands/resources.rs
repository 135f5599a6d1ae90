//! Resources command implementation.

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::settings;

#[derive(Args, Debug)]
pub struct ResourcesArgs {
    /// Print resources as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ResourcesArgs, connection: &ConnectionArgs) -> Result<()> {
    let catalog = settings::effective(connection)?.connect()?;

    if args.json {
        let resources: Vec<_> = catalog
            .resources()
            .iter()
            .map(|r| json!({"name": r.name(), "url": r.url()}))
            .collect();
        return output::json_pretty(&resources);
    }

    if catalog.is_empty() {
        output::note("The service advertises no resources.");
        return Ok(());
    }

    for resource in catalog.resources() {
        output::field(resource.name(), resource.url());
    }

    Ok(())
}
