//! Update item command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::settings;

use super::read_fields;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Resource name
    pub resource: String,

    /// Item identifier
    pub id: String,

    /// JSON object with the fields to change (use - for stdin)
    #[arg(long)]
    pub json: Option<String>,
}

pub fn run(args: UpdateArgs, connection: &ConnectionArgs) -> Result<()> {
    let fields = read_fields(args.json.as_deref())?;

    let catalog = settings::effective(connection)?.connect()?;
    let mut item = catalog
        .resource(&args.resource)?
        .get(&args.id)
        .with_context(|| format!("Failed to get {} {}", args.resource, args.id))?;

    item.update(fields, None, None);
    item.save()
        .with_context(|| format!("Failed to update {}", item))?;

    if let Some(etag) = item.etag() {
        println!("{}", etag);
    }
    output::success(&format!("Updated {}", item));

    Ok(())
}
