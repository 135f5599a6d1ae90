//! Create item command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::settings;

use super::read_fields;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Resource name
    pub resource: String,

    /// JSON object with the item fields (use - for stdin)
    #[arg(long)]
    pub json: Option<String>,
}

pub fn run(args: CreateArgs, connection: &ConnectionArgs) -> Result<()> {
    let fields = read_fields(args.json.as_deref())?;

    let catalog = settings::effective(connection)?.connect()?;
    let mut item = catalog.resource(&args.resource)?.new_item();
    item.update(fields, None, None);
    item.save()
        .with_context(|| format!("Failed to create item in {}", args.resource))?;

    if let Some(id) = item.id() {
        println!("{}", id);
    }
    output::success(&format!("Created {}", item));

    Ok(())
}
