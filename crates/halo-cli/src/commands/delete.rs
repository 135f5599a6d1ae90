//! Delete item command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ConnectionArgs;
use crate::output;
use crate::settings;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Resource name
    pub resource: String,

    /// Item identifier
    pub id: String,
}

pub fn run(args: DeleteArgs, connection: &ConnectionArgs) -> Result<()> {
    let catalog = settings::effective(connection)?.connect()?;
    let item = catalog
        .resource(&args.resource)?
        .get(&args.id)
        .with_context(|| format!("Failed to get {} {}", args.resource, args.id))?;

    item.delete()
        .with_context(|| format!("Failed to delete {}", item))?;

    output::success(&format!("Deleted {}", item));
    Ok(())
}
