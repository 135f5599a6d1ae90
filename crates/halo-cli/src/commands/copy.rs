//! Copy item command implementation.

use anyhow::{Context, Result};
use clap::Args;

use halo_core::{CopyOptions, Item};

use crate::cli::ConnectionArgs;
use crate::output;
use crate::settings;

#[derive(Args, Debug)]
pub struct CopyArgs {
    /// Source resource name
    pub from: String,

    /// Identifier of the item to copy
    pub id: String,

    /// Target resource name
    pub to: String,

    /// Let the target assign a new identifier
    #[arg(long)]
    pub no_keep_id: bool,

    /// Do not carry the source's updated timestamp
    #[arg(long)]
    pub no_keep_updated: bool,

    /// Do not carry the source's created timestamp
    #[arg(long)]
    pub no_keep_created: bool,
}

impl CopyArgs {
    fn options(&self) -> CopyOptions {
        CopyOptions::default()
            .keep_id(!self.no_keep_id)
            .keep_updated(!self.no_keep_updated)
            .keep_created(!self.no_keep_created)
    }
}

pub fn run(args: CopyArgs, connection: &ConnectionArgs) -> Result<()> {
    let catalog = settings::effective(connection)?.connect()?;
    let source = catalog
        .resource(&args.from)?
        .get(&args.id)
        .with_context(|| format!("Failed to get {} {}", args.from, args.id))?;

    let target = catalog.resource(&args.to)?;
    let mut copy = Item::copy(target, &source, args.options());
    copy.save()
        .with_context(|| format!("Failed to copy {} into {}", source, args.to))?;

    if let Some(id) = copy.id() {
        println!("{}", id);
    }
    output::success(&format!("Copied {} to {}", source, copy));

    Ok(())
}
