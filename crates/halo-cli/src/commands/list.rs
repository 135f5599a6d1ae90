//! List items command implementation.

use anyhow::{Context, Result};
use clap::Args;

use halo_core::QueryOptions;

use crate::cli::{ConnectionArgs, parse_key_value};
use crate::output;
use crate::settings;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Resource name as advertised by the service
    pub resource: String,

    /// Filter expression, sent as the `where` query parameter
    #[arg(long = "where", value_name = "EXPR")]
    pub filter: Option<String>,

    /// Additional query parameter for the first request (repeatable)
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Stop after this many pages
    #[arg(long)]
    pub max_pages: Option<usize>,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

pub fn run(args: ListArgs, connection: &ConnectionArgs) -> Result<()> {
    let catalog = settings::effective(connection)?.connect()?;
    let mut resource = catalog.resource(&args.resource)?.clone();
    if let Some(max_pages) = args.max_pages {
        resource = resource.with_options(QueryOptions::default().max_pages(max_pages));
    }

    let mut params = args.params;
    if let Some(filter) = args.filter {
        params.insert(0, ("where".to_string(), filter));
    }

    let items = resource
        .find(params)
        .with_context(|| format!("Failed to list {}", resource.name()))?;

    if items.is_empty() {
        output::note("No items found.");
        return Ok(());
    }

    for item in &items {
        if args.pretty {
            output::json_pretty(&item.to_document())?;
        } else {
            output::json(&item.to_document())?;
        }
    }

    tracing::info!(count = items.len(), "Listed items");
    Ok(())
}
