//! Command-line entry point for object-group access changes

use anyhow::{Context, Result};
use clap::Parser;
use netgrant_core::{plan_add, plan_purge, plan_remove, Store};
use netgrant_device::{DeviceGateway, SshGateway};
use std::path::PathBuf;
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "netgrant")]
#[command(about = "Push object-group access changes for a project to the firewall")]
struct Args {
    /// The project whose object group to modify
    project: String,

    /// The network to add to (or remove from) the project
    #[arg(long, short = 'n', conflicts_with = "purge")]
    network: Option<String>,

    /// Remove the network instead of adding it
    #[arg(long, short = 'r', requires = "network")]
    remove: bool,

    /// Remove all configured networks from the project
    #[arg(long, short = 'p')]
    purge: bool,

    /// Save the device configuration after applying the change
    #[arg(long, short = 's')]
    save: bool,

    /// Print the configuration batch instead of applying it
    #[arg(long)]
    dry_run: bool,

    /// Policy document path
    #[arg(long)]
    policy: Option<PathBuf>,

    /// Credentials document path
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let env_filter = if args.verbose {
        EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::DEBUG.into())
    } else {
        EnvFilter::from_default_env()
            .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let store =
        Store::load(args.policy, args.credentials).context("Failed to load configuration")?;

    // Plan the change
    let plan = if args.purge {
        plan_purge(&store, &args.project)
    } else if let Some(network) = &args.network {
        if args.remove {
            plan_remove(&store, &args.project, network)
        } else {
            plan_add(&store, &args.project, network)
        }
    } else {
        anyhow::bail!("Need a network (-n) or --purge to modify {}", args.project);
    };

    // The user-facing message stays generic; the reason is debug-level only
    let lines = match plan {
        Ok(lines) => lines,
        Err(e) => {
            tracing::debug!("Planning failed: {e}");
            anyhow::bail!("Unable to generate a valid configuration. Run with -v to troubleshoot.");
        }
    };

    if args.dry_run {
        for line in &lines {
            println!("{line}");
        }
        return Ok(());
    }

    // Apply the batch over the device session
    let gateway = SshGateway::new(store.credentials().clone());
    if let Err(e) = gateway.apply(&lines, args.save).await {
        tracing::debug!("Gateway failure: {e}");
        anyhow::bail!("Failed to apply the configuration to the device.");
    }

    println!(
        "Applied {} configuration lines for {}",
        lines.len(),
        args.project
    );
    Ok(())
}
