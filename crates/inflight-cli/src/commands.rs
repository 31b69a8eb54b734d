use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use colored::Colorize;
use inflight_sdk::{object_key, Inflight, InflightConfig};
use tracing::info;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    match cli.command {
        Command::Put(args) => cmd_put(&config, args, &cli.format),
        Command::Get(args) => cmd_get(&config, args),
        Command::Key(args) => cmd_key(&config, args),
    }
}

/// Configuration file (if any) with command-line overrides applied on top.
fn resolve_config(cli: &Cli) -> anyhow::Result<InflightConfig> {
    let mut config = match &cli.config {
        Some(path) => InflightConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => InflightConfig::default(),
    };
    if let Some(root) = &cli.root {
        config.store_root = root.clone();
    }
    if let Some(container) = &cli.container {
        config.container = container.clone();
    }
    if let Some(path) = &cli.path {
        config.path = path.clone();
    }
    if let Some(naming) = cli.naming {
        config.naming = naming;
    }
    Ok(config)
}

fn cmd_put(config: &InflightConfig, args: PutArgs, format: &OutputFormat) -> anyhow::Result<()> {
    let data = read_input(args.file.as_ref())?;
    let inflight = Inflight::from_config(config)?;
    let reference = inflight.write(&data).context("write failed")?;
    info!(reference = %reference, len = data.len(), "stored");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reference)?),
        OutputFormat::Text => {
            println!("{} Stored {} bytes", "✓".green().bold(), data.len());
            println!("  Object: {}", reference.name().yellow());
            println!("  Location: {}", reference.to_string().cyan());
        }
    }
    Ok(())
}

fn cmd_get(config: &InflightConfig, args: GetArgs) -> anyhow::Result<()> {
    let inflight = Inflight::from_config(config)?;
    let data = inflight
        .read(&args.name)
        .with_context(|| format!("read of {} failed", args.name))?;

    match args.output {
        Some(path) => {
            fs::write(&path, &data).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("{} Wrote {} bytes to {}", "✓".green(), data.len(), path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn cmd_key(config: &InflightConfig, args: KeyArgs) -> anyhow::Result<()> {
    let key = object_key(&config.path, &args.name)?;
    println!("{}/{}", config.container, key.trim_start_matches('/'));
    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> anyhow::Result<Vec<u8>> {
    match file {
        Some(path) => fs::read(path).with_context(|| format!("reading {}", path.display())),
        None => {
            let mut data = Vec::new();
            io::stdin().lock().read_to_end(&mut data).context("reading stdin")?;
            Ok(data)
        }
    }
}
