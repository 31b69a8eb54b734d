use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use inflight_sdk::NamingKind;

#[derive(Parser)]
#[command(
    name = "inflight",
    about = "Write payloads to object storage and read them back",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Root directory of the object store
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[arg(long, global = true)]
    pub container: Option<String>,

    /// Namespace path objects are grouped under
    #[arg(long, global = true)]
    pub path: Option<String>,

    /// content-hash or random
    #[arg(long, global = true)]
    pub naming: Option<NamingKind>,

    #[arg(long, global = true, default_value = "json")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a file (or stdin) and print its reference
    Put(PutArgs),
    /// Fetch an object by name
    Get(GetArgs),
    /// Show the storage location of an object name
    Key(KeyArgs),
}

#[derive(Args)]
pub struct PutArgs {
    /// File to store; stdin when omitted
    pub file: Option<PathBuf>,
}

#[derive(Args)]
pub struct GetArgs {
    pub name: String,
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct KeyArgs {
    pub name: String,
}
