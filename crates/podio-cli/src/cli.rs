use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "podio")]
#[command(about = "Manage Podio spaces, apps and fields declaratively")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Provider configuration file (defaults to ./podio.toml)
    #[arg(short, long, global = true, env = "PODIO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "PODIO_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum SchemaFormat {
    #[default]
    Json,
    Markdown,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the declared schema of the provider and its entity types
    Schema(SchemaArgs),
    /// Validate a desired-state file without contacting Podio
    Validate(ValidateArgs),
    /// Create a remote object and write its tracked state
    Create(ApplyArgs),
    /// Refresh tracked state from Podio
    Read(StateArgs),
    /// Update a remote object in place
    Update(ApplyArgs),
    /// Delete a remote object and remove its tracked state
    Delete(StateArgs),
    /// Adopt an existing remote object by identifier
    Import(ImportArgs),
    /// Resolve a data source (e.g. podio_organization)
    Lookup(LookupArgs),
}

#[derive(clap::Args)]
pub struct SchemaArgs {
    /// Only print this entity type
    #[arg(long)]
    pub entity: Option<String>,
    /// Output format
    #[arg(long, default_value = "json")]
    pub format: SchemaFormat,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Entity type (e.g. podio_space)
    pub entity: String,
    /// Path to a JSON desired-state file
    pub file: PathBuf,
}

#[derive(clap::Args)]
pub struct ApplyArgs {
    /// Entity type (e.g. podio_space)
    pub entity: String,
    /// Path to a JSON desired-state file
    #[arg(long)]
    pub desired: PathBuf,
    /// Path to the tracked-state file
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(clap::Args)]
pub struct StateArgs {
    /// Entity type (e.g. podio_space)
    pub entity: String,
    /// Path to the tracked-state file
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(clap::Args)]
pub struct ImportArgs {
    /// Entity type (e.g. podio_space)
    pub entity: String,
    /// Remote identifier (e.g. 123, or 31/400 for app fields)
    pub id: String,
    /// Path to write the tracked-state file
    #[arg(long)]
    pub state: PathBuf,
}

#[derive(clap::Args)]
pub struct LookupArgs {
    /// Data source type (e.g. podio_organization)
    pub data_source: String,
    /// Path to a JSON lookup file
    pub file: PathBuf,
}
