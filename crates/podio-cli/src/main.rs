mod cli;
mod commands;
mod output;
mod state;

use anyhow::{Context, Result};
use clap::Parser;

use cli::{Cli, Commands};
use output::{describe_error, print_error};
use podio_provider::Provider;
use podio_provider::observability::init_tracing_with_level;

#[tokio::main]
async fn main() {
    // .env is optional
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    if let Err(e) = run().await {
        print_error(&describe_error(&e));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(&cli.log_level);

    match &cli.command {
        Commands::Schema(args) => {
            commands::schema::schema(args.entity.as_deref(), args.format)?;
        }
        Commands::Validate(args) => {
            commands::schema::validate(&args.entity, &args.file)?;
        }
        Commands::Create(args) => {
            let provider = configure(&cli).await?;
            commands::lifecycle::create(&provider, &args.entity, &args.desired, &args.state)
                .await?;
        }
        Commands::Read(args) => {
            let provider = configure(&cli).await?;
            commands::lifecycle::read(&provider, &args.entity, &args.state).await?;
        }
        Commands::Update(args) => {
            let provider = configure(&cli).await?;
            commands::lifecycle::update(&provider, &args.entity, &args.desired, &args.state)
                .await?;
        }
        Commands::Delete(args) => {
            let provider = configure(&cli).await?;
            commands::lifecycle::delete(&provider, &args.entity, &args.state).await?;
        }
        Commands::Import(args) => {
            let provider = configure(&cli).await?;
            commands::lifecycle::import(&provider, &args.entity, &args.id, &args.state).await?;
        }
        Commands::Lookup(args) => {
            let provider = configure(&cli).await?;
            commands::lifecycle::lookup(&provider, &args.data_source, &args.file).await?;
        }
    }

    Ok(())
}

async fn configure(cli: &Cli) -> Result<Provider> {
    let config = podio_config::load_config(cli.config.as_deref())
        .context("Failed to load provider configuration")?;
    let provider = Provider::configure(&config).await?;
    tracing::debug!(
        backend = provider.backend_name(),
        resources = provider.resource_types().count(),
        "Provider ready"
    );
    Ok(provider)
}
