use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use podio_provider::{DeleteOutcome, Provider};

use crate::output::{print_record, print_success, print_warning};
use crate::state::{read_record, remove_record, write_record};

pub async fn create(provider: &Provider, entity: &str, desired: &Path, state: &Path) -> Result<()> {
    if state.exists() {
        anyhow::bail!(
            "State file {} already exists; use `update` or `read` instead",
            state.display()
        );
    }
    let controller = provider.resolve(entity)?;
    let desired = read_record(desired)?;

    let tracked = controller.create(&desired).await?;
    write_record(state, &tracked)?;
    print_success(&format!("Created {}", entity.cyan()));
    print_record(&tracked)
}

pub async fn read(provider: &Provider, entity: &str, state: &Path) -> Result<()> {
    let controller = provider.resolve(entity)?;
    let tracked = read_record(state)?;

    match controller.read(&tracked).await {
        Ok(refreshed) => {
            write_record(state, &refreshed)?;
            print_record(&refreshed)
        }
        Err(err) if err.is_not_found() => {
            remove_record(state)?;
            print_warning(&format!(
                "{err}; removed {} from tracking",
                state.display()
            ));
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn update(provider: &Provider, entity: &str, desired: &Path, state: &Path) -> Result<()> {
    let controller = provider.resolve(entity)?;
    let desired = read_record(desired)?;
    let prior = read_record(state)?;

    let tracked = controller.update(&desired, &prior).await?;
    write_record(state, &tracked)?;
    print_success(&format!("Updated {}", entity.cyan()));
    print_record(&tracked)
}

pub async fn delete(provider: &Provider, entity: &str, state: &Path) -> Result<()> {
    let controller = provider.resolve(entity)?;
    let tracked = read_record(state)?;

    let outcome = controller.delete(&tracked).await?;
    remove_record(state)?;
    match outcome {
        DeleteOutcome::Deleted => print_success(&format!("Deleted {}", entity.cyan())),
        DeleteOutcome::AlreadyAbsent => {
            print_success(&format!("{} was already gone", entity.cyan()));
        }
        DeleteOutcome::Tolerated { message } => {
            print_warning(&format!("Delete failure ignored: {message}"));
        }
    }
    Ok(())
}

pub async fn import(provider: &Provider, entity: &str, id: &str, state: &Path) -> Result<()> {
    let controller = provider.resolve(entity)?;

    let tracked = controller.import(id).await?;
    write_record(state, &tracked)?;
    print_success(&format!("Imported {} {}", entity.cyan(), id.cyan()));
    print_record(&tracked)
}

pub async fn lookup(provider: &Provider, data_source: &str, file: &Path) -> Result<()> {
    let source = provider.resolve_data_source(data_source)?;
    let config = read_record(file)?;

    let found = source.lookup(&config).await?;
    print_record(&found)
}
