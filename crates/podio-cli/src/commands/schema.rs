use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use podio_provider::{ProviderError, catalog, validate_desired};

use crate::cli::SchemaFormat;
use crate::output::{print_schema_table, print_success};
use crate::state::read_record;

pub fn schema(entity: Option<&str>, format: SchemaFormat) -> Result<()> {
    let catalog = catalog();

    let selected: Vec<_> = match entity {
        Some(name) => vec![
            catalog
                .get(name)
                .ok_or_else(|| ProviderError::unknown_entity_type(name))?,
        ],
        None => catalog.all().collect(),
    };

    match format {
        SchemaFormat::Json => {
            let json = match entity {
                Some(_) => serde_json::to_string_pretty(&selected[0])?,
                None => serde_json::to_string_pretty(&catalog)?,
            };
            println!("{json}");
        }
        SchemaFormat::Markdown => {
            let docs: Vec<String> = selected.iter().map(|s| s.to_markdown()).collect();
            println!("{}", docs.join("\n"));
        }
        SchemaFormat::Table => {
            for schema in selected {
                print_schema_table(schema);
            }
        }
    }
    Ok(())
}

pub fn validate(entity: &str, file: &Path) -> Result<()> {
    let desired = read_record(file)?;
    validate_desired(entity, &desired)?;
    print_success(&format!("{} is a valid {}", file.display(), entity.cyan()));
    Ok(())
}
