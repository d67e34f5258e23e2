use anyhow::Result;
use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use podio_provider::{EntitySchema, ProviderError, Record, Requirement};

pub fn print_record(record: &Record) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(record)?);
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// `<category>: <detail>` for provider errors, the full chain otherwise.
pub fn describe_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<ProviderError>() {
        Some(provider_err) => format!("{}: {provider_err}", provider_err.category()),
        None => format!("{err:#}"),
    }
}

pub fn print_schema_table(schema: &EntitySchema) {
    println!("{} {}", schema.type_name.cyan(), format!("({})", schema.kind).dimmed());

    let mut builder = Builder::default();
    builder.push_record(["Attribute", "Type", "Class", "Flags", "Description"]);
    for attr in &schema.attributes {
        let class = match attr.requirement {
            Requirement::Required => "required",
            Requirement::Optional => "optional",
            Requirement::Computed => "computed",
            Requirement::OptionalComputed => "optional, computed",
        };
        let mut flags = Vec::new();
        if attr.force_new {
            flags.push("force-new");
        }
        if attr.local {
            flags.push("local");
        }
        if attr.sensitive {
            flags.push("sensitive");
        }
        builder.push_record([
            attr.name.to_string(),
            attr.attr_type.to_string(),
            class.to_string(),
            flags.join(", "),
            attr.description.to_string(),
        ]);
    }
    println!("{}", builder.build().with(Style::rounded()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_provider_error_has_category() {
        let err = anyhow::Error::new(ProviderError::not_found("podio_space", "7"));
        assert_eq!(
            describe_error(&err),
            "not_found: Remote object not found: podio_space/7"
        );
    }

    #[test]
    fn test_describe_other_error_keeps_context() {
        let err = anyhow::anyhow!("disk full").context("Failed to write state file");
        assert_eq!(describe_error(&err), "Failed to write state file: disk full");
    }
}
