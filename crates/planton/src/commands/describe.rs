use anyhow::Context;
use colored::Colorize;
use planton_apis::{CloudResourceKind, descriptor_for};
use planton_core::declared_defaults;

pub fn handle(kind: &str) -> anyhow::Result<()> {
    let kind: CloudResourceKind = kind.parse()?;
    let descriptor =
        descriptor_for(kind).with_context(|| format!("No schema for resource kind {}", kind))?;
    let defaults = declared_defaults(descriptor);

    println!("{} {}", kind.to_string().bold(), descriptor.full_name.dimmed());
    if let Some(api_version) = kind.api_version() {
        println!("apiVersion: {}", api_version);
    }
    println!();

    if defaults.is_empty() {
        println!("{}", "No schema defaults.".dimmed());
        return Ok(());
    }

    let width = defaults.iter().map(|d| d.path.len()).max().unwrap_or(0).max(4);
    println!(
        "{}",
        format!("{:<width$}  {:<8}  DEFAULT", "PATH", "KIND").bold()
    );
    println!("{}", "─".repeat(width + 30).dimmed());
    for default in &defaults {
        println!(
            "{}  {:<8}  {}",
            format!("{:<width$}", default.path).cyan(),
            default.kind,
            default.default
        );
    }
    Ok(())
}
