pub mod defaults;
pub mod describe;
pub mod outputs;
pub mod preview;
pub mod up;
pub mod validate;

use crate::ManifestArgs;
use colored::Colorize;
use planton_apis::{Manifest, resolve_manifest};
use planton_iac::{ActionType, Output, Plan};
use std::collections::BTreeMap;

/// Load a manifest, apply `--set` overrides and fill schema defaults
pub(crate) async fn load_with_defaults(args: &ManifestArgs) -> anyhow::Result<Manifest> {
    let mut manifest = resolve_manifest(&args.manifest, &args.overrides).await?;
    manifest.apply_defaults()?;
    Ok(manifest)
}

pub(crate) fn print_plan(plan: &Plan) {
    if !plan.has_changes {
        println!("{}", "No changes.".green());
        return;
    }

    for action in &plan.actions {
        let line = format!(
            "  {} {} ({})",
            action.action_type.symbol(),
            action.resource_name,
            action.resource_type
        );
        match action.action_type {
            ActionType::Create => println!("{}", line.green()),
            ActionType::Update => {
                println!("{}", line.yellow());
                if let Some(changed) = action.details.get("changed").and_then(|v| v.as_array()) {
                    let keys: Vec<&str> = changed.iter().filter_map(|k| k.as_str()).collect();
                    println!("      {}", keys.join(", ").dimmed());
                }
            }
            ActionType::Delete => println!("{}", line.red()),
            ActionType::NoOp => println!("{}", line.dimmed()),
        }
    }
    println!();
    println!("{}", plan.summary().to_string().bold());
}

pub(crate) fn print_outputs(outputs: &BTreeMap<String, Output>) {
    if outputs.is_empty() {
        println!("{}", "No outputs.".dimmed());
        return;
    }

    let width = outputs.keys().map(String::len).max().unwrap_or(0).max(4);
    println!("{}", format!("{:<width$}  VALUE", "NAME").bold());
    println!("{}", "─".repeat(width + 40).dimmed());
    for (name, value) in outputs {
        println!("{}  {}", format!("{:<width$}", name).cyan(), value);
    }
}
