use crate::ManifestArgs;
use colored::Colorize;

pub async fn handle(args: &ManifestArgs) -> anyhow::Result<()> {
    println!("{}", "Validating manifest...".blue());

    let manifest = super::load_with_defaults(args).await?;

    println!(
        "{} {} {} is valid",
        "✓".green().bold(),
        manifest.kind().to_string().bold(),
        manifest.name().cyan()
    );
    if let Some(provider) = manifest.kind().provider() {
        println!("  provider: {}", provider);
    }
    Ok(())
}
