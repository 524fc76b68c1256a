use crate::ManifestArgs;

/// Print the manifest as YAML after defaults are applied
pub async fn handle(args: &ManifestArgs) -> anyhow::Result<()> {
    let manifest = super::load_with_defaults(args).await?;
    print!("{}", manifest.to_yaml()?);
    Ok(())
}
