use planton_config::CliConfig;
use planton_iac::LocalBackend;

pub async fn handle(stack: Option<&str>) -> anyhow::Result<()> {
    let config = CliConfig::load()?;
    let stack = config.stack(stack);
    let backend = LocalBackend::new(config.backend_dir(&std::env::current_dir()?));

    let outputs = backend.outputs(stack).await?;
    super::print_outputs(&outputs);
    Ok(())
}
