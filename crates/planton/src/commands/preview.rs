use crate::{StackArgs, modules};
use colored::Colorize;
use planton_config::CliConfig;
use planton_iac::{LocalBackend, PreviewEngine, StackContext, StackRun};

/// Run the manifest's module against the preview engine
pub(crate) async fn stack_run(args: &StackArgs) -> anyhow::Result<(StackRun, LocalBackend)> {
    let config = CliConfig::load()?;
    let manifest = super::load_with_defaults(&args.manifest).await?;
    let stack = config.stack(args.stack.as_deref()).to_string();
    let project = manifest.kind().to_string().to_lowercase();

    println!(
        "{} {} {} → stack {}",
        "Stack".blue(),
        manifest.kind().to_string().bold(),
        manifest.name().cyan(),
        stack.cyan()
    );

    let engine = PreviewEngine::new();
    let mut ctx = StackContext::new(&engine, project, stack);
    modules::provision(&mut ctx, manifest, args).await?;
    let run = ctx.finish();

    let backend = LocalBackend::new(config.backend_dir(&std::env::current_dir()?));
    Ok((run, backend))
}

pub async fn handle(args: &StackArgs) -> anyhow::Result<()> {
    let (run, backend) = stack_run(args).await?;
    let plan = backend.plan(&run).await?;

    println!();
    super::print_plan(&plan);
    Ok(())
}
