use crate::StackArgs;
use colored::Colorize;

pub async fn handle(args: &StackArgs) -> anyhow::Result<()> {
    let (run, backend) = super::preview::stack_run(args).await?;
    let (plan, result) = backend.apply(&run).await?;

    println!();
    super::print_plan(&plan);

    if !result.is_success() {
        anyhow::bail!("Apply failed for stack {}", run.stack);
    }

    println!();
    println!(
        "{} Stack {} recorded ({}ms)",
        "✓".green().bold(),
        run.stack.cyan(),
        result.duration_ms
    );
    println!();
    super::print_outputs(&run.outputs);
    Ok(())
}
