mod commands;
mod modules;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use planton_apis::Override;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "planton")]
#[command(about = "Fill cloud resource manifests from their schema defaults and provision them", long_about = None)]
struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
pub struct ManifestArgs {
    /// Manifest file path or http(s) URL
    #[arg(short = 'f', long = "manifest", value_name = "PATH|URL")]
    pub manifest: String,

    /// Override a manifest value (`spec.region=nyc1`), repeatable
    #[arg(long = "set", value_name = "PATH=VALUE")]
    pub overrides: Vec<Override>,
}

#[derive(Args, Clone)]
pub struct StackArgs {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// Stack name (defaults to the config's defaultStack, then "dev")
    #[arg(short = 's', long = "stack", env = "PLANTON_STACK")]
    pub stack: Option<String>,

    /// DigitalOcean credential file
    #[arg(long = "digitalocean-credential", value_name = "FILE")]
    pub digitalocean_credential: Option<PathBuf>,

    /// AWS credential file
    #[arg(long = "aws-credential", value_name = "FILE")]
    pub aws_credential: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a manifest parses and its defaults apply
    Validate(ManifestArgs),
    /// Print a manifest with schema defaults filled in
    Defaults(ManifestArgs),
    /// List the schema defaults of a resource kind
    Describe {
        /// Resource kind (e.g. DigitalOceanVpc)
        kind: String,
    },
    /// Show the changes provisioning a manifest would make
    Preview(StackArgs),
    /// Provision a manifest and record the stack state
    Up(StackArgs),
    /// Show the outputs recorded for a stack
    Outputs {
        /// Stack name
        #[arg(short = 's', long = "stack", env = "PLANTON_STACK")]
        stack: Option<String>,
    },
    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::handle(&args).await,
        Commands::Defaults(args) => commands::defaults::handle(&args).await,
        Commands::Describe { kind } => commands::describe::handle(&kind),
        Commands::Preview(args) => commands::preview::handle(&args).await,
        Commands::Up(args) => commands::up::handle(&args).await,
        Commands::Outputs { stack } => commands::outputs::handle(stack.as_deref()).await,
        Commands::Version => {
            println!("planton {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
