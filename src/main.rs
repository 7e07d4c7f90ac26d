use std::path::PathBuf;
use std::process::ExitCode;

use agentlint::AgentRegistry;
use agentlint::LintConfig;
use agentlint::cli;
use agentlint::config::ColorMode;
use agentlint::config::OutputFormat;
use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "agentlint")]
#[command(about = "Validate the structure of every agent in an agent registry")]
#[command(version)]
struct Cli {
    /// Registry root containing one directory per agent (defaults to `agents`
    /// next to the installed binary)
    agents_dir: Option<PathBuf>,

    /// Configuration file path (defaults to `agentlint.yaml` in the registry root)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// When to use colors
    #[arg(long, value_enum)]
    color: Option<ColorMode>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("agentlint={log_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> Result<u8> {
    let agents_dir = args
        .agents_dir
        .unwrap_or_else(AgentRegistry::find_default_agents_dir);
    let registry = AgentRegistry::open(agents_dir)?;

    let mut config = LintConfig::load(args.config.as_deref(), registry.root())?;
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(color) = args.color {
        config.output.color = color;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::validate_agents(&registry, &config, cli::use_color(config.output.color), &mut out)
}
