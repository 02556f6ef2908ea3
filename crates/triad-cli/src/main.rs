mod cmd;
mod output;
mod root;
mod tools;

use clap::{Parser, Subcommand};
use cmd::{feature::FeatureSubcommand, phase::PhaseSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "triad",
    about = "Define, design, deliver: track the active feature and phase for AI-assisted work",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .triad/ or .git/)
    #[arg(long, global = true, env = "TRIAD_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize triad in the current project
    Init {
        /// Remove all features and session state and start over
        #[arg(long)]
        clean: bool,
    },

    /// Create, enter, exit and list features
    Feature {
        #[command(subcommand)]
        subcommand: FeatureSubcommand,
    },

    /// Move the active feature between phases
    Phase {
        #[command(subcommand)]
        subcommand: PhaseSubcommand,
    },

    /// Show the active feature and phase
    Status,

    /// Convert a session record written by an older release
    Migrate,

    /// Run as an MCP stdio server
    Mcp,
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Mcp => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init { clean } => cmd::init::run(&root, clean, cli.json),
        Commands::Feature { subcommand } => cmd::feature::run(&root, subcommand, cli.json),
        Commands::Phase { subcommand } => cmd::phase::run(&root, subcommand, cli.json),
        Commands::Status => cmd::status::run(&root, cli.json),
        Commands::Migrate => cmd::migrate::run(&root, cli.json),
        Commands::Mcp => cmd::mcp::run(&root),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
