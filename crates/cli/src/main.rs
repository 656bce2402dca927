mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "zettelsite", version, about = "Publish a zettelkasten as a static site")]
struct Cli {
    /// Path to the config file (default: ~/.config/zettelsite/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate the site into the configured site folder
    Build(BuildArgs),

    /// Show what a build would write and delete, without touching anything
    Plan,

    /// Validate configuration and print resolved paths
    Doctor,
}

#[derive(Debug, Args)]
pub struct BuildArgs {
    /// Overwrite style.css with the built-in default
    #[arg(long)]
    pub refresh_css: bool,

    /// Delete leftover .html files without asking
    #[arg(long)]
    pub yes: bool,

    /// Keep leftover .html files without asking
    #[arg(long, conflicts_with = "yes")]
    pub keep: bool,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Build(args) => cmd::build::run(cli.config.as_deref(), args),
        Commands::Plan => cmd::plan::run(cli.config.as_deref()),
        Commands::Doctor => cmd::doctor::run(cli.config.as_deref()),
    }
}
