use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ktspec_core::Config;

mod commands;
mod logging;
mod tui;

#[derive(Parser)]
#[command(name = "ktspec")]
#[command(about = "Browse, mark and run Kotest specs", long_about = None)]
struct Cli {
    /// Configuration file, instead of ./ktspec.toml or the user config
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the specs and tests declared in a file
    Tests {
        file: PathBuf,
        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },
    /// Show the innermost test at a position
    At {
        file: PathBuf,
        /// 1-based line
        line: u32,
        /// 1-based column
        #[arg(long, default_value_t = 1)]
        column: u32,
    },
    /// List the gutter run markers of a file
    Markers {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the run request for the spec or test at a line
    Run {
        file: PathBuf,
        line: u32,
        /// run, debug or coverage
        #[arg(long, default_value = "run")]
        mode: String,
    },
    /// Print the source of a new test in the given style
    Stub {
        /// Style name, e.g. "fun" or "FeatureSpec"
        style: String,
        /// Test name
        name: String,
        /// Name of the enclosing spec class
        #[arg(long, default_value = "MySpec")]
        spec: String,
    },
    /// List the registered spec styles
    Styles,
    /// Index a project and list its specs per module
    Scan {
        dir: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// Open the interactive test explorer
    Explore {
        dir: Option<PathBuf>,
        /// Files to open; defaults to every file holding a spec
        files: Vec<PathBuf>,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let root = match &cli.command {
        Commands::Scan { dir, .. } | Commands::Explore { dir, .. } => {
            dir.clone().unwrap_or_else(|| PathBuf::from("."))
        }
        _ => PathBuf::from("."),
    };
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load_from(&root)?,
    };

    let interactive = matches!(cli.command, Commands::Explore { .. });
    logging::initialize(&config.logging, interactive)?;

    match cli.command {
        Commands::Tests { file, json } => commands::tests(&config, &file, json),
        Commands::At { file, line, column } => commands::at(&config, &file, line, column),
        Commands::Markers { file, json } => commands::markers(&config, &file, json),
        Commands::Run { file, line, mode } => commands::run(&config, &file, line, &mode),
        Commands::Stub { style, name, spec } => commands::stub(&config, &style, &name, &spec),
        Commands::Styles => commands::styles(&config),
        Commands::Scan { json, .. } => commands::scan(&config, &root, json),
        Commands::Explore { files, .. } => commands::explore(config, &root, files).await,
        Commands::Config => {
            print!("{}", config.to_toml());
            Ok(())
        }
    }
}
