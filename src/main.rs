//! Mindgraph CLI - knowledge-graph visualization from the command line.

use std::process;

use clap::Parser;
use mindgraph::cli::{CacheCommands, Cli, Commands};
use mindgraph::commands::{self, Output};
use mindgraph::config::Settings;
use tracing_subscriber::EnvFilter;

fn main() {
    // MG_LOG controls verbosity; defaults to warnings only
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("MG_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let human = cli.human_readable;

    match run_command(cli.command) {
        Ok(output) => {
            if human {
                println!("{}", output.human);
            } else {
                println!("{}", output.json);
            }
        }
        Err(e) => {
            if human {
                eprintln!("Error: {}", e);
            } else {
                eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
            }
            process::exit(1);
        }
    }
}

fn run_command(command: Commands) -> mindgraph::Result<Output> {
    let settings = Settings::load()?;

    match command {
        Commands::Generate {
            topic,
            offline,
            no_cache,
        } => commands::generate(&topic, offline, no_cache, &settings),
        Commands::Render {
            input,
            theme,
            layout,
            background,
            output,
        } => commands::render(
            &input,
            theme.as_deref(),
            layout.as_deref(),
            background.as_deref(),
            output.as_deref(),
            &settings,
        ),
        Commands::Bundle {
            input,
            topic,
            theme,
            layout,
            output,
        } => commands::bundle(
            &input,
            topic.as_deref(),
            theme.as_deref(),
            layout.as_deref(),
            output.as_deref(),
            &settings,
        ),
        Commands::Themes => Ok(commands::themes()),
        Commands::Layouts => Ok(commands::layouts()),
        Commands::Cache { command } => match command {
            CacheCommands::Path => commands::cache_path(),
            CacheCommands::Clear => commands::cache_clear(),
        },
    }
}
