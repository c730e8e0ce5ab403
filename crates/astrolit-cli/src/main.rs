//! Astrolit CLI - Citation classification and hypothesis tracking.

use astrolit_cli::commands;
use astrolit_cli::{Cli, Command, Config, Formatter};
use astrolit_store::SqliteStore;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn run(cli: Cli) -> astrolit_cli::Result<()> {
    // File, then environment, then flags
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.classifier.apply_env();
    if let Some(database) = cli.database {
        config.database = Some(database);
    }
    if let Some(mode) = cli.classifier {
        config.classifier.mode = mode.into();
    }
    if let Some(model) = cli.model {
        config.classifier.model = model;
    }

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Classify(args) => {
            let classifier = commands::build_classifier(&config.classifier)?;
            if args.persist {
                let mut store = open_store(&config)?;
                commands::execute_classify(args, &classifier, Some(&mut store), &formatter)?;
            } else {
                commands::execute_classify(args, &classifier, None, &formatter)?;
            }
        }
        Command::Reclassify(args) => {
            let classifier = commands::build_classifier(&config.classifier)?;
            let mut store = open_store(&config)?;
            commands::execute_reclassify(args, &classifier, &mut store, &formatter)?;
        }
        Command::Summary(args) => {
            let store = open_store(&config)?;
            commands::execute_summary(args, &store, &formatter)?;
        }
        Command::Citations(args) => {
            let mut store = open_store(&config)?;
            commands::execute_citations(args, &mut store, &formatter)?;
        }
        Command::Papers(args) => {
            let mut store = open_store(&config)?;
            commands::execute_papers(args, &mut store, &formatter)?;
        }
        Command::Hypothesis(args) => {
            let mut store = open_store(&config)?;
            commands::execute_hypothesis(args, &mut store, &formatter)?;
        }
        Command::Stats => {
            let store = open_store(&config)?;
            commands::execute_stats(&store, &formatter)?;
        }
    }

    Ok(())
}

fn open_store(config: &Config) -> astrolit_cli::Result<SqliteStore> {
    let path = config.database_path()?;
    debug!(path = %path.display(), "Opening database");
    Ok(SqliteStore::new(&path)?)
}
