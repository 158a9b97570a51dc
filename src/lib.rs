pub mod cli;
pub mod config;
pub mod display;
pub mod engine;
pub mod extractor;
pub mod pattern;
pub mod replay;
pub mod session;

use anyhow::Context;
use std::io::Read;
use std::path::Path;
use tracing::{Level, info};

pub use cli::{ColorMode, Commands, OutputFormat, cli_parse};
pub use config::{FilterConfig, load_config};
pub use engine::{FilterInputs, RowDisplay, VisibilityDecision, apply_visibility, evaluate};
pub use extractor::{ColumnTextIndex, ExtractedTable, TableRow, extract_table};
pub use pattern::{CompiledPattern, FilterKind, Matcher};
pub use session::{FilterSession, SessionError};

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn write_output_file(path: &Path, content: &str) -> anyhow::Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write output file '{}'", path.display()))
}

fn emit(output: Option<&Path>, text: &str) -> anyhow::Result<()> {
    print!("{text}");
    if !text.ends_with('\n') {
        println!();
    }
    if let Some(path) = output {
        write_output_file(path, text)?;
    }
    Ok(())
}

fn read_events(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read events file '{}'", path.display())),
        _ => {
            let mut script = String::new();
            std::io::stdin()
                .read_to_string(&mut script)
                .context("Failed to read events from stdin")?;
            Ok(script)
        }
    }
}

fn open_session(file: &Path, config: &FilterConfig) -> anyhow::Result<FilterSession> {
    let html = extractor::read_document(file)?;
    FilterSession::from_document(&html, config)
        .with_context(|| format!("Failed to start filter session for '{}'", file.display()))
}

pub fn run() -> anyhow::Result<()> {
    let cli = cli_parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.color {
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
        ColorMode::Auto => {}
    }

    let config = load_config(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(path) = &cli.config {
        info!(config = %path.display(), "loaded config");
    }
    let output = cli.output.as_deref();

    match &cli.command {
        Commands::Filter {
            file,
            ids,
            keys,
            palette,
            count,
        } => {
            let mut session = open_session(file, &config)?;
            session.set_inputs(FilterInputs::new(ids, keys, palette));
            let total = session.rows().len();

            let text = match (cli.format, *count) {
                (OutputFormat::Text, true) => format!("{}\n", session.visible_count()),
                (OutputFormat::Json, true) => serde_json::to_string_pretty(&serde_json::json!({
                    "filter": {
                        "file": file.display().to_string(),
                        "total_rows": total,
                        "visible_rows": session.visible_count(),
                    }
                }))?,
                (OutputFormat::Text, false) => {
                    display::format_rows_text(session.visible_rows(), total, session.inputs())
                }
                (OutputFormat::Json, false) => display::format_rows_json(
                    file,
                    session.visible_rows(),
                    total,
                    session.inputs(),
                ),
            };
            emit(output, &text)?;
        }
        Commands::Info { file } => {
            let html = extractor::read_document(file)?;
            let table = extract_table(&html, &config);

            let text = match cli.format {
                OutputFormat::Text => display::format_info_text(file, &table, &config),
                OutputFormat::Json => display::format_info_json(file, &table, &config),
            };
            emit(output, &text)?;
        }
        Commands::Replay { file, events } => {
            let mut session = open_session(file, &config)?;
            let script = read_events(events.as_deref())?;
            let events = replay::parse_events(&script)?;
            let steps = replay::replay_events(&mut session, &events)?;

            let text = match cli.format {
                OutputFormat::Text => display::format_replay_text(&steps),
                OutputFormat::Json => display::format_replay_json(file, &steps),
            };
            emit(output, &text)?;
        }
    }

    Ok(())
}
