use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Filter the keyboard-shortcut table of a command reference page
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// TOML config with the table marker, input ids and column positions
    #[arg(short, long, global = true, env = "SHORTCUT_FILTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the output to this file
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// When to use colors
    #[arg(long, global = true, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one filter pass and print the rows left visible
    Filter {
        /// HTML document containing the shortcut table
        file: PathBuf,

        /// Command-id filter: every word must appear, in any order
        #[arg(long, default_value = "")]
        ids: String,

        /// Key-shortcut filter: any of the space-separated keys
        #[arg(long, default_value = "")]
        keys: String,

        /// Command-palette filter: first word, then the rest later on
        #[arg(long, default_value = "")]
        palette: String,

        /// Print only the number of visible rows
        #[arg(long)]
        count: bool,
    },
    /// Show what the extractor finds in a document
    Info {
        /// HTML document containing the shortcut table
        file: PathBuf,
    },
    /// Replay `element_id=value` input events and report visible rows after each
    Replay {
        /// HTML document containing the shortcut table
        file: PathBuf,

        /// Event script; reads stdin when omitted or '-'
        #[arg(short, long)]
        events: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
