//! objpack CLI
//!
//! Converts JSON documents to objpack documents and back, and inspects
//! encoded documents.

mod commands;
mod json;

use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use commands::{DEFAULT_MAX_DEPTH, cmd_decode, cmd_encode, cmd_inspect};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "objpack")]
#[command(author, version, about = "Encode, decode and inspect objpack documents")]
#[command(long_about = "
objpack is a self-describing binary object-graph format with a
deduplicated string table.

Examples:
  objpack encode data.json
  objpack encode a.json b.json c.json
  objpack encode data.json -o data.bin
  objpack decode data.opk --pretty
  objpack inspect data.opk --strings
  objpack completions bash > objpack.bash
")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode JSON files into documents
    #[command(alias = "e")]
    Encode {
        /// JSON files to encode (processed in parallel)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file (single input only; default: input with .opk extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Decode a document to JSON
    #[command(alias = "d")]
    Decode {
        /// Document to decode
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(short, long)]
        pretty: bool,

        /// Reject documents nested deeper than this
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Show the layout, string table and value tree of a document
    #[command(alias = "i")]
    Inspect {
        /// Document to inspect
        input: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,

        /// List the string table entries
        #[arg(short, long)]
        strings: bool,

        /// Reject documents nested deeper than this
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: usize,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Encode { inputs, output } => cmd_encode(&inputs, output.as_deref()),
        Commands::Decode {
            input,
            output,
            pretty,
            max_depth,
        } => cmd_decode(&input, output.as_deref(), pretty, max_depth),
        Commands::Inspect {
            input,
            json,
            strings,
            max_depth,
        } => cmd_inspect(&input, json, strings, max_depth),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "objpack", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
