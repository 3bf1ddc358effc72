//! notecircuit CLI - Command-line interface for note-to-circuit compilation
//!
//! This binary validates note files, compiles them into circuit documents,
//! and inspects the circuits they produce.

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use notecircuit_cli::commands;
use notecircuit_cli::commands::compile::CompileOptions;

/// notecircuit - Compile note sequences into logic circuits
#[derive(Parser)]
#[command(name = "notecircuit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a note file without compiling it
    Validate {
        /// Path to the note file (JSON)
        #[arg(short, long)]
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Compile a note file into a circuit document
    Compile {
        /// Path to the note file (JSON)
        #[arg(short, long)]
        input: String,

        /// Path of the circuit document to write
        #[arg(short, long)]
        output: String,

        /// Re-sort notes by start tick instead of rejecting unordered input
        #[arg(long)]
        sort: bool,

        /// Refuse to write circuits with more nodes than this
        #[arg(long)]
        max_nodes: Option<usize>,

        /// Do not write a report file next to the output
        #[arg(long)]
        no_report: bool,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Compile in memory and print circuit statistics and trigger wiring
    Inspect {
        /// Path to the note file (JSON)
        #[arg(short, long)]
        input: String,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { input, json } => commands::validate::run(&input, json),
        Commands::Compile {
            input,
            output,
            sort,
            max_nodes,
            no_report,
            json,
        } => {
            let options = CompileOptions {
                sort,
                max_nodes,
                no_report,
            };
            commands::compile::run(&input, &output, &options, json)
        }
        Commands::Inspect { input, json } => commands::inspect::run(&input, json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
