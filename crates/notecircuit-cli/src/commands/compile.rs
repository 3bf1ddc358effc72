//! Compile command implementation
//!
//! Validates a note file, compiles it into a circuit document, writes the
//! document and a `<stem>.report.json` report next to it.

use anyhow::{Context, Result};
use colored::Colorize;
use notecircuit_backend_circuit::{compile, minimum_node_count};
use notecircuit_spec::{
    canonical_sequence_hash, validate_sequence, BackendError, CircuitStats, NoteSequence,
    OutputResult, ReportBuilder, ReportError, ValidationResult,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{error_codes, CompileOutput, JsonError, JsonWarning};
use super::reporting;
use crate::input::load_notes;

/// Options for one compile run.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Stably re-sort notes by start tick instead of rejecting unordered input.
    pub sort: bool,
    /// Refuse to write documents with more nodes than this.
    pub max_nodes: Option<usize>,
    /// Skip writing the report file.
    pub no_report: bool,
}

/// Everything a run produced, before rendering.
#[derive(Debug, Default)]
struct Outcome {
    input_hash: Option<String>,
    reordered: bool,
    validation: ValidationResult,
    errors: Vec<JsonError>,
    output: Option<OutputResult>,
    stats: Option<CircuitStats>,
    report_path: Option<PathBuf>,
    duration_ms: u64,
}

impl Outcome {
    fn success(&self) -> bool {
        self.validation.is_ok() && self.errors.is_empty()
    }
}

/// Run the compile command
///
/// # Returns
/// Exit code: 0 if the document was written, 1 otherwise
pub fn run(
    input_path: &str,
    output_path: &str,
    options: &CompileOptions,
    json_output: bool,
) -> Result<ExitCode> {
    if json_output {
        run_json(input_path, output_path, options)
    } else {
        run_human(input_path, output_path, options)
    }
}

fn run_human(input_path: &str, output_path: &str, options: &CompileOptions) -> Result<ExitCode> {
    println!("{} {}", "Compiling:".cyan().bold(), input_path);

    let loaded = load_notes(Path::new(input_path))
        .with_context(|| format!("Failed to load note file: {}", input_path))?;
    let outcome = execute(loaded.sequence, Path::new(output_path), options)?;

    if outcome.reordered {
        println!("{} notes re-ordered by start tick", "Sorted:".dimmed());
    }
    reporting::print_validation_results(&outcome.validation);
    for error in &outcome.errors {
        println!("  {} [{}] {}", "x".red(), error.code, error.message);
    }
    if let Some(stats) = &outcome.stats {
        print_stats(stats);
    }
    if let Some(output) = &outcome.output {
        println!(
            "\n{} {} ({} bytes, {})",
            "Wrote:".dimmed(),
            output.path.display(),
            output.bytes,
            &output.hash[..16]
        );
    }
    if let Some(path) = &outcome.report_path {
        println!("{} {}", "Report:".dimmed(), path.display());
    }

    if outcome.success() {
        println!(
            "\n{} Circuit compiled ({}ms)",
            "SUCCESS".green().bold(),
            outcome.duration_ms
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} Compilation failed with {} error(s) ({}ms)",
            "FAILED".red().bold(),
            outcome.validation.errors.len() + outcome.errors.len(),
            outcome.duration_ms
        );
        Ok(ExitCode::from(1))
    }
}

fn run_json(input_path: &str, output_path: &str, options: &CompileOptions) -> Result<ExitCode> {
    let output = match load_notes(Path::new(input_path)) {
        Ok(loaded) => match execute(loaded.sequence, Path::new(output_path), options) {
            Ok(outcome) => CompileOutput {
                success: outcome.success(),
                errors: outcome
                    .validation
                    .errors
                    .iter()
                    .map(JsonError::from_validation)
                    .chain(outcome.errors.iter().cloned())
                    .collect(),
                warnings: outcome
                    .validation
                    .warnings
                    .iter()
                    .map(JsonWarning::from_validation)
                    .collect(),
                input_hash: outcome.input_hash,
                output: outcome.output,
                stats: outcome.stats,
                report_path: outcome
                    .report_path
                    .map(|p| p.to_string_lossy().to_string()),
                duration_ms: outcome.duration_ms,
            },
            Err(e) => failure(JsonError::new(error_codes::OUTPUT_WRITE, format!("{:#}", e))),
        },
        Err(e) => failure(JsonError::new(e.code(), e.to_string())),
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    println!("{}", json);

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn failure(error: JsonError) -> CompileOutput {
    CompileOutput {
        success: false,
        errors: vec![error],
        warnings: vec![],
        input_hash: None,
        output: None,
        stats: None,
        report_path: None,
        duration_ms: 0,
    }
}

/// Validates, compiles, enforces the node budget, and writes the document
/// and report. Only file system failures are returned as errors.
fn execute(
    mut sequence: NoteSequence,
    output_path: &Path,
    options: &CompileOptions,
) -> Result<Outcome> {
    let start = Instant::now();
    let mut outcome = Outcome::default();

    if options.sort && !sequence.is_sorted() {
        sequence.sort_by_start();
        outcome.reordered = true;
    }

    let input_hash = canonical_sequence_hash(&sequence).context("Failed to hash input")?;
    outcome.input_hash = Some(input_hash.clone());
    outcome.validation = validate_sequence(&sequence);

    let mut report = reporting::apply_validation_messages(
        ReportBuilder::new(input_hash, reporting::backend_version()),
        &outcome.validation,
    );

    if outcome.validation.is_ok() {
        let lower_bound = minimum_node_count(&sequence.notes);
        match options.max_nodes {
            // Long extension chains are rejected before they are built.
            Some(max) if lower_bound > max => {
                let error = JsonError::new(
                    error_codes::NODE_BUDGET,
                    format!("circuit needs at least {lower_bound} nodes, budget is {max}"),
                );
                report = report.error(ReportError::new(&error.code, &error.message));
                outcome.errors.push(error);
            }
            _ => match compile(&sequence.notes) {
                Ok(result) => {
                    outcome.stats = Some(result.stats);
                    report = report.stats(result.stats);

                    match options.max_nodes {
                        Some(max) if result.stats.nodes > max => {
                            let error = JsonError::new(
                                error_codes::NODE_BUDGET,
                                format!(
                                    "circuit has {} nodes, budget is {}",
                                    result.stats.nodes, max
                                ),
                            );
                            report = report.error(ReportError::new(&error.code, &error.message));
                            outcome.errors.push(error);
                        }
                        _ => {
                            fs::write(output_path, &result.json).with_context(|| {
                                format!("Failed to write circuit to: {}", output_path.display())
                            })?;
                            let output = OutputResult::new(
                                output_path.to_path_buf(),
                                result.hash,
                                result.json.len() as u64,
                            );
                            report = report.output(output.clone());
                            outcome.output = Some(output);
                        }
                    }
                }
                Err(e) => {
                    report = report.error(ReportError::new(e.code(), e.message()));
                    outcome.errors.push(JsonError::from_backend(&e));
                }
            },
        }
    }

    outcome.duration_ms = start.elapsed().as_millis() as u64;

    if !options.no_report {
        let path = reporting::report_path(output_path);
        let report = report
            .ok(outcome.success())
            .duration_ms(outcome.duration_ms)
            .build();
        reporting::write_report(&report, &path)?;
        outcome.report_path = Some(path);
    }

    Ok(outcome)
}

pub(crate) fn print_stats(stats: &CircuitStats) {
    println!("\n{}", "Circuit:".cyan().bold());
    println!("  {:<18} {}", "notes", stats.notes);
    println!("  {:<18} {}", "emitters", stats.emitters);
    println!("  {:<18} {}", "duration timers", stats.duration_timers);
    println!("  {:<18} {}", "start timers", stats.start_timers);
    println!("  {:<18} {}", "extension timers", stats.extension_timers);
    println!("  {:<18} {}", "logic gates", stats.logic_gates);
    println!("  {:<18} {}", "nodes", stats.nodes.to_string().bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use notecircuit_spec::Note;
    use pretty_assertions::assert_eq;

    fn sequence(notes: Vec<Note>) -> NoteSequence {
        NoteSequence::new(notes)
    }

    #[test]
    fn test_execute_writes_document_and_report() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("theme.json");

        let outcome = execute(
            sequence(vec![Note::new(0, 20, 12)]),
            &output,
            &CompileOptions::default(),
        )
        .unwrap();

        assert!(outcome.success());
        assert_eq!(outcome.stats.unwrap().nodes, 7);
        assert!(output.exists());
        let report_path = tmp.path().join("theme.report.json");
        assert_eq!(outcome.report_path.as_deref(), Some(report_path.as_path()));

        let report = notecircuit_spec::Report::from_json(
            &fs::read_to_string(&report_path).unwrap(),
        )
        .unwrap();
        assert!(report.ok);
        assert_eq!(report.outputs.len(), 1);
        assert_eq!(report.outputs[0].bytes, fs::metadata(&output).unwrap().len());
    }

    #[test]
    fn test_execute_rejects_unordered_without_sort() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("theme.json");
        let notes = vec![Note::new(40, 20, 1), Note::new(0, 20, 1)];

        let outcome = execute(sequence(notes), &output, &CompileOptions::default()).unwrap();
        assert!(!outcome.success());
        assert_eq!(outcome.validation.errors[0].code.code(), "E004");
        assert!(!output.exists());
    }

    #[test]
    fn test_execute_sorts_when_asked() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("theme.json");
        let notes = vec![Note::new(40, 20, 1), Note::new(0, 20, 1)];
        let options = CompileOptions {
            sort: true,
            ..CompileOptions::default()
        };

        let outcome = execute(sequence(notes), &output, &options).unwrap();
        assert!(outcome.success());
        assert!(outcome.reordered);
        assert_eq!(outcome.stats.unwrap().emitters, 1);
    }

    #[test]
    fn test_execute_rejects_long_chain_before_compiling() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("theme.json");
        let options = CompileOptions {
            max_nodes: Some(1000),
            ..CompileOptions::default()
        };

        // 1000 minutes in: the extension chain alone is 1000 nodes.
        let outcome = execute(
            sequence(vec![Note::new(2_400_000, 20, 12)]),
            &output,
            &options,
        )
        .unwrap();
        assert!(!outcome.success());
        assert_eq!(outcome.errors[0].code, "CLI_003");
        assert!(outcome.errors[0].message.contains("at least 1007"));
        assert!(outcome.stats.is_none());
        assert!(!output.exists());

        let report = notecircuit_spec::Report::from_json(
            &fs::read_to_string(tmp.path().join("theme.report.json")).unwrap(),
        )
        .unwrap();
        assert!(!report.ok);
        assert!(report.stats.is_none());
    }

    #[test]
    fn test_execute_enforces_node_budget() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("theme.json");
        let options = CompileOptions {
            max_nodes: Some(6),
            no_report: true,
            ..CompileOptions::default()
        };

        let outcome = execute(sequence(vec![Note::new(0, 20, 12)]), &output, &options).unwrap();
        assert!(!outcome.success());
        assert_eq!(outcome.errors[0].code, "CLI_003");
        assert!(!output.exists());
        assert!(outcome.report_path.is_none());
        assert!(!tmp.path().join("theme.report.json").exists());
    }

    #[test]
    fn test_run_missing_input() {
        let tmp = tempfile::tempdir().unwrap();
        let output = tmp.path().join("theme.json");
        let output = output.to_string_lossy();
        let options = CompileOptions::default();
        assert!(run("/nonexistent/notes.json", &output, &options, false).is_err());
        assert_eq!(
            run("/nonexistent/notes.json", &output, &options, true).unwrap(),
            ExitCode::from(1)
        );
    }
}
