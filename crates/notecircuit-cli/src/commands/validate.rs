//! Validate command implementation
//!
//! Checks a note file without compiling it and lists every diagnostic.

use anyhow::{Context, Result};
use colored::Colorize;
use notecircuit_spec::validate_sequence;
use std::path::Path;
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{JsonError, JsonWarning, ValidateOutput};
use super::reporting;
use crate::input::{load_notes, LoadResult};

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(input_path: &str, json_output: bool) -> Result<ExitCode> {
    if json_output {
        run_json(input_path)
    } else {
        run_human(input_path)
    }
}

fn run_human(input_path: &str) -> Result<ExitCode> {
    let start = Instant::now();
    println!("{} {}", "Validating:".cyan().bold(), input_path);

    let LoadResult {
        sequence,
        source_hash,
    } = load_notes(Path::new(input_path))
        .with_context(|| format!("Failed to load note file: {}", input_path))?;

    println!(
        "{} {} note(s) ({})",
        "Source:".dimmed(),
        sequence.len(),
        &source_hash[..16]
    );

    let validation = validate_sequence(&sequence);
    let duration_ms = start.elapsed().as_millis() as u64;
    reporting::print_validation_results(&validation);

    if validation.is_ok() {
        println!(
            "\n{} Notes are valid ({}ms)",
            "SUCCESS".green().bold(),
            duration_ms
        );
        Ok(ExitCode::SUCCESS)
    } else {
        println!(
            "\n{} Notes have {} error(s) ({}ms)",
            "FAILED".red().bold(),
            validation.errors.len(),
            duration_ms
        );
        Ok(ExitCode::from(1))
    }
}

fn run_json(input_path: &str) -> Result<ExitCode> {
    let output = match load_notes(Path::new(input_path)) {
        Ok(LoadResult {
            sequence,
            source_hash,
        }) => {
            let validation = validate_sequence(&sequence);
            ValidateOutput {
                success: validation.is_ok(),
                errors: validation.errors.iter().map(JsonError::from_validation).collect(),
                warnings: validation
                    .warnings
                    .iter()
                    .map(JsonWarning::from_validation)
                    .collect(),
                source_hash: Some(source_hash),
                note_count: Some(sequence.len()),
            }
        }
        Err(e) => ValidateOutput {
            success: false,
            errors: vec![JsonError::new(e.code(), e.to_string())],
            warnings: vec![],
            source_hash: None,
            note_count: None,
        },
    };

    let json = serde_json::to_string_pretty(&output).context("Failed to serialize output")?;
    println!("{}", json);

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_notes(dir: &Path, body: &str) -> String {
        let path = dir.join("notes.json");
        std::fs::write(&path, body).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_valid_notes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_notes(
            tmp.path(),
            r#"{"notes":[{"start_tick":0,"duration_tick":20,"pitch_class":12}]}"#,
        );
        assert_eq!(run(&path, false).unwrap(), ExitCode::SUCCESS);
        assert_eq!(run(&path, true).unwrap(), ExitCode::SUCCESS);
    }

    #[test]
    fn test_invalid_notes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_notes(
            tmp.path(),
            r#"{"notes":[{"start_tick":0,"duration_tick":0,"pitch_class":30}]}"#,
        );
        assert_eq!(run(&path, false).unwrap(), ExitCode::from(1));
        assert_eq!(run(&path, true).unwrap(), ExitCode::from(1));
    }

    #[test]
    fn test_missing_file() {
        assert!(run("/nonexistent/notes.json", false).is_err());
        // JSON mode reports the failure instead of erroring out.
        assert_eq!(
            run("/nonexistent/notes.json", true).unwrap(),
            ExitCode::from(1)
        );
    }
}
