use anyhow::{Context, Result};
use colored::Colorize;
use notecircuit_spec::{Report, ReportBuilder, ValidationResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Backend version string recorded in reports.
pub(crate) fn backend_version() -> String {
    format!(
        "{} v{}",
        notecircuit_backend_circuit::BACKEND_ID,
        notecircuit_backend_circuit::VERSION
    )
}

pub(crate) fn apply_validation_messages(
    builder: ReportBuilder,
    validation: &ValidationResult,
) -> ReportBuilder {
    builder
        .validation_errors(&validation.errors)
        .validation_warnings(&validation.warnings)
}

/// Report file written next to the compiled document: `<stem>.report.json`.
pub(crate) fn report_path(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "circuit".to_string());
    let dir = output_path.parent().unwrap_or(Path::new("."));
    dir.join(Report::filename(&stem))
}

pub(crate) fn write_report(report: &Report, path: &Path) -> Result<()> {
    let json = report.to_json_pretty().context("Failed to serialize report")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write report to: {}", path.display()))?;
    Ok(())
}

/// Print validation errors and warnings in the human format.
pub(crate) fn print_validation_results(validation: &ValidationResult) {
    if !validation.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in &validation.errors {
            println!("  {} {}", "x".red(), error);
        }
    }
    if !validation.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &validation.warnings {
            println!("  {} {}", "!".yellow(), warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notecircuit_spec::{
        ErrorCode, OutputResult, ValidationError, ValidationWarning, WarningCode,
    };

    #[test]
    fn test_report_path_sibling_file() {
        let path = report_path(Path::new("out/songs/theme.json"));
        let expected = Path::new("out").join("songs").join("theme.report.json");
        assert_eq!(path, expected);
    }

    #[test]
    fn test_report_path_bare_file_name() {
        assert_eq!(
            report_path(Path::new("theme.json")),
            PathBuf::from("theme.report.json")
        );
    }

    #[test]
    fn test_apply_validation_messages() {
        let mut validation = ValidationResult::default();
        validation.add_error(ValidationError::new(ErrorCode::UnorderedNotes, "late"));
        validation.add_warning(ValidationWarning::new(WarningCode::DuplicateNote, "dup"));

        let report = apply_validation_messages(
            ReportBuilder::new("hash".to_string(), backend_version()),
            &validation,
        )
        .build();
        assert!(!report.ok);
        assert_eq!(report.errors[0].code, "E004");
        assert_eq!(report.warnings[0].code, "W003");
    }

    #[test]
    fn test_write_report_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("theme.report.json");

        let report = ReportBuilder::new("hash".to_string(), backend_version())
            .output(OutputResult::new(PathBuf::from("theme.json"), "abc".to_string(), 10))
            .build();
        write_report(&report, &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let parsed = Report::from_json(&content).unwrap();
        assert_eq!(parsed, report);
    }
}
