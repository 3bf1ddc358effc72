//! Error types and reporting infrastructure for determinism testing.

use std::fmt;
use std::path::PathBuf;

use crate::determinism::core::DeterminismResult;

/// Error type for determinism testing.
#[derive(Debug, Clone)]
pub enum DeterminismError {
    /// Note file was not found.
    InputNotFound,
    /// IO error reading the note file.
    Io(String),
    /// The note file is not a valid sequence.
    Parse(String),
    /// Compilation was rejected.
    CompileFailed(String),
}

impl fmt::Display for DeterminismError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InputNotFound => write!(f, "Note file not found"),
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::CompileFailed(e) => write!(f, "Compilation failed: {}", e),
        }
    }
}

impl std::error::Error for DeterminismError {}

/// Entry in a determinism report for a single note file.
#[derive(Debug)]
pub struct DeterminismReportEntry {
    pub input_path: PathBuf,
    pub result: Result<DeterminismResult, DeterminismError>,
}

impl DeterminismReportEntry {
    /// Check if this entry passed determinism verification.
    pub fn passed(&self) -> bool {
        matches!(&self.result, Ok(r) if r.is_deterministic)
    }
}

/// Report of determinism tests across multiple note files.
#[derive(Debug, Default)]
pub struct DeterminismReport {
    pub entries: Vec<DeterminismReportEntry>,
}

impl DeterminismReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(&mut self, entry: DeterminismReportEntry) {
        self.entries.push(entry);
    }

    /// Check if every input passed determinism verification.
    pub fn all_deterministic(&self) -> bool {
        self.entries.iter().all(|e| e.passed())
    }

    pub fn passed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.total_count() - self.passed_count()
    }

    pub fn total_count(&self) -> usize {
        self.entries.len()
    }

    pub fn failures(&self) -> Vec<&DeterminismReportEntry> {
        self.entries.iter().filter(|e| !e.passed()).collect()
    }

    /// Panic if any tests failed, with detailed report.
    pub fn assert_all_deterministic(&self) {
        if self.all_deterministic() {
            return;
        }

        let mut msg = format!(
            "Determinism verification failed!\n\
             Passed: {}/{}\n\n\
             Failures:\n",
            self.passed_count(),
            self.total_count()
        );
        for entry in self.failures() {
            msg.push_str(&format!("  - {}\n", entry.input_path.display()));
            match &entry.result {
                Ok(result) => {
                    if let Some(diff) = &result.diff_info {
                        msg.push_str(&format!("    {}\n", diff));
                    }
                }
                Err(e) => msg.push_str(&format!("    Error: {}\n", e)),
            }
        }
        panic!("{}", msg);
    }
}

impl fmt::Display for DeterminismReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Determinism Report")?;
        writeln!(f, "==================")?;
        writeln!(
            f,
            "Passed: {}/{}",
            self.passed_count(),
            self.total_count()
        )?;
        writeln!(f)?;

        for entry in &self.entries {
            let status = if entry.passed() { "PASS" } else { "FAIL" };
            writeln!(f, "[{}] {}", status, entry.input_path.display())?;
            match &entry.result {
                Ok(result) => {
                    writeln!(
                        f,
                        "       {} runs, {} bytes, hash {}",
                        result.runs, result.output_size, result.hash
                    )?;
                    if let Some(diff) = &result.diff_info {
                        writeln!(f, "       {}", diff)?;
                    }
                }
                Err(e) => writeln!(f, "       Error: {}", e)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(
        name: &str,
        result: Result<DeterminismResult, DeterminismError>,
    ) -> DeterminismReportEntry {
        DeterminismReportEntry {
            input_path: PathBuf::from(name),
            result,
        }
    }

    #[test]
    fn test_counts_and_display() {
        let mut report = DeterminismReport::new();
        report.add_entry(entry(
            "a.json",
            Ok(DeterminismResult::success(3, 42, "abc".to_string())),
        ));
        report.add_entry(entry("b.json", Err(DeterminismError::InputNotFound)));

        assert_eq!(report.passed_count(), 1);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.failures()[0].input_path, PathBuf::from("b.json"));

        let text = report.to_string();
        assert!(text.contains("Passed: 1/2"));
        assert!(text.contains("[PASS] a.json"));
        assert!(text.contains("[FAIL] b.json"));
        assert!(text.contains("Note file not found"));
    }

    #[test]
    #[should_panic(expected = "Compilation failed: boom")]
    fn test_assert_all_deterministic_lists_errors() {
        let mut report = DeterminismReport::new();
        report.add_entry(entry(
            "c.json",
            Err(DeterminismError::CompileFailed("boom".to_string())),
        ));
        report.assert_all_deterministic();
    }

    #[test]
    fn test_empty_report_passes() {
        let report = DeterminismReport::new();
        assert!(report.all_deterministic());
        report.assert_all_deterministic();
    }
}
