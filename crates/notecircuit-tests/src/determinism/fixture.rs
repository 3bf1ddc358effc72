//! Test fixture for running determinism tests across multiple note files.

use std::path::{Path, PathBuf};

use notecircuit_spec::NoteSequence;

use crate::determinism::core::{verify_determinism, DeterminismResult};
use crate::determinism::report::{DeterminismError, DeterminismReport, DeterminismReportEntry};

/// Compiles each registered note file several times and compares the documents.
///
/// # Example
///
/// ```no_run
/// use notecircuit_tests::determinism::DeterminismFixture;
///
/// let report = DeterminismFixture::new()
///     .add_input("fixtures/scenario_a.json")
///     .add_input("fixtures/chord.json")
///     .runs(5)
///     .run();
///
/// println!("{}", report);
/// assert!(report.all_deterministic());
/// ```
#[derive(Debug, Clone)]
pub struct DeterminismFixture {
    /// Note file paths to test.
    pub inputs: Vec<PathBuf>,
    /// Number of runs per input.
    pub runs: usize,
    /// Re-sort notes by start tick before compiling.
    pub sort: bool,
}

impl Default for DeterminismFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl DeterminismFixture {
    pub fn new() -> Self {
        Self {
            inputs: Vec::new(),
            runs: 3,
            sort: false,
        }
    }

    /// Add a note file path to the fixture.
    pub fn add_input<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.inputs.push(path.as_ref().to_path_buf());
        self
    }

    /// Add multiple note file paths.
    pub fn add_inputs<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.inputs
            .extend(paths.into_iter().map(|p| p.as_ref().to_path_buf()));
        self
    }

    /// Set the number of runs per input.
    pub fn runs(mut self, runs: usize) -> Self {
        assert!(runs >= 2, "Must run at least 2 times");
        self.runs = runs;
        self
    }

    /// Sort notes by start tick before compiling, like `compile --sort`.
    pub fn sorted(mut self) -> Self {
        self.sort = true;
        self
    }

    /// Run determinism tests for all inputs.
    pub fn run(&self) -> DeterminismReport {
        let mut report = DeterminismReport::new();
        for path in &self.inputs {
            report.add_entry(DeterminismReportEntry {
                input_path: path.clone(),
                result: self.test_input(path),
            });
        }
        report
    }

    fn test_input(&self, path: &Path) -> Result<DeterminismResult, DeterminismError> {
        if !path.exists() {
            return Err(DeterminismError::InputNotFound);
        }

        let content =
            std::fs::read_to_string(path).map_err(|e| DeterminismError::Io(e.to_string()))?;
        let mut sequence =
            NoteSequence::from_json(&content).map_err(|e| DeterminismError::Parse(e.to_string()))?;
        if self.sort {
            sequence.sort_by_start();
        }

        // Surface compile errors once instead of comparing empty outputs.
        notecircuit_backend_circuit::compile(&sequence.notes)
            .map_err(|e| DeterminismError::CompileFailed(e.to_string()))?;

        Ok(verify_determinism(
            || {
                notecircuit_backend_circuit::compile(&sequence.notes)
                    .map(|r| r.json)
                    .unwrap_or_default()
            },
            self.runs,
        ))
    }
}
