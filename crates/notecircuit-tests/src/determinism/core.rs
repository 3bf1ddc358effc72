//! Core determinism verification types and functions.
//!
//! These compare the raw bytes of repeated runs and, on mismatch, point at
//! the first differing byte with a little surrounding text.

use std::fmt;

/// Result of a determinism verification.
#[derive(Debug, Clone)]
pub struct DeterminismResult {
    /// Whether all runs produced identical output.
    pub is_deterministic: bool,
    /// Number of runs performed.
    pub runs: usize,
    /// Size of the output in bytes.
    pub output_size: usize,
    /// BLAKE3 hash of the first run's output.
    pub hash: String,
    /// If non-deterministic, the first difference found.
    pub diff_info: Option<DiffInfo>,
}

/// The first byte difference found between runs.
#[derive(Debug, Clone)]
pub struct DiffInfo {
    /// Byte offset of the difference.
    pub offset: usize,
    /// Byte from the first run, if it extends this far.
    pub expected: Option<u8>,
    /// Byte from the differing run, if it extends this far.
    pub actual: Option<u8>,
    /// Which run (0-indexed) differed.
    pub run_index: usize,
    /// Up to 24 bytes of the first run around the offset, lossily decoded.
    pub context: String,
}

impl fmt::Display for DiffInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |b: Option<u8>| match b {
            Some(b) => format!("{:?}", b as char),
            None => "end of output".to_string(),
        };
        write!(
            f,
            "Difference at byte {}: expected {}, got {} (run {})",
            self.offset,
            show(self.expected),
            show(self.actual),
            self.run_index
        )?;
        if !self.context.is_empty() {
            write!(f, "\n  Context: {}", self.context)?;
        }
        Ok(())
    }
}

impl DeterminismResult {
    pub fn success(runs: usize, output_size: usize, hash: String) -> Self {
        Self {
            is_deterministic: true,
            runs,
            output_size,
            hash,
            diff_info: None,
        }
    }

    pub fn failure(runs: usize, output_size: usize, hash: String, diff_info: DiffInfo) -> Self {
        Self {
            is_deterministic: false,
            runs,
            output_size,
            hash,
            diff_info: Some(diff_info),
        }
    }

    /// Panic with a detailed message if not deterministic.
    pub fn assert_deterministic(&self) {
        if let Some(diff) = self.diff_info.as_ref().filter(|_| !self.is_deterministic) {
            panic!(
                "Non-deterministic output detected!\n\
                 Runs: {}\n\
                 Output size: {} bytes\n\
                 Hash: {}\n\
                 {}",
                self.runs, self.output_size, self.hash, diff
            );
        }
    }
}

/// Run a compilation `runs` times and verify all outputs are identical.
///
/// # Example
///
/// ```
/// use notecircuit_backend_circuit::compile;
/// use notecircuit_spec::Note;
/// use notecircuit_tests::determinism::verify_determinism;
///
/// let notes = [Note::new(0, 20, 12)];
/// let result = verify_determinism(|| compile(&notes).unwrap().json, 3);
/// assert!(result.is_deterministic);
/// ```
pub fn verify_determinism<F, O>(generate_fn: F, runs: usize) -> DeterminismResult
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    assert!(runs >= 2, "Must run at least 2 times to verify determinism");

    let reference = generate_fn();
    let reference_bytes = reference.as_ref();
    let reference_hash = compute_hash(reference_bytes);

    for run_index in 1..runs {
        let output = generate_fn();
        if let Some(diff) = find_first_difference(reference_bytes, output.as_ref(), run_index) {
            return DeterminismResult::failure(runs, reference_bytes.len(), reference_hash, diff);
        }
    }

    DeterminismResult::success(runs, reference_bytes.len(), reference_hash)
}

/// Find the first byte difference between two outputs, including a length mismatch.
pub(crate) fn find_first_difference(
    expected: &[u8],
    actual: &[u8],
    run_index: usize,
) -> Option<DiffInfo> {
    let offset = expected
        .iter()
        .zip(actual.iter())
        .position(|(e, a)| e != a)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))?;

    Some(DiffInfo {
        offset,
        expected: expected.get(offset).copied(),
        actual: actual.get(offset).copied(),
        run_index,
        context: extract_context(expected, offset),
    })
}

/// Text around a byte offset.
pub(crate) fn extract_context(data: &[u8], offset: usize) -> String {
    let start = offset.saturating_sub(12);
    let end = (offset + 12).min(data.len());
    String::from_utf8_lossy(&data[start.min(end)..end]).to_string()
}

/// Returns true if all hashes are identical.
pub fn verify_hash_determinism(hashes: &[String]) -> bool {
    hashes.windows(2).all(|pair| pair[0] == pair[1])
}

/// Compute BLAKE3 hash of data.
pub fn compute_hash(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Panics unless `runs` invocations return identical bytes.
pub fn assert_deterministic<F, O>(runs: usize, generate_fn: F)
where
    F: Fn() -> O,
    O: AsRef<[u8]>,
{
    verify_determinism(generate_fn, runs).assert_deterministic();
}
