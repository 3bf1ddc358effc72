//! Loading note sequences from disk.

use notecircuit_spec::{blake3_hash_str, NoteSequence};
use std::path::{Path, PathBuf};

/// A parsed note file plus its provenance.
#[derive(Debug)]
pub struct LoadResult {
    /// The parsed sequence, in file order.
    pub sequence: NoteSequence,
    /// BLAKE3 hash of the raw file content (hex string).
    pub source_hash: String,
}

/// Errors that can occur while loading a note file.
#[derive(Debug)]
pub enum InputError {
    /// File could not be read.
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// File content is not a note sequence.
    JsonParse { message: String },
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::FileRead { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            InputError::JsonParse { message } => write!(f, "invalid note file: {}", message),
        }
    }
}

impl std::error::Error for InputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InputError::FileRead { source, .. } => Some(source),
            InputError::JsonParse { .. } => None,
        }
    }
}

impl InputError {
    /// Stable code for `--json` output.
    pub fn code(&self) -> &'static str {
        use crate::commands::json_output::error_codes;
        match self {
            InputError::FileRead { .. } => error_codes::FILE_READ,
            InputError::JsonParse { .. } => error_codes::JSON_PARSE,
        }
    }
}

/// Reads and parses a `{"notes": [...]}` file.
pub fn load_notes(path: &Path) -> Result<LoadResult, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let source_hash = blake3_hash_str(&content);
    let sequence = NoteSequence::from_json(&content).map_err(|e| InputError::JsonParse {
        message: e.to_string(),
    })?;

    Ok(LoadResult {
        sequence,
        source_hash,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_notes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.json");
        std::fs::write(
            &path,
            r#"{"notes":[{"start_tick":0,"duration_tick":20,"pitch_class":12}]}"#,
        )
        .unwrap();

        let loaded = load_notes(&path).unwrap();
        assert_eq!(loaded.sequence.len(), 1);
        assert_eq!(loaded.source_hash.len(), 64);
    }

    #[test]
    fn test_missing_file() {
        let err = load_notes(Path::new("/nonexistent/notes.json")).unwrap_err();
        assert!(matches!(err, InputError::FileRead { .. }));
        assert_eq!(err.code(), "CLI_001");
    }

    #[test]
    fn test_malformed_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.json");
        std::fs::write(&path, r#"{"notes":[{"start_tick":0}]}"#).unwrap();

        let err = load_notes(&path).unwrap_err();
        assert!(matches!(err, InputError::JsonParse { .. }));
        assert!(err.to_string().starts_with("invalid note file"));
    }
}
