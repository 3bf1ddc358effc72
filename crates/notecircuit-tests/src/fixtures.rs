//! Access to the checked-in note fixtures.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// The `fixtures/` directory of this crate.
pub struct NoteFixtures;

impl NoteFixtures {
    /// Root directory of the note fixtures.
    pub fn dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Path of a named fixture, without the `.json` extension.
    pub fn path(name: &str) -> PathBuf {
        Self::dir().join(format!("{}.json", name))
    }

    /// Reads a named fixture.
    pub fn read(name: &str) -> String {
        std::fs::read_to_string(Self::path(name))
            .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", name, e))
    }

    /// Fixtures that compile as-is.
    pub fn valid() -> Vec<PathBuf> {
        Self::list(&Self::dir().join("valid"))
    }

    /// Fixtures that are rejected unless sorted first.
    pub fn unordered() -> Vec<PathBuf> {
        Self::list(&Self::dir().join("unordered"))
    }

    /// Fixtures that fail validation.
    pub fn invalid() -> Vec<PathBuf> {
        Self::list(&Self::dir().join("invalid"))
    }

    /// All `.json` files under `dir`, sorted by path.
    pub fn list(dir: &Path) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_dirs_are_populated() {
        assert!(NoteFixtures::dir().exists());
        assert!(!NoteFixtures::valid().is_empty());
        assert!(!NoteFixtures::unordered().is_empty());
        assert!(!NoteFixtures::invalid().is_empty());
    }

    #[test]
    fn test_list_is_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.json"), "{}").unwrap();
        std::fs::write(dir.path().join("nested").join("a.json"), "{}").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "").unwrap();

        let paths = NoteFixtures::list(dir.path());
        assert_eq!(
            paths,
            vec![dir.path().join("b.json"), dir.path().join("nested").join("a.json")]
        );
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        assert!(NoteFixtures::list(Path::new("no/such/dir")).is_empty());
    }
}
