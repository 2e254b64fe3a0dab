//! Dataset file discovery.

use std::path::{Path, PathBuf};

use crate::IngestError;

/// Locations checked, relative to the base directory, when no explicit
/// dataset path is given.
pub const CANDIDATE_PATHS: &[&str] = &["crimes.csv", "archive/crimes.csv", "data/crimes.csv"];

/// Returns the dataset file to load.
///
/// An `explicit` path is used as-is (resolved against `base_dir` when
/// relative) and must exist. Otherwise each of [`CANDIDATE_PATHS`] is tried
/// in order and the first existing file wins.
///
/// # Errors
///
/// Returns [`IngestError::NotFound`] listing every path that was tried.
pub fn locate_dataset(explicit: Option<&Path>, base_dir: &Path) -> Result<PathBuf, IngestError> {
    let candidates: Vec<PathBuf> = match explicit {
        Some(path) => vec![base_dir.join(path)],
        None => CANDIDATE_PATHS.iter().map(|p| base_dir.join(p)).collect(),
    };

    for candidate in &candidates {
        if candidate.is_file() {
            log::debug!("Using dataset at {}", candidate.display());
            return Ok(candidate.clone());
        }
        log::trace!("No dataset at {}", candidate.display());
    }

    Err(IngestError::NotFound { tried: candidates })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "safe_walk_discovery_{name}_{}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn finds_first_existing_candidate() {
        let dir = scratch_dir("candidate");
        std::fs::create_dir_all(dir.join("archive")).unwrap();
        std::fs::create_dir_all(dir.join("data")).unwrap();
        std::fs::write(dir.join("archive/crimes.csv"), "Date,Primary Type\n").unwrap();
        std::fs::write(dir.join("data/crimes.csv"), "Date,Primary Type\n").unwrap();

        let found = locate_dataset(None, &dir).unwrap();
        assert_eq!(found, dir.join("archive/crimes.csv"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn explicit_path_must_exist() {
        let dir = scratch_dir("explicit");
        std::fs::write(dir.join("crimes.csv"), "Date,Primary Type\n").unwrap();

        match locate_dataset(Some(Path::new("other.csv")), &dir) {
            Err(IngestError::NotFound { tried }) => assert_eq!(tried, vec![dir.join("other.csv")]),
            other => panic!("expected NotFound, got {other:?}"),
        }

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn reports_every_candidate_tried() {
        let dir = scratch_dir("missing");
        match locate_dataset(None, &dir) {
            Err(IngestError::NotFound { tried }) => assert_eq!(tried.len(), CANDIDATE_PATHS.len()),
            other => panic!("expected NotFound, got {other:?}"),
        }
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
