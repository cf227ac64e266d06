//! Directory scan + glob match + JSON flattening.

use std::path::Path;

use contracts::{Corpus, Record};
use glob::Pattern;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

use crate::CorpusError;

/// Corpus loader
///
/// Provides static methods to build a [`Corpus`] from a directory of JSON
/// files.
///
/// # Ordering caveat
/// Files are visited in `std::fs::read_dir` order, which is OS-dependent and
/// not guaranteed to be alphabetical. Within a file, element order is
/// preserved. Callers that need a stable cross-platform order must name their
/// corpus into a single file.
pub struct CorpusLoader;

impl CorpusLoader {
    /// Load every file in `dir` whose *file name* matches `pattern`, parse
    /// each as a JSON array of objects, and flatten into one corpus.
    ///
    /// # Errors
    /// - Unreadable directory or file
    /// - Invalid glob pattern
    /// - Any matching file that is not a JSON array of objects
    #[instrument(name = "corpus_load", skip(dir, pattern), fields(dir = %dir.as_ref().display()))]
    pub fn load_from_dir(dir: impl AsRef<Path>, pattern: &str) -> Result<Corpus, CorpusError> {
        let dir = dir.as_ref();
        let matcher = Pattern::new(pattern).map_err(|e| CorpusError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;

        let entries = std::fs::read_dir(dir).map_err(|source| CorpusError::DirUnreadable {
            dir: dir.display().to_string(),
            source,
        })?;

        let mut records = Vec::new();
        let mut files_loaded = 0usize;

        for entry in entries {
            let entry = entry.map_err(|source| CorpusError::DirUnreadable {
                dir: dir.display().to_string(),
                source,
            })?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if !matcher.matches(name) {
                continue;
            }

            let path = entry.path();
            let before = records.len();
            Self::load_file(&path, &mut records)?;
            files_loaded += 1;
            debug!(
                file = %path.display(),
                records = records.len() - before,
                "corpus file loaded"
            );
        }

        metrics::gauge!("corpus_records_loaded").set(records.len() as f64);
        info!(
            files = files_loaded,
            records = records.len(),
            "corpus loaded"
        );

        Ok(Corpus::new(records))
    }

    /// Parse one file as a JSON array of objects and append each element,
    /// re-serialized compactly, as a record.
    fn load_file(path: &Path, records: &mut Vec<Record>) -> Result<(), CorpusError> {
        let contents =
            std::fs::read_to_string(path).map_err(|source| CorpusError::FileUnreadable {
                file: path.display().to_string(),
                source,
            })?;

        let elements: Vec<Map<String, Value>> =
            serde_json::from_str(&contents).map_err(|e| CorpusError::MalformedFile {
                file: path.display().to_string(),
                message: format!("expected a JSON array of objects: {e}"),
            })?;

        for element in &elements {
            let payload = serde_json::to_vec(element).map_err(|e| CorpusError::MalformedFile {
                file: path.display().to_string(),
                message: format!("cannot re-serialize element: {e}"),
            })?;
            records.push(Record::new(payload));
        }

        Ok(())
    }
}
