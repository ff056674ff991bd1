use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::engine::trie::Trie;
use crate::error::{Result, SampleError};
use crate::pipeline::{read_text, split_lines};

pub const DEFAULT_COMMENT_PREFIX: &str = "#";

/// Word list held as a trie of case-folded terms.
#[derive(Debug, Default)]
pub struct Dictionary {
    terms: Trie<()>,
}

impl Dictionary {
    /// Builds from dictionary text. Blank lines and lines starting with
    /// `comment_prefix` are skipped; every other line is trimmed and folded.
    pub fn parse(text: &str, comment_prefix: &str) -> Self {
        let mut terms = Trie::new();
        for line in split_lines(text) {
            let line = line.trim();
            if line.is_empty() || (!comment_prefix.is_empty() && line.starts_with(comment_prefix)) {
                continue;
            }
            terms.insert(&fold_case(line), ());
        }
        Self { terms }
    }

    pub fn load(path: &Path, comment_prefix: &str) -> Result<Self> {
        let text = read_text(path).map_err(|source| SampleError::DictionaryUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text, comment_prefix))
    }

    /// Looks `term` up after folding it the same way entries were folded.
    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(&fold_case(term))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Dictionaries keyed by normalized path, each built at most once per run.
///
/// Owned by the run context and handed to evaluators explicitly. The lock is
/// held across a build, so concurrent first references cannot build twice.
#[derive(Debug)]
pub struct DictionaryRegistry {
    comment_prefix: String,
    loaded: Mutex<HashMap<PathBuf, Arc<Dictionary>>>,
}

impl Default for DictionaryRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_COMMENT_PREFIX)
    }
}

impl DictionaryRegistry {
    pub fn new(comment_prefix: &str) -> Self {
        Self {
            comment_prefix: comment_prefix.to_string(),
            loaded: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the dictionary for `path`, building it on first reference.
    pub fn get_or_load(&self, path: &Path) -> Result<Arc<Dictionary>> {
        let key = normalize_path(path)?;
        let mut loaded = self.loaded.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(dictionary) = loaded.get(&key) {
            debug!("Reusing dictionary {}", path.display());
            return Ok(Arc::clone(dictionary));
        }

        let dictionary = Arc::new(Dictionary::load(path, &self.comment_prefix)?);
        info!(
            "Loaded dictionary {} ({} terms)",
            path.display(),
            dictionary.len()
        );
        loaded.insert(key, Arc::clone(&dictionary));
        Ok(dictionary)
    }

    /// Number of distinct dictionaries built so far.
    pub fn len(&self) -> usize {
        self.loaded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Absolute, case-folded form of `path` used as the registry key.
fn normalize_path(path: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(path).map_err(|source| SampleError::DictionaryUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(PathBuf::from(fold_case(&absolute.to_string_lossy())))
}
