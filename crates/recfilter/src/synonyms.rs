//! Synonym table supplied to the evaluator at construction time.
//!
//! A [`SynonymTable`] maps a canonical word to an ordered list of alternates
//! considered equivalent during full-text matching. It is an explicit
//! capability injected into
//! [`FilterEvaluator::new`](crate::filter::FilterEvaluator::new), loaded once
//! and read-only thereafter.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A specialized Result type for synonym loading.
pub type SynonymResult<T> = Result<T, SynonymError>;

/// Errors that can occur while loading a synonym file.
///
/// A missing file is not an error; [`SynonymTable::load`] maps it to an empty
/// table.
#[derive(Debug, Error)]
pub enum SynonymError {
    /// The file exists but could not be read.
    #[error("failed to read synonym file: {0}")]
    Io(#[from] io::Error),

    /// The file contents are not a JSON object of word to synonym-list.
    #[error("malformed synonym file: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Mapping from a canonical word to its list of synonym words.
///
/// Lookup is by exact, case-sensitive key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SynonymTable {
    entries: HashMap<String, Vec<String>>,
}

impl SynonymTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a table from a JSON file mapping each word to an array of
    /// synonym strings.
    ///
    /// A missing file yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`SynonymError::Io`] for any read failure other than
    /// file-not-found, and [`SynonymError::Malformed`] if the contents do not
    /// parse as a word-to-synonyms object.
    pub fn load(path: impl AsRef<Path>) -> SynonymResult<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(err) => return Err(err.into()),
        };
        let entries = serde_json::from_str(&contents)?;
        Ok(Self { entries })
    }

    /// Adds or replaces the synonym list for a word.
    pub fn insert(&mut self, word: impl Into<String>, synonyms: Vec<String>) {
        self.entries.insert(word.into(), synonyms);
    }

    /// Returns the synonyms recorded for a word, if any.
    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.entries.get(word).map(Vec::as_slice)
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of words with synonym lists.
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl From<HashMap<String, Vec<String>>> for SynonymTable {
    fn from(entries: HashMap<String, Vec<String>>) -> Self {
        Self { entries }
    }
}
