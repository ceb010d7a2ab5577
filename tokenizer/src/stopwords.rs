//! Per-language stopword sets.
//!
//! Built-in sets are the NLTK lists shipped by the `stop-words` crate
//! (about 200 words each), which keep content words such as "ano" or
//! "million" out of the set. Custom sets can be
//! built from a word list, extended, and saved to / loaded from JSON.
//! Words are always stored lowercase; lookups are case-insensitive.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use stop_words::{get, LANGUAGE};

/// Languages with a built-in stopword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Portuguese,
    English,
}

impl Language {
    /// ISO 639-1 code, as used by translation services.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Portuguese => "pt",
            Language::English => "en",
        }
    }

    /// Parse an ISO code or an English language name.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "pt" | "portuguese" => Some(Language::Portuguese),
            "en" | "english" => Some(Language::English),
            _ => None,
        }
    }
}

/// A set of stopwords.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StopwordSet {
    /// Source language, `None` for custom lists
    pub language: Option<Language>,
    words: HashSet<String>,
}

impl StopwordSet {
    /// Load the built-in stopword list for `language`.
    pub fn new(language: Language) -> Self {
        let lang = match language {
            Language::Portuguese => LANGUAGE::Portuguese,
            Language::English => LANGUAGE::English,
        };

        Self {
            language: Some(language),
            words: get(lang).iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    /// An empty set (filters nothing).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a custom set from a word list.
    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        Self {
            language: None,
            words: words.iter().map(|w| w.as_ref().to_lowercase()).collect(),
        }
    }

    /// Add words to the set.
    pub fn extend<S: AsRef<str>>(&mut self, words: &[S]) {
        self.words
            .extend(words.iter().map(|w| w.as_ref().to_lowercase()));
    }

    /// Remove words from the set.
    pub fn remove<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.words.remove(&word.as_ref().to_lowercase());
        }
    }

    /// Case-insensitive membership test.
    pub fn is_stopword(&self, word: &str) -> bool {
        self.words.contains(word) || self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Save the set to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load a set from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)?;
        let set: Self = serde_json::from_str(&json)?;

        // Hand-edited files may carry capitalized entries
        Ok(Self {
            language: set.language,
            words: set.words.into_iter().map(|w| w.to_lowercase()).collect(),
        })
    }
}
