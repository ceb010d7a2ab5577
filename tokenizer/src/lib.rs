//! newsprep Tokenizer: word tokenization and stopword sets.
//!
//! This crate provides the NLP primitives the news cleaning pipeline
//! delegates to:
//!
//! - **Word tokenization** (`words`): splits text into word tokens and
//!   standalone punctuation marks, keeping numbers like `2,5` intact
//! - **Stopword sets** (`stopwords`): built-in Portuguese and English
//!   lists plus custom lists, with case-insensitive lookup and JSON
//!   save/load
//!
//! ## Usage
//!
//! ```rust
//! use newsprep_tokenizer::{word_tokenize, Language, StopwordSet};
//!
//! let english = StopwordSet::new(Language::English);
//! assert!(english.is_stopword("The"));
//!
//! let custom = StopwordSet::from_list(&["the"]);
//! let kept: Vec<&str> = word_tokenize("the harvest grew")
//!     .into_iter()
//!     .filter(|t| !custom.is_stopword(t))
//!     .collect();
//! assert_eq!(kept, vec!["harvest", "grew"]);
//! ```

pub mod stopwords;
pub mod words;

#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module entry point
#[cfg(feature = "python")]
#[pymodule]
fn newsprep_tokenizer_rs(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(python::word_tokenize, m)?)?;
    m.add_class::<python::PyStopwordSet>()?;
    Ok(())
}

// Re-export main types
pub use stopwords::{Language, StopwordSet};
pub use words::{word_tokenize, Tokenizer, WordTokenizer};
