use pyo3::prelude::*;
use std::path::Path;

use crate::stopwords::{Language, StopwordSet};
use crate::words;

/// Split text into word and punctuation tokens
#[pyfunction]
pub fn word_tokenize(text: &str) -> Vec<String> {
    words::word_tokenize(text)
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Python wrapper for a stopword set
#[pyclass(name = "StopwordSet", module = "newsprep_tokenizer_rs")]
pub struct PyStopwordSet {
    pub(crate) inner: StopwordSet,
}

#[pymethods]
impl PyStopwordSet {
    /// Built-in list for "pt"/"portuguese" or "en"/"english"
    #[new]
    pub fn new(language: &str) -> PyResult<Self> {
        let language = Language::from_code(language).ok_or_else(|| {
            pyo3::exceptions::PyValueError::new_err(format!("unsupported language: {language}"))
        })?;
        Ok(Self {
            inner: StopwordSet::new(language),
        })
    }

    #[staticmethod]
    pub fn from_list(words: Vec<String>) -> Self {
        Self {
            inner: StopwordSet::from_list(&words),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.inner.is_stopword(word)
    }

    pub fn extend(&mut self, words: Vec<String>) {
        self.inner.extend(&words);
    }

    /// Save the set to a JSON file
    pub fn save(&self, path: &str) -> PyResult<()> {
        self.inner
            .save(Path::new(path))
            .map_err(|e| pyo3::exceptions::PyIOError::new_err(e.to_string()))
    }

    /// Load a set from a JSON file
    #[staticmethod]
    pub fn load(path: &str) -> PyResult<Self> {
        let inner = StopwordSet::load(Path::new(path))
            .map_err(|e| pyo3::exceptions::PyIOError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn __len__(&self) -> usize {
        self.inner.len()
    }
}
