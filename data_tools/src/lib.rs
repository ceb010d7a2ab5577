//! newsprep Data Tools: news article treatment.
//!
//! Turns scraped Portuguese news rows into a cleaned, translated dataset
//! for one economic category:
//!
//! - **Relevance** (`relevance`): counts category keywords per article
//!   and drops articles below `min_crit`
//! - **Deduplication** (`dedup`): exact-text duplicates via xxh3
//!   fingerprints, then a stable sort by publication date
//! - **Normalization and stripping** (`clean`): whitespace cleanup,
//!   stopword/punctuation/digit removal
//! - **Translation** (`translate`): Portuguese → English with a bounded
//!   retry policy and the `"ERRO"` sentinel for failures
//! - **Export** (`export`): one `noticicas_tratadas_{category}.xlsx`
//!   per run
//!
//! `pipeline::Pipeline` wires the stages together in that order.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use newsprep_data_tools::{treat_articles, Article};
//!
//! let published = NaiveDate::from_ymd_opt(2024, 3, 1)
//!     .unwrap()
//!     .and_hms_opt(9, 0, 0)
//!     .unwrap();
//! let rows = vec![Article::new(
//!     published,
//!     "https://exemplo.com.br/noticia",
//!     "Colheita de soja bate recorde",
//! )];
//!
//! let treated = treat_articles(rows, "Agronegócio").unwrap();
//! println!("{} articles kept", treated.len());
//! ```

pub mod article;
pub mod category;
pub mod clean;
pub mod config;
pub mod dedup;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod relevance;
pub mod translate;

#[cfg(feature = "python")]
pub mod python;

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module entry point
#[cfg(feature = "python")]
#[pymodule]
fn newsprep_data_tools_rs(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(python::fast_normalize_text, m)?)?;
    m.add_function(wrap_pyfunction!(python::fast_normalize_batch, m)?)?;
    m.add_function(wrap_pyfunction!(python::fast_strip_text, m)?)?;
    m.add_function(wrap_pyfunction!(python::fast_strip_batch, m)?)?;
    m.add_function(wrap_pyfunction!(python::tratamento, m)?)?;
    Ok(())
}

// Re-export main types
pub use article::{parse_published_at, Article};
pub use category::{Category, KeywordCatalog};
pub use clean::{normalize_batch, normalize_text, Stripper};
pub use config::PipelineConfig;
pub use dedup::Deduplicator;
pub use error::{PipelineError, Result, TranslationError};
pub use export::{output_file_name, DatasetWriter, XlsxWriter};
pub use pipeline::{treat_articles, Pipeline};
pub use relevance::RelevanceScorer;
pub use translate::{
    GoogleTranslator, RetryPolicy, TranslationStage, Translator, TRANSLATION_SENTINEL,
};
