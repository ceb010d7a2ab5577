use crate::article::{parse_published_at, Article};
use crate::clean::{normalize_batch, normalize_text, Stripper};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use pyo3::exceptions::{PyIOError, PyValueError};
use pyo3::prelude::*;
use std::path::PathBuf;

/// One processed row: (Data, endereco, Texto, Num_Palavras-Chave, Traducao)
type Row = (String, String, String, usize, Option<String>);

fn to_py_err(error: PipelineError) -> PyErr {
    match error {
        PipelineError::Persistence { .. } | PipelineError::Io { .. } => {
            PyIOError::new_err(error.to_string())
        }
        _ => PyValueError::new_err(error.to_string()),
    }
}

/// Replace newlines, tabs and hyphens with spaces and collapse runs
#[pyfunction]
pub fn fast_normalize_text(text: String) -> String {
    normalize_text(&text)
}

/// Normalize a list of texts in parallel
#[pyfunction]
pub fn fast_normalize_batch(texts: Vec<String>) -> Vec<String> {
    normalize_batch(texts)
}

/// Lowercase, drop pt/en stopwords, punctuation and digits
#[pyfunction]
pub fn fast_strip_text(text: String) -> String {
    Stripper::builtin().strip(&text)
}

/// Batched stripping, in parallel
#[pyfunction]
pub fn fast_strip_batch(texts: Vec<String>) -> Vec<String> {
    Stripper::builtin().strip_batch(texts)
}

/// Run the full treatment on `(Data, endereco, Texto)` rows and write
/// `noticicas_tratadas_{category}.xlsx`. Returns the processed rows.
#[pyfunction]
#[pyo3(signature = (rows, category, min_crit=None, output_dir=None))]
pub fn tratamento(
    py: Python<'_>,
    rows: Vec<(String, String, String)>,
    category: String,
    min_crit: Option<usize>,
    output_dir: Option<PathBuf>,
) -> PyResult<Vec<Row>> {
    let articles = rows
        .into_iter()
        .enumerate()
        .map(|(idx, (date, url, text))| {
            parse_published_at(&date)
                .map(|published_at| Article::new(published_at, url, text))
                .ok_or_else(|| PyValueError::new_err(format!("row {idx}: invalid date {date:?}")))
        })
        .collect::<PyResult<Vec<_>>>()?;

    let mut config = PipelineConfig::load().map_err(to_py_err)?;
    if let Some(min_crit) = min_crit {
        config.min_crit = min_crit;
    }
    if let Some(dir) = output_dir {
        config.output_dir = dir;
    }

    let pipeline = Pipeline::from_config(&config).map_err(to_py_err)?;
    let treated = py
        .allow_threads(|| pipeline.run(articles, &category))
        .map_err(to_py_err)?;

    Ok(treated
        .into_iter()
        .map(|article| {
            (
                article.published_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                article.source_url,
                article.text,
                article.keyword_count,
                article.translation,
            )
        })
        .collect())
}
