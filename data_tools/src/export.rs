//! Spreadsheet output.
//!
//! The pipeline's only side effect: one worksheet with a header row and
//! one row per article, written once at the end of a run.

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::article::{Article, COLUMNS};
use crate::category::Category;
use crate::error::{PipelineError, Result};

/// Excel's limit on characters per cell.
const MAX_CELL_CHARS: usize = 32_767;

/// File name of the processed dataset for `category`.
pub fn output_file_name(category: Category) -> String {
    format!("noticicas_tratadas_{}.xlsx", category.name())
}

/// Persists a processed dataset.
pub trait DatasetWriter: Send + Sync {
    /// Write `articles` and return where they went.
    fn write(&self, articles: &[Article], category: Category) -> Result<PathBuf>;
}

/// Writes `.xlsx` files into a directory.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    output_dir: PathBuf,
}

impl XlsxWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Write `articles` to an explicit path.
    pub fn write_to(&self, articles: &[Article], path: &Path) -> Result<(), XlsxError> {
        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");

        let worksheet = workbook.add_worksheet();
        for (col, name) in COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *name, &header)?;
        }

        for (idx, article) in articles.iter().enumerate() {
            let row = (idx + 1) as u32;
            worksheet.write_datetime_with_format(row, 0, &article.published_at, &date_format)?;
            worksheet.write_string(row, 1, fit_cell(&article.source_url))?;
            worksheet.write_string(row, 2, fit_cell(&article.text))?;
            worksheet.write_number(row, 3, article.keyword_count as f64)?;
            if let Some(translation) = &article.translation {
                worksheet.write_string(row, 4, fit_cell(translation))?;
            }
        }

        workbook.save(path)?;
        Ok(())
    }
}

impl DatasetWriter for XlsxWriter {
    fn write(&self, articles: &[Article], category: Category) -> Result<PathBuf> {
        let path = self.output_dir.join(output_file_name(category));

        self.write_to(articles, &path)
            .map_err(|e| PipelineError::Persistence {
                path: path.clone(),
                source: Box::new(e),
            })?;

        info!(path = %path.display(), rows = articles.len(), "wrote processed articles");
        Ok(path)
    }
}

/// Truncate to Excel's per-cell limit on a char boundary.
fn fit_cell(text: &str) -> &str {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            debug!(chars = text.chars().count(), "truncating oversized cell");
            &text[..end]
        }
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Vec<Article> {
        let date = NaiveDate::from_ymd_opt(2024, 4, 2)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap();
        let mut translated = Article::new(date, "https://exemplo.com.br/1", "safra recorde");
        translated.keyword_count = 2;
        translated.translation = Some("record harvest".to_string());
        let mut failed = Article::new(date, "https://exemplo.com.br/2", "colheita");
        failed.keyword_count = 1;
        failed.translation = Some("ERRO".to_string());
        vec![translated, failed]
    }

    #[test]
    fn test_output_file_name() {
        assert_eq!(
            output_file_name(Category::Agronegocio),
            "noticicas_tratadas_Agronegócio.xlsx"
        );
        assert_eq!(
            output_file_name(Category::MercadoDeTrabalho),
            "noticicas_tratadas_Mercado de Trabalho.xlsx"
        );
    }

    #[test]
    fn test_writes_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let writer = XlsxWriter::new(dir.path());

        let path = writer.write(&sample(), Category::Agronegocio).unwrap();

        assert_eq!(path, dir.path().join("noticicas_tratadas_Agronegócio.xlsx"));
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_empty_dataset_still_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = XlsxWriter::new(dir.path())
            .write(&[], Category::Servicos)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_missing_directory_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let writer = XlsxWriter::new(dir.path().join("does/not/exist"));

        let err = writer.write(&sample(), Category::Industria).unwrap_err();
        assert_eq!(err.kind(), "persistence");
    }

    #[test]
    fn test_fit_cell() {
        assert_eq!(fit_cell("curto"), "curto");

        let long = "é".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(fit_cell(&long).chars().count(), MAX_CELL_CHARS);
    }
}
