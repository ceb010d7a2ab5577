//! The article treatment pipeline.
//!
//! Stages run in a fixed order over the whole dataset:
//! 1. Score relevance and drop articles below `min_crit`
//! 2. Drop duplicate texts, sort by date
//! 3. Normalize `text`
//! 4. Translate `text` (adds `translation`)
//! 5. Strip `text`: lowercase, stopwords, punctuation, numbers
//! 6. Write the spreadsheet
//!
//! Only an unknown category or a persistence failure aborts a run.
//! Translation failures are recorded as the sentinel value.

use rayon::prelude::*;
use std::path::PathBuf;
use tracing::{info, info_span, warn};

use crate::article::Article;
use crate::category::{Category, KeywordCatalog};
use crate::clean::{normalize_text, Stripper};
use crate::config::PipelineConfig;
use crate::dedup::Deduplicator;
use crate::error::{PipelineError, Result};
use crate::export::{DatasetWriter, XlsxWriter};
use crate::relevance::{RelevanceScorer, DEFAULT_MIN_CRIT};
use crate::translate::{GoogleTranslator, TranslationStage};

/// Enter a tracing span named after the running stage.
macro_rules! stage_span {
    ($name:expr) => {
        let _span = info_span!("pipeline_stage", stage = $name).entered();
    };
}

pub struct Pipeline {
    catalog: KeywordCatalog,
    min_crit: usize,
    deduplicator: Deduplicator,
    stripper: Stripper,
    translation: TranslationStage,
    writer: Box<dyn DatasetWriter>,
    clean_translation: bool,
}

impl Pipeline {
    /// A pipeline with `min_crit = 1` and the built-in stopword lists.
    pub fn new(
        catalog: KeywordCatalog,
        translation: TranslationStage,
        writer: impl DatasetWriter + 'static,
    ) -> Self {
        Self {
            catalog,
            min_crit: DEFAULT_MIN_CRIT,
            deduplicator: Deduplicator::new(),
            stripper: Stripper::builtin(),
            translation,
            writer: Box::new(writer),
            clean_translation: false,
        }
    }

    /// Production wiring: Google translation, xlsx output, configured
    /// catalog and thresholds.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        let translator =
            GoogleTranslator::new(&config.translation.endpoint, config.translation.timeout())
                .map_err(|e| {
                    PipelineError::Config(format!("cannot build translation client: {e}"))
                })?;

        let translation = TranslationStage::new(translator)
            .with_policy(config.translation.retry_policy())
            .with_languages(&config.source_lang, &config.target_lang)
            .with_workers(config.translation.workers);

        Ok(Self::new(
            config.keyword_catalog()?,
            translation,
            XlsxWriter::new(&config.output_dir),
        )
        .with_min_crit(config.min_crit)
        .with_clean_translation(config.clean_translation))
    }

    pub fn with_min_crit(mut self, min_crit: usize) -> Self {
        self.min_crit = min_crit;
        self
    }

    pub fn with_stripper(mut self, stripper: Stripper) -> Self {
        self.stripper = stripper;
        self
    }

    pub fn with_clean_translation(mut self, clean_translation: bool) -> Self {
        self.clean_translation = clean_translation;
        self
    }

    /// Run every stage and persist the result.
    pub fn run(&self, articles: Vec<Article>, category: &str) -> Result<Vec<Article>> {
        self.run_with_path(articles, category).map(|(articles, _)| articles)
    }

    /// Like [`Pipeline::run`], also returning where the output was written.
    pub fn run_with_path(
        &self,
        articles: Vec<Article>,
        category: &str,
    ) -> Result<(Vec<Article>, PathBuf)> {
        let category: Category = category.parse()?;
        info!(%category, rows = articles.len(), "starting article treatment");

        let articles = {
            stage_span!("relevance");
            let scorer = RelevanceScorer::new(self.catalog.keywords(category), self.min_crit);
            let kept = scorer.filter(articles);
            info!(rows = kept.len(), min_crit = self.min_crit, "filtered by keyword relevance");
            kept
        };

        let mut articles = {
            stage_span!("dedup");
            let unique = self.deduplicator.deduplicate(articles);
            info!(rows = unique.len(), "removed duplicate articles");
            unique
        };

        {
            stage_span!("normalize");
            articles
                .par_iter_mut()
                .for_each(|article| article.text = normalize_text(&article.text));
        }

        {
            stage_span!("translate");
            let failures = self.translation.translate_all(&mut articles);
            if failures > 0 {
                warn!(failures, rows = articles.len(), "some translations failed");
            } else {
                info!(rows = articles.len(), "translated all articles");
            }
        }

        {
            stage_span!("strip");
            let clean_translation = self.clean_translation;
            articles.par_iter_mut().for_each(|article| {
                article.text = self.stripper.strip(&article.text);
                if clean_translation {
                    if let Some(translation) = &article.translation {
                        article.translation = Some(self.stripper.strip(translation));
                    }
                }
            });
        }

        let path = {
            stage_span!("persist");
            self.writer.write(&articles, category)?
        };

        Ok((articles, path))
    }
}

/// Treat `articles` for `category` using configuration from the
/// environment (see [`PipelineConfig::load`]).
#[doc(alias = "tratamento")]
pub fn treat_articles(articles: Vec<Article>, category: &str) -> Result<Vec<Article>> {
    // Validate before touching configuration or the network
    category.parse::<Category>()?;

    let config = PipelineConfig::load()?;
    Pipeline::from_config(&config)?.run(articles, category)
}
