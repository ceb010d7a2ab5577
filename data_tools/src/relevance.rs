//! Keyword relevance scoring.
//!
//! An article's score is the number of distinct category keywords that
//! occur anywhere in its text, compared case-insensitively as plain
//! substrings. Articles scoring below `min_crit` are dropped.

use rayon::prelude::*;

use crate::article::Article;

/// Default minimum number of keywords for an article to be kept.
pub const DEFAULT_MIN_CRIT: usize = 1;

#[derive(Debug, Clone)]
pub struct RelevanceScorer {
    /// Lowercased, de-duplicated, non-empty keywords
    keywords: Vec<String>,
    min_crit: usize,
}

impl RelevanceScorer {
    pub fn new<S: AsRef<str>>(keywords: &[S], min_crit: usize) -> Self {
        let mut lowered: Vec<String> = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            let keyword = keyword.as_ref().to_lowercase();
            if !keyword.is_empty() && !lowered.contains(&keyword) {
                lowered.push(keyword);
            }
        }

        Self {
            keywords: lowered,
            min_crit,
        }
    }

    pub fn min_crit(&self) -> usize {
        self.min_crit
    }

    /// Number of distinct keywords found in `text`.
    pub fn count_keywords(&self, text: &str) -> usize {
        let text = text.to_lowercase();
        self.keywords
            .iter()
            .filter(|keyword| text.contains(keyword.as_str()))
            .count()
    }

    /// Score every article and keep those with at least `min_crit`
    /// keywords. Order is preserved.
    pub fn filter(&self, articles: Vec<Article>) -> Vec<Article> {
        articles
            .into_par_iter()
            .filter_map(|mut article| {
                article.keyword_count = self.count_keywords(&article.text);
                (article.keyword_count >= self.min_crit).then_some(article)
            })
            .collect()
    }
}
