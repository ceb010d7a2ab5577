//! Exact-duplicate removal and chronological ordering.
//!
//! Scrapers often fetch the same story from several listing pages, so
//! identical article bodies show up more than once:
//! - **Fingerprinting**: each body is hashed with xxh3 (parallelized via
//!   rayon)
//! - **Grouping**: articles sharing a fingerprint are compared in full,
//!   so only byte-identical texts collapse
//! - **Ordering**: survivors are sorted by publication date
//!
//! The first occurrence of each text wins, with all of its fields.

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use xxhash_rust::xxh3::xxh3_64;

use crate::article::Article;

/// Content fingerprint of an article body.
#[inline]
pub fn fingerprint(text: &str) -> u64 {
    xxh3_64(text.as_bytes())
}

/// The deduplication engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator;

impl Deduplicator {
    pub fn new() -> Self {
        Self
    }

    /// Compute fingerprints for a batch of articles in parallel.
    pub fn fingerprints_batch(&self, articles: &[Article]) -> Vec<u64> {
        articles
            .par_iter()
            .map(|article| fingerprint(&article.text))
            .collect()
    }

    /// Find indices of duplicate articles.
    ///
    /// Returns the set of indices to REMOVE (keeps the first article
    /// carrying each text).
    pub fn find_duplicates(&self, articles: &[Article]) -> HashSet<usize> {
        let fingerprints = self.fingerprints_batch(articles);

        // fingerprint → indices of kept articles with that fingerprint
        let mut kept: HashMap<u64, Vec<usize>> = HashMap::with_capacity(articles.len());
        let mut to_remove = HashSet::new();

        for (idx, fp) in fingerprints.into_iter().enumerate() {
            let bucket = kept.entry(fp).or_default();
            if bucket
                .iter()
                .any(|&k| articles[k].text == articles[idx].text)
            {
                to_remove.insert(idx);
            } else {
                bucket.push(idx);
            }
        }

        to_remove
    }

    /// Drop duplicate texts and sort ascending by publication date.
    ///
    /// The output carries only date, url, text and keyword count: any
    /// translation is cleared. The sort is stable, so articles with the
    /// same date keep their original relative order.
    pub fn deduplicate(&self, articles: Vec<Article>) -> Vec<Article> {
        let to_remove = self.find_duplicates(&articles);

        let mut unique: Vec<Article> = articles
            .into_iter()
            .enumerate()
            .filter(|(idx, _)| !to_remove.contains(idx))
            .map(|(_, mut article)| {
                article.translation = None;
                article
            })
            .collect();

        unique.sort_by_key(|article| article.published_at);
        unique
    }
}
