//! Text normalization and stripping.
//!
//! Two stages of the article pipeline live here:
//! - **Normalization** (`normalize_text`): newlines, carriage returns,
//!   hyphens and tabs become spaces, then whitespace runs (including the
//!   U+001C..U+001F separators) collapse to a single space.
//!   Leading/trailing space is kept.
//! - **Stripping** (`Stripper`): lowercase, drop Portuguese stopwords,
//!   drop English stopwords, delete punctuation, delete digits, always
//!   in that order.

use newsprep_tokenizer::{Language, StopwordSet, Tokenizer, WordTokenizer};
use rayon::prelude::*;
use std::iter;
use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

/// The fixed punctuation set removed by [`remove_punctuation`].
pub const PUNCTUATION: &str = r##"!"#$%&'()*+,-./:;<=>?@[\]^_`{|}~"##;

/// Replace structural noise with spaces and collapse whitespace runs.
///
/// Single pass, no regex. Idempotent.
pub fn normalize_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last_was_space = false;

    for ch in text.chars() {
        let ch = match ch {
            '\n' | '\r' | '-' | '\t' => ' ',
            c => c,
        };

        if is_space(ch) {
            if !last_was_space {
                result.push(' ');
                last_was_space = true;
            }
        } else {
            result.push(ch);
            last_was_space = false;
        }
    }

    result
}

/// Unicode whitespace plus the file/group/record/unit separators.
fn is_space(ch: char) -> bool {
    ch.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&ch)
}

/// Normalize multiple texts in parallel, preserving order.
pub fn normalize_batch(texts: Vec<String>) -> Vec<String> {
    texts
        .into_par_iter()
        .map(|text| normalize_text(&text))
        .collect()
}

/// Tokenize, drop tokens found in `stopwords`, and rejoin with single spaces.
pub fn remove_stopwords(text: &str, stopwords: &StopwordSet, tokenizer: &dyn Tokenizer) -> String {
    tokenizer
        .tokenize(text)
        .into_iter()
        .filter(|token| !stopwords.is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Delete every character of [`PUNCTUATION`].
pub fn remove_punctuation(text: &str) -> String {
    text.chars().filter(|c| !PUNCTUATION.contains(*c)).collect()
}

/// Delete every digit character.
///
/// Fractions and other numerals (`½`, `Ⅻ`) are kept.
pub fn remove_numbers(text: &str) -> String {
    text.chars().filter(|&c| !is_digit(c)).collect()
}

/// A decimal digit (`Nd`), or a compatibility form of exactly one (`²`, `①`).
fn is_digit(c: char) -> bool {
    let decimal = |c: char| c.general_category() == GeneralCategory::DecimalNumber;
    if decimal(c) {
        return true;
    }
    if !c.is_numeric() {
        return false;
    }

    let mut folded = iter::once(c).nfkc();
    matches!((folded.next(), folded.next()), (Some(d), None) if decimal(d))
}

/// The stopword/punctuation/number stripping chain.
pub struct Stripper {
    portuguese: StopwordSet,
    english: StopwordSet,
    tokenizer: Box<dyn Tokenizer>,
}

impl Stripper {
    pub fn new(portuguese: StopwordSet, english: StopwordSet) -> Self {
        Self {
            portuguese,
            english,
            tokenizer: Box::new(WordTokenizer),
        }
    }

    /// Built-in Portuguese and English stopword lists.
    pub fn builtin() -> Self {
        Self::new(
            StopwordSet::new(Language::Portuguese),
            StopwordSet::new(Language::English),
        )
    }

    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    /// Run the full chain on one text.
    pub fn strip(&self, text: &str) -> String {
        let result = text.to_lowercase();
        let result = remove_stopwords(&result, &self.portuguese, self.tokenizer.as_ref());
        let result = remove_stopwords(&result, &self.english, self.tokenizer.as_ref());
        let result = remove_punctuation(&result);
        remove_numbers(&result)
    }

    /// Strip multiple texts in parallel, preserving order.
    pub fn strip_batch(&self, texts: Vec<String>) -> Vec<String> {
        texts.into_par_iter().map(|text| self.strip(&text)).collect()
    }
}
