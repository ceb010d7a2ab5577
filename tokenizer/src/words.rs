//! Word tokenization.
//!
//! Splits text into word and punctuation tokens with a single pass over
//! the characters (no regex):
//! - whitespace separates tokens and is dropped
//! - every punctuation or symbol character becomes its own token
//! - `.` and `,` between two digits stay inside the number (`2,5`, `1.000`)
//! - an apostrophe between two letters stays inside the word (`d'água`)
//!
//! Tokens borrow from the input, so tokenizing never copies text.

/// Splits a string into word tokens.
///
/// This is the seam the cleaning stages use, so a different tokenizer
/// (e.g. a language-specific one) can be swapped in.
pub trait Tokenizer: Send + Sync {
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str>;
}

/// Default whitespace + punctuation tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    #[inline]
    fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        word_tokenize(text)
    }
}

/// Tokenize `text` into words and standalone punctuation marks.
pub fn word_tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        let next = chars.peek().map(|&(_, c)| c);

        if ch.is_whitespace() {
            if let Some(s) = start.take() {
                tokens.push(&text[s..idx]);
            }
        } else if ch.is_alphanumeric() {
            if start.is_none() {
                start = Some(idx);
            }
        } else if start.is_some() && joins_word(prev, ch, next) {
            // Separator inside a number or an elided word
        } else {
            if let Some(s) = start.take() {
                tokens.push(&text[s..idx]);
            }
            tokens.push(&text[idx..idx + ch.len_utf8()]);
        }

        prev = Some(ch);
    }

    if let Some(s) = start {
        tokens.push(&text[s..]);
    }

    tokens
}

/// Whether `ch` (between `prev` and `next`) belongs to the surrounding word.
fn joins_word(prev: Option<char>, ch: char, next: Option<char>) -> bool {
    let (Some(p), Some(n)) = (prev, next) else {
        return false;
    };

    match ch {
        '.' | ',' => p.is_numeric() && n.is_numeric(),
        '\'' | '’' => p.is_alphabetic() && n.is_alphabetic(),
        _ => false,
    }
}
