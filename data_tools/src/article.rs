//! Article records flowing through the pipeline.
//!
//! Field names serialize to the column names the scraper produces and
//! the spreadsheet consumers expect (`Data`, `endereco`, `Texto`, ...).

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Output column order.
pub const COLUMNS: [&str; 5] = ["Data", "endereco", "Texto", "Num_Palavras-Chave", "Traducao"];

/// One scraped news article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "Data")]
    pub published_at: NaiveDateTime,
    #[serde(rename = "endereco")]
    pub source_url: String,
    #[serde(rename = "Texto")]
    pub text: String,
    /// Distinct category keywords found in `text`, set by the scorer
    #[serde(rename = "Num_Palavras-Chave", default)]
    pub keyword_count: usize,
    /// English translation, set by the translation stage
    #[serde(rename = "Traducao", default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<String>,
}

impl Article {
    /// A raw scraped row: not yet scored or translated.
    pub fn new(
        published_at: NaiveDateTime,
        source_url: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            published_at,
            source_url: source_url.into(),
            text: text.into(),
            keyword_count: 0,
            translation: None,
        }
    }
}

/// Parse the date formats scrapers commonly emit.
///
/// Date-only values are placed at midnight.
pub fn parse_published_at(value: &str) -> Option<NaiveDateTime> {
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M",
    ];
    const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];

    let value = value.trim();

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();

        assert_eq!(parse_published_at("2024-03-15 09:30:00"), Some(expected));
        assert_eq!(parse_published_at("2024-03-15T09:30:00"), Some(expected));
        assert_eq!(parse_published_at("15/03/2024 09:30"), Some(expected));
    }

    #[test]
    fn test_parse_date_only() {
        let midnight = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        assert_eq!(parse_published_at(" 2024-03-15 "), Some(midnight));
        assert_eq!(parse_published_at("15/03/2024"), Some(midnight));
        assert_eq!(parse_published_at("ontem"), None);
    }

    #[test]
    fn test_serializes_with_column_names() {
        let published_at = parse_published_at("2024-03-15").unwrap();
        let article = Article::new(published_at, "https://exemplo.com.br/a", "Safra recorde");

        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["endereco"], "https://exemplo.com.br/a");
        assert_eq!(json["Texto"], "Safra recorde");
        assert_eq!(json["Num_Palavras-Chave"], 0);
        assert!(json.get("Traducao").is_none());

        let back: Article = serde_json::from_value(json).unwrap();
        assert_eq!(back, article);
    }
}
