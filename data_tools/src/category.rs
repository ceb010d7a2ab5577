//! Topical categories and their keyword lists.
//!
//! The category set is closed: exactly the five variants of [`Category`].
//! Which keywords belong to each category is configuration, held by a
//! [`KeywordCatalog`] loaded from TOML. The built-in catalog is embedded
//! in the crate.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::error::{PipelineError, Result};

const BUILTIN_CATALOG: &str = include_str!("../config/keywords.toml");

/// A topical filter selecting one keyword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Agronegocio,
    Industria,
    MercadoDeTrabalho,
    MercadoFinanceiro,
    Servicos,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Agronegocio,
        Category::Industria,
        Category::MercadoDeTrabalho,
        Category::MercadoFinanceiro,
        Category::Servicos,
    ];

    /// Canonical label, as accepted by `from_str` and used in file names.
    pub fn name(&self) -> &'static str {
        match self {
            Category::Agronegocio => "Agronegócio",
            Category::Industria => "Indústria",
            Category::MercadoDeTrabalho => "Mercado de Trabalho",
            Category::MercadoFinanceiro => "Mercado Financeiro",
            Category::Servicos => "Serviços",
        }
    }
}

impl FromStr for Category {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        Category::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| PipelineError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    categories: BTreeMap<String, Vec<String>>,
}

/// Immutable mapping from category to keyword list.
#[derive(Debug, Clone)]
pub struct KeywordCatalog {
    lists: HashMap<Category, Vec<String>>,
}

impl KeywordCatalog {
    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CATALOG)
    }

    /// Load a catalog from a TOML file with a `[categories]` table.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Parse a catalog. Every category must be present with at least one
    /// keyword, and no other category may appear.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| PipelineError::Config(format!("keyword catalog: {e}")))?;

        let mut lists = HashMap::with_capacity(Category::ALL.len());
        for (name, keywords) in file.categories {
            let category = name.parse::<Category>().map_err(|_| {
                PipelineError::Config(format!("keyword catalog names unknown category {name:?}"))
            })?;
            if keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(PipelineError::Config(format!(
                    "keyword catalog has no keywords for {category}"
                )));
            }
            lists.insert(category, keywords);
        }

        if let Some(missing) = Category::ALL.iter().find(|c| !lists.contains_key(*c)) {
            return Err(PipelineError::Config(format!(
                "keyword catalog is missing category {missing}"
            )));
        }

        Ok(Self { lists })
    }

    /// Keywords for `category`.
    pub fn keywords(&self, category: Category) -> &[String] {
        self.lists
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_category_names() {
        for category in Category::ALL {
            assert_eq!(category.name().parse::<Category>().unwrap(), category);
        }
        assert_eq!(
            "Mercado Financeiro".parse::<Category>().unwrap(),
            Category::MercadoFinanceiro
        );
    }

    #[test]
    fn test_unknown_category() {
        let err = "Tecnologia".parse::<Category>().unwrap_err();
        assert_eq!(err.kind(), "unknown_category");

        // Labels must match exactly
        assert!("agronegócio".parse::<Category>().is_err());
        assert!("Agronegocio".parse::<Category>().is_err());
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = KeywordCatalog::builtin().unwrap();

        assert_eq!(catalog.keywords(Category::Agronegocio).len(), 20);
        assert_eq!(catalog.keywords(Category::Servicos).len(), 21);
        assert!(catalog
            .keywords(Category::MercadoFinanceiro)
            .iter()
            .any(|k| k == "Câmbio"));
        assert!(catalog
            .keywords(Category::MercadoFinanceiro)
            .iter()
            .any(|k| k == "Ações"));
    }

    #[test]
    fn test_cambio_and_acoes_score_separately() {
        let catalog = KeywordCatalog::builtin().unwrap();
        let financeiro = catalog.keywords(Category::MercadoFinanceiro);
        assert_eq!(financeiro.len(), 15);
        assert!(!financeiro.iter().any(|k| k.contains("CâmbioAções")));

        let scorer = crate::relevance::RelevanceScorer::new(financeiro, 1);
        assert_eq!(scorer.count_keywords("Câmbio dispara"), 1);
        assert_eq!(scorer.count_keywords("Ações caem"), 1);
    }

    #[test]
    fn test_catalog_missing_category() {
        let toml = r#"
            [categories]
            "Agronegócio" = ["Soja"]
        "#;
        let err = KeywordCatalog::from_toml_str(toml).unwrap_err();
        assert_eq!(err.kind(), "config");
        assert!(err.to_string().contains("missing category"));
    }

    #[test]
    fn test_catalog_rejects_unknown_category() {
        let mut toml = String::from("[categories]\n");
        for category in Category::ALL {
            toml.push_str(&format!("\"{}\" = [\"x\"]\n", category.name()));
        }
        toml.push_str("\"Varejo\" = [\"loja\"]\n");

        let err = KeywordCatalog::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("Varejo"));
    }

    #[test]
    fn test_catalog_rejects_empty_list() {
        let mut toml = String::from("[categories]\n");
        for category in Category::ALL {
            toml.push_str(&format!("\"{}\" = [\"x\"]\n", category.name()));
        }
        let toml = toml.replace("\"Serviços\" = [\"x\"]", "\"Serviços\" = []");

        let err = KeywordCatalog::from_toml_str(&toml).unwrap_err();
        assert!(err.to_string().contains("Serviços"));
    }
}
