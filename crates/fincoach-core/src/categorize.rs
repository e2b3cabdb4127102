//! Keyword-based transaction categorization
//!
//! A [`CategoryTable`] is an ordered list of categories, each with lowercase
//! keyword substrings. Categories are tried in declaration order and the
//! first keyword found in the lower-cased description wins, so declaration
//! order breaks ties between overlapping keywords ("gas" is transportation
//! before it is utilities).
//!
//! The table loads with the same resolution as [`crate::config::Config`]:
//! explicit path, then `categories.toml` in the data dir, then the embedded
//! default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::read_layered;
use crate::error::{Error, Result};
use crate::stats::round2;

const DEFAULT_CATEGORIES: &str = include_str!("../../../config/categories.toml");

/// Category reported when nothing matches
pub const UNCATEGORIZED: &str = "other";

/// Confidence reported for a keyword match
pub const MATCH_CONFIDENCE: f64 = 0.85;

/// Score added to a suggestion per matching keyword
const SUGGESTION_STEP: f64 = 0.1;

const MAX_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Result of categorizing one description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Categorization {
    pub category: String,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_keyword: Option<String>,
}

impl Categorization {
    fn uncategorized() -> Self {
        Self {
            category: UNCATEGORIZED.to_string(),
            confidence: 0.0,
            matched_keyword: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySuggestion {
    pub category: String,
    pub confidence: f64,
    /// Keywords found in the description, in declaration order
    pub matched_keywords: Vec<String>,
}

/// One item of a batch request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub transaction_id: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub transaction_id: i64,
    #[serde(flatten)]
    pub result: Categorization,
}

/// Ordered category → keyword table
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
}

#[derive(Debug, Deserialize)]
struct RawTable {
    #[serde(default)]
    categories: Vec<CategoryRule>,
}

impl CategoryTable {
    pub fn new(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                name: rule.name,
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Load from `path`, the data-dir override, or the embedded default
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let content = read_layered(path, "categories.toml", DEFAULT_CATEGORIES)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawTable = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid category table: {}", e)))?;

        if let Some(rule) = raw.categories.iter().find(|r| r.name.trim().is_empty()) {
            return Err(Error::Config(format!(
                "Category with keywords {:?} has no name",
                rule.keywords
            )));
        }

        Ok(Self::new(raw.categories))
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Copy of this table with `keyword` added to `category`.
    ///
    /// Unknown categories are appended after every existing one, so they never
    /// win a tie. A keyword already present in that category is ignored.
    pub fn with_rule(&self, keyword: &str, category: &str) -> Self {
        let keyword = keyword.trim().to_lowercase();
        let mut table = self.clone();
        if keyword.is_empty() {
            return table;
        }

        match table.rules.iter_mut().find(|r| r.name == category) {
            Some(rule) => {
                if !rule.keywords.contains(&keyword) {
                    rule.keywords.push(keyword);
                }
            }
            None => table.rules.push(CategoryRule {
                name: category.to_string(),
                keywords: vec![keyword],
            }),
        }
        table
    }

    /// First matching category in declaration order, or "other"
    pub fn categorize(&self, description: &str) -> Categorization {
        let text = description.to_lowercase();
        if text.trim().is_empty() {
            return Categorization::uncategorized();
        }

        for rule in &self.rules {
            if let Some(keyword) = rule.keywords.iter().find(|k| text.contains(k.as_str())) {
                debug!(category = %rule.name, keyword = %keyword, "Keyword match");
                return Categorization {
                    category: rule.name.clone(),
                    confidence: MATCH_CONFIDENCE,
                    matched_keyword: Some(keyword.clone()),
                };
            }
        }

        Categorization::uncategorized()
    }

    /// Up to three candidate categories, strongest first.
    ///
    /// Each matching keyword adds 0.1 (capped at 1.0); equal scores keep
    /// declaration order.
    pub fn suggestions(&self, description: &str) -> Vec<CategorySuggestion> {
        let text = description.to_lowercase();
        let mut scored: Vec<CategorySuggestion> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let matched: Vec<String> = rule
                    .keywords
                    .iter()
                    .filter(|k| text.contains(k.as_str()))
                    .cloned()
                    .collect();
                (!matched.is_empty()).then(|| CategorySuggestion {
                    category: rule.name.clone(),
                    confidence: round2((matched.len() as f64 * SUGGESTION_STEP).min(1.0)),
                    matched_keywords: matched,
                })
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(MAX_SUGGESTIONS);
        scored
    }

    pub fn batch_categorize(&self, items: &[BatchItem]) -> Vec<BatchResult> {
        debug!(count = items.len(), "Batch categorizing");
        items
            .iter()
            .map(|item| BatchResult {
                transaction_id: item.transaction_id,
                result: self.categorize(&item.description),
            })
            .collect()
    }
}

impl Default for CategoryTable {
    /// The embedded keyword table
    fn default() -> Self {
        Self::parse(DEFAULT_CATEGORIES).unwrap_or_else(|e| {
            warn!("Embedded category table is invalid: {}", e);
            Self { rules: Vec::new() }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_order() {
        let table = CategoryTable::default();
        let names: Vec<&str> = table.rules().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "food",
                "transportation",
                "entertainment",
                "utilities",
                "shopping",
                "health",
                "education",
                "finance",
                "personal",
                "rent",
                "salary",
                "investment"
            ]
        );
    }

    #[test]
    fn test_categorize_match() {
        let table = CategoryTable::default();
        let result = table.categorize("Dinner at Luigi's PIZZA place");
        assert_eq!(result.category, "food");
        assert_eq!(result.confidence, 0.85);
        assert_eq!(result.matched_keyword.as_deref(), Some("pizza"));
    }

    #[test]
    fn test_first_declared_category_wins() {
        let table = CategoryTable::default();
        // "gas" is listed under transportation and utilities
        assert_eq!(table.categorize("Shell gas station").category, "transportation");

        let table = CategoryTable::new(vec![
            CategoryRule {
                name: "food".into(),
                keywords: vec!["market".into()],
            },
            CategoryRule {
                name: "shopping".into(),
                keywords: vec!["market".into()],
            },
        ]);
        assert_eq!(table.categorize("Farmers market").category, "food");
    }

    #[test]
    fn test_no_match_is_other() {
        let table = CategoryTable::default();
        let result = table.categorize("xyz 123");
        assert_eq!(result.category, "other");
        assert_eq!(result.confidence, 0.0);
        assert!(result.matched_keyword.is_none());
        assert_eq!(table.categorize("").category, "other");
    }

    #[test]
    fn test_suggestions_ranked_and_capped() {
        let table = CategoryTable::default();
        // finance hits seven keywords, investment two, food one
        let suggestions =
            table.suggestions("bank loan credit insurance stock mutual fund at the cafe");
        assert_eq!(suggestions.len(), 3);
        assert_eq!(suggestions[0].category, "finance");
        assert_eq!(suggestions[0].confidence, 0.7);
        assert_eq!(suggestions[1].category, "investment");
        assert_eq!(suggestions[1].confidence, 0.2);
        assert_eq!(suggestions[2].category, "food");
        assert_eq!(suggestions[2].confidence, 0.1);
    }

    #[test]
    fn test_suggestions_list_matched_keywords() {
        let table = CategoryTable::default();
        let suggestions = table.suggestions("pizza at the cafe");
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].category, "food");
        assert_eq!(suggestions[0].confidence, 0.2);
        assert_eq!(suggestions[0].matched_keywords, vec!["cafe", "pizza"]);

        let json = serde_json::to_value(&suggestions).unwrap();
        assert_eq!(json[0]["matched_keywords"], serde_json::json!(["cafe", "pizza"]));
    }

    #[test]
    fn test_suggestions_ties_keep_declaration_order() {
        let table = CategoryTable::default();
        let suggestions = table.suggestions("uber to the movie");
        assert_eq!(suggestions[0].category, "transportation");
        assert_eq!(suggestions[1].category, "entertainment");
    }

    #[test]
    fn test_with_rule_returns_new_table() {
        let table = CategoryTable::default();
        let updated = table.with_rule("Starbucks", "coffee");

        assert_eq!(table.categorize("starbucks latte").category, "other");
        assert_eq!(updated.categorize("STARBUCKS latte").category, "coffee");
        assert_eq!(updated.rules().last().unwrap().name, "coffee");
        assert_eq!(updated.len(), table.len() + 1);

        let again = updated.with_rule("starbucks", "coffee");
        assert_eq!(again.rules().last().unwrap().keywords, vec!["starbucks"]);
    }

    #[test]
    fn test_batch_echoes_ids() {
        let table = CategoryTable::default();
        let results = table.batch_categorize(&[
            BatchItem {
                transaction_id: 11,
                description: "Netflix subscription".into(),
            },
            BatchItem {
                transaction_id: 12,
                description: "???".into(),
            },
        ]);
        assert_eq!(results[0].transaction_id, 11);
        assert_eq!(results[0].result.category, "entertainment");
        assert_eq!(results[1].transaction_id, 12);
        assert_eq!(results[1].result.category, "other");
    }

    #[test]
    fn test_parse_rejects_unnamed_category() {
        let err = CategoryTable::parse("[[categories]]\nname = \"\"\nkeywords = [\"x\"]\n");
        assert!(err.is_err());
    }
}
