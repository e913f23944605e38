//! Product matching against query tokens.
//!
//! Scans the whitespace-split lowercased query left to right and asks the
//! repository for a case-insensitive name-substring hit per token. The first
//! token with a hit wins; there is no scoring or ranking.

use std::sync::Arc;

use bazaar_core::types::Product;
use bazaar_storage::ProductRepository;

use crate::error::ChatError;

/// Resolves the product a query is talking about, if any.
pub struct ProductMatcher {
    products: Arc<ProductRepository>,
}

impl ProductMatcher {
    pub fn new(products: Arc<ProductRepository>) -> Self {
        Self { products }
    }

    /// Find the first product mentioned by any query token.
    ///
    /// Absence of a match is a normal `None`, not an error.
    pub fn find(&self, query: &str) -> Result<Option<Product>, ChatError> {
        for token in query.to_lowercase().split_whitespace() {
            if let Some(product) = self.products.find_by_name_fragment(token)? {
                tracing::debug!(token, product = %product.name, "Query token matched product");
                return Ok(Some(product));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::types::NewProduct;
    use bazaar_storage::Database;

    fn make_matcher(names: &[&str]) -> ProductMatcher {
        let repo = Arc::new(ProductRepository::new(Arc::new(
            Database::in_memory().unwrap(),
        )));
        for name in names {
            repo.insert(NewProduct {
                name: (*name).to_string(),
                ..NewProduct::default()
            })
            .unwrap();
        }
        ProductMatcher::new(repo)
    }

    #[test]
    fn test_matches_token_as_name_substring() {
        let matcher = make_matcher(&["Red Chair"]);
        let hit = matcher.find("what is the price of the red chair").unwrap();
        assert_eq!(hit.unwrap().name, "Red Chair");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let matcher = make_matcher(&["Red Chair"]);
        let hit = matcher.find("TELL ME ABOUT THE RED ONE").unwrap();
        assert_eq!(hit.unwrap().name, "Red Chair");
    }

    #[test]
    fn test_no_match_returns_none() {
        let matcher = make_matcher(&["Red Chair"]);
        assert!(matcher.find("do you sell bicycles").unwrap().is_none());
    }

    #[test]
    fn test_first_token_in_query_order_wins() {
        let matcher = make_matcher(&["Oak Table", "Red Chair"]);
        // "table" appears before "red" in the query, so the table wins even
        // though the chair was inserted later.
        let hit = matcher.find("is the table cheaper than the red chair").unwrap();
        assert_eq!(hit.unwrap().name, "Oak Table");
    }

    #[test]
    fn test_empty_query_yields_none() {
        let matcher = make_matcher(&["Red Chair"]);
        assert!(matcher.find("").unwrap().is_none());
        assert!(matcher.find("   ").unwrap().is_none());
    }

    #[test]
    fn test_stopword_tokens_can_match_too() {
        // Token scanning is deliberately naive: any token that happens to be
        // a substring of a name matches (original behavior preserved).
        let matcher = make_matcher(&["The Great Lamp"]);
        let hit = matcher.find("what is the price").unwrap();
        assert_eq!(hit.unwrap().name, "The Great Lamp");
    }
}
