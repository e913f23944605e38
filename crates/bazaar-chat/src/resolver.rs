//! Attribute answers from stored product data.
//!
//! A fixed ordered list of attribute keywords is tested for containment in
//! the lowercased query; the first hit selects a canned sentence template.
//! The order is significant: a query naming several attributes answers the
//! earliest one in the list.

use bazaar_core::types::Product;

/// Recognized attribute keywords, in priority order.
const ATTRIBUTE_KEYWORDS: [&str; 5] = ["price", "material", "description", "category", "condition"];

/// Maps attribute questions to template answers.
pub struct AttributeResolver;

impl AttributeResolver {
    /// Answer an attribute question about `product`, or `None` when the
    /// query names no known attribute (signalling generative fallback).
    pub fn resolve(&self, query: &str, product: &Product) -> Option<String> {
        let lower = query.to_lowercase();
        let keyword = ATTRIBUTE_KEYWORDS.iter().find(|k| lower.contains(**k))?;

        let answer = match *keyword {
            "price" => format!(
                "The price of {} is {}.",
                product.name,
                product.price.as_deref().unwrap_or("unknown")
            ),
            // No material field exists in the catalog; this attribute always
            // answers "not available" regardless of stored data.
            "material" => format!(
                "Material information is not available for {} in our database.",
                product.name
            ),
            "description" => format!(
                "Description of {}: {}",
                product.name,
                product
                    .description
                    .as_deref()
                    .unwrap_or("No description available")
            ),
            "category" => format!(
                "The category of {} is {}",
                product.name,
                product.category.as_deref().unwrap_or("unknown")
            ),
            "condition" => format!(
                "The condition of {} is {}",
                product.name,
                product.condition.as_deref().unwrap_or("unknown")
            ),
            _ => unreachable!("keyword comes from ATTRIBUTE_KEYWORDS"),
        };
        Some(answer)
    }
}
