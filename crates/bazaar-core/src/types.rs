use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// Product
// =============================================================================

/// A catalog product record.
///
/// Owned by the storage layer; the chat core only ever reads it. Every field
/// except `id` and `name` is optional, matching whatever a seller chose to
/// fill in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Opaque identifier (uuid v4 string).
    pub id: String,
    pub name: String,
    /// Display string of the listed price ("40", "39.99", "make an offer").
    pub price: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    /// Ordered image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Opaque reference to the listing owner.
    pub owner: Option<String>,
}

/// A price as it arrives on the wire: a JSON number or a string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriceValue {
    Number(serde_json::Number),
    Text(String),
}

impl PriceValue {
    /// The display form used in stored rows and attribute answers.
    pub fn display(&self) -> String {
        match self {
            PriceValue::Number(n) => n.to_string(),
            PriceValue::Text(s) => s.clone(),
        }
    }
}

/// Fields for creating a product. The id is assigned by the repository.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: Option<PriceValue>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(rename = "user")]
    pub owner: Option<String>,
}

impl NewProduct {
    /// Materialize a full product with a fresh id.
    pub fn into_product(self) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            name: self.name,
            price: self.price.as_ref().map(PriceValue::display),
            category: self.category,
            condition: self.condition,
            description: self.description,
            images: self.images,
            owner: self.owner,
        }
    }
}

/// A partial update. Absent fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub price: Option<PriceValue>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    #[serde(rename = "user")]
    pub owner: Option<String>,
}

impl ProductPatch {
    /// True when the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.condition.is_none()
            && self.description.is_none()
            && self.images.is_none()
            && self.owner.is_none()
    }

    /// Apply the patch to an existing product, returning the updated record.
    pub fn apply_to(&self, current: &Product) -> Product {
        Product {
            id: current.id.clone(),
            name: self.name.clone().unwrap_or_else(|| current.name.clone()),
            price: self
                .price
                .as_ref()
                .map(PriceValue::display)
                .or_else(|| current.price.clone()),
            category: self.category.clone().or_else(|| current.category.clone()),
            condition: self.condition.clone().or_else(|| current.condition.clone()),
            description: self
                .description
                .clone()
                .or_else(|| current.description.clone()),
            images: self.images.clone().unwrap_or_else(|| current.images.clone()),
            owner: self.owner.clone().or_else(|| current.owner.clone()),
        }
    }
}
