//! Repository for product persistence.
//!
//! All SQL for the products table lives here. The repository operates on the
//! shared Database wrapper and returns domain types from bazaar-core.

use std::sync::Arc;

use rusqlite::{OptionalExtension, Row};

use bazaar_core::error::BazaarError;
use bazaar_core::types::{NewProduct, Product, ProductPatch};

use crate::db::Database;

const PRODUCT_COLUMNS: &str = "id, name, price, category, condition, description, images, owner";

/// Outcome of an update against an existing row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The row existed and at least one field changed.
    Updated,
    /// The row existed but the patch left every field as it was.
    NoChanges,
    /// No row with that id.
    NotFound,
}

/// Repository for product records.
pub struct ProductRepository {
    db: Arc<Database>,
}

impl ProductRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Store a new product and return its generated id.
    pub fn insert(&self, new: NewProduct) -> Result<String, BazaarError> {
        let product = new.into_product();
        let images = serde_json::to_string(&product.images)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO products (id, name, price, category, condition, description, images, owner)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    product.id,
                    product.name,
                    product.price,
                    product.category,
                    product.condition,
                    product.description,
                    images,
                    product.owner,
                ],
            )
            .map_err(|e| BazaarError::Storage(format!("Failed to insert product: {}", e)))?;
            Ok(product.id.clone())
        })
    }

    /// List all products in insertion order.
    pub fn list(&self) -> Result<Vec<Product>, BazaarError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM products ORDER BY rowid ASC",
                    PRODUCT_COLUMNS
                ))
                .map_err(|e| BazaarError::Storage(e.to_string()))?;

            let rows = stmt
                .query_map([], |row| Ok(row_to_product(row)))
                .map_err(|e| BazaarError::Storage(e.to_string()))?;

            let mut products = Vec::new();
            for row in rows {
                let product = row.map_err(|e| BazaarError::Storage(e.to_string()))??;
                products.push(product);
            }
            Ok(products)
        })
    }

    /// Find a product by id.
    pub fn find_by_id(&self, id: &str) -> Result<Option<Product>, BazaarError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM products WHERE id = ?1",
                    PRODUCT_COLUMNS
                ))
                .map_err(|e| BazaarError::Storage(e.to_string()))?;

            let result = stmt
                .query_row(rusqlite::params![id], |row| Ok(row_to_product(row)))
                .optional()
                .map_err(|e| BazaarError::Storage(e.to_string()))?;

            match result {
                Some(product) => Ok(Some(product?)),
                None => Ok(None),
            }
        })
    }

    /// Find the first product whose name contains `fragment`,
    /// case-insensitively, in insertion order.
    pub fn find_by_name_fragment(&self, fragment: &str) -> Result<Option<Product>, BazaarError> {
        let pattern = format!("%{}%", escape_like(fragment));
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM products
                     WHERE name LIKE ?1 ESCAPE '\\'
                     ORDER BY rowid ASC LIMIT 1",
                    PRODUCT_COLUMNS
                ))
                .map_err(|e| BazaarError::Storage(e.to_string()))?;

            let result = stmt
                .query_row(rusqlite::params![pattern], |row| Ok(row_to_product(row)))
                .optional()
                .map_err(|e| BazaarError::Storage(e.to_string()))?;

            match result {
                Some(product) => Ok(Some(product?)),
                None => Ok(None),
            }
        })
    }

    /// Apply a partial update.
    ///
    /// Compares the patched record against the stored one so that an update
    /// carrying only already-current values reports `NoChanges`.
    pub fn update(&self, id: &str, patch: &ProductPatch) -> Result<UpdateOutcome, BazaarError> {
        let Some(current) = self.find_by_id(id)? else {
            return Ok(UpdateOutcome::NotFound);
        };

        let updated = patch.apply_to(&current);
        if updated == current {
            return Ok(UpdateOutcome::NoChanges);
        }

        let images = serde_json::to_string(&updated.images)?;
        self.db.with_conn(|conn| {
            conn.execute(
                "UPDATE products
                 SET name = ?1, price = ?2, category = ?3, condition = ?4,
                     description = ?5, images = ?6, owner = ?7,
                     updated_at = strftime('%s', 'now')
                 WHERE id = ?8",
                rusqlite::params![
                    updated.name,
                    updated.price,
                    updated.category,
                    updated.condition,
                    updated.description,
                    images,
                    updated.owner,
                    id,
                ],
            )
            .map_err(|e| BazaarError::Storage(format!("Failed to update product: {}", e)))?;
            Ok(UpdateOutcome::Updated)
        })
    }

    /// Delete a product. Returns true if a row was removed.
    pub fn delete(&self, id: &str) -> Result<bool, BazaarError> {
        self.db.with_conn(|conn| {
            let affected = conn
                .execute("DELETE FROM products WHERE id = ?1", rusqlite::params![id])
                .map_err(|e| BazaarError::Storage(format!("Failed to delete product: {}", e)))?;
            Ok(affected == 1)
        })
    }

    /// Count stored products.
    pub fn count(&self) -> Result<u64, BazaarError> {
        self.db.with_conn(|conn| {
            let count: i64 = conn
                .query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))
                .map_err(|e| BazaarError::Storage(e.to_string()))?;
            Ok(count as u64)
        })
    }
}

/// Escape LIKE metacharacters so a fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn row_to_product(row: &Row<'_>) -> Result<Product, BazaarError> {
    let images_json: String = row
        .get(6)
        .map_err(|e| BazaarError::Storage(e.to_string()))?;
    Ok(Product {
        id: row.get(0).map_err(|e| BazaarError::Storage(e.to_string()))?,
        name: row.get(1).map_err(|e| BazaarError::Storage(e.to_string()))?,
        price: row.get(2).map_err(|e| BazaarError::Storage(e.to_string()))?,
        category: row.get(3).map_err(|e| BazaarError::Storage(e.to_string()))?,
        condition: row.get(4).map_err(|e| BazaarError::Storage(e.to_string()))?,
        description: row.get(5).map_err(|e| BazaarError::Storage(e.to_string()))?,
        images: serde_json::from_str(&images_json).unwrap_or_default(),
        owner: row.get(7).map_err(|e| BazaarError::Storage(e.to_string()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_core::types::PriceValue;

    fn make_repo() -> ProductRepository {
        ProductRepository::new(Arc::new(Database::in_memory().unwrap()))
    }

    fn red_chair() -> NewProduct {
        NewProduct {
            name: "Red Chair".to_string(),
            price: Some(PriceValue::Text("40".to_string())),
            category: Some("furniture".to_string()),
            ..NewProduct::default()
        }
    }

    #[test]
    fn test_insert_and_find_by_id() {
        let repo = make_repo();
        let id = repo.insert(red_chair()).unwrap();

        let product = repo.find_by_id(&id).unwrap().unwrap();
        assert_eq!(product.name, "Red Chair");
        assert_eq!(product.price.as_deref(), Some("40"));
        assert_eq!(product.category.as_deref(), Some("furniture"));
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_find_by_id_missing() {
        let repo = make_repo();
        assert!(repo.find_by_id("no-such-id").unwrap().is_none());
    }

    #[test]
    fn test_list_preserves_insertion_order() {
        let repo = make_repo();
        repo.insert(NewProduct {
            name: "First".to_string(),
            ..NewProduct::default()
        })
        .unwrap();
        repo.insert(NewProduct {
            name: "Second".to_string(),
            ..NewProduct::default()
        })
        .unwrap();

        let products = repo.list().unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "First");
        assert_eq!(products[1].name, "Second");
    }

    #[test]
    fn test_find_by_name_fragment_case_insensitive() {
        let repo = make_repo();
        repo.insert(red_chair()).unwrap();

        let hit = repo.find_by_name_fragment("red").unwrap();
        assert_eq!(hit.unwrap().name, "Red Chair");

        let hit = repo.find_by_name_fragment("CHAIR").unwrap();
        assert_eq!(hit.unwrap().name, "Red Chair");

        assert!(repo.find_by_name_fragment("sofa").unwrap().is_none());
    }

    #[test]
    fn test_find_by_name_fragment_first_row_wins() {
        let repo = make_repo();
        repo.insert(NewProduct {
            name: "Red Chair".to_string(),
            ..NewProduct::default()
        })
        .unwrap();
        repo.insert(NewProduct {
            name: "Red Table".to_string(),
            ..NewProduct::default()
        })
        .unwrap();

        let hit = repo.find_by_name_fragment("red").unwrap().unwrap();
        assert_eq!(hit.name, "Red Chair");
    }

    #[test]
    fn test_find_by_name_fragment_escapes_like_wildcards() {
        let repo = make_repo();
        repo.insert(NewProduct {
            name: "Plain Lamp".to_string(),
            ..NewProduct::default()
        })
        .unwrap();

        // A bare "%" would match everything if not escaped.
        assert!(repo.find_by_name_fragment("%").unwrap().is_none());
        assert!(repo.find_by_name_fragment("_").unwrap().is_none());
    }

    #[test]
    fn test_update_changes_fields() {
        let repo = make_repo();
        let id = repo.insert(red_chair()).unwrap();

        let patch = ProductPatch {
            price: Some(PriceValue::Text("55".to_string())),
            ..ProductPatch::default()
        };
        assert_eq!(repo.update(&id, &patch).unwrap(), UpdateOutcome::Updated);

        let product = repo.find_by_id(&id).unwrap().unwrap();
        assert_eq!(product.price.as_deref(), Some("55"));
        assert_eq!(product.name, "Red Chair");
    }

    #[test]
    fn test_update_identical_values_reports_no_changes() {
        let repo = make_repo();
        let id = repo.insert(red_chair()).unwrap();

        let patch = ProductPatch {
            price: Some(PriceValue::Text("55".to_string())),
            ..ProductPatch::default()
        };
        assert_eq!(repo.update(&id, &patch).unwrap(), UpdateOutcome::Updated);
        // Second identical update touches nothing.
        assert_eq!(repo.update(&id, &patch).unwrap(), UpdateOutcome::NoChanges);
    }

    #[test]
    fn test_update_missing_id() {
        let repo = make_repo();
        let patch = ProductPatch {
            name: Some("Ghost".to_string()),
            ..ProductPatch::default()
        };
        assert_eq!(
            repo.update("no-such-id", &patch).unwrap(),
            UpdateOutcome::NotFound
        );
    }

    #[test]
    fn test_delete() {
        let repo = make_repo();
        let id = repo.insert(red_chair()).unwrap();

        assert!(repo.delete(&id).unwrap());
        assert!(!repo.delete(&id).unwrap());
        assert!(repo.find_by_id(&id).unwrap().is_none());
    }

    #[test]
    fn test_count() {
        let repo = make_repo();
        assert_eq!(repo.count().unwrap(), 0);
        repo.insert(red_chair()).unwrap();
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_images_round_trip_as_json() {
        let repo = make_repo();
        let id = repo
            .insert(NewProduct {
                name: "Poster".to_string(),
                images: vec![
                    "https://img.example/1.jpg".to_string(),
                    "https://img.example/2.jpg".to_string(),
                ],
                ..NewProduct::default()
            })
            .unwrap();

        let product = repo.find_by_id(&id).unwrap().unwrap();
        assert_eq!(product.images.len(), 2);
        assert_eq!(product.images[0], "https://img.example/1.jpg");
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("red"), "red");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
