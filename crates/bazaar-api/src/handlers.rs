//! Route handler functions for all API endpoints.
//!
//! Each handler extracts its body or path parameters via axum extractors,
//! interacts with AppState services, and returns JSON responses.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use serde::{Deserialize, Serialize};

use bazaar_core::types::{NewProduct, PriceValue, Product, ProductPatch};
use bazaar_storage::UpdateOutcome;

use crate::error::ApiError;
use crate::state::AppState;

/// Embedded chat page served at the root.
const INDEX_HTML: &str = include_str!("../assets/index.html");

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub price: Option<PriceValue>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub user: Option<String>,
}

// =============================================================================
// Response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatReplyBody {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateProductResponse {
    pub message: String,
    pub product_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductEntry {
    pub product_id: String,
    pub name: String,
    pub price: Option<String>,
    pub category: Option<String>,
    pub condition: Option<String>,
    pub images: Vec<String>,
    pub description: Option<String>,
    pub user: Option<String>,
}

impl From<Product> for ProductEntry {
    fn from(p: Product) -> Self {
        Self {
            product_id: p.id,
            name: p.name,
            price: p.price,
            category: p.category,
            condition: p.condition,
            images: p.images,
            description: p.description,
            user: p.owner,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<ProductEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub product_count: u64,
}

// =============================================================================
// Handler functions
// =============================================================================

/// POST /chatbot - route a natural-language query.
pub async fn chatbot(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReplyBody>, ApiError> {
    let query = body.query.unwrap_or_default();
    if query.trim().is_empty() {
        return Err(ApiError::BadRequest("No query provided".to_string()));
    }

    let reply = state.router.handle(&query).await?;
    Ok(Json(ChatReplyBody {
        response: reply.text().to_string(),
    }))
}

/// POST /products - create a product.
pub async fn create_product(
    State(state): State<AppState>,
    Json(body): Json<CreateProductRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(name) = body.name.filter(|n| !n.trim().is_empty()) else {
        return Err(ApiError::BadRequest(
            "Product data is incomplete".to_string(),
        ));
    };

    let product_id = state.products.insert(NewProduct {
        name,
        price: body.price,
        category: body.category,
        condition: body.condition,
        description: body.description,
        images: body.images,
        owner: body.user,
    })?;

    tracing::info!(product_id = %product_id, "Product created");
    Ok((
        StatusCode::CREATED,
        Json(CreateProductResponse {
            message: "Product created successfully".to_string(),
            product_id,
        }),
    ))
}

/// GET /products - list all products.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let products = state
        .products
        .list()?
        .into_iter()
        .map(ProductEntry::from)
        .collect();
    Ok(Json(ProductsResponse { products }))
}

/// PUT /products/{id} - apply a partial update.
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<MessageResponse>, ApiError> {
    if patch.is_empty() {
        return Err(ApiError::BadRequest(
            "No data provided to update.".to_string(),
        ));
    }

    let message = match state.products.update(&id, &patch)? {
        UpdateOutcome::Updated => "Product updated successfully",
        UpdateOutcome::NoChanges => "No changes made",
        UpdateOutcome::NotFound => {
            return Err(ApiError::NotFound("Product not found".to_string()));
        }
    };
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

/// DELETE /products/{id} - remove a product.
///
/// Deleting an unknown id is reported in the message body, not as an error
/// status.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = if state.products.delete(&id)? {
        "Product deleted successfully"
    } else {
        "Product not found"
    };
    Ok(Json(MessageResponse {
        message: message.to_string(),
    }))
}

/// GET /health - health check.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        product_count: state.products.count()?,
    }))
}

/// GET / - serve the embedded chat page.
pub async fn index() -> impl IntoResponse {
    Html(INDEX_HTML)
}
