//! Product catalog CRUD.
//!
//! Reads are public; writes require the admin role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use loomline_core::{DiscountPercent, ProductId, ProductStatus};

use crate::db::RepositoryError;
use crate::db::products::ProductRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::product::{NewProduct, Product, ProductPatch};
use crate::routes::ApiJson;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(get_one).put(update).delete(delete))
}

#[derive(Debug, Deserialize)]
struct CreateProductRequest {
    name: String,
    #[serde(default)]
    description: String,
    price: Decimal,
    #[serde(default)]
    discount: i32,
    category: String,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    colors: Vec<String>,
    #[serde(default)]
    sizes: Vec<String>,
    #[serde(default)]
    stock: i32,
    status: Option<String>,
}

/// Partial update; absent fields are left unchanged. An explicit zero
/// (discount cleared, stock emptied) is a present field and is applied.
#[derive(Debug, Deserialize)]
struct UpdateProductRequest {
    name: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    discount: Option<i32>,
    category: Option<String>,
    images: Option<Vec<String>>,
    colors: Option<Vec<String>>,
    sizes: Option<Vec<String>>,
    stock: Option<i32>,
    status: Option<String>,
}

#[derive(Debug, Serialize)]
struct DeleteResponse {
    message: String,
}

async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    ApiJson(body): ApiJson<CreateProductRequest>,
) -> Result<impl IntoResponse> {
    let input = validate_create(body)?;
    let product = ProductRepository::new(state.pool()).create(&input).await?;

    Ok((StatusCode::CREATED, Json(product)))
}

async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<UpdateProductRequest>,
) -> Result<Json<Product>> {
    let id = parse_id(&id)?;
    let patch = validate_update(body)?;

    let repo = ProductRepository::new(state.pool());

    // An empty body changes nothing, not even updated_at; answer with the
    // current product.
    let product = if patch.is_empty() {
        repo.get(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?
    } else {
        repo.update(id, &patch).await.map_err(not_found_or_db)?
    };

    Ok(Json(product))
}

async fn delete(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let id = parse_id(&id)?;

    ProductRepository::new(state.pool())
        .delete(id)
        .await
        .map_err(not_found_or_db)?;

    Ok(Json(DeleteResponse {
        message: "Product deleted successfully".to_string(),
    }))
}

fn parse_id(raw: &str) -> Result<ProductId> {
    raw.parse()
        .map_err(|_| ApiError::Validation("Invalid product id".to_string()))
}

fn not_found_or_db(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound => ApiError::NotFound("Product not found".to_string()),
        other => ApiError::Database(other),
    }
}

fn validate_create(body: CreateProductRequest) -> Result<NewProduct> {
    let name = require_text("Name", &body.name)?;
    let category = require_text("Category", &body.category)?;
    let price = validate_price(body.price)?;
    let discount = validate_discount(body.discount)?;
    let stock = validate_stock(body.stock)?;
    let status = parse_status(body.status.as_deref())?.unwrap_or_default();

    Ok(NewProduct {
        name,
        description: body.description,
        price,
        discount,
        category,
        images: body.images,
        colors: body.colors,
        sizes: body.sizes,
        stock,
        status,
    })
}

fn validate_update(body: UpdateProductRequest) -> Result<ProductPatch> {
    let name = body
        .name
        .as_deref()
        .map(|n| require_text("Name", n))
        .transpose()?;
    let category = body
        .category
        .as_deref()
        .map(|c| require_text("Category", c))
        .transpose()?;
    let price = body.price.map(validate_price).transpose()?;
    let discount = body.discount.map(validate_discount).transpose()?;
    let stock = body.stock.map(validate_stock).transpose()?;
    let status = parse_status(body.status.as_deref())?;

    Ok(ProductPatch {
        name,
        description: body.description,
        price,
        discount,
        category,
        images: body.images,
        colors: body.colors,
        sizes: body.sizes,
        stock,
        status,
    })
}

fn require_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: Decimal) -> Result<Decimal> {
    if price.is_sign_negative() {
        return Err(ApiError::Validation(
            "Price must not be negative".to_string(),
        ));
    }
    Ok(price)
}

fn validate_discount(discount: i32) -> Result<DiscountPercent> {
    DiscountPercent::new(discount).map_err(|e| ApiError::Validation(e.to_string()))
}

fn validate_stock(stock: i32) -> Result<i32> {
    if stock < 0 {
        return Err(ApiError::Validation(
            "Stock must not be negative".to_string(),
        ));
    }
    Ok(stock)
}

fn parse_status(raw: Option<&str>) -> Result<Option<ProductStatus>> {
    raw.map(|s| {
        s.parse()
            .map_err(|_| ApiError::Validation("Invalid status".to_string()))
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_body() -> CreateProductRequest {
        CreateProductRequest {
            name: "Linen Shirt".to_string(),
            description: String::new(),
            price: Decimal::new(4999, 2),
            discount: 0,
            category: "Shirts".to_string(),
            images: vec![],
            colors: vec![],
            sizes: vec![],
            stock: 10,
            status: None,
        }
    }

    #[test]
    fn create_defaults_status_to_active() {
        let input = validate_create(create_body()).expect("valid");
        assert_eq!(input.status, ProductStatus::Active);
    }

    #[test]
    fn create_rejects_blank_name() {
        let body = CreateProductRequest {
            name: "   ".to_string(),
            ..create_body()
        };
        assert!(matches!(
            validate_create(body),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn create_rejects_out_of_range_discount() {
        let body = CreateProductRequest {
            discount: 101,
            ..create_body()
        };
        assert!(matches!(
            validate_create(body),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn update_keeps_explicit_zero_discount() {
        let body = UpdateProductRequest {
            name: None,
            description: None,
            price: None,
            discount: Some(0),
            category: None,
            images: None,
            colors: None,
            sizes: None,
            stock: None,
            status: None,
        };
        let patch = validate_update(body).expect("valid");
        assert_eq!(patch.discount, Some(DiscountPercent::ZERO));
        assert!(patch.name.is_none());
    }

    #[test]
    fn update_with_no_fields_yields_an_empty_patch() {
        let body = UpdateProductRequest {
            name: None,
            description: None,
            price: None,
            discount: None,
            category: None,
            images: None,
            colors: None,
            sizes: None,
            stock: None,
            status: None,
        };
        let patch = validate_update(body).expect("valid");
        assert!(patch.is_empty());
    }

    #[test]
    fn update_rejects_negative_price() {
        let body = UpdateProductRequest {
            name: None,
            description: None,
            price: Some(Decimal::new(-100, 2)),
            discount: None,
            category: None,
            images: None,
            colors: None,
            sizes: None,
            stock: None,
            status: None,
        };
        assert!(matches!(
            validate_update(body),
            Err(ApiError::Validation(_))
        ));
    }

    #[test]
    fn bad_ids_fail_validation() {
        assert!(parse_id("not-a-uuid").is_err());
        assert!(parse_id("3f0c8aa2-8e6d-4f1e-9e0e-0a9b8c7d6e5f").is_ok());
    }
}
