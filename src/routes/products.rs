use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    audit::log_audit,
    db::Tables,
    dto::{
        Validate,
        auth::ErrorDetail,
        products::{CreateProductRequest, UpdateProductRequest},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Product,
    query::SortKey,
    response::PagedJson,
    routes::params::ListParams,
    services::listing::{SortValue, list_rows},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Product not found".into())
}

fn ensure_references(tables: &Tables, category_id: i64, supplier_id: i64) -> AppResult<()> {
    if !tables.categories.iter().any(|c| c.id == category_id) {
        return Err(AppError::NotFound("Category not found".into()));
    }
    if !tables.suppliers.iter().any(|s| s.id == supplier_id) {
        return Err(AppError::NotFound("Supplier not found".into()));
    }
    Ok(())
}

fn name_taken(tables: &Tables, name: &str, except: Option<i64>) -> bool {
    let name = name.trim().to_lowercase();
    tables
        .products
        .iter()
        .any(|p| Some(p.id) != except && p.name.to_lowercase() == name)
}

#[utoipa::path(
    get,
    path = "/products",
    params(ListParams),
    responses(
        (status = 200, description = "One page of products; the total is in X-Total-Count", body = Vec<Product>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> PagedJson<Product> {
    let tables = state.db.read().await;
    list_rows(
        &tables.products,
        &params,
        |p| p.name.clone(),
        |p, key| match key {
            SortKey::Name => SortValue::text(&p.name),
            SortKey::Price => SortValue::Number(p.price),
            SortKey::Category => SortValue::text(tables.category_name(p.category_id).unwrap_or("")),
        },
    )
}

#[utoipa::path(
    get,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Get product", body = Product),
        (status = 404, description = "Product not found", body = ErrorDetail),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let tables = state.db.read().await;
    let product = tables
        .products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(not_found)?;
    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Create product", body = Product),
        (status = 409, description = "Duplicate name", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<Product>)> {
    payload.validate().map_err(AppError::Unprocessable)?;
    let mut tables = state.db.write().await;

    if name_taken(&tables, &payload.name, None) {
        return Err(AppError::Conflict("This product is already registered".into()));
    }
    ensure_references(&tables, payload.category_id, payload.supplier_id)?;

    let product = Product {
        id: tables.next_product_id(),
        name: payload.name.trim().to_string(),
        price: payload.price,
        category_id: payload.category_id,
        supplier_id: payload.supplier_id,
    };
    tables.products.push(product.clone());
    log_audit(
        &mut tables,
        &user.username,
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    );

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 404, description = "Product not found", body = ErrorDetail),
        (status = 409, description = "Duplicate name", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<Json<Product>> {
    payload.validate().map_err(AppError::Unprocessable)?;
    let mut tables = state.db.write().await;

    let existing = tables
        .products
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(not_found)?;

    if let Some(name) = &payload.name
        && name_taken(&tables, name, Some(id))
    {
        return Err(AppError::Conflict(
            "Another product already has that name".into(),
        ));
    }

    let updated = Product {
        id,
        name: payload
            .name
            .map(|n| n.trim().to_string())
            .unwrap_or(existing.name),
        price: payload.price.unwrap_or(existing.price),
        category_id: payload.category_id.unwrap_or(existing.category_id),
        supplier_id: payload.supplier_id.unwrap_or(existing.supplier_id),
    };
    ensure_references(&tables, updated.category_id, updated.supplier_id)?;

    if let Some(slot) = tables.products.iter_mut().find(|p| p.id == id) {
        *slot = updated.clone();
    }
    log_audit(
        &mut tables,
        &user.username,
        "product_update",
        "products",
        serde_json::json!({ "product_id": id }),
    );

    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/products/{id}",
    params(("id" = i64, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Deleted product"),
        (status = 400, description = "Product has orders", body = ErrorDetail),
        (status = 404, description = "Product not found", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut tables = state.db.write().await;

    if !tables.products.iter().any(|p| p.id == id) {
        return Err(not_found());
    }
    if tables.orders.iter().any(|o| o.product_id == id) {
        return Err(AppError::BadRequest(
            "Cannot delete the product because it has orders".into(),
        ));
    }

    tables.products.retain(|p| p.id != id);
    log_audit(
        &mut tables,
        &user.username,
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    );

    Ok(StatusCode::NO_CONTENT)
}
