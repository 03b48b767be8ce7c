use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    audit::log_audit,
    dto::{Validate, auth::ErrorDetail, categories::CategoryRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Category,
    response::PagedJson,
    routes::params::ListParams,
    services::listing::{SortValue, list_rows},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Category not found".into())
}

#[utoipa::path(
    get,
    path = "/categories",
    params(ListParams),
    responses((status = 200, description = "List categories", body = Vec<Category>)),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> PagedJson<Category> {
    let tables = state.db.read().await;
    list_rows(
        &tables.categories,
        &params,
        |c| c.name.clone(),
        |c, _| SortValue::text(&c.name),
    )
}

#[utoipa::path(
    get,
    path = "/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Get category", body = Category),
        (status = 404, description = "Category not found", body = ErrorDetail),
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let tables = state.db.read().await;
    tables
        .categories
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

#[utoipa::path(
    post,
    path = "/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Create category", body = Category),
        (status = 409, description = "Category exists", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<(StatusCode, Json<Category>)> {
    payload.validate().map_err(AppError::Unprocessable)?;
    let name = payload.name.trim().to_string();
    let mut tables = state.db.write().await;

    if tables
        .categories
        .iter()
        .any(|c| c.name.eq_ignore_ascii_case(&name))
    {
        return Err(AppError::Conflict("The category already exists".into()));
    }

    let category = Category {
        id: tables.next_category_id(),
        name,
    };
    tables.categories.push(category.clone());
    log_audit(
        &mut tables,
        &user.username,
        "category_create",
        "categories",
        serde_json::json!({ "category_id": category.id }),
    );

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    put,
    path = "/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = Category),
        (status = 404, description = "Category not found", body = ErrorDetail),
        (status = 409, description = "Name already used", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryRequest>,
) -> AppResult<Json<Category>> {
    payload.validate().map_err(AppError::Unprocessable)?;
    let name = payload.name.trim().to_string();
    let mut tables = state.db.write().await;

    if tables
        .categories
        .iter()
        .any(|c| c.id != id && c.name.eq_ignore_ascii_case(&name))
    {
        return Err(AppError::Conflict("The category already exists".into()));
    }

    let category = tables
        .categories
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(not_found)?;
    category.name = name;
    let updated = category.clone();

    log_audit(
        &mut tables,
        &user.username,
        "category_update",
        "categories",
        serde_json::json!({ "category_id": id }),
    );
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/categories/{id}",
    params(("id" = i64, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Deleted category"),
        (status = 400, description = "Category still has products", body = ErrorDetail),
        (status = 404, description = "Category not found", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut tables = state.db.write().await;

    if !tables.categories.iter().any(|c| c.id == id) {
        return Err(not_found());
    }
    if tables.products.iter().any(|p| p.category_id == id) {
        return Err(AppError::BadRequest(
            "Cannot delete the category because it has associated products".into(),
        ));
    }

    tables.categories.retain(|c| c.id != id);
    log_audit(
        &mut tables,
        &user.username,
        "category_delete",
        "categories",
        serde_json::json!({ "category_id": id }),
    );
    Ok(StatusCode::NO_CONTENT)
}
