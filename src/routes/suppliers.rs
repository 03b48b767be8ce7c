use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    audit::log_audit,
    dto::{Validate, auth::ErrorDetail, non_blank, suppliers::SupplierRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Supplier,
    response::PagedJson,
    routes::params::ListParams,
    services::listing::{SortValue, list_rows},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_suppliers).post(create_supplier))
        .route(
            "/{id}",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Supplier not found".into())
}

#[utoipa::path(
    get,
    path = "/suppliers",
    params(ListParams),
    responses((status = 200, description = "List suppliers", body = Vec<Supplier>)),
    tag = "Suppliers"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> PagedJson<Supplier> {
    let tables = state.db.read().await;
    list_rows(
        &tables.suppliers,
        &params,
        |c| c.name.clone(),
        |c, _| SortValue::text(&c.name),
    )
}

#[utoipa::path(
    get,
    path = "/suppliers/{id}",
    params(("id" = i64, Path, description = "Supplier ID")),
    responses(
        (status = 200, description = "Get supplier", body = Supplier),
        (status = 404, description = "Supplier not found", body = ErrorDetail),
    ),
    tag = "Suppliers"
)]
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Supplier>> {
    let tables = state.db.read().await;
    tables
        .suppliers
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

#[utoipa::path(
    post,
    path = "/suppliers",
    request_body = SupplierRequest,
    responses(
        (status = 201, description = "Create supplier", body = Supplier),
        (status = 409, description = "Supplier exists", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SupplierRequest>,
) -> AppResult<(StatusCode, Json<Supplier>)> {
    payload.validate().map_err(AppError::Unprocessable)?;
    let name = payload.name.trim().to_string();
    let mut tables = state.db.write().await;

    if tables
        .suppliers
        .iter()
        .any(|c| c.name.eq_ignore_ascii_case(&name))
    {
        return Err(AppError::Conflict("The supplier already exists".into()));
    }

    let supplier = Supplier {
        id: tables.next_supplier_id(),
        name,
        phone: non_blank(payload.phone),
        email: non_blank(payload.email),
    };
    tables.suppliers.push(supplier.clone());
    log_audit(
        &mut tables,
        &user.username,
        "supplier_create",
        "suppliers",
        serde_json::json!({ "supplier_id": supplier.id }),
    );

    Ok((StatusCode::CREATED, Json(supplier)))
}

#[utoipa::path(
    put,
    path = "/suppliers/{id}",
    params(("id" = i64, Path, description = "Supplier ID")),
    request_body = SupplierRequest,
    responses(
        (status = 200, description = "Updated supplier", body = Supplier),
        (status = 404, description = "Supplier not found", body = ErrorDetail),
        (status = 409, description = "Name already used", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<SupplierRequest>,
) -> AppResult<Json<Supplier>> {
    payload.validate().map_err(AppError::Unprocessable)?;
    let name = payload.name.trim().to_string();
    let mut tables = state.db.write().await;

    if tables
        .suppliers
        .iter()
        .any(|c| c.id != id && c.name.eq_ignore_ascii_case(&name))
    {
        return Err(AppError::Conflict("The supplier already exists".into()));
    }

    let supplier = tables
        .suppliers
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(not_found)?;
    supplier.name = name;
    supplier.phone = non_blank(payload.phone);
    supplier.email = non_blank(payload.email);
    let updated = supplier.clone();

    log_audit(
        &mut tables,
        &user.username,
        "supplier_update",
        "suppliers",
        serde_json::json!({ "supplier_id": id }),
    );
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/suppliers/{id}",
    params(("id" = i64, Path, description = "Supplier ID")),
    responses(
        (status = 204, description = "Deleted supplier"),
        (status = 400, description = "Supplier still has products", body = ErrorDetail),
        (status = 404, description = "Supplier not found", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Suppliers"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut tables = state.db.write().await;

    if !tables.suppliers.iter().any(|c| c.id == id) {
        return Err(not_found());
    }
    if tables.products.iter().any(|p| p.supplier_id == id) {
        return Err(AppError::BadRequest(
            "Cannot delete the supplier because it has associated products".into(),
        ));
    }

    tables.suppliers.retain(|c| c.id != id);
    log_audit(
        &mut tables,
        &user.username,
        "supplier_delete",
        "suppliers",
        serde_json::json!({ "supplier_id": id }),
    );
    Ok(StatusCode::NO_CONTENT)
}
