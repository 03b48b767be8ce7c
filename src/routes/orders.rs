use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::Utc;

use crate::{
    audit::log_audit,
    db::{OrderRow, Tables},
    dto::{
        Validate,
        auth::ErrorDetail,
        non_blank,
        orders::{CreateOrderRequest, UpdateOrderRequest},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{DEFAULT_ORDER_STATUS, Order},
    query::SortKey,
    response::PagedJson,
    routes::params::OrderListParams,
    services::listing::{SortValue, list_rows},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Order not found".into())
}

fn ensure_references(tables: &Tables, customer_id: i64, product_id: i64) -> AppResult<()> {
    if !tables.customers.iter().any(|c| c.id == customer_id) {
        return Err(AppError::NotFound("Customer not found".into()));
    }
    if !tables.products.iter().any(|p| p.id == product_id) {
        return Err(AppError::NotFound("Product not found".into()));
    }
    Ok(())
}

fn joined(tables: &Tables, row: &OrderRow) -> AppResult<Order> {
    tables
        .join_order(row)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("order {} has dangling references", row.id)))
}

#[utoipa::path(
    get,
    path = "/orders",
    params(OrderListParams),
    responses(
        (status = 200, description = "List orders with customer and product", body = Vec<Order>),
        (status = 401, description = "Missing or invalid token", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<OrderListParams>,
) -> PagedJson<Order> {
    let tables = state.db.read().await;
    let mut orders: Vec<Order> = tables
        .orders
        .iter()
        .filter(|o| params.customer_id.is_none_or(|id| o.customer_id == id))
        .filter(|o| {
            params
                .status
                .as_deref()
                .is_none_or(|s| o.status.eq_ignore_ascii_case(s.trim()))
        })
        .filter_map(|o| tables.join_order(o))
        .collect();
    // Ties on the sort key keep the newest order first.
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    list_rows(
        &orders,
        &params.listing(),
        |o| format!("{} {}", o.customer.name, o.product.name),
        |o, key| match key {
            SortKey::Name => SortValue::text(&o.customer.name),
            SortKey::Price => SortValue::Number(o.total()),
            SortKey::Category => SortValue::text(&o.status),
        },
    )
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Get order", body = Order),
        (status = 404, description = "Order not found", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Order>> {
    let tables = state.db.read().await;
    let row = tables
        .orders
        .iter()
        .find(|o| o.id == id)
        .ok_or_else(not_found)?;
    Ok(Json(joined(&tables, row)?))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Create order", body = Order),
        (status = 404, description = "Unknown customer or product", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<Order>)> {
    payload.validate().map_err(AppError::Unprocessable)?;
    let mut tables = state.db.write().await;
    ensure_references(&tables, payload.customer_id, payload.product_id)?;

    let row = OrderRow {
        id: tables.next_order_id(),
        customer_id: payload.customer_id,
        product_id: payload.product_id,
        quantity: payload.quantity,
        status: non_blank(payload.status).unwrap_or_else(|| DEFAULT_ORDER_STATUS.to_string()),
        notes: non_blank(payload.notes),
        created_at: Utc::now(),
    };
    let order = joined(&tables, &row)?;
    tables.orders.push(row);
    log_audit(
        &mut tables,
        &user.username,
        "order_create",
        "orders",
        serde_json::json!({ "order_id": order.id }),
    );

    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 404, description = "Order, customer or product not found", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<Json<Order>> {
    payload.validate().map_err(AppError::Unprocessable)?;
    let mut tables = state.db.write().await;

    let mut row = tables
        .orders
        .iter()
        .find(|o| o.id == id)
        .cloned()
        .ok_or_else(not_found)?;

    if let Some(customer_id) = payload.customer_id {
        row.customer_id = customer_id;
    }
    if let Some(product_id) = payload.product_id {
        row.product_id = product_id;
    }
    if let Some(quantity) = payload.quantity {
        row.quantity = quantity;
    }
    if let Some(status) = non_blank(payload.status) {
        row.status = status;
    }
    if payload.notes.is_some() {
        row.notes = non_blank(payload.notes);
    }
    ensure_references(&tables, row.customer_id, row.product_id)?;

    let order = joined(&tables, &row)?;
    if let Some(slot) = tables.orders.iter_mut().find(|o| o.id == id) {
        *slot = row;
    }
    log_audit(
        &mut tables,
        &user.username,
        "order_update",
        "orders",
        serde_json::json!({ "order_id": id }),
    );

    Ok(Json(order))
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = i64, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Deleted order"),
        (status = 404, description = "Order not found", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut tables = state.db.write().await;

    if !tables.orders.iter().any(|o| o.id == id) {
        return Err(not_found());
    }

    tables.orders.retain(|o| o.id != id);
    log_audit(
        &mut tables,
        &user.username,
        "order_delete",
        "orders",
        serde_json::json!({ "order_id": id }),
    );
    Ok(StatusCode::NO_CONTENT)
}
