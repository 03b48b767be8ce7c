use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    audit::log_audit,
    dto::{
        Validate,
        auth::ErrorDetail,
        customers::{CreateCustomerRequest, UpdateCustomerRequest},
        non_blank,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::Customer,
    response::PagedJson,
    routes::params::ListParams,
    services::listing::{SortValue, list_rows},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route(
            "/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
}

fn not_found() -> AppError {
    AppError::NotFound("Customer not found".into())
}

fn email_taken() -> AppError {
    AppError::Conflict("The e-mail is already registered".into())
}

#[utoipa::path(
    get,
    path = "/customers",
    params(ListParams),
    responses((status = 200, description = "List customers", body = Vec<Customer>)),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> PagedJson<Customer> {
    let tables = state.db.read().await;
    list_rows(
        &tables.customers,
        &params,
        |c| format!("{} {}", c.name, c.email),
        |c, _| SortValue::text(&c.name),
    )
}

#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Get customer", body = Customer),
        (status = 404, description = "Customer not found", body = ErrorDetail),
    ),
    tag = "Customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let tables = state.db.read().await;
    tables
        .customers
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

#[utoipa::path(
    post,
    path = "/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Create customer", body = Customer),
        (status = 409, description = "E-mail already registered", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCustomerRequest>,
) -> AppResult<(StatusCode, Json<Customer>)> {
    payload.validate().map_err(AppError::Unprocessable)?;
    let email = payload.email.trim().to_lowercase();
    let mut tables = state.db.write().await;

    if tables.customers.iter().any(|c| c.email == email) {
        return Err(email_taken());
    }

    let customer = Customer {
        id: tables.next_customer_id(),
        name: payload.name.trim().to_string(),
        email,
        phone: non_blank(payload.phone),
    };
    tables.customers.push(customer.clone());
    log_audit(
        &mut tables,
        &user.username,
        "customer_create",
        "customers",
        serde_json::json!({ "customer_id": customer.id }),
    );

    Ok((StatusCode::CREATED, Json(customer)))
}

#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer ID")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Updated customer", body = Customer),
        (status = 404, description = "Customer not found", body = ErrorDetail),
        (status = 409, description = "E-mail already registered", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> AppResult<Json<Customer>> {
    payload.validate().map_err(AppError::Unprocessable)?;
    let email = payload.email.map(|e| e.trim().to_lowercase());
    let mut tables = state.db.write().await;

    if let Some(email) = &email
        && tables
            .customers
            .iter()
            .any(|c| c.id != id && &c.email == email)
    {
        return Err(email_taken());
    }

    let customer = tables
        .customers
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(not_found)?;
    if let Some(name) = payload.name {
        customer.name = name.trim().to_string();
    }
    if let Some(email) = email {
        customer.email = email;
    }
    if payload.phone.is_some() {
        customer.phone = non_blank(payload.phone);
    }
    let updated = customer.clone();

    log_audit(
        &mut tables,
        &user.username,
        "customer_update",
        "customers",
        serde_json::json!({ "customer_id": id }),
    );
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Deleted customer"),
        (status = 400, description = "Customer has orders", body = ErrorDetail),
        (status = 404, description = "Customer not found", body = ErrorDetail),
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    let mut tables = state.db.write().await;

    if !tables.customers.iter().any(|c| c.id == id) {
        return Err(not_found());
    }
    if tables.orders.iter().any(|o| o.customer_id == id) {
        return Err(AppError::BadRequest(
            "Cannot delete the customer because it has registered orders".into(),
        ));
    }

    tables.customers.retain(|c| c.id != id);
    log_audit(
        &mut tables,
        &user.username,
        "customer_delete",
        "customers",
        serde_json::json!({ "customer_id": id }),
    );
    Ok(StatusCode::NO_CONTENT)
}
