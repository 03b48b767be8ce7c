use std::net::SocketAddr;

use axum::{
    Form, Json, Router,
    extract::{ConnectInfo, State},
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::auth::{ErrorDetail, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    error::AppResult,
    services::auth_service::{login_user, register_user},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
}

#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Register user", body = RegisterResponse),
        (status = 403, description = "Invalid invite code", body = ErrorDetail),
        (status = 409, description = "Username or e-mail taken", body = ErrorDetail),
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let resp = register_user(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    post,
    path = "/login",
    request_body(content = LoginRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login user", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorDetail),
        (status = 429, description = "Too many attempts, see Retry-After", body = ErrorDetail),
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    Form(payload): Form<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    state.login_limiter.check(addr.ip()).await?;
    let resp = login_user(&state, payload).await?;
    Ok(Json(resp))
}
