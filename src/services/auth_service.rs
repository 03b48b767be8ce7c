use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;

use crate::{
    audit::log_audit,
    config::AppConfig,
    db::UserRecord,
    dto::{
        Validate,
        auth::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse},
    },
    error::{AppError, AppResult},
    state::AppState,
};

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();
    Ok(hash)
}

fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub fn issue_token(config: &AppConfig, username: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::minutes(config.access_token_minutes))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: username.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<LoginResponse> {
    let LoginRequest { username, password } = payload;
    let password_hash = {
        let tables = state.db.read().await;
        tables
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.password_hash.clone())
    };

    let authenticated = match password_hash {
        Some(hash) => verify_password(&password, &hash)?,
        None => false,
    };
    if !authenticated {
        tracing::info!(%username, "login rejected");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let access_token = issue_token(&state.config, &username)?;
    tracing::info!(%username, "login succeeded");
    Ok(LoginResponse {
        access_token,
        token_type: "bearer".to_string(),
    })
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<RegisterResponse> {
    if payload.invite_code.as_deref() != Some(state.config.invite_code.as_str()) {
        return Err(AppError::Forbidden("Invalid invite code".into()));
    }
    payload.validate().map_err(AppError::Unprocessable)?;

    let username = payload.username.trim().to_string();
    let email = payload.email.trim().to_lowercase();
    let password_hash = hash_password(&payload.password)?;

    let mut tables = state.db.write().await;
    if tables.users.iter().any(|u| u.username == username) {
        return Err(AppError::Conflict("The user already exists".into()));
    }
    if tables.users.iter().any(|u| u.email == email) {
        return Err(AppError::Conflict("The e-mail is already registered".into()));
    }

    let id = tables.next_user_id();
    tables.users.push(UserRecord {
        id,
        username: username.clone(),
        email,
        password_hash,
        created_at: Utc::now(),
    });
    log_audit(
        &mut tables,
        &username,
        "user_register",
        "users",
        serde_json::json!({ "user_id": id }),
    );

    Ok(RegisterResponse {
        message: "User created".to_string(),
        username,
    })
}
