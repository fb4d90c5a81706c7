use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};

use crate::entities::status::Status;
use crate::entities::{role, user};
use crate::error::{AppError, AppResult};
use crate::handlers::users::hash_password;
use crate::utils::jwt::{create_token, Claims};
use crate::utils::pending::{ConfirmOutcome, PendingRegistration};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub email: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserInfo,
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordValidation {
    pub min_length: bool,
    pub has_upper: bool,
    pub has_lower: bool,
    pub has_number: bool,
    pub has_special: bool,
}

impl PasswordValidation {
    fn is_valid(&self) -> bool {
        self.min_length && self.has_upper && self.has_lower && self.has_number && self.has_special
    }
}

fn validate_password(password: &str) -> PasswordValidation {
    PasswordValidation {
        min_length: password.len() >= 8,
        has_upper: password.chars().any(|c| c.is_ascii_uppercase()),
        has_lower: password.chars().any(|c| c.is_ascii_lowercase()),
        has_number: password.chars().any(|c| c.is_ascii_digit()),
        has_special: password.chars().any(|c| "!@#$%^&*(),.?\":{}|<>".contains(c)),
    }
}

async fn role_code(state: &AppState, role_id: Option<i32>) -> AppResult<Option<String>> {
    let Some(role_id) = role_id else {
        return Ok(None);
    };
    Ok(role::Entity::find_by_id(role_id)
        .one(&state.db)
        .await?
        .map(|r| r.code))
}

async fn user_info(state: &AppState, user: &user::Model) -> AppResult<UserInfo> {
    Ok(UserInfo {
        id: user.id,
        email: user.account.clone(),
        name: user.full_name.clone(),
        role: role_code(state, user.role_id).await?,
    })
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AppError::BadRequest("Email и пароль обязательны".to_string()));
    };

    let user = user::Entity::find()
        .filter(user::Column::Account.eq(&email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Неверный email или пароль".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Failed to parse password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Неверный email или пароль".to_string()))?;

    let token = create_token(
        user.id,
        &user.account,
        user.is_super_admin,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        success: true,
        user: user_info(&state, &user).await?,
        token,
        message: None,
    }))
}

/// POST /api/auth/register
///
/// Starts a registration: validates the password, stores a hashed pending
/// entry with a confirmation code, and reports the code out of band (logged;
/// a mail integration would pick it up here).
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Response> {
    let (Some(email), Some(password)) = (payload.email, payload.password) else {
        return Err(AppError::BadRequest("Email и пароль обязательны".to_string()));
    };

    let validation = validate_password(&password);
    if !validation.is_valid() {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "message": "Пароль не соответствует требованиям",
                "validation": validation,
            })),
        )
            .into_response());
    }

    let existing = user::Entity::find()
        .filter(user::Column::Account.eq(&email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "Пользователь с таким email уже существует".to_string(),
        ));
    }

    let code = rand::thread_rng().gen_range(100_000..=999_999).to_string();
    state.pending.insert(
        &email,
        PendingRegistration {
            password_hash: hash_password(&password)?,
            code: code.clone(),
        },
    );

    tracing::info!(email = %email, code = %code, "Confirmation code issued");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Код подтверждения отправлен на email",
        "email": email,
    }))
    .into_response())
}

/// POST /api/auth/confirm
pub async fn confirm(
    State(state): State<AppState>,
    Json(payload): Json<ConfirmRequest>,
) -> AppResult<Json<AuthResponse>> {
    let (Some(email), Some(code)) = (payload.email, payload.code) else {
        return Err(AppError::BadRequest("Email и код обязательны".to_string()));
    };

    let registration = match state.pending.confirm(&email, &code) {
        ConfirmOutcome::Missing => {
            return Err(AppError::BadRequest(
                "Регистрация не найдена или истекла".to_string(),
            ));
        }
        ConfirmOutcome::Expired => {
            return Err(AppError::BadRequest("Срок регистрации истек".to_string()));
        }
        ConfirmOutcome::CodeMismatch => {
            return Err(AppError::BadRequest(
                "Неверный код подтверждения".to_string(),
            ));
        }
        ConfirmOutcome::Confirmed(registration) => registration,
    };

    let new_user = user::ActiveModel {
        full_name: Set("Агент".to_string()),
        account: Set(email.clone()),
        password_hash: Set(registration.password_hash),
        is_super_admin: Set(false),
        status: Set(Status::Active),
        ..Default::default()
    };
    let user = new_user.insert(&state.db).await?;

    let token = create_token(
        user.id,
        &user.account,
        user.is_super_admin,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        success: true,
        user: user_info(&state, &user).await?,
        token,
        message: Some("Регистрация успешно завершена"),
    }))
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub user: UserInfo,
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<MeResponse>> {
    let user = user::Entity::find_by_id(claims.sub)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Не авторизован".to_string()))?;

    Ok(Json(MeResponse {
        user: user_info(&state, &user).await?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strong_password_passes() {
        assert!(validate_password("Str0ng!pass").is_valid());
    }

    #[test]
    fn each_rule_reported() {
        let v = validate_password("short");
        assert!(!v.min_length);
        assert!(!v.has_upper);
        assert!(v.has_lower);
        assert!(!v.has_number);
        assert!(!v.has_special);

        let v = validate_password("NOLOWER123!");
        assert!(!v.has_lower);
        assert!(v.has_upper && v.has_number && v.has_special);
    }
}
