use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{config::JwtConfig, error::AppError, state::AppState};

pub const ISSUER: &str = "moredoc";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserClaims {
    pub user_id: i64,
    /// 토큰마다 새로 발급되는 UUID
    pub uuid: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
}

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub token_uuid: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AuthError::MissingToken)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::InvalidToken)?;

        let claims = check_user_jwt_token(token, &state.jwt)?;

        Ok(AuthUser {
            user_id: claims.user_id,
            token_uuid: claims.uuid,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    ExpiredToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AuthError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "missing_token",
                "Authorization token is required",
            ),
            AuthError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authorization token",
            ),
            AuthError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                "expired_token",
                "Authorization token has expired",
            ),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

/// 사용자 JWT를 발급합니다. 유효 기간은 `JwtConfig::duration_days`일입니다.
///
/// 만료 시각을 표현할 수 없을 만큼 큰 기간이면 `AppError::Internal`을 반환합니다.
pub fn create_user_jwt_token(user_id: i64, cfg: &JwtConfig) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = Duration::try_days(cfg.duration_days)
        .and_then(|duration| now.checked_add_signed(duration))
        .ok_or_else(|| {
            AppError::Internal(format!("JWT duration out of range: {} days", cfg.duration_days))
        })?;
    let claims = UserClaims {
        user_id,
        uuid: uuid::Uuid::now_v7().to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
        iss: ISSUER.to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))
}

/// 서명, 만료 시각, 발급자를 검증하고 클레임을 돌려줍니다.
pub fn check_user_jwt_token(token: &str, cfg: &JwtConfig) -> Result<UserClaims, AuthError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[ISSUER]);

    let token_data = decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(cfg.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
        _ => AuthError::InvalidToken,
    })?;

    Ok(token_data.claims)
}
