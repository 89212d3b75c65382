use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::{ForgotPasswordRequest, ResetPasswordRequest};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_token;
use crate::utils::validate::{normalize_email, validate_email, validate_password};

use super::AuthService;

const RESET_TOKEN_LENGTH: usize = 48;
const FORGOT_PASSWORD_MESSAGE: &str =
    "If the account exists, a password reset link has been sent";

/// 重置链接：`reset_url?token=...`
pub(crate) fn build_reset_link(reset_url: &str, token: &str) -> String {
    let separator = if reset_url.contains('?') { '&' } else { '?' };
    format!("{reset_url}{separator}token={token}")
}

pub async fn handle_forgot_password(
    service: &AuthService,
    forgot_request: ForgotPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let config = service.get_config();
    let email = normalize_email(&forgot_request.email);

    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    // 无论账号是否存在都返回相同响应
    match storage.get_user_by_email(&email).await {
        Ok(Some(user)) if user.status == UserStatus::Active => {
            let token = generate_token(RESET_TOKEN_LENGTH);
            let expires_at = (chrono::Utc::now()
                + chrono::Duration::minutes(config.recovery.token_expiry))
            .timestamp();

            match storage
                .create_password_reset(user.id, &token, expires_at)
                .await
            {
                Ok(()) => {
                    tracing::info!(
                        email = %user.email,
                        expires_in_minutes = config.recovery.token_expiry,
                        "Password recovery link: {}",
                        build_reset_link(&config.recovery.reset_url, &token)
                    );
                }
                Err(e) => {
                    tracing::error!("Failed to store password reset token: {}", e);
                }
            }
        }
        Ok(Some(user)) => {
            tracing::info!("Password recovery requested for inactive user {}", user.id);
        }
        Ok(None) => {
            tracing::debug!("Password recovery requested for unknown email");
        }
        Err(e) => {
            tracing::error!("Failed to look up user for password recovery: {}", e);
        }
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(FORGOT_PASSWORD_MESSAGE)))
}

pub async fn handle_reset_password(
    service: &AuthService,
    reset_request: ResetPasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let token = reset_request.token.trim();
    if token.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ResetTokenInvalid,
            "Reset token is invalid or has expired",
        )));
    }

    if let Err(msg) = validate_password(&reset_request.password) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    let password_hash = match hash_password(&reset_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    match storage
        .reset_password_with_token(token, &password_hash)
        .await
    {
        Ok(Some(user_id)) => {
            tracing::info!("Password reset completed for user {}", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Password has been reset, please login again",
            )))
        }
        Ok(None) => Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ResetTokenInvalid,
            "Reset token is invalid or has expired",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Password reset failed: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_reset_link() {
        assert_eq!(
            build_reset_link("http://localhost:5173/reset-password", "abc"),
            "http://localhost:5173/reset-password?token=abc"
        );
        assert_eq!(
            build_reset_link("https://school.example/reset?lang=en", "abc"),
            "https://school.example/reset?lang=en&token=abc"
        );
    }
}
