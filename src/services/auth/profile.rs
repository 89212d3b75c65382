use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::auth::requests::UpdateProfileRequest;
use crate::models::auth::responses::UserInfoResponse;
use crate::models::users::requests::UpdateUserRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::password::hash_password;
use crate::utils::validate::{optional_text, validate_password};

use super::AuthService;

const MAX_NAME_CHARS: usize = 100;

pub async fn handle_update_profile(
    service: &AuthService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let current = match RequireJWT::extract_auth_user(request) {
        Some(auth_user) => auth_user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized access, please login",
            )));
        }
    };

    let full_name = optional_text(update_data.full_name);
    if full_name
        .as_deref()
        .is_some_and(|name| name.chars().count() > MAX_NAME_CHARS)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Full name must be at most {MAX_NAME_CHARS} characters"),
        )));
    }

    // 修改密码
    let mut user = current.user;
    if let Some(ref password) = update_data.password {
        if let Err(msg) = validate_password(password) {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::UserPasswordInvalid,
                msg,
            )));
        }

        let password_hash = match hash_password(password) {
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

        let update = UpdateUserRequest {
            password: Some(password_hash),
            status: None,
        };
        match storage.update_user(user.id, update).await {
            Ok(Some(updated)) => user = updated,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::UserNotFound,
                    "User not found",
                )));
            }
            Err(e) => {
                return Ok(HttpResponse::InternalServerError().json(
                    ApiResponse::error_empty(
                        ErrorCode::UserUpdateFailed,
                        format!("Failed to update password: {e}"),
                    ),
                ));
            }
        }
    }

    let profile = match storage.update_profile_name(user.id, full_name).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ProfileNotFound,
                "Profile not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::UserUpdateFailed,
                    format!("Failed to update profile: {e}"),
                )),
            );
        }
    };

    RequireJWT::invalidate_session(request).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user, profile },
        "Profile updated successfully",
    )))
}
