use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProfileService;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::UpdateRoleRequest;
use crate::models::users::responses::ProfileResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::current_user;

pub async fn update_role(
    service: &ProfileService,
    request: &HttpRequest,
    user_id: i64,
    update_data: UpdateRoleRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 管理员不能撤销自己的管理员身份
    if current.id() == user_id && update_data.role != UserRole::Admin {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::CanNotDemoteCurrentUser,
            "You cannot remove your own admin role",
        )));
    }

    let storage = service.get_storage(request);

    match storage.update_profile_role(user_id, update_data.role).await {
        Ok(Some(profile)) => {
            tracing::info!(
                "User {} changed role of user {} to {}",
                current.id(),
                profile.user_id,
                profile.role
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                ProfileResponse { profile },
                "Role updated successfully",
            )))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ProfileNotFound,
            "Profile not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Failed to update role: {e}"),
            )),
        ),
    }
}
