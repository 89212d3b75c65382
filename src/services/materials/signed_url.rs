use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{DOWNLOAD_PATH, MaterialService};
use crate::config::AppConfig;
use crate::models::materials::responses::SignedUrlResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::{current_user, load_visible_student};
use crate::utils::jwt::JwtUtils;

pub(crate) fn signed_download_url(token: &str) -> String {
    format!("{DOWNLOAD_PATH}?token={token}")
}

fn material_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::MaterialNotFound,
        "Material not found",
    ))
}

pub async fn create_signed_url(
    service: &MaterialService,
    request: &HttpRequest,
    material_id: i64,
) -> ActixResult<HttpResponse> {
    let auth_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let material = match storage.get_material_by_id(material_id).await {
        Ok(Some(material)) => material,
        Ok(None) => return Ok(material_not_found()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load material: {e}"),
                )),
            );
        }
    };

    // 不属于自己孩子的资料与不存在的资料同样处理
    if load_visible_student(&storage, &auth_user, material.student_id)
        .await
        .is_err()
    {
        return Ok(material_not_found());
    }

    let expires_in = AppConfig::get().upload.signed_url_expiry;
    match JwtUtils::generate_download_token(material.id, &material.file_path, expires_in) {
        Ok(token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SignedUrlResponse {
                signed_url: signed_download_url(&token),
                expires_in,
            },
            "Signed URL created successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to sign download token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to create signed URL",
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_download_url() {
        assert_eq!(
            signed_download_url("abc.def"),
            "/api/v1/materials/download?token=abc.def"
        );
    }
}
