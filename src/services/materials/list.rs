use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::MaterialService;
use crate::models::materials::responses::MaterialListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::{current_user, load_visible_student};

pub async fn list_for_student(
    service: &MaterialService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let auth_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    if let Err(response) = load_visible_student(&storage, &auth_user, student_id).await {
        return Ok(response);
    }

    match storage.list_materials_for_student(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            MaterialListResponse { items },
            "Materials retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list materials: {e}"),
            )),
        ),
    }
}
