use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgressService;
use crate::models::progress::requests::ProgressListQuery;
use crate::models::progress::responses::ProgressListResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::{current_user, load_visible_student};

pub async fn list_progress(
    service: &ProgressService,
    request: &HttpRequest,
    query: ProgressListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_progress(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProgressListResponse { items },
            "Progress retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ProgressOperationFailed,
                format!("Failed to list progress: {e}"),
            )),
        ),
    }
}

pub async fn list_for_student(
    service: &ProgressService,
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

    let query = ProgressListQuery {
        student_id: Some(student_id),
        ..Default::default()
    };

    match storage.list_progress(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProgressListResponse { items },
            "Progress retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ProgressOperationFailed,
                format!("Failed to list progress: {e}"),
            )),
        ),
    }
}
