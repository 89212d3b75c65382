use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProgressService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_progress(
    service: &ProgressService,
    request: &HttpRequest,
    progress_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_progress(progress_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
            "Progress deleted successfully",
        ))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ProgressNotFound,
            "Progress entry not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ProgressOperationFailed,
                format!("Failed to delete progress: {e}"),
            )),
        ),
    }
}
