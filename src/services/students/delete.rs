use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::materials::remove_stored_object;

pub async fn delete_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 先记下资料文件，行删除成功后再清理对象
    let materials = match storage.list_materials_for_student(student_id).await {
        Ok(materials) => materials,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::StudentOperationFailed,
                    format!("Failed to delete student: {e}"),
                )),
            );
        }
    };

    match storage.delete_student(student_id).await {
        Ok(true) => {
            for material in &materials {
                remove_stored_object(&material.file_path).await;
            }
            tracing::info!(
                "Student {} deleted with {} material file(s)",
                student_id,
                materials.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Student deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::StudentOperationFailed,
                format!("Failed to delete student: {e}"),
            )),
        ),
    }
}
