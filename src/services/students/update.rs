use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{MAX_GRADE_CHARS, MAX_NAME_CHARS, StudentService, ensure_parent};
use crate::models::students::requests::{UpdateStudentParentRequest, UpdateStudentRequest};
use crate::models::students::responses::StudentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::required_text;

pub async fn update_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    update_data: UpdateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let name = match update_data.name {
        Some(name) => match required_text("Name", &name, MAX_NAME_CHARS) {
            Ok(name) => Some(name),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::StudentNameInvalid, msg)));
            }
        },
        None => None,
    };

    // 空字符串表示清除年级
    let grade = update_data.grade.map(|g| g.trim().to_string());
    if grade
        .as_deref()
        .is_some_and(|g| g.chars().count() > MAX_GRADE_CHARS)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Grade must be at most {MAX_GRADE_CHARS} characters"),
        )));
    }

    match storage
        .update_student(student_id, UpdateStudentRequest { name, grade })
        .await
    {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentResponse { student },
            "Student updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::StudentOperationFailed,
                format!("Failed to update student: {e}"),
            )),
        ),
    }
}

pub async fn update_student_parent(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
    update_data: UpdateStudentParentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(parent_id) = update_data.parent_id
        && let Err(response) = ensure_parent(&storage, parent_id).await
    {
        return Ok(response);
    }

    match storage
        .set_student_parent(student_id, update_data.parent_id)
        .await
    {
        Ok(Some(student)) => {
            let message = if student.parent_id.is_some() {
                "Parent linked successfully"
            } else {
                "Parent unlinked successfully"
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(StudentResponse { student }, message)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotFound,
            "Student not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::StudentOperationFailed,
                format!("Failed to update student parent: {e}"),
            )),
        ),
    }
}
