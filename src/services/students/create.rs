use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{MAX_GRADE_CHARS, MAX_NAME_CHARS, StudentService, ensure_parent};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::students::responses::StudentResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{optional_text, required_text};

pub async fn create_student(
    service: &StudentService,
    request: &HttpRequest,
    create_data: CreateStudentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let name = match required_text("Name", &create_data.name, MAX_NAME_CHARS) {
        Ok(name) => name,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::StudentNameInvalid, msg)));
        }
    };

    let grade = optional_text(create_data.grade);
    if grade
        .as_deref()
        .is_some_and(|g| g.chars().count() > MAX_GRADE_CHARS)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Grade must be at most {MAX_GRADE_CHARS} characters"),
        )));
    }

    if let Some(parent_id) = create_data.parent_id
        && let Err(response) = ensure_parent(&storage, parent_id).await
    {
        return Ok(response);
    }

    let create_request = CreateStudentRequest {
        name,
        grade,
        parent_id: create_data.parent_id,
    };

    match storage.create_student(create_request).await {
        Ok(student) => {
            tracing::info!("Student {} created (ID: {})", student.name, student.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse { student },
                "Student created successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::StudentOperationFailed,
                format!("Failed to create student: {e}"),
            )),
        ),
    }
}
