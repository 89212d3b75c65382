use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{MAX_NOTE_CHARS, MAX_SUBJECT_CHARS, MAX_TITLE_CHARS, ProgressService, check_len};
use crate::models::progress::requests::CreateProgressRequest;
use crate::models::progress::responses::ProgressResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::current_user;
use crate::utils::validate::{optional_text, required_text, validate_score};

pub async fn create_progress(
    service: &ProgressService,
    request: &HttpRequest,
    create_data: CreateProgressRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let subject = match required_text("Subject", &create_data.subject, MAX_SUBJECT_CHARS) {
        Ok(subject) => subject,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::ProgressInvalid, msg)));
        }
    };
    let title = optional_text(create_data.title);
    let note = optional_text(create_data.note);

    let checks = check_len("Title", title.as_deref(), MAX_TITLE_CHARS)
        .and_then(|_| check_len("Note", note.as_deref(), MAX_NOTE_CHARS))
        .and_then(|_| validate_score(create_data.score).map_err(str::to_string));
    if let Err(msg) = checks {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ProgressInvalid, msg)));
    }

    match storage.get_student_by_id(create_data.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::ProgressOperationFailed,
                    format!("Failed to create progress: {e}"),
                )),
            );
        }
    }

    let entry = CreateProgressRequest {
        student_id: create_data.student_id,
        subject,
        title,
        score: create_data.score,
        note,
        progress_date: create_data.progress_date,
    };

    match storage.create_progress(entry, Some(current.id())).await {
        Ok(entry) => Ok(HttpResponse::Created().json(ApiResponse::success(
            ProgressResponse { entry },
            "Progress created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ProgressOperationFailed,
                format!("Failed to create progress: {e}"),
            )),
        ),
    }
}
