use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{MAX_NOTE_CHARS, MAX_SUBJECT_CHARS, MAX_TITLE_CHARS, ProgressService, check_len};
use crate::models::progress::requests::UpdateProgressRequest;
use crate::models::progress::responses::ProgressResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{required_text, validate_score};

pub async fn update_progress(
    service: &ProgressService,
    request: &HttpRequest,
    progress_id: i64,
    update_data: UpdateProgressRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let subject = match update_data.subject {
        Some(subject) => match required_text("Subject", &subject, MAX_SUBJECT_CHARS) {
            Ok(subject) => Some(subject),
            Err(msg) => {
                return Ok(HttpResponse::BadRequest()
                    .json(ApiResponse::error_empty(ErrorCode::ProgressInvalid, msg)));
            }
        },
        None => None,
    };
    let title = update_data.title.map(|t| t.trim().to_string());
    let note = update_data.note.map(|n| n.trim().to_string());

    let checks = check_len("Title", title.as_deref(), MAX_TITLE_CHARS)
        .and_then(|_| check_len("Note", note.as_deref(), MAX_NOTE_CHARS))
        .and_then(|_| validate_score(update_data.score.flatten()).map_err(str::to_string));
    if let Err(msg) = checks {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ProgressInvalid, msg)));
    }

    let update = UpdateProgressRequest {
        subject,
        title,
        score: update_data.score,
        note,
        progress_date: update_data.progress_date,
    };

    match storage.update_progress(progress_id, update).await {
        Ok(Some(entry)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProgressResponse { entry },
            "Progress updated successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ProgressNotFound,
            "Progress entry not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ProgressOperationFailed,
                format!("Failed to update progress: {e}"),
            )),
        ),
    }
}
