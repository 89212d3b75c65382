use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeedbackService;
use crate::models::feedback::requests::{CreateFeedbackRequest, NewFeedback};
use crate::models::feedback::responses::FeedbackResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::current_user;
use crate::utils::validate::required_text;

const MAX_CONTENT_CHARS: usize = 5000;

pub async fn create_feedback(
    service: &FeedbackService,
    request: &HttpRequest,
    create_data: CreateFeedbackRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let content = match required_text("Content", &create_data.content, MAX_CONTENT_CHARS) {
        Ok(content) => content,
        Err(msg) => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::FeedbackContentEmpty, msg)));
        }
    };

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
                    ErrorCode::FeedbackOperationFailed,
                    format!("Failed to create feedback: {e}"),
                )),
            );
        }
    }

    let new_feedback = NewFeedback {
        student_id: create_data.student_id,
        content,
        visibility: create_data.visibility,
        created_by: Some(current.id()),
    };

    match storage.create_feedback(new_feedback).await {
        Ok(feedback) => Ok(HttpResponse::Created().json(ApiResponse::success(
            FeedbackResponse { feedback },
            "Feedback created successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FeedbackOperationFailed,
                format!("Failed to create feedback: {e}"),
            )),
        ),
    }
}
