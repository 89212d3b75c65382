use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeedbackService;
use crate::models::feedback::entities::{FeedbackMessage, FeedbackVisibility};
use crate::models::feedback::responses::FeedbackResponse;
use crate::models::users::entities::AuthUser;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::{current_user, load_visible_student};

/// 内部消息对家长不可见
fn visible_to(auth_user: &AuthUser, feedback: &FeedbackMessage) -> bool {
    auth_user.is_admin() || feedback.visibility == FeedbackVisibility::Parents
}

fn feedback_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::FeedbackNotFound,
        "Feedback not found",
    ))
}

pub async fn mark_read(
    service: &FeedbackService,
    request: &HttpRequest,
    feedback_id: i64,
) -> ActixResult<HttpResponse> {
    let auth_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let feedback = match storage.get_feedback_by_id(feedback_id).await {
        Ok(Some(feedback)) if visible_to(&auth_user, &feedback) => feedback,
        Ok(_) => return Ok(feedback_not_found()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::FeedbackOperationFailed,
                    format!("Failed to load feedback: {e}"),
                )),
            );
        }
    };

    if load_visible_student(&storage, &auth_user, feedback.student_id)
        .await
        .is_err()
    {
        return Ok(feedback_not_found());
    }

    // 已读消息直接返回，不改写 read_at
    if feedback.is_read {
        return Ok(HttpResponse::Ok().json(ApiResponse::success(
            FeedbackResponse { feedback },
            "Feedback already marked as read",
        )));
    }

    match storage.mark_feedback_read(feedback_id).await {
        Ok(Some(feedback)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FeedbackResponse { feedback },
            "Feedback marked as read",
        ))),
        Ok(None) => Ok(feedback_not_found()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FeedbackOperationFailed,
                format!("Failed to mark feedback as read: {e}"),
            )),
        ),
    }
}
