use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FeedbackService;
use crate::models::feedback::requests::RecentFeedbackQuery;
use crate::models::feedback::responses::{FeedbackListResponse, UnreadCountResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::{current_user, load_visible_student};

const DEFAULT_RECENT_LIMIT: u64 = 5;
const MAX_RECENT_LIMIT: u64 = 50;

fn recent_limit(query: &RecentFeedbackQuery) -> u64 {
    query
        .limit
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .clamp(1, MAX_RECENT_LIMIT)
}

pub async fn list_recent(
    service: &FeedbackService,
    request: &HttpRequest,
    query: RecentFeedbackQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_recent_feedback(recent_limit(&query)).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FeedbackListResponse { items },
            "Recent feedback retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FeedbackOperationFailed,
                format!("Failed to list feedback: {e}"),
            )),
        ),
    }
}

pub async fn list_for_student(
    service: &FeedbackService,
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

    // 家长只能看到对家长可见的消息
    match storage
        .list_feedback_for_student(student_id, !auth_user.is_admin())
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            FeedbackListResponse { items },
            "Feedback retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FeedbackOperationFailed,
                format!("Failed to list feedback: {e}"),
            )),
        ),
    }
}

pub async fn unread_count(
    service: &FeedbackService,
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

    match storage
        .count_unread_feedback(student_id, !auth_user.is_admin())
        .await
    {
        Ok(unread) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UnreadCountResponse { student_id, unread },
            "Unread count retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::FeedbackOperationFailed,
                format!("Failed to count unread feedback: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_limit_defaults_and_bounds() {
        assert_eq!(recent_limit(&RecentFeedbackQuery { limit: None }), 5);
        assert_eq!(recent_limit(&RecentFeedbackQuery { limit: Some(0) }), 1);
        assert_eq!(recent_limit(&RecentFeedbackQuery { limit: Some(20) }), 20);
        assert_eq!(recent_limit(&RecentFeedbackQuery { limit: Some(500) }), 50);
    }
}
