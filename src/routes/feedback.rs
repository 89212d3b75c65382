use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::feedback::requests::{CreateFeedbackRequest, RecentFeedbackQuery};
use crate::models::users::entities::UserRole;
use crate::services::FeedbackService;
use crate::utils::SafeIDI64;

// 懒加载的全局 FeedbackService 实例
static FEEDBACK_SERVICE: Lazy<FeedbackService> = Lazy::new(FeedbackService::new_lazy);

pub async fn create_feedback(
    req: HttpRequest,
    create_data: web::Json<CreateFeedbackRequest>,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE
        .create_feedback(&req, create_data.into_inner())
        .await
}

pub async fn list_recent(
    req: HttpRequest,
    query: web::Query<RecentFeedbackQuery>,
) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.list_recent(&req, query.into_inner()).await
}

pub async fn list_for_student(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.list_for_student(&req, path.0).await
}

pub async fn unread_count(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.unread_count(&req, path.0).await
}

pub async fn mark_read(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    FEEDBACK_SERVICE.mark_read(&req, path.0).await
}

// 配置路由
pub fn configure_feedback_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin/feedback")
            .wrap(middlewares::RequireRole::new(&UserRole::Admin))
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(create_feedback))
            .route("/recent", web::get().to(list_recent)),
    );

    cfg.service(
        web::scope("/api/v1/feedback")
            .wrap(middlewares::RequireRole::new_any(
                UserRole::parent_area_roles(),
            ))
            .wrap(middlewares::RequireJWT)
            .route("/{id}/read", web::post().to(mark_read)),
    );
}
