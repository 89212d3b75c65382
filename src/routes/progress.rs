use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::progress::requests::{
    CreateProgressRequest, ProgressListQuery, UpdateProgressRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ProgressService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ProgressService 实例
static PROGRESS_SERVICE: Lazy<ProgressService> = Lazy::new(ProgressService::new_lazy);

pub async fn list_progress(
    req: HttpRequest,
    query: web::Query<ProgressListQuery>,
) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE
        .list_progress(&req, query.into_inner())
        .await
}

pub async fn list_for_student(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.list_for_student(&req, path.0).await
}

pub async fn create_progress(
    req: HttpRequest,
    create_data: web::Json<CreateProgressRequest>,
) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE
        .create_progress(&req, create_data.into_inner())
        .await
}

pub async fn update_progress(
    req: HttpRequest,
    path: SafeIDI64,
    update_data: web::Json<UpdateProgressRequest>,
) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE
        .update_progress(&req, path.0, update_data.into_inner())
        .await
}

pub async fn delete_progress(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    PROGRESS_SERVICE.delete_progress(&req, path.0).await
}

// 配置路由
pub fn configure_progress_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin/progress")
            .wrap(middlewares::RequireRole::new(&UserRole::Admin))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_progress))
            .route("", web::post().to(create_progress))
            .route("/{id}", web::put().to(update_progress))
            .route("/{id}", web::delete().to(delete_progress)),
    );
}
