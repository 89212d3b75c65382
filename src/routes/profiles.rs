use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::{ProfileListParams, UpdateRoleRequest};
use crate::services::ProfileService;
use crate::utils::SafeIDI64;

// 懒加载的全局 ProfileService 实例
static PROFILE_SERVICE: Lazy<ProfileService> = Lazy::new(ProfileService::new_lazy);

pub async fn list_profiles(
    req: HttpRequest,
    query: web::Query<ProfileListParams>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.list_profiles(&req, query.into_inner()).await
}

pub async fn list_parents(req: HttpRequest) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE.list_parents(&req).await
}

pub async fn update_role(
    req: HttpRequest,
    path: SafeIDI64,
    role_data: web::Json<UpdateRoleRequest>,
) -> ActixResult<HttpResponse> {
    PROFILE_SERVICE
        .update_role(&req, path.0, role_data.into_inner())
        .await
}

// 配置路由
pub fn configure_profile_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin/profiles")
            .wrap(middlewares::RequireRole::new(&UserRole::Admin))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_profiles))
            .route("/parents", web::get().to(list_parents))
            .route("/{id}/role", web::put().to(update_role)),
    );
}
