use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::dashboard::responses::ParentMaterialsQuery;
use crate::models::users::entities::UserRole;
use crate::services::DashboardService;

// 懒加载的全局 DashboardService 实例
static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn admin_metrics(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.admin_metrics(&req).await
}

pub async fn parent_dashboard(req: HttpRequest) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.parent_dashboard(&req).await
}

pub async fn parent_materials(
    req: HttpRequest,
    query: web::Query<ParentMaterialsQuery>,
) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE
        .parent_materials(&req, query.into_inner())
        .await
}

// 配置路由
pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin/dashboard")
            .wrap(middlewares::RequireRole::new(&UserRole::Admin))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(admin_metrics)),
    );

    cfg.service(
        web::scope("/api/v1/dashboard")
            .wrap(middlewares::RequireRole::new_any(
                UserRole::parent_area_roles(),
            ))
            .wrap(middlewares::RequireJWT)
            .route("/parent", web::get().to(parent_dashboard))
            .route("/parent/materials", web::get().to(parent_materials)),
    );
}
