use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::{
    AttendanceDateQuery, BulkPresentRequest, MarkAttendanceRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

// 懒加载的全局 AttendanceService 实例
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn list_by_date(
    req: HttpRequest,
    query: web::Query<AttendanceDateQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .list_by_date(&req, query.into_inner())
        .await
}

pub async fn mark(
    req: HttpRequest,
    mark_data: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.mark(&req, mark_data.into_inner()).await
}

pub async fn mark_all_present(
    req: HttpRequest,
    bulk_data: web::Json<BulkPresentRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_all_present(&req, bulk_data.into_inner())
        .await
}

pub async fn list_for_student(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.list_for_student(&req, path.0).await
}

pub async fn latest_for_student(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.latest_for_student(&req, path.0).await
}

// 配置路由（学生维度的查询在 students 路由中注册）
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin/attendance")
            .wrap(middlewares::RequireRole::new(&UserRole::Admin))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_by_date))
            .route("", web::put().to(mark))
            .route("/bulk-present", web::post().to(mark_all_present)),
    );
}
