use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::{attendance, feedback, materials, progress};
use crate::middlewares;
use crate::models::students::requests::{
    CreateStudentRequest, StudentListQuery, UpdateStudentParentRequest, UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;
use crate::utils::SafeIDI64;

// 懒加载的全局 StudentService 实例
static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .list_students(&req, query.into_inner())
        .await
}

pub async fn get_student(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, path.0).await
}

pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(&req, student_data.into_inner())
        .await
}

pub async fn update_student(
    req: HttpRequest,
    path: SafeIDI64,
    update_data: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, path.0, update_data.into_inner())
        .await
}

pub async fn update_student_parent(
    req: HttpRequest,
    path: SafeIDI64,
    update_data: web::Json<UpdateStudentParentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student_parent(&req, path.0, update_data.into_inner())
        .await
}

pub async fn delete_student(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(&req, path.0).await
}

// 配置路由
//
// 学生子资源（考勤、进度、反馈、资料）挂在同一个 scope 下，
// 各自的处理函数在对应的路由模块中。
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireRole::new_any(
                UserRole::parent_area_roles(),
            ))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_students))
            .route("/{id}", web::get().to(get_student))
            .route(
                "/{id}/attendance",
                web::get().to(attendance::list_for_student),
            )
            .route(
                "/{id}/attendance/latest",
                web::get().to(attendance::latest_for_student),
            )
            .route("/{id}/progress", web::get().to(progress::list_for_student))
            .route("/{id}/feedback", web::get().to(feedback::list_for_student))
            .route(
                "/{id}/feedback/unread-count",
                web::get().to(feedback::unread_count),
            )
            .route(
                "/{id}/materials",
                web::get().to(materials::list_for_student),
            ),
    );

    cfg.service(
        web::scope("/api/v1/admin/students")
            .wrap(middlewares::RequireRole::new(&UserRole::Admin))
            .wrap(middlewares::RequireJWT)
            .route("", web::post().to(create_student))
            .route("/{id}", web::put().to(update_student))
            .route("/{id}", web::delete().to(delete_student))
            .route("/{id}/parent", web::put().to(update_student_parent)),
    );
}
