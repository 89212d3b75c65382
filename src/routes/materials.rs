use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::materials::requests::DownloadQuery;
use crate::models::users::entities::UserRole;
use crate::services::MaterialService;
use crate::utils::SafeIDI64;

// 懒加载的全局 MaterialService 实例
static MATERIAL_SERVICE: Lazy<MaterialService> = Lazy::new(MaterialService::new_lazy);

pub async fn upload(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.upload(&req, payload).await
}

pub async fn list_for_student(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.list_for_student(&req, path.0).await
}

pub async fn signed_url(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.signed_url(&req, path.0).await
}

pub async fn download(
    req: HttpRequest,
    query: web::Query<DownloadQuery>,
) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE
        .download(&req, query.into_inner().token)
        .await
}

pub async fn delete_material(req: HttpRequest, path: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.delete(&req, path.0).await
}

// 配置路由
pub fn configure_material_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/admin/materials")
            .wrap(middlewares::RequireRole::new(&UserRole::Admin))
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .wrap(RateLimit::file_upload())
                    .route(web::post().to(upload)),
            )
            .route("/{id}", web::delete().to(delete_material)),
    );

    // 下载链接本身携带签名，无需登录
    cfg.service(
        web::scope("/api/v1/materials")
            .route("/download", web::get().to(download))
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(
                        UserRole::parent_area_roles(),
                    ))
                    .wrap(middlewares::RequireJWT)
                    .route("/{id}/signed-url", web::get().to(signed_url)),
            ),
    );
}
