use actix_web::{
    HttpRequest, HttpResponse, Result as ActixResult,
    http::header::{self, ContentDisposition, DispositionParam, DispositionType},
};

use super::MaterialService;
use crate::config::AppConfig;
use crate::errors::SchoolHubError;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::jwt::JwtUtils;
use crate::utils::object_store::resolve_object_path;

fn link_invalid() -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(
        ErrorCode::DownloadLinkInvalid,
        "Download link is invalid or has expired",
    ))
}

fn file_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::FileNotFound,
        "File not found",
    ))
}

pub async fn handle_download(
    service: &MaterialService,
    request: &HttpRequest,
    token: String,
) -> ActixResult<HttpResponse> {
    let claims = match JwtUtils::verify_download_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Download token rejected: {}", e);
            return Ok(link_invalid());
        }
    };
    let Ok(material_id) = claims.sub.parse::<i64>() else {
        return Ok(link_invalid());
    };

    let storage = service.get_storage(request);
    let material = match storage.get_material_by_id(material_id).await {
        // 资料被删除后旧链接失效
        Ok(Some(material)) if material.file_path == claims.path => material,
        Ok(_) => return Ok(file_not_found()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("File query failed: {e}"),
                )),
            );
        }
    };

    let upload_dir = &AppConfig::get().upload.dir;
    let Some(path) = resolve_object_path(upload_dir, &material.file_path) else {
        return Ok(file_not_found());
    };

    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(file_not_found()),
        Err(e) => {
            tracing::error!("{}", SchoolHubError::file_operation(format!("{e}")));
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "File read failed",
                )),
            );
        }
    };

    let content_type = material
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    // 以原始文件名下载
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type))
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(material.file_name)],
        })
        .insert_header((header::CACHE_CONTROL, "private, no-store"))
        .body(data))
}
