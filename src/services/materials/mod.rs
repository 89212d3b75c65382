pub mod delete;
pub mod download;
pub mod list;
pub mod signed_url;
pub mod upload;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::SchoolHubError;
use crate::storage::Storage;
use crate::utils::object_store::resolve_object_path;

/// 签名下载链接的路径
pub(crate) const DOWNLOAD_PATH: &str = "/api/v1/materials/download";

pub struct MaterialService {
    storage: Option<Arc<dyn Storage>>,
}

impl MaterialService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub async fn upload(
        &self,
        request: &HttpRequest,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        upload::handle_upload(self, request, payload).await
    }

    pub async fn list_for_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_for_student(self, request, student_id).await
    }

    pub async fn signed_url(
        &self,
        request: &HttpRequest,
        material_id: i64,
    ) -> ActixResult<HttpResponse> {
        signed_url::create_signed_url(self, request, material_id).await
    }

    pub async fn download(&self, request: &HttpRequest, token: String) -> ActixResult<HttpResponse> {
        download::handle_download(self, request, token).await
    }

    pub async fn delete(&self, request: &HttpRequest, material_id: i64) -> ActixResult<HttpResponse> {
        delete::delete_material(self, request, material_id).await
    }
}

/// 删除存储的对象，文件已不存在时忽略
pub(crate) async fn remove_stored_object(file_path: &str) {
    let upload_dir = &AppConfig::get().upload.dir;
    let Some(path) = resolve_object_path(upload_dir, file_path) else {
        tracing::warn!("Refusing to remove object outside upload dir: {}", file_path);
        return;
    };

    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::debug!("Removed stored object {}", file_path),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            "{}",
            SchoolHubError::file_operation(format!("Failed to remove {file_path}: {e}"))
        ),
    }
}
