use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{MaterialService, remove_stored_object};
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_material(
    service: &MaterialService,
    request: &HttpRequest,
    material_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let material = match storage.get_material_by_id(material_id).await {
        Ok(Some(material)) => material,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::MaterialNotFound,
                "Material not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to load material: {e}"),
                )),
            );
        }
    };

    match storage.delete_material(material_id).await {
        Ok(true) => {
            remove_stored_object(&material.file_path).await;
            tracing::info!("Material {} deleted", material.file_path);
            Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_empty(
                "Material deleted successfully",
            )))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::MaterialNotFound,
            "Material not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to delete material: {e}"),
            )),
        ),
    }
}
