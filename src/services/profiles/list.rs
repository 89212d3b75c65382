use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ProfileService;
use crate::models::users::requests::{ProfileListParams, ProfileListQuery};
use crate::models::users::responses::ParentListResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_profiles(
    service: &ProfileService,
    request: &HttpRequest,
    query: ProfileListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let list_query = ProfileListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        role: query.role,
        search: query.search,
    };

    match storage.list_profiles_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Profiles retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list profiles: {e}"),
            )),
        ),
    }
}

pub async fn list_parents(
    service: &ProfileService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.list_parents().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ParentListResponse { items },
            "Parents retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to list parents: {e}"),
            )),
        ),
    }
}
