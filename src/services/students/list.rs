use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use super::access::current_user;
use crate::models::students::requests::StudentListQuery;
use crate::models::students::responses::StudentListResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_students(
    service: &StudentService,
    request: &HttpRequest,
    query: StudentListQuery,
) -> ActixResult<HttpResponse> {
    let auth_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    // 家长只能看到自己名下的学生
    let query = if auth_user.is_admin() {
        query
    } else {
        StudentListQuery {
            parent_id: Some(auth_user.id()),
            search: query.search,
        }
    };

    match storage.list_students(query).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentListResponse { items },
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::StudentOperationFailed,
                format!("Failed to list students: {e}"),
            )),
        ),
    }
}
