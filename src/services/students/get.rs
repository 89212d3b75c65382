use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::StudentService;
use super::access::{current_user, load_visible_student};
use crate::models::ApiResponse;
use crate::models::students::responses::StudentResponse;

pub async fn get_student(
    service: &StudentService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let auth_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    match load_visible_student(&storage, &auth_user, student_id).await {
        Ok(student) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentResponse { student },
            "Student retrieved successfully",
        ))),
        Err(response) => Ok(response),
    }
}
