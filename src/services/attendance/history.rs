use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::attendance::responses::{AttendanceListResponse, LatestAttendanceResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::{current_user, load_visible_student};

pub async fn list_for_student(
    service: &AttendanceService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let auth_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    if let Err(response) = load_visible_student(&storage, &auth_user, student_id).await {
        return Ok(response);
    }

    match storage.list_attendance_for_student(student_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceListResponse { items },
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AttendanceOperationFailed,
                format!("Failed to list attendance: {e}"),
            )),
        ),
    }
}

pub async fn latest_for_student(
    service: &AttendanceService,
    request: &HttpRequest,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let auth_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    if let Err(response) = load_visible_student(&storage, &auth_user, student_id).await {
        return Ok(response);
    }

    match storage.get_latest_attendance(student_id).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            LatestAttendanceResponse { record },
            "Latest attendance retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AttendanceOperationFailed,
                format!("Failed to load attendance: {e}"),
            )),
        ),
    }
}
