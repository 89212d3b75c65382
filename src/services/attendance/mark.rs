use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::attendance::requests::{
    BulkPresentRequest, MarkAttendanceRequest, UpsertAttendance,
};
use crate::models::attendance::responses::{AttendanceResponse, BulkMarkResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::current_user;
use crate::utils::validate::optional_text;

const MAX_NOTE_CHARS: usize = 500;

pub async fn mark_attendance(
    service: &AttendanceService,
    request: &HttpRequest,
    mark_data: MarkAttendanceRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let note = optional_text(mark_data.note);
    if note
        .as_deref()
        .is_some_and(|n| n.chars().count() > MAX_NOTE_CHARS)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::AttendanceInvalid,
            format!("Note must be at most {MAX_NOTE_CHARS} characters"),
        )));
    }

    match storage.get_student_by_id(mark_data.student_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotFound,
                "Student not found",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::AttendanceOperationFailed,
                    format!("Failed to mark attendance: {e}"),
                )),
            );
        }
    }

    let upsert = UpsertAttendance {
        student_id: mark_data.student_id,
        date: mark_data.date,
        status: mark_data.status,
        note,
        marked_by: Some(current.id()),
    };

    match storage.upsert_attendance(upsert).await {
        Ok(record) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceResponse { record },
            "Attendance saved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AttendanceOperationFailed,
                format!("Failed to mark attendance: {e}"),
            )),
        ),
    }
}

pub async fn mark_all_present(
    service: &AttendanceService,
    request: &HttpRequest,
    bulk_data: BulkPresentRequest,
) -> ActixResult<HttpResponse> {
    let current = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    match storage
        .mark_all_present(bulk_data.date, Some(current.id()))
        .await
    {
        Ok(marked) => {
            tracing::info!(
                "User {} marked {} student(s) present for {}",
                current.id(),
                marked,
                bulk_data.date
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BulkMarkResponse {
                    date: bulk_data.date,
                    marked,
                },
                "All students marked present",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AttendanceOperationFailed,
                format!("Failed to mark attendance: {e}"),
            )),
        ),
    }
}
