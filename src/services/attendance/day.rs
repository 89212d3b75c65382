use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AttendanceService, today};
use crate::models::attendance::requests::AttendanceDateQuery;
use crate::models::attendance::responses::{AttendanceDayResponse, AttendanceSummary};
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_by_date(
    service: &AttendanceService,
    request: &HttpRequest,
    query: AttendanceDateQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let date = query.date.unwrap_or_else(today);

    match storage.list_attendance_by_date(date).await {
        Ok(items) => {
            let summary = AttendanceSummary::from_records(&items);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AttendanceDayResponse {
                    date,
                    items,
                    summary,
                },
                "Attendance retrieved successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::AttendanceOperationFailed,
                format!("Failed to list attendance: {e}"),
            )),
        ),
    }
}
