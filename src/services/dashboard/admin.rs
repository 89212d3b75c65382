use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use std::sync::Arc;

use super::DashboardService;
use crate::models::attendance::responses::AttendanceSummary;
use crate::models::dashboard::responses::AdminMetricsResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::attendance::today;
use crate::storage::Storage;

const LATEST_FEEDBACK_LIMIT: u64 = 5;
/// 进度统计窗口：进度日期不早于 today - 7 天
const PROGRESS_WINDOW_DAYS: i64 = 7;

async fn load_metrics(
    storage: &Arc<dyn Storage>,
    today: NaiveDate,
) -> crate::errors::Result<AdminMetricsResponse> {
    let since = today - chrono::Duration::days(PROGRESS_WINDOW_DAYS);

    let (student_count, attendance, progress_count, latest_feedback) = futures_util::join!(
        storage.count_students(),
        storage.list_attendance_by_date(today),
        storage.count_progress_since(since),
        storage.list_recent_feedback(LATEST_FEEDBACK_LIMIT),
    );
    let summary = AttendanceSummary::from_records(&attendance?);

    Ok(AdminMetricsResponse {
        student_count: student_count?,
        today,
        present: summary.present,
        absent: summary.absent,
        progress_count: progress_count?,
        latest_feedback: latest_feedback?,
    })
}

pub async fn admin_metrics(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match load_metrics(&storage, today()).await {
        Ok(metrics) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            metrics,
            "Dashboard metrics retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load dashboard metrics: {e}"),
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attendance::entities::AttendanceStatus;
    use crate::models::attendance::requests::UpsertAttendance;
    use crate::models::progress::requests::CreateProgressRequest;
    use crate::models::users::entities::UserRole;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_student, seed_user};

    #[tokio::test]
    async fn test_load_metrics_counts_today() {
        let db = memory_storage().await;
        let admin = seed_user(&db, "admin@school.org", UserRole::Admin).await;
        let a = seed_student(&db, "A", None).await;
        let b = seed_student(&db, "B", None).await;
        let storage: Arc<dyn Storage> = Arc::new(db);

        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        for (student_id, status) in [(a.id, AttendanceStatus::Present), (b.id, AttendanceStatus::Absent)] {
            storage
                .upsert_attendance(UpsertAttendance {
                    student_id,
                    date: day,
                    status,
                    note: None,
                    marked_by: Some(admin.id()),
                })
                .await
                .unwrap();
        }

        let metrics = load_metrics(&storage, day).await.unwrap();
        assert_eq!(metrics.student_count, 2);
        assert_eq!(metrics.present, 1);
        assert_eq!(metrics.absent, 1);
        assert_eq!(metrics.progress_count, 0);
        assert!(metrics.latest_feedback.is_empty());
    }

    #[tokio::test]
    async fn test_progress_count_window_edges() {
        let db = memory_storage().await;
        let student = seed_student(&db, "C", None).await;
        let storage: Arc<dyn Storage> = Arc::new(db);

        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        for offset in [0, 7, 8] {
            storage
                .create_progress(
                    CreateProgressRequest {
                        student_id: student.id,
                        subject: "Math".to_string(),
                        title: None,
                        score: None,
                        note: None,
                        progress_date: day - chrono::Duration::days(offset),
                    },
                    None,
                )
                .await
                .unwrap();
        }

        // 3 月 3 日在窗口内，3 月 2 日在窗口外
        let metrics = load_metrics(&storage, day).await.unwrap();
        assert_eq!(metrics.progress_count, 2);
    }
}
