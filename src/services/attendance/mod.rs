pub mod day;
pub mod history;
pub mod mark;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use std::sync::Arc;

use crate::models::attendance::requests::{
    AttendanceDateQuery, BulkPresentRequest, MarkAttendanceRequest,
};
use crate::storage::Storage;

pub struct AttendanceService {
    storage: Option<Arc<dyn Storage>>,
}

/// 服务器本地日期
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl AttendanceService {
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

    // 某日考勤及统计
    pub async fn list_by_date(
        &self,
        request: &HttpRequest,
        query: AttendanceDateQuery,
    ) -> ActixResult<HttpResponse> {
        day::list_by_date(self, request, query).await
    }

    pub async fn mark(
        &self,
        request: &HttpRequest,
        mark_data: MarkAttendanceRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_attendance(self, request, mark_data).await
    }

    pub async fn mark_all_present(
        &self,
        request: &HttpRequest,
        bulk_data: BulkPresentRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_all_present(self, request, bulk_data).await
    }

    pub async fn list_for_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        history::list_for_student(self, request, student_id).await
    }

    pub async fn latest_for_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        history::latest_for_student(self, request, student_id).await
    }
}
