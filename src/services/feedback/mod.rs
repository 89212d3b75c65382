pub mod create;
pub mod list;
pub mod read;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::feedback::requests::{CreateFeedbackRequest, RecentFeedbackQuery};
use crate::storage::Storage;

pub struct FeedbackService {
    storage: Option<Arc<dyn Storage>>,
}

impl FeedbackService {
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

    pub async fn create_feedback(
        &self,
        request: &HttpRequest,
        create_data: CreateFeedbackRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_feedback(self, request, create_data).await
    }

    pub async fn list_recent(
        &self,
        request: &HttpRequest,
        query: RecentFeedbackQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_recent(self, request, query).await
    }

    pub async fn list_for_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_for_student(self, request, student_id).await
    }

    pub async fn unread_count(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::unread_count(self, request, student_id).await
    }

    pub async fn mark_read(
        &self,
        request: &HttpRequest,
        feedback_id: i64,
    ) -> ActixResult<HttpResponse> {
        read::mark_read(self, request, feedback_id).await
    }
}
