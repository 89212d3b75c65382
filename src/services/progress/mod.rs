pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::progress::requests::{
    CreateProgressRequest, ProgressListQuery, UpdateProgressRequest,
};
use crate::storage::Storage;

pub(crate) const MAX_SUBJECT_CHARS: usize = 100;
pub(crate) const MAX_TITLE_CHARS: usize = 200;
pub(crate) const MAX_NOTE_CHARS: usize = 2000;

pub struct ProgressService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProgressService {
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

    pub async fn list_progress(
        &self,
        request: &HttpRequest,
        query: ProgressListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_progress(self, request, query).await
    }

    pub async fn list_for_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_for_student(self, request, student_id).await
    }

    pub async fn create_progress(
        &self,
        request: &HttpRequest,
        create_data: CreateProgressRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_progress(self, request, create_data).await
    }

    pub async fn update_progress(
        &self,
        request: &HttpRequest,
        progress_id: i64,
        update_data: UpdateProgressRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_progress(self, request, progress_id, update_data).await
    }

    pub async fn delete_progress(
        &self,
        request: &HttpRequest,
        progress_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_progress(self, request, progress_id).await
    }
}

/// 可选文本长度校验
pub(crate) fn check_len(field: &str, value: Option<&str>, max_chars: usize) -> Result<(), String> {
    match value {
        Some(v) if v.chars().count() > max_chars => {
            Err(format!("{field} must be at most {max_chars} characters"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_len() {
        assert!(check_len("Title", None, 3).is_ok());
        assert!(check_len("Title", Some("abc"), 3).is_ok());
        assert_eq!(
            check_len("Title", Some("abcd"), 3).unwrap_err(),
            "Title must be at most 3 characters"
        );
    }
}
