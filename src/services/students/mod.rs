pub mod access;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::students::requests::{
    CreateStudentRequest, StudentListQuery, UpdateStudentParentRequest, UpdateStudentRequest,
};
use crate::storage::Storage;

pub struct StudentService {
    storage: Option<Arc<dyn Storage>>,
}

impl StudentService {
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

    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    pub async fn get_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, request, student_id).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        create_data: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, create_data).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
        update_data: UpdateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, request, student_id, update_data).await
    }

    pub async fn update_student_parent(
        &self,
        request: &HttpRequest,
        student_id: i64,
        update_data: UpdateStudentParentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student_parent(self, request, student_id, update_data).await
    }

    pub async fn delete_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, request, student_id).await
    }
}

/// 学生姓名最大长度
pub(crate) const MAX_NAME_CHARS: usize = 100;
/// 年级最大长度
pub(crate) const MAX_GRADE_CHARS: usize = 50;

/// 校验家长 ID 指向一个家长资料
pub(crate) async fn ensure_parent(
    storage: &Arc<dyn Storage>,
    parent_id: i64,
) -> Result<(), HttpResponse> {
    use crate::models::users::entities::UserRole;
    use crate::models::{ApiResponse, ErrorCode};

    match storage.get_profile(parent_id).await {
        Ok(Some(profile)) if profile.role == UserRole::Parent => Ok(()),
        Ok(_) => Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::StudentParentInvalid,
            "parent_id must reference a parent account",
        ))),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load parent profile: {e}"),
            )),
        ),
    }
}
