pub mod list;
pub mod update_role;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::users::requests::{ProfileListParams, UpdateRoleRequest};
use crate::storage::Storage;

pub struct ProfileService {
    storage: Option<Arc<dyn Storage>>,
}

impl ProfileService {
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

    // 分页列出角色资料
    pub async fn list_profiles(
        &self,
        request: &HttpRequest,
        query: ProfileListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_profiles(self, request, query).await
    }

    // 全部家长，供绑定学生时选择
    pub async fn list_parents(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_parents(self, request).await
    }

    pub async fn update_role(
        &self,
        request: &HttpRequest,
        user_id: i64,
        update_data: UpdateRoleRequest,
    ) -> ActixResult<HttpResponse> {
        update_role::update_role(self, request, user_id, update_data).await
    }
}
