pub mod admin;
pub mod parent;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::dashboard::responses::ParentMaterialsQuery;
use crate::storage::Storage;

pub struct DashboardService {
    storage: Option<Arc<dyn Storage>>,
}

impl DashboardService {
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

    // 管理端首页指标
    pub async fn admin_metrics(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        admin::admin_metrics(self, request).await
    }

    // 家长首页卡片
    pub async fn parent_dashboard(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        parent::parent_dashboard(self, request).await
    }

    // 家长资料库
    pub async fn parent_materials(
        &self,
        request: &HttpRequest,
        query: ParentMaterialsQuery,
    ) -> ActixResult<HttpResponse> {
        parent::parent_materials(self, request, query).await
    }
}
