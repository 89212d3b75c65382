use super::entities::Profile;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

// 资料响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct ProfileResponse {
    pub profile: Profile,
}

// 资料列表响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct ProfileListResponse {
    pub items: Vec<Profile>,
    pub pagination: PaginationInfo,
}

// 家长下拉列表
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "user.ts")]
pub struct ParentListResponse {
    pub items: Vec<Profile>,
}
