use super::entities::MaterialFile;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "material.ts")]
pub struct MaterialResponse {
    pub material: MaterialFile,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "material.ts")]
pub struct MaterialListResponse {
    pub items: Vec<MaterialFile>,
}

/// 限时下载链接
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "material.ts")]
pub struct SignedUrlResponse {
    pub signed_url: String,
    pub expires_in: i64,
}
