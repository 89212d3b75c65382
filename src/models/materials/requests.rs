use serde::Deserialize;
use ts_rs::TS;

// 签名下载链接参数
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "material.ts")]
pub struct DownloadQuery {
    pub token: String,
}

// 存储层插入参数
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub student_id: i64,
    pub title: String,
    pub file_path: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: Option<i64>,
    pub uploaded_by: Option<i64>,
}
