use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生资料文件
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "material.ts")]
pub struct MaterialFile {
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    /// 对象存储键：<student_id>/<unix_ms>-<安全文件名>
    pub file_path: String,
    /// 原始文件名
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: Option<i64>,
    pub uploaded_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
