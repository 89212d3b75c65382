use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 记录作者（教师）信息，来自其角色资料
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "progress.ts")]
pub struct TeacherInfo {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

// 学习进度记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "progress.ts")]
pub struct ProgressEntry {
    pub id: i64,
    pub student_id: i64,
    pub subject: String,
    pub title: Option<String>,
    pub score: Option<f64>,
    pub note: Option<String>,
    pub progress_date: NaiveDate,
    pub created_by: Option<i64>,
    pub teacher: Option<TeacherInfo>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
