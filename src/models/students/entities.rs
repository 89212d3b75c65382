use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 学生实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "student.ts")]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub grade: Option<String>,
    /// 关联的家长用户 ID
    pub parent_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Student {
    /// 家长只能访问自己名下的学生
    pub fn is_linked_to(&self, parent_id: i64) -> bool {
        self.parent_id == Some(parent_id)
    }
}
