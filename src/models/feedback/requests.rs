use super::entities::FeedbackVisibility;
use serde::Deserialize;
use ts_rs::TS;

// 新建反馈，visibility 缺省为家长可见
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "feedback.ts")]
pub struct CreateFeedbackRequest {
    pub student_id: i64,
    pub content: String,
    #[serde(default)]
    pub visibility: FeedbackVisibility,
}

// 最近反馈
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "feedback.ts")]
pub struct RecentFeedbackQuery {
    pub limit: Option<u64>,
}

// 存储层插入参数
#[derive(Debug, Clone)]
pub struct NewFeedback {
    pub student_id: i64,
    pub content: String,
    pub visibility: FeedbackVisibility,
    pub created_by: Option<i64>,
}
