use super::entities::FeedbackMessage;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "feedback.ts")]
pub struct FeedbackResponse {
    pub feedback: FeedbackMessage,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "feedback.ts")]
pub struct FeedbackListResponse {
    pub items: Vec<FeedbackMessage>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "feedback.ts")]
pub struct UnreadCountResponse {
    pub student_id: i64,
    pub unread: i64,
}
