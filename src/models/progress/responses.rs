use super::entities::ProgressEntry;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "progress.ts")]
pub struct ProgressResponse {
    pub entry: ProgressEntry,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "progress.ts")]
pub struct ProgressListResponse {
    pub items: Vec<ProgressEntry>,
}
