use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::attendance::entities::AttendanceRecord;
use crate::models::feedback::entities::FeedbackMessage;
use crate::models::materials::entities::MaterialFile;
use crate::models::students::entities::Student;

/// 管理端首页指标
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct AdminMetricsResponse {
    pub student_count: i64,
    pub today: NaiveDate,
    pub present: i64,
    pub absent: i64,
    /// 最近 7 天的进度记录数
    pub progress_count: i64,
    pub latest_feedback: Vec<FeedbackMessage>,
}

// 家长首页每个孩子一张卡片
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct ParentStudentCard {
    pub student: Student,
    pub unread: i64,
    pub latest_attendance: Option<AttendanceRecord>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct ParentDashboardResponse {
    pub items: Vec<ParentStudentCard>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct MaterialGroup {
    pub student: Student,
    pub materials: Vec<MaterialFile>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct ParentMaterialsResponse {
    pub groups: Vec<MaterialGroup>,
}

/// 资料排序
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "dashboard.ts")]
pub enum MaterialSort {
    #[default]
    Newest,
    Oldest,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "dashboard.ts")]
pub struct ParentMaterialsQuery {
    pub q: Option<String>,
    #[serde(default)]
    pub sort: MaterialSort,
}

impl ParentMaterialsQuery {
    /// 去除首尾空白后的搜索词，空串视为未给出
    pub fn search_term(&self) -> Option<String> {
        self.q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_term_trims_and_lowercases() {
        let query = ParentMaterialsQuery {
            q: Some("  Math ".to_string()),
            sort: MaterialSort::Newest,
        };
        assert_eq!(query.search_term().as_deref(), Some("math"));

        let blank = ParentMaterialsQuery {
            q: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank.search_term().is_none());
    }

    #[test]
    fn test_sort_defaults_to_newest() {
        let query: ParentMaterialsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.sort, MaterialSort::Newest);
        let query: ParentMaterialsQuery =
            serde_json::from_str(r#"{"sort":"oldest"}"#).unwrap();
        assert_eq!(query.sort, MaterialSort::Oldest);
    }
}
