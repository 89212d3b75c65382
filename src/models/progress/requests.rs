use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use ts_rs::TS;

// 新建进度记录
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "progress.ts")]
pub struct CreateProgressRequest {
    pub student_id: i64,
    pub subject: String,
    pub title: Option<String>,
    pub score: Option<f64>,
    pub note: Option<String>,
    pub progress_date: NaiveDate,
}

// 部分更新，未提供的字段保持不变
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "progress.ts")]
pub struct UpdateProgressRequest {
    pub subject: Option<String>,
    pub title: Option<String>,
    /// 缺省保持不变，`null` 清除分数
    #[serde(default, deserialize_with = "nullable_field")]
    #[ts(optional)]
    pub score: Option<Option<f64>>,
    pub note: Option<String>,
    pub progress_date: Option<NaiveDate>,
}

// 区分字段缺省与显式 null：缺省由 `default` 给出 None，null 得到 Some(None)
fn nullable_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// 管理端列表筛选
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "progress.ts")]
pub struct ProgressListQuery {
    pub student_id: Option<i64>,
    pub subject: Option<String>,
    /// 在标题/备注中搜索
    pub search: Option<String>,
    /// 仅返回该日期及之后的记录
    pub since: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_score_absent_null_and_value() {
        let absent: UpdateProgressRequest = serde_json::from_str(r#"{"note":"x"}"#).unwrap();
        assert_eq!(absent.score, None);

        let cleared: UpdateProgressRequest = serde_json::from_str(r#"{"score":null}"#).unwrap();
        assert_eq!(cleared.score, Some(None));

        let set: UpdateProgressRequest = serde_json::from_str(r#"{"score":92.5}"#).unwrap();
        assert_eq!(set.score, Some(Some(92.5)));
    }
}
