use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 反馈可见范围
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "feedback.ts")]
pub enum FeedbackVisibility {
    #[default]
    Parents, // 家长可见
    Internal, // 仅教职工内部
}

impl<'de> Deserialize<'de> for FeedbackVisibility {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<FeedbackVisibility>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的可见范围: '{s}'. 支持: parents, internal"
            ))
        })
    }
}

impl std::fmt::Display for FeedbackVisibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedbackVisibility::Parents => write!(f, "parents"),
            FeedbackVisibility::Internal => write!(f, "internal"),
        }
    }
}

impl std::str::FromStr for FeedbackVisibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "parents" => Ok(FeedbackVisibility::Parents),
            "internal" => Ok(FeedbackVisibility::Internal),
            _ => Err(format!("Invalid feedback visibility: {s}")),
        }
    }
}

// 反馈消息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "feedback.ts")]
pub struct FeedbackMessage {
    pub id: i64,
    pub student_id: i64,
    pub content: String,
    pub visibility: FeedbackVisibility,
    pub created_by: Option<i64>,
    pub is_read: bool,
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
