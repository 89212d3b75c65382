//! 数据模型定义
//!
//! 每个业务域拆分为 `entities`（业务实体）、`requests`（请求体/查询参数）、`responses`（响应体）。

pub mod attendance;
pub mod auth;
pub mod common;
pub mod dashboard;
pub mod feedback;
pub mod materials;
pub mod progress;
pub mod students;
pub mod system;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginationInfo, PaginationQuery};

/// 程序启动时间，用于计算运行时长
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
