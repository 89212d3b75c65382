//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 时间戳以 unix 秒存储，日历日期以 `YYYY-MM-DD` 文本存储（字典序即日期序）。

pub mod prelude;

pub mod attendance;
pub mod feedback;
pub mod materials;
pub mod password_resets;
pub mod profiles;
pub mod progress;
pub mod students;
pub mod users;

use chrono::{DateTime, NaiveDate, Utc};

pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

pub(crate) fn to_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap_or_default()
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
