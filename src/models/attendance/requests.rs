use super::entities::AttendanceStatus;
use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

// 标记考勤（同一学生同一天重复提交会覆盖）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct MarkAttendanceRequest {
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
}

// 全部标记为出勤
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct BulkPresentRequest {
    pub date: NaiveDate,
}

// 按日期查询，缺省为今天
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceDateQuery {
    pub date: Option<NaiveDate>,
}

// 存储层 upsert 参数
#[derive(Debug, Clone)]
pub struct UpsertAttendance {
    pub student_id: i64,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub marked_by: Option<i64>,
}
