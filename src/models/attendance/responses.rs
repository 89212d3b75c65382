use super::entities::{AttendanceRecord, AttendanceStatus};
use chrono::NaiveDate;
use serde::Serialize;
use ts_rs::TS;

// 某日考勤统计
#[derive(Debug, Default, Clone, PartialEq, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceSummary {
    pub present: i64,
    pub absent: i64,
    pub late: i64,
}

impl AttendanceSummary {
    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        records
            .iter()
            .fold(Self::default(), |mut summary, record| {
                match record.status {
                    AttendanceStatus::Present => summary.present += 1,
                    AttendanceStatus::Absent => summary.absent += 1,
                    AttendanceStatus::Late => summary.late += 1,
                }
                summary
            })
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceDayResponse {
    pub date: NaiveDate,
    pub items: Vec<AttendanceRecord>,
    pub summary: AttendanceSummary,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceListResponse {
    pub items: Vec<AttendanceRecord>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct AttendanceResponse {
    pub record: AttendanceRecord,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct LatestAttendanceResponse {
    pub record: Option<AttendanceRecord>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "attendance.ts")]
pub struct BulkMarkResponse {
    pub date: NaiveDate,
    pub marked: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, status: AttendanceStatus) -> AttendanceRecord {
        let now = chrono::Utc::now();
        AttendanceRecord {
            id,
            student_id: id,
            date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            status,
            note: None,
            marked_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_summary_counts_each_status() {
        let records = vec![
            record(1, AttendanceStatus::Present),
            record(2, AttendanceStatus::Present),
            record(3, AttendanceStatus::Absent),
            record(4, AttendanceStatus::Late),
        ];
        let summary = AttendanceSummary::from_records(&records);
        assert_eq!(
            summary,
            AttendanceSummary {
                present: 2,
                absent: 1,
                late: 1
            }
        );
    }

    #[test]
    fn test_summary_of_empty_day() {
        assert_eq!(
            AttendanceSummary::from_records(&[]),
            AttendanceSummary::default()
        );
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("late".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Late));
        assert!("sick".parse::<AttendanceStatus>().is_err());
        assert!(serde_json::from_str::<AttendanceStatus>("\"sick\"").is_err());
    }
}
