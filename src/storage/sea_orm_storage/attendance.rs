//! 考勤存储操作

use super::SeaOrmStorage;
use crate::entity::attendance::{ActiveModel, Column, Entity as Attendance};
use crate::entity::date_key;
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::errors::{Result, SchoolHubError};
use crate::models::attendance::{
    entities::{AttendanceRecord, AttendanceStatus},
    requests::UpsertAttendance,
};
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    sea_query::OnConflict,
};

impl SeaOrmStorage {
    /// 按 (student_id, date) 写入考勤，已存在则覆盖状态与备注
    pub async fn upsert_attendance_impl(
        &self,
        record: UpsertAttendance,
    ) -> Result<AttendanceRecord> {
        Self::upsert_attendance_on(&self.db, &record).await?;

        let date = date_key(record.date);
        Attendance::find()
            .filter(Column::StudentId.eq(record.student_id))
            .filter(Column::Date.eq(date))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤失败: {e}")))?
            .map(|m| m.into_record())
            .ok_or_else(|| SchoolHubError::not_found("考勤记录写入后未找到"))
    }

    async fn upsert_attendance_on<C: ConnectionTrait>(
        db: &C,
        record: &UpsertAttendance,
    ) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(record.student_id),
            date: Set(date_key(record.date)),
            status: Set(record.status.to_string()),
            note: Set(record.note.clone()),
            marked_by: Set(record.marked_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        Attendance::insert(model)
            .on_conflict(
                OnConflict::columns([Column::StudentId, Column::Date])
                    .update_columns([
                        Column::Status,
                        Column::Note,
                        Column::MarkedBy,
                        Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("写入考勤失败: {e}")))?;

        Ok(())
    }

    /// 全部学生标记出勤，逐行 upsert
    pub async fn mark_all_present_impl(
        &self,
        date: NaiveDate,
        marked_by: Option<i64>,
    ) -> Result<i64> {
        let student_ids: Vec<i64> = Students::find()
            .select_only()
            .column(StudentColumn::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生失败: {e}")))?;

        let mut marked = 0;
        for student_id in student_ids {
            let record = UpsertAttendance {
                student_id,
                date,
                status: AttendanceStatus::Present,
                note: None,
                marked_by,
            };
            Self::upsert_attendance_on(&self.db, &record).await?;
            marked += 1;
        }

        Ok(marked)
    }

    pub async fn list_attendance_by_date_impl(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = Attendance::find()
            .filter(Column::Date.eq(date_key(date)))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }

    /// 学生考勤历史，日期倒序
    pub async fn list_attendance_for_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<AttendanceRecord>> {
        let records = Attendance::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Date)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询考勤历史失败: {e}")))?;

        Ok(records.into_iter().map(|m| m.into_record()).collect())
    }

    pub async fn get_latest_attendance_impl(
        &self,
        student_id: i64,
    ) -> Result<Option<AttendanceRecord>> {
        let record = Attendance::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::Date)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询最近考勤失败: {e}")))?;

        Ok(record.map(|m| m.into_record()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_student, seed_user};
    use crate::models::attendance::{entities::AttendanceStatus, requests::UpsertAttendance};
    use crate::models::users::entities::UserRole;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_record_per_day() {
        let storage = memory_storage().await;
        let admin = seed_user(&storage, "staff@example.com", UserRole::Admin).await;
        let student = seed_student(&storage, "Gus", None).await;

        let first = storage
            .upsert_attendance_impl(UpsertAttendance {
                student_id: student.id,
                date: day(4),
                status: AttendanceStatus::Absent,
                note: Some("sick".to_string()),
                marked_by: Some(admin.id()),
            })
            .await
            .unwrap();

        let second = storage
            .upsert_attendance_impl(UpsertAttendance {
                student_id: student.id,
                date: day(4),
                status: AttendanceStatus::Late,
                note: None,
                marked_by: Some(admin.id()),
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.status, AttendanceStatus::Late);
        assert_eq!(second.note, None);
        assert_eq!(second.date, day(4));
        assert_eq!(storage.list_attendance_by_date_impl(day(4)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_history_and_latest_are_newest_first() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Hal", None).await;
        for (d, status) in [
            (2, AttendanceStatus::Present),
            (10, AttendanceStatus::Late),
            (5, AttendanceStatus::Absent),
        ] {
            storage
                .upsert_attendance_impl(UpsertAttendance {
                    student_id: student.id,
                    date: day(d),
                    status,
                    note: None,
                    marked_by: None,
                })
                .await
                .unwrap();
        }

        let history = storage
            .list_attendance_for_student_impl(student.id)
            .await
            .unwrap();
        let dates: Vec<_> = history.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day(10), day(5), day(2)]);

        let latest = storage
            .get_latest_attendance_impl(student.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest.status, AttendanceStatus::Late);

        let other = seed_student(&storage, "Ivy", None).await;
        assert!(
            storage
                .get_latest_attendance_impl(other.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_mark_all_present_overwrites_existing() {
        let storage = memory_storage().await;
        let a = seed_student(&storage, "Jo", None).await;
        seed_student(&storage, "Kim", None).await;
        storage
            .upsert_attendance_impl(UpsertAttendance {
                student_id: a.id,
                date: day(7),
                status: AttendanceStatus::Absent,
                note: None,
                marked_by: None,
            })
            .await
            .unwrap();

        let marked = storage.mark_all_present_impl(day(7), None).await.unwrap();
        assert_eq!(marked, 2);

        let records = storage.list_attendance_by_date_impl(day(7)).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(
            records
                .iter()
                .all(|r| r.status == AttendanceStatus::Present)
        );
    }
}
