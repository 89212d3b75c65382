//! 学生存储操作

use super::SeaOrmStorage;
use crate::entity::prelude::{Attendance, Feedback, Materials, Progress};
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::entity::{attendance, feedback, materials, progress};
use crate::errors::{Result, SchoolHubError};
use crate::models::students::{
    entities::Student,
    requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            grade: Set(req.grade),
            parent_id: Set(req.parent_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建学生失败: {e}")))?;

        Ok(result.into_student())
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生失败: {e}")))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 列出学生，新建的在前
    pub async fn list_students_impl(&self, query: StudentListQuery) -> Result<Vec<Student>> {
        let mut select = Students::find();

        if let Some(parent_id) = query.parent_id {
            select = select.filter(Column::ParentId.eq(parent_id));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(Column::Name.like(contains_pattern(search.trim())));
        }

        let students = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生列表失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(grade) = update.grade {
            // 空字符串表示清除年级
            model.grade = Set(Some(grade).filter(|g| !g.trim().is_empty()));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新学生失败: {e}")))?;

        Ok(Some(result.into_student()))
    }

    /// 绑定或解绑家长
    pub async fn set_student_parent_impl(
        &self,
        id: i64,
        parent_id: Option<i64>,
    ) -> Result<Option<Student>> {
        let result = Students::update_many()
            .col_expr(Column::ParentId, Expr::value(parent_id))
            .col_expr(
                Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新学生家长失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_student_by_id_impl(id).await
    }

    /// 删除学生及其所有关联记录
    pub async fn delete_student_impl(&self, id: i64) -> Result<bool> {
        let txn = self.db.begin().await?;

        Attendance::delete_many()
            .filter(attendance::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        Progress::delete_many()
            .filter(progress::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        Feedback::delete_many()
            .filter(feedback::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        Materials::delete_many()
            .filter(materials::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;

        let result = Students::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除学生失败: {e}")))?;

        txn.commit().await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_students_impl(&self) -> Result<i64> {
        let count = Students::find()
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计学生数量失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_student, seed_user};
    use crate::models::attendance::{entities::AttendanceStatus, requests::UpsertAttendance};
    use crate::models::students::requests::{StudentListQuery, UpdateStudentRequest};
    use crate::models::users::entities::UserRole;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn test_list_students_filters_by_parent_newest_first() {
        let storage = memory_storage().await;
        let parent = seed_user(&storage, "mom@example.com", UserRole::Parent).await;
        let first = seed_student(&storage, "Ann", Some(parent.id())).await;
        seed_student(&storage, "Bob", None).await;
        let third = seed_student(&storage, "Cid", Some(parent.id())).await;

        let mine = storage
            .list_students_impl(StudentListQuery {
                parent_id: Some(parent.id()),
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<_> = mine.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![third.id, first.id]);

        let all = storage
            .list_students_impl(StudentListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_link_and_unlink_parent() {
        let storage = memory_storage().await;
        let parent = seed_user(&storage, "dad@example.com", UserRole::Parent).await;
        let student = seed_student(&storage, "Dee", None).await;

        let linked = storage
            .set_student_parent_impl(student.id, Some(parent.id()))
            .await
            .unwrap()
            .unwrap();
        assert!(linked.is_linked_to(parent.id()));

        let unlinked = storage
            .set_student_parent_impl(student.id, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unlinked.parent_id, None);

        assert!(
            storage
                .set_student_parent_impl(404, None)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_update_student_partial() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Eve", None).await;

        let updated = storage
            .update_student_impl(
                student.id,
                UpdateStudentRequest {
                    name: None,
                    grade: Some("Grade 3".to_string()),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Eve");
        assert_eq!(updated.grade.as_deref(), Some("Grade 3"));
    }

    #[tokio::test]
    async fn test_delete_student_removes_records() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Fay", None).await;
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        storage
            .upsert_attendance_impl(UpsertAttendance {
                student_id: student.id,
                date,
                status: AttendanceStatus::Present,
                note: None,
                marked_by: None,
            })
            .await
            .unwrap();

        assert!(storage.delete_student_impl(student.id).await.unwrap());
        assert!(storage.get_student_by_id_impl(student.id).await.unwrap().is_none());
        assert!(
            storage
                .list_attendance_by_date_impl(date)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(!storage.delete_student_impl(student.id).await.unwrap());
    }
}
