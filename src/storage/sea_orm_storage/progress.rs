//! 学习进度存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::date_key;
use crate::entity::profiles::{Column as ProfileColumn, Entity as Profiles};
use crate::entity::progress::{ActiveModel, Column, Entity as Progress, Model};
use crate::errors::{Result, SchoolHubError};
use crate::models::progress::{
    entities::{ProgressEntry, TeacherInfo},
    requests::{CreateProgressRequest, ProgressListQuery, UpdateProgressRequest},
};
use crate::utils::contains_pattern;
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 根据 created_by 批量补全记录作者信息
    async fn attach_teachers(&self, models: Vec<Model>) -> Result<Vec<ProgressEntry>> {
        let mut author_ids: Vec<i64> = models.iter().filter_map(|m| m.created_by).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let teachers: HashMap<i64, TeacherInfo> = if author_ids.is_empty() {
            HashMap::new()
        } else {
            Profiles::find()
                .filter(ProfileColumn::UserId.is_in(author_ids))
                .all(&self.db)
                .await
                .map_err(|e| {
                    SchoolHubError::database_operation(format!("查询记录作者失败: {e}"))
                })?
                .into_iter()
                .map(|p| {
                    (
                        p.user_id,
                        TeacherInfo {
                            full_name: p.full_name,
                            email: p.email,
                        },
                    )
                })
                .collect()
        };

        Ok(models
            .into_iter()
            .map(|m| {
                let teacher = m.created_by.and_then(|id| teachers.get(&id).cloned());
                ProgressEntry {
                    teacher,
                    ..m.into_entry()
                }
            })
            .collect())
    }

    pub async fn create_progress_impl(
        &self,
        req: CreateProgressRequest,
        created_by: Option<i64>,
    ) -> Result<ProgressEntry> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            student_id: Set(req.student_id),
            subject: Set(req.subject),
            title: Set(req.title),
            score: Set(req.score),
            note: Set(req.note),
            progress_date: Set(date_key(req.progress_date)),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建进度记录失败: {e}")))?;

        let mut entries = self.attach_teachers(vec![result]).await?;
        entries
            .pop()
            .ok_or_else(|| SchoolHubError::not_found("进度记录写入后未找到"))
    }

    /// 进度列表，按进度日期、创建时间倒序
    pub async fn list_progress_impl(&self, query: ProgressListQuery) -> Result<Vec<ProgressEntry>> {
        let mut select = Progress::find();

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        if let Some(ref subject) = query.subject
            && !subject.trim().is_empty()
        {
            select = select.filter(Column::Subject.eq(subject.trim()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Subject.like(contains_pattern(term)))
                    .add(Column::Title.like(contains_pattern(term)))
                    .add(Column::Note.like(contains_pattern(term))),
            );
        }

        if let Some(since) = query.since {
            select = select.filter(Column::ProgressDate.gte(date_key(since)));
        }

        let models = select
            .order_by_desc(Column::ProgressDate)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询进度列表失败: {e}")))?;

        self.attach_teachers(models).await
    }

    pub async fn update_progress_impl(
        &self,
        id: i64,
        update: UpdateProgressRequest,
    ) -> Result<Option<ProgressEntry>> {
        if Progress::find_by_id(id).one(&self.db).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(subject) = update.subject {
            model.subject = Set(subject);
        }
        // 空字符串表示清除
        if let Some(title) = update.title {
            model.title = Set(Some(title).filter(|t| !t.is_empty()));
        }
        // Some(None) 清除分数
        if let Some(score) = update.score {
            model.score = Set(score);
        }
        if let Some(note) = update.note {
            model.note = Set(Some(note).filter(|n| !n.is_empty()));
        }
        if let Some(progress_date) = update.progress_date {
            model.progress_date = Set(date_key(progress_date));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新进度记录失败: {e}")))?;

        Ok(self.attach_teachers(vec![result]).await?.pop())
    }

    pub async fn delete_progress_impl(&self, id: i64) -> Result<bool> {
        let result = Progress::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除进度记录失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_progress_since_impl(&self, since: NaiveDate) -> Result<i64> {
        let count = Progress::find()
            .filter(Column::ProgressDate.gte(date_key(since)))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计进度记录失败: {e}")))?;

        Ok(count as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_student, seed_user};
    use crate::models::progress::requests::{
        CreateProgressRequest, ProgressListQuery, UpdateProgressRequest,
    };
    use crate::models::users::entities::UserRole;
    use chrono::NaiveDate;

    fn entry(student_id: i64, subject: &str, day: u32) -> CreateProgressRequest {
        CreateProgressRequest {
            student_id,
            subject: subject.to_string(),
            title: None,
            score: Some(80.0),
            note: None,
            progress_date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_entries_carry_teacher_info() {
        let storage = memory_storage().await;
        let teacher = seed_user(&storage, "teacher@example.com", UserRole::Admin).await;
        storage
            .update_profile_name_impl(teacher.id(), Some("Ms. Lee".to_string()))
            .await
            .unwrap();
        let student = seed_student(&storage, "Lou", None).await;

        let created = storage
            .create_progress_impl(entry(student.id, "Math", 3), Some(teacher.id()))
            .await
            .unwrap();
        let info = created.teacher.unwrap();
        assert_eq!(info.full_name.as_deref(), Some("Ms. Lee"));
        assert_eq!(info.email.as_deref(), Some("teacher@example.com"));

        let anonymous = storage
            .create_progress_impl(entry(student.id, "Art", 4), None)
            .await
            .unwrap();
        assert!(anonymous.teacher.is_none());
    }

    #[tokio::test]
    async fn test_list_order_and_filters() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Max", None).await;
        let other = seed_student(&storage, "Ned", None).await;
        storage
            .create_progress_impl(entry(student.id, "Math", 1), None)
            .await
            .unwrap();
        storage
            .create_progress_impl(entry(student.id, "Reading", 9), None)
            .await
            .unwrap();
        storage
            .create_progress_impl(entry(other.id, "Math", 5), None)
            .await
            .unwrap();

        let all = storage
            .list_progress_impl(ProgressListQuery::default())
            .await
            .unwrap();
        let days: Vec<_> = all.iter().map(|e| e.progress_date.to_string()).collect();
        assert_eq!(days, vec!["2025-03-09", "2025-03-05", "2025-03-01"]);

        let math_for_student = storage
            .list_progress_impl(ProgressListQuery {
                student_id: Some(student.id),
                subject: Some("Math".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(math_for_student.len(), 1);

        let since = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(storage.count_progress_since_impl(since).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_partial_update_and_delete() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Oli", None).await;
        let created = storage
            .create_progress_impl(entry(student.id, "Science", 2), None)
            .await
            .unwrap();

        let updated = storage
            .update_progress_impl(
                created.id,
                UpdateProgressRequest {
                    note: Some("great lab work".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.subject, "Science");
        assert_eq!(updated.score, Some(80.0));
        assert_eq!(updated.note.as_deref(), Some("great lab work"));

        assert!(storage.delete_progress_impl(created.id).await.unwrap());
        assert!(
            storage
                .list_progress_impl(ProgressListQuery::default())
                .await
                .unwrap()
                .is_empty()
        );
        assert!(!storage.delete_progress_impl(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_null_score_clears_and_absent_keeps() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Pia", None).await;
        let created = storage
            .create_progress_impl(entry(student.id, "Music", 6), None)
            .await
            .unwrap();

        let kept = storage
            .update_progress_impl(
                created.id,
                UpdateProgressRequest {
                    title: Some("Scales".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.score, Some(80.0));

        let cleared = storage
            .update_progress_impl(
                created.id,
                UpdateProgressRequest {
                    score: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cleared.score, None);
        assert_eq!(cleared.title.as_deref(), Some("Scales"));
    }

    #[tokio::test]
    async fn test_search_treats_wildcards_literally() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Quin", None).await;
        for (day, title) in [(1, "scored 100% today"), (2, "plain text"), (3, "scored 1000 today")] {
            storage
                .create_progress_impl(
                    CreateProgressRequest {
                        title: Some(title.to_string()),
                        ..entry(student.id, "Math", day)
                    },
                    None,
                )
                .await
                .unwrap();
        }

        let search = |term: &str| ProgressListQuery {
            search: Some(term.to_string()),
            ..Default::default()
        };

        let percent = storage.list_progress_impl(search("100%")).await.unwrap();
        assert_eq!(percent.len(), 1);
        assert_eq!(percent[0].title.as_deref(), Some("scored 100% today"));

        // `_` 不再匹配任意单字符
        let underscore = storage.list_progress_impl(search("plain_text")).await.unwrap();
        assert!(underscore.is_empty());

        let plain = storage.list_progress_impl(search("plain text")).await.unwrap();
        assert_eq!(plain.len(), 1);
    }
}
