//! 反馈消息存储操作

use super::SeaOrmStorage;
use crate::entity::feedback::{ActiveModel, Column, Entity as Feedback};
use crate::errors::{Result, SchoolHubError};
use crate::models::feedback::{
    entities::{FeedbackMessage, FeedbackVisibility},
    requests::NewFeedback,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, Set, sea_query::Expr,
};

fn visible(select: Select<Feedback>, parents_only: bool) -> Select<Feedback> {
    if parents_only {
        select.filter(Column::Visibility.eq(FeedbackVisibility::Parents.to_string()))
    } else {
        select
    }
}

impl SeaOrmStorage {
    pub async fn create_feedback_impl(&self, req: NewFeedback) -> Result<FeedbackMessage> {
        let model = ActiveModel {
            student_id: Set(req.student_id),
            content: Set(req.content),
            visibility: Set(req.visibility.to_string()),
            created_by: Set(req.created_by),
            is_read: Set(false),
            read_at: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建反馈失败: {e}")))?;

        Ok(result.into_feedback())
    }

    pub async fn get_feedback_by_id_impl(&self, id: i64) -> Result<Option<FeedbackMessage>> {
        let result = Feedback::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询反馈失败: {e}")))?;

        Ok(result.map(|m| m.into_feedback()))
    }

    /// 学生的反馈，新的在前
    pub async fn list_feedback_for_student_impl(
        &self,
        student_id: i64,
        parents_only: bool,
    ) -> Result<Vec<FeedbackMessage>> {
        let select = Feedback::find().filter(Column::StudentId.eq(student_id));

        let messages = visible(select, parents_only)
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询反馈列表失败: {e}")))?;

        Ok(messages.into_iter().map(|m| m.into_feedback()).collect())
    }

    pub async fn list_recent_feedback_impl(&self, limit: u64) -> Result<Vec<FeedbackMessage>> {
        let messages = Feedback::find()
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询最近反馈失败: {e}")))?;

        Ok(messages.into_iter().map(|m| m.into_feedback()).collect())
    }

    pub async fn count_unread_feedback_impl(
        &self,
        student_id: i64,
        parents_only: bool,
    ) -> Result<i64> {
        let select = Feedback::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::IsRead.eq(false));

        let count = visible(select, parents_only)
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计未读反馈失败: {e}")))?;

        Ok(count as i64)
    }

    /// 标记已读，只在首次标记时写入 read_at
    pub async fn mark_feedback_read_impl(&self, id: i64) -> Result<Option<FeedbackMessage>> {
        Feedback::update_many()
            .col_expr(Column::IsRead, Expr::value(true))
            .col_expr(
                Column::ReadAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("标记反馈已读失败: {e}")))?;

        self.get_feedback_by_id_impl(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_student};
    use crate::models::feedback::{entities::FeedbackVisibility, requests::NewFeedback};

    fn note(student_id: i64, content: &str, visibility: FeedbackVisibility) -> NewFeedback {
        NewFeedback {
            student_id,
            content: content.to_string(),
            visibility,
            created_by: None,
        }
    }

    #[tokio::test]
    async fn test_parents_only_hides_internal_notes() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Pia", None).await;
        storage
            .create_feedback_impl(note(student.id, "Great week", FeedbackVisibility::Parents))
            .await
            .unwrap();
        storage
            .create_feedback_impl(note(student.id, "Watch focus", FeedbackVisibility::Internal))
            .await
            .unwrap();

        let for_parent = storage
            .list_feedback_for_student_impl(student.id, true)
            .await
            .unwrap();
        assert_eq!(for_parent.len(), 1);
        assert_eq!(for_parent[0].content, "Great week");

        let for_staff = storage
            .list_feedback_for_student_impl(student.id, false)
            .await
            .unwrap();
        assert_eq!(for_staff.len(), 2);
        assert_eq!(for_staff[0].content, "Watch focus");

        assert_eq!(
            storage
                .count_unread_feedback_impl(student.id, true)
                .await
                .unwrap(),
            1
        );
        assert_eq!(
            storage
                .count_unread_feedback_impl(student.id, false)
                .await
                .unwrap(),
            2
        );
    }

    #[tokio::test]
    async fn test_mark_read_is_idempotent() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Quin", None).await;
        let message = storage
            .create_feedback_impl(note(student.id, "Hello", FeedbackVisibility::Parents))
            .await
            .unwrap();
        assert!(!message.is_read);

        let first = storage
            .mark_feedback_read_impl(message.id)
            .await
            .unwrap()
            .unwrap();
        assert!(first.is_read);
        let read_at = first.read_at.unwrap();

        let second = storage
            .mark_feedback_read_impl(message.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(second.read_at, Some(read_at));
        assert_eq!(
            storage
                .count_unread_feedback_impl(student.id, true)
                .await
                .unwrap(),
            0
        );

        assert!(storage.mark_feedback_read_impl(404).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recent_feedback_limit() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Rae", None).await;
        for i in 0..7 {
            storage
                .create_feedback_impl(note(
                    student.id,
                    &format!("note {i}"),
                    FeedbackVisibility::Parents,
                ))
                .await
                .unwrap();
        }

        let recent = storage.list_recent_feedback_impl(5).await.unwrap();
        assert_eq!(recent.len(), 5);
        assert_eq!(recent[0].content, "note 6");
    }
}
