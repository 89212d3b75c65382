//! 反馈消息实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub visibility: String,
    pub created_by: Option<i64>,
    pub is_read: bool,
    pub read_at: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::Id"
    )]
    Student,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_feedback(self) -> crate::models::feedback::entities::FeedbackMessage {
        use crate::models::feedback::entities::{FeedbackMessage, FeedbackVisibility};

        FeedbackMessage {
            id: self.id,
            student_id: self.student_id,
            content: self.content,
            visibility: self.visibility.parse().unwrap_or(FeedbackVisibility::Parents),
            created_by: self.created_by,
            is_read: self.is_read,
            read_at: self.read_at.map(super::to_datetime),
            created_at: super::to_datetime(self.created_at),
        }
    }
}
