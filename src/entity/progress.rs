//! 学习进度实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "progress")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub subject: String,
    pub title: Option<String>,
    pub score: Option<f64>,
    pub note: Option<String>,
    pub progress_date: String,
    pub created_by: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
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
    /// 转换为业务模型，teacher 由存储层根据 created_by 补全
    pub fn into_entry(self) -> crate::models::progress::entities::ProgressEntry {
        crate::models::progress::entities::ProgressEntry {
            id: self.id,
            student_id: self.student_id,
            subject: self.subject,
            title: self.title,
            score: self.score,
            note: self.note,
            progress_date: super::to_date(&self.progress_date),
            created_by: self.created_by,
            teacher: None,
            created_at: super::to_datetime(self.created_at),
            updated_at: super::to_datetime(self.updated_at),
        }
    }
}
