//! 资料文件实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    #[sea_orm(unique)]
    pub file_path: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size: Option<i64>,
    pub uploaded_by: Option<i64>,
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
    pub fn into_material(self) -> crate::models::materials::entities::MaterialFile {
        crate::models::materials::entities::MaterialFile {
            id: self.id,
            student_id: self.student_id,
            title: self.title,
            file_path: self.file_path,
            file_name: self.file_name,
            content_type: self.content_type,
            size: self.size,
            uploaded_by: self.uploaded_by,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
