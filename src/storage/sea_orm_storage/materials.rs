//! 资料文件存储操作

use super::SeaOrmStorage;
use crate::entity::materials::{ActiveModel, Column, Entity as Materials};
use crate::errors::{Result, SchoolHubError};
use crate::models::materials::{entities::MaterialFile, requests::NewMaterial};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    pub async fn create_material_impl(&self, req: NewMaterial) -> Result<MaterialFile> {
        let model = ActiveModel {
            student_id: Set(req.student_id),
            title: Set(req.title),
            file_path: Set(req.file_path),
            file_name: Set(req.file_name),
            content_type: Set(req.content_type),
            size: Set(req.size),
            uploaded_by: Set(req.uploaded_by),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("保存资料记录失败: {e}")))?;

        Ok(result.into_material())
    }

    pub async fn get_material_by_id_impl(&self, id: i64) -> Result<Option<MaterialFile>> {
        let result = Materials::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询资料失败: {e}")))?;

        Ok(result.map(|m| m.into_material()))
    }

    pub async fn list_materials_for_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<MaterialFile>> {
        let materials = Materials::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询资料列表失败: {e}")))?;

        Ok(materials.into_iter().map(|m| m.into_material()).collect())
    }

    pub async fn delete_material_impl(&self, id: i64) -> Result<bool> {
        let result = Materials::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("删除资料失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_student};
    use crate::models::materials::requests::NewMaterial;

    fn upload(student_id: i64, key: &str) -> NewMaterial {
        NewMaterial {
            student_id,
            title: "Reading list".to_string(),
            file_path: key.to_string(),
            file_name: "list.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            size: Some(1024),
            uploaded_by: None,
        }
    }

    #[tokio::test]
    async fn test_materials_newest_first_and_delete() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Sam", None).await;
        let older = storage
            .create_material_impl(upload(student.id, "1/100-list.pdf"))
            .await
            .unwrap();
        let newer = storage
            .create_material_impl(upload(student.id, "1/200-list.pdf"))
            .await
            .unwrap();

        let listed = storage
            .list_materials_for_student_impl(student.id)
            .await
            .unwrap();
        let ids: Vec<_> = listed.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        assert!(storage.delete_material_impl(older.id).await.unwrap());
        assert!(storage.get_material_by_id_impl(older.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_object_key_is_unique() {
        let storage = memory_storage().await;
        let student = seed_student(&storage, "Tia", None).await;
        storage
            .create_material_impl(upload(student.id, "1/300-a.pdf"))
            .await
            .unwrap();
        assert!(
            storage
                .create_material_impl(upload(student.id, "1/300-a.pdf"))
                .await
                .is_err()
        );
    }
}
