//! 角色资料存储操作

use super::SeaOrmStorage;
use crate::entity::profiles::{ActiveModel, Column, Entity as Profiles};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    PaginationInfo,
    users::{
        entities::{Profile, User, UserRole},
        requests::ProfileListQuery,
        responses::ProfileListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set, sea_query::OnConflict,
};

impl SeaOrmStorage {
    pub async fn get_profile_impl(&self, user_id: i64) -> Result<Option<Profile>> {
        let result = Profiles::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询角色资料失败: {e}")))?;

        Ok(result.map(|m| m.into_profile()))
    }

    /// 获取资料，不存在时以家长角色创建
    ///
    /// 并发首登时以主键冲突兜底，重复插入被忽略后重新读取。
    pub async fn ensure_profile_impl(&self, user: &User) -> Result<Profile> {
        if let Some(profile) = self.get_profile_impl(user.id).await? {
            return Ok(profile);
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            user_id: Set(user.id),
            email: Set(Some(user.email.clone())),
            full_name: Set(None),
            role: Set(UserRole::Parent.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Profiles::insert(model)
            .on_conflict(
                OnConflict::column(Column::UserId)
                    .do_nothing()
                    .to_owned(),
            )
            .do_nothing()
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("创建角色资料失败: {e}")))?;

        tracing::info!("Created default parent profile for user {}", user.id);

        self.get_profile_impl(user.id)
            .await?
            .ok_or_else(|| SchoolHubError::not_found(format!("角色资料不存在: {}", user.id)))
    }

    /// 分页列出角色资料，按邮箱排序
    pub async fn list_profiles_with_pagination_impl(
        &self,
        query: ProfileListQuery,
    ) -> Result<ProfileListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(10).clamp(1, 100) as u64;

        let mut select = Profiles::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(Column::Email.like(contains_pattern(term)))
                    .add(Column::FullName.like(contains_pattern(term))),
            );
        }

        if let Some(ref role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        let paginator = select
            .order_by_asc(Column::Email)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询资料总数失败: {e}")))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询资料页数失败: {e}")))?;
        let profiles = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询资料列表失败: {e}")))?;

        Ok(ProfileListResponse {
            items: profiles.into_iter().map(|m| m.into_profile()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 全部家长资料
    pub async fn list_parents_impl(&self) -> Result<Vec<Profile>> {
        let profiles = Profiles::find()
            .filter(Column::Role.eq(UserRole::Parent.to_string()))
            .order_by_asc(Column::Email)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询家长列表失败: {e}")))?;

        Ok(profiles.into_iter().map(|m| m.into_profile()).collect())
    }

    pub async fn update_profile_role_impl(
        &self,
        user_id: i64,
        role: UserRole,
    ) -> Result<Option<Profile>> {
        if self.get_profile_impl(user_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            user_id: Set(user_id),
            role: Set(role.to_string()),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新用户角色失败: {e}")))?;

        Ok(Some(result.into_profile()))
    }

    pub async fn update_profile_name_impl(
        &self,
        user_id: i64,
        full_name: Option<String>,
    ) -> Result<Option<Profile>> {
        if self.get_profile_impl(user_id).await?.is_none() {
            return Ok(None);
        }

        let model = ActiveModel {
            user_id: Set(user_id),
            full_name: Set(full_name),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新资料失败: {e}")))?;

        Ok(Some(result.into_profile()))
    }

    pub async fn has_admin_impl(&self) -> Result<bool> {
        let count = Profiles::find()
            .filter(Column::Role.eq(UserRole::Admin.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("统计管理员失败: {e}")))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::entity::profiles::Entity as Profiles;
    use crate::models::users::{entities::UserRole, requests::ProfileListQuery};
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn test_ensure_profile_creates_parent_once() {
        let storage = memory_storage().await;
        let auth = seed_user(&storage, "p@example.com", UserRole::Admin).await;

        // 模拟外部创建、尚无资料的用户
        Profiles::delete_by_id(auth.id())
            .exec(&storage.db)
            .await
            .unwrap();
        assert!(storage.get_profile_impl(auth.id()).await.unwrap().is_none());

        let created = storage.ensure_profile_impl(&auth.user).await.unwrap();
        assert_eq!(created.role, UserRole::Parent);
        assert_eq!(created.email.as_deref(), Some("p@example.com"));

        let again = storage.ensure_profile_impl(&auth.user).await.unwrap();
        assert_eq!(again.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_list_parents_sorted_by_email() {
        let storage = memory_storage().await;
        seed_user(&storage, "zoe@example.com", UserRole::Parent).await;
        seed_user(&storage, "admin@example.com", UserRole::Admin).await;
        seed_user(&storage, "amy@example.com", UserRole::Parent).await;

        let parents = storage.list_parents_impl().await.unwrap();
        let emails: Vec<_> = parents
            .iter()
            .map(|p| p.email.clone().unwrap_or_default())
            .collect();
        assert_eq!(emails, vec!["amy@example.com", "zoe@example.com"]);
    }

    #[tokio::test]
    async fn test_profile_pagination_and_role_filter() {
        let storage = memory_storage().await;
        for i in 0..3 {
            seed_user(&storage, &format!("p{i}@example.com"), UserRole::Parent).await;
        }
        seed_user(&storage, "staff@example.com", UserRole::Admin).await;

        let page = storage
            .list_profiles_with_pagination_impl(ProfileListQuery {
                page: Some(1),
                size: Some(2),
                role: Some(UserRole::Parent),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);

        let found = storage
            .list_profiles_with_pagination_impl(ProfileListQuery {
                page: None,
                size: None,
                role: None,
                search: Some("staff".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(found.items.len(), 1);
        assert_eq!(found.items[0].role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_role_change_and_admin_presence() {
        let storage = memory_storage().await;
        let auth = seed_user(&storage, "soon-admin@example.com", UserRole::Parent).await;
        assert!(!storage.has_admin_impl().await.unwrap());

        let updated = storage
            .update_profile_role_impl(auth.id(), UserRole::Admin)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.role, UserRole::Admin);
        assert!(storage.has_admin_impl().await.unwrap());

        assert!(
            storage
                .update_profile_role_impl(404, UserRole::Admin)
                .await
                .unwrap()
                .is_none()
        );
    }
}
