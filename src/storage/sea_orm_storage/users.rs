use super::SeaOrmStorage;
use crate::entity::profiles::ActiveModel as ProfileActiveModel;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{Result, SchoolHubError};
use crate::models::users::{
    entities::{AuthUser, User, UserStatus},
    requests::{CreateUserRequest, UpdateUserRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, SqlErr, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户，同一事务内写入角色资料
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<AuthUser> {
        let now = chrono::Utc::now().timestamp();

        let txn = self.db.begin().await?;

        let model = ActiveModel {
            email: Set(req.email.clone()),
            password_hash: Set(req.password),
            status: Set(UserStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let user = model.insert(&txn).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                SchoolHubError::conflict(format!("邮箱已被注册: {}", req.email))
            } else {
                SchoolHubError::database_operation(format!("创建用户失败: {e}"))
            }
        })?;

        let profile = ProfileActiveModel {
            user_id: Set(user.id),
            email: Set(Some(req.email)),
            full_name: Set(req.full_name),
            role: Set(req.role.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("创建角色资料失败: {e}")))?;

        txn.commit().await?;

        Ok(AuthUser {
            user: user.into_user(),
            profile: profile.into_profile(),
        })
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                SchoolHubError::database_operation(format!("更新最后登录时间失败: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户凭据
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新用户失败: {e}")))?;

        Ok(Some(result.into_user()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::errors::SchoolHubError;
    use crate::models::users::{
        entities::{UserRole, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest},
    };

    #[tokio::test]
    async fn test_create_user_writes_profile() {
        let storage = memory_storage().await;
        let auth = seed_user(&storage, "mom@example.com", UserRole::Parent).await;

        assert_eq!(auth.profile.user_id, auth.user.id);
        assert_eq!(auth.profile.role, UserRole::Parent);
        assert_eq!(auth.profile.email.as_deref(), Some("mom@example.com"));
        assert_eq!(auth.user.status, UserStatus::Active);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let storage = memory_storage().await;
        seed_user(&storage, "dup@example.com", UserRole::Parent).await;

        let err = storage
            .create_user_impl(CreateUserRequest {
                email: "dup@example.com".to_string(),
                password: "hash".to_string(),
                role: UserRole::Parent,
                full_name: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SchoolHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_user_password_and_last_login() {
        let storage = memory_storage().await;
        let auth = seed_user(&storage, "dad@example.com", UserRole::Parent).await;

        let updated = storage
            .update_user_impl(
                auth.id(),
                UpdateUserRequest {
                    password: Some("new-hash".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.password_hash, "new-hash");

        assert!(storage.update_last_login_impl(auth.id()).await.unwrap());
        let reloaded = storage.get_user_by_id_impl(auth.id()).await.unwrap().unwrap();
        assert!(reloaded.last_login.is_some());

        assert!(
            storage
                .update_user_impl(9999, UpdateUserRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
