//! 密码重置令牌存储操作

use super::SeaOrmStorage;
use crate::entity::password_resets::{ActiveModel, Column, Entity as PasswordResets};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{Result, SchoolHubError};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_password_reset_impl(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<()> {
        ActiveModel {
            token: Set(token.to_string()),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            used_at: Set(None),
            created_at: Set(chrono::Utc::now().timestamp()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("保存重置令牌失败: {e}")))?;

        Ok(())
    }

    /// 校验令牌并更新密码，令牌一次性
    pub async fn reset_password_with_token_impl(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<Option<i64>> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await?;

        let Some(reset) = PasswordResets::find_by_id(token.to_string())
            .one(&txn)
            .await?
            .filter(|r| r.is_usable(now))
        else {
            return Ok(None);
        };

        // 条件更新，避免同一令牌被并发重复使用
        let consumed = PasswordResets::update_many()
            .col_expr(Column::UsedAt, Expr::value(now))
            .filter(Column::Token.eq(token))
            .filter(Column::UsedAt.is_null())
            .exec(&txn)
            .await?;
        if consumed.rows_affected == 0 {
            return Ok(None);
        }

        Users::update_many()
            .col_expr(UserColumn::PasswordHash, Expr::value(password_hash))
            .col_expr(UserColumn::UpdatedAt, Expr::value(now))
            .filter(UserColumn::Id.eq(reset.user_id))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("更新密码失败: {e}")))?;

        txn.commit().await?;

        Ok(Some(reset.user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{memory_storage, seed_user};
    use crate::models::users::entities::UserRole;

    #[tokio::test]
    async fn test_reset_token_is_single_use() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "forgot@example.com", UserRole::Parent).await;
        let expires = chrono::Utc::now().timestamp() + 600;
        storage
            .create_password_reset_impl(user.id(), "tok-1", expires)
            .await
            .unwrap();

        let reset = storage
            .reset_password_with_token_impl("tok-1", "fresh-hash")
            .await
            .unwrap();
        assert_eq!(reset, Some(user.id()));

        let reloaded = storage.get_user_by_id_impl(user.id()).await.unwrap().unwrap();
        assert_eq!(reloaded.password_hash, "fresh-hash");

        assert!(
            storage
                .reset_password_with_token_impl("tok-1", "again")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_expired_or_unknown_token_rejected() {
        let storage = memory_storage().await;
        let user = seed_user(&storage, "late@example.com", UserRole::Parent).await;
        let expired = chrono::Utc::now().timestamp() - 1;
        storage
            .create_password_reset_impl(user.id(), "tok-old", expired)
            .await
            .unwrap();

        assert!(
            storage
                .reset_password_with_token_impl("tok-old", "x")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            storage
                .reset_password_with_token_impl("missing", "x")
                .await
                .unwrap()
                .is_none()
        );
    }
}
