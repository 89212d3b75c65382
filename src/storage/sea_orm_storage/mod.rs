//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod attendance;
mod feedback;
mod materials;
mod password_resets;
mod profiles;
mod progress;
mod students;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolHubError};
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(
            &config.database.url,
            config.database.pool_size,
            config.database.timeout,
        )
        .await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(url: &str, pool_size: u32, timeout: u64) -> Result<Self> {
        let db_url = Self::build_database_url(url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, timeout).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            // 内存库随最后一个连接关闭而消失，不设空闲回收
            .idle_timeout(None)
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    attendance::{entities::AttendanceRecord, requests::UpsertAttendance},
    feedback::{entities::FeedbackMessage, requests::NewFeedback},
    materials::{entities::MaterialFile, requests::NewMaterial},
    progress::{
        entities::ProgressEntry,
        requests::{CreateProgressRequest, ProgressListQuery, UpdateProgressRequest},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
    },
    users::{
        entities::{AuthUser, Profile, User, UserRole},
        requests::{CreateUserRequest, ProfileListQuery, UpdateUserRequest},
        responses::ProfileListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<AuthUser> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    // 角色资料模块
    async fn get_profile(&self, user_id: i64) -> Result<Option<Profile>> {
        self.get_profile_impl(user_id).await
    }

    async fn ensure_profile(&self, user: &User) -> Result<Profile> {
        self.ensure_profile_impl(user).await
    }

    async fn list_profiles_with_pagination(
        &self,
        query: ProfileListQuery,
    ) -> Result<ProfileListResponse> {
        self.list_profiles_with_pagination_impl(query).await
    }

    async fn list_parents(&self) -> Result<Vec<Profile>> {
        self.list_parents_impl().await
    }

    async fn update_profile_role(&self, user_id: i64, role: UserRole) -> Result<Option<Profile>> {
        self.update_profile_role_impl(user_id, role).await
    }

    async fn update_profile_name(
        &self,
        user_id: i64,
        full_name: Option<String>,
    ) -> Result<Option<Profile>> {
        self.update_profile_name_impl(user_id, full_name).await
    }

    async fn has_admin(&self) -> Result<bool> {
        self.has_admin_impl().await
    }

    // 密码重置模块
    async fn create_password_reset(
        &self,
        user_id: i64,
        token: &str,
        expires_at: i64,
    ) -> Result<()> {
        self.create_password_reset_impl(user_id, token, expires_at)
            .await
    }

    async fn reset_password_with_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<Option<i64>> {
        self.reset_password_with_token_impl(token, password_hash)
            .await
    }

    // 学生模块
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn list_students(&self, query: StudentListQuery) -> Result<Vec<Student>> {
        self.list_students_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn set_student_parent(
        &self,
        id: i64,
        parent_id: Option<i64>,
    ) -> Result<Option<Student>> {
        self.set_student_parent_impl(id, parent_id).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn count_students(&self) -> Result<i64> {
        self.count_students_impl().await
    }

    // 考勤模块
    async fn upsert_attendance(&self, record: UpsertAttendance) -> Result<AttendanceRecord> {
        self.upsert_attendance_impl(record).await
    }

    async fn mark_all_present(&self, date: NaiveDate, marked_by: Option<i64>) -> Result<i64> {
        self.mark_all_present_impl(date, marked_by).await
    }

    async fn list_attendance_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_by_date_impl(date).await
    }

    async fn list_attendance_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<AttendanceRecord>> {
        self.list_attendance_for_student_impl(student_id).await
    }

    async fn get_latest_attendance(&self, student_id: i64) -> Result<Option<AttendanceRecord>> {
        self.get_latest_attendance_impl(student_id).await
    }

    // 学习进度模块
    async fn create_progress(
        &self,
        entry: CreateProgressRequest,
        created_by: Option<i64>,
    ) -> Result<ProgressEntry> {
        self.create_progress_impl(entry, created_by).await
    }

    async fn list_progress(&self, query: ProgressListQuery) -> Result<Vec<ProgressEntry>> {
        self.list_progress_impl(query).await
    }

    async fn update_progress(
        &self,
        id: i64,
        update: UpdateProgressRequest,
    ) -> Result<Option<ProgressEntry>> {
        self.update_progress_impl(id, update).await
    }

    async fn delete_progress(&self, id: i64) -> Result<bool> {
        self.delete_progress_impl(id).await
    }

    async fn count_progress_since(&self, since: NaiveDate) -> Result<i64> {
        self.count_progress_since_impl(since).await
    }

    // 反馈模块
    async fn create_feedback(&self, feedback: NewFeedback) -> Result<FeedbackMessage> {
        self.create_feedback_impl(feedback).await
    }

    async fn get_feedback_by_id(&self, id: i64) -> Result<Option<FeedbackMessage>> {
        self.get_feedback_by_id_impl(id).await
    }

    async fn list_feedback_for_student(
        &self,
        student_id: i64,
        parents_only: bool,
    ) -> Result<Vec<FeedbackMessage>> {
        self.list_feedback_for_student_impl(student_id, parents_only)
            .await
    }

    async fn list_recent_feedback(&self, limit: u64) -> Result<Vec<FeedbackMessage>> {
        self.list_recent_feedback_impl(limit).await
    }

    async fn count_unread_feedback(&self, student_id: i64, parents_only: bool) -> Result<i64> {
        self.count_unread_feedback_impl(student_id, parents_only)
            .await
    }

    async fn mark_feedback_read(&self, id: i64) -> Result<Option<FeedbackMessage>> {
        self.mark_feedback_read_impl(id).await
    }

    // 资料模块
    async fn create_material(&self, material: NewMaterial) -> Result<MaterialFile> {
        self.create_material_impl(material).await
    }

    async fn get_material_by_id(&self, id: i64) -> Result<Option<MaterialFile>> {
        self.get_material_by_id_impl(id).await
    }

    async fn list_materials_for_student(&self, student_id: i64) -> Result<Vec<MaterialFile>> {
        self.list_materials_for_student_impl(student_id).await
    }

    async fn delete_material(&self, id: i64) -> Result<bool> {
        self.delete_material_impl(id).await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::models::users::{
        entities::{AuthUser, UserRole},
        requests::CreateUserRequest,
    };
    use crate::models::students::{entities::Student, requests::CreateStudentRequest};

    /// 单连接内存库，跑完整迁移
    pub async fn memory_storage() -> SeaOrmStorage {
        SeaOrmStorage::connect("sqlite::memory:", 1, 5)
            .await
            .expect("in-memory sqlite")
    }

    pub async fn seed_user(storage: &SeaOrmStorage, email: &str, role: UserRole) -> AuthUser {
        storage
            .create_user_impl(CreateUserRequest {
                email: email.to_string(),
                password: "hash".to_string(),
                role,
                full_name: None,
            })
            .await
            .expect("create user")
    }

    pub async fn seed_student(
        storage: &SeaOrmStorage,
        name: &str,
        parent_id: Option<i64>,
    ) -> Student {
        storage
            .create_student_impl(CreateStudentRequest {
                name: name.to_string(),
                grade: None,
                parent_id,
            })
            .await
            .expect("create student")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("schoolhub.db").unwrap(),
            "sqlite://schoolhub.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").unwrap(),
            "postgres://u:p@localhost/db"
        );
        assert!(SeaOrmStorage::build_database_url("oracle://x").is_err());
    }

    #[tokio::test]
    async fn test_migrations_run_on_memory_database() {
        let storage = test_support::memory_storage().await;
        assert_eq!(storage.count_students_impl().await.unwrap(), 0);
    }
}
