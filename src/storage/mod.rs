use std::sync::Arc;

use chrono::NaiveDate;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户及其角色资料
    async fn create_user(&self, user: CreateUserRequest) -> Result<AuthUser>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 更新用户凭据
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;

    /// 角色资料方法
    async fn get_profile(&self, user_id: i64) -> Result<Option<Profile>>;
    // 获取资料，不存在时以家长角色创建
    async fn ensure_profile(&self, user: &User) -> Result<Profile>;
    async fn list_profiles_with_pagination(
        &self,
        query: ProfileListQuery,
    ) -> Result<ProfileListResponse>;
    // 全部家长资料，按邮箱升序
    async fn list_parents(&self) -> Result<Vec<Profile>>;
    async fn update_profile_role(&self, user_id: i64, role: UserRole) -> Result<Option<Profile>>;
    async fn update_profile_name(
        &self,
        user_id: i64,
        full_name: Option<String>,
    ) -> Result<Option<Profile>>;
    // 是否存在管理员
    async fn has_admin(&self) -> Result<bool>;

    /// 密码重置方法
    async fn create_password_reset(&self, user_id: i64, token: &str, expires_at: i64)
    -> Result<()>;
    // 消费重置令牌并写入新密码哈希，返回用户ID；令牌无效时返回 None
    async fn reset_password_with_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<Option<i64>>;

    /// 学生管理方法
    async fn create_student(&self, student: CreateStudentRequest) -> Result<Student>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    // 按创建时间倒序
    async fn list_students(&self, query: StudentListQuery) -> Result<Vec<Student>>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn set_student_parent(&self, id: i64, parent_id: Option<i64>)
    -> Result<Option<Student>>;
    // 删除学生及其考勤、进度、反馈、资料记录
    async fn delete_student(&self, id: i64) -> Result<bool>;
    async fn count_students(&self) -> Result<i64>;

    /// 考勤方法
    async fn upsert_attendance(&self, record: UpsertAttendance) -> Result<AttendanceRecord>;
    // 将所有学生标记为出勤，返回标记条数
    async fn mark_all_present(&self, date: NaiveDate, marked_by: Option<i64>) -> Result<i64>;
    async fn list_attendance_by_date(&self, date: NaiveDate) -> Result<Vec<AttendanceRecord>>;
    // 按日期倒序
    async fn list_attendance_for_student(&self, student_id: i64)
    -> Result<Vec<AttendanceRecord>>;
    async fn get_latest_attendance(&self, student_id: i64) -> Result<Option<AttendanceRecord>>;

    /// 学习进度方法
    async fn create_progress(
        &self,
        entry: CreateProgressRequest,
        created_by: Option<i64>,
    ) -> Result<ProgressEntry>;
    async fn list_progress(&self, query: ProgressListQuery) -> Result<Vec<ProgressEntry>>;
    async fn update_progress(
        &self,
        id: i64,
        update: UpdateProgressRequest,
    ) -> Result<Option<ProgressEntry>>;
    async fn delete_progress(&self, id: i64) -> Result<bool>;
    async fn count_progress_since(&self, since: NaiveDate) -> Result<i64>;

    /// 反馈方法
    async fn create_feedback(&self, feedback: NewFeedback) -> Result<FeedbackMessage>;
    async fn get_feedback_by_id(&self, id: i64) -> Result<Option<FeedbackMessage>>;
    // parents_only 为 true 时只返回家长可见的消息
    async fn list_feedback_for_student(
        &self,
        student_id: i64,
        parents_only: bool,
    ) -> Result<Vec<FeedbackMessage>>;
    async fn list_recent_feedback(&self, limit: u64) -> Result<Vec<FeedbackMessage>>;
    async fn count_unread_feedback(&self, student_id: i64, parents_only: bool) -> Result<i64>;
    // 标记已读，已读消息保持原 read_at
    async fn mark_feedback_read(&self, id: i64) -> Result<Option<FeedbackMessage>>;

    /// 资料文件方法
    async fn create_material(&self, material: NewMaterial) -> Result<MaterialFile>;
    async fn get_material_by_id(&self, id: i64) -> Result<Option<MaterialFile>>;
    // 按上传时间倒序
    async fn list_materials_for_student(&self, student_id: i64) -> Result<Vec<MaterialFile>>;
    async fn delete_material(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
