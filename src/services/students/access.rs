//! 会话用户与学生归属校验
//!
//! 家长只能访问 `parent_id` 指向自己的学生；不属于自己的学生与不存在的学生返回相同的 404。

use actix_web::{HttpRequest, HttpResponse};
use std::sync::Arc;

use crate::middlewares::RequireJWT;
use crate::models::students::entities::Student;
use crate::models::users::entities::AuthUser;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub(crate) const NOT_ASSIGNED_MESSAGE: &str =
    "Student not found or not assigned to your account";

pub(crate) fn current_user(request: &HttpRequest) -> Result<AuthUser, HttpResponse> {
    RequireJWT::extract_auth_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

/// 会话用户能否看到该学生
pub(crate) fn can_view(auth_user: &AuthUser, student: &Student) -> bool {
    auth_user.is_admin() || student.is_linked_to(auth_user.id())
}

/// 加载当前用户可见的学生
pub(crate) async fn load_visible_student(
    storage: &Arc<dyn Storage>,
    auth_user: &AuthUser,
    student_id: i64,
) -> Result<Student, HttpResponse> {
    match storage.get_student_by_id(student_id).await {
        Ok(Some(student)) if can_view(auth_user, &student) => Ok(student),
        Ok(_) => {
            let message = if auth_user.is_admin() {
                "Student not found"
            } else {
                NOT_ASSIGNED_MESSAGE
            };
            Err(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::StudentNotFound, message)))
        }
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to load student: {e}"),
            )),
        ),
    }
}

/// 当前用户可见的全部学生，按创建时间倒序
pub(crate) async fn visible_students(
    storage: &Arc<dyn Storage>,
    auth_user: &AuthUser,
) -> crate::errors::Result<Vec<Student>> {
    let query = crate::models::students::requests::StudentListQuery {
        parent_id: (!auth_user.is_admin()).then(|| auth_user.id()),
        search: None,
    };
    storage.list_students(query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{Profile, User, UserRole, UserStatus};

    fn auth_user(id: i64, role: UserRole) -> AuthUser {
        let now = chrono::Utc::now();
        AuthUser {
            user: User {
                id,
                email: format!("user{id}@school.org"),
                password_hash: String::new(),
                status: UserStatus::Active,
                last_login: None,
                created_at: now,
                updated_at: now,
            },
            profile: Profile {
                user_id: id,
                email: None,
                full_name: None,
                role,
                created_at: now,
                updated_at: now,
            },
        }
    }

    fn student(parent_id: Option<i64>) -> Student {
        let now = chrono::Utc::now();
        Student {
            id: 1,
            name: "Mia".to_string(),
            grade: None,
            parent_id,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_parent_sees_only_own_children() {
        let parent = auth_user(5, UserRole::Parent);
        assert!(can_view(&parent, &student(Some(5))));
        assert!(!can_view(&parent, &student(Some(6))));
        assert!(!can_view(&parent, &student(None)));
    }

    #[test]
    fn test_admin_sees_everyone() {
        let admin = auth_user(1, UserRole::Admin);
        assert!(can_view(&admin, &student(Some(5))));
        assert!(can_view(&admin, &student(None)));
    }

    #[tokio::test]
    async fn test_load_visible_student_hides_foreign_children() {
        use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_student, seed_user};

        let db = memory_storage().await;
        let owner = seed_user(&db, "owner@school.org", UserRole::Parent).await;
        let other = seed_user(&db, "other@school.org", UserRole::Parent).await;
        let kid = seed_student(&db, "Kid", Some(owner.id())).await;
        let storage: Arc<dyn Storage> = Arc::new(db);

        assert!(load_visible_student(&storage, &owner, kid.id).await.is_ok());
        let denied = load_visible_student(&storage, &other, kid.id).await.unwrap_err();
        assert_eq!(denied.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
