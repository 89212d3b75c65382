pub mod attendance;

pub mod auth;

pub mod dashboard;

pub mod feedback;

pub mod materials;

pub mod profiles;

pub mod progress;

pub mod students;

pub mod system;

pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use dashboard::configure_dashboard_routes;
pub use feedback::configure_feedback_routes;
pub use materials::configure_material_routes;
pub use profiles::configure_profile_routes;
pub use progress::configure_progress_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test, web};
    use serde_json::{Value, json};

    use crate::cache::ObjectCache;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::models::users::entities::{AuthUser, UserRole};
    use crate::services::students::access::NOT_ASSIGNED_MESSAGE;
    use crate::storage::Storage;
    use crate::storage::sea_orm_storage::test_support::{memory_storage, seed_student, seed_user};
    use super::configure_student_routes;
    use crate::utils::jwt::JwtUtils;

    struct Fixture {
        storage: Arc<dyn Storage>,
        cache: Arc<dyn ObjectCache>,
        admin_token: String,
        parent_token: String,
        own_student_id: i64,
        other_student_id: i64,
    }

    fn bearer(auth_user: &AuthUser) -> String {
        let token =
            JwtUtils::generate_access_token(auth_user.id(), &auth_user.role().to_string())
                .unwrap();
        format!("Bearer {token}")
    }

    async fn fixture() -> Fixture {
        let db = memory_storage().await;
        let admin = seed_user(&db, "admin@school.org", UserRole::Admin).await;
        let parent = seed_user(&db, "parent@example.com", UserRole::Parent).await;
        let other_parent = seed_user(&db, "other@example.com", UserRole::Parent).await;
        let own = seed_student(&db, "Ada", Some(parent.id())).await;
        let other = seed_student(&db, "Ben", Some(other_parent.id())).await;

        Fixture {
            storage: Arc::new(db),
            cache: Arc::new(MokaCacheWrapper::with_settings(100, 60)),
            admin_token: bearer(&admin),
            parent_token: bearer(&parent),
            own_student_id: own.id,
            other_student_id: other.id,
        }
    }

    macro_rules! init_app {
        ($fx:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($fx.storage.clone()))
                    .app_data(web::Data::new($fx.cache.clone()))
                    .configure(configure_student_routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthorized() {
        let fx = fixture().await;
        let app = init_app!(fx);

        let req = test::TestRequest::get().uri("/api/v1/students").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::get()
            .uri("/api/v1/students")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_parent_forbidden_in_admin_area() {
        let fx = fixture().await;
        let app = init_app!(fx);

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/students")
            .insert_header(("Authorization", fx.parent_token.as_str()))
            .set_json(json!({ "name": "Cy" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/students/{}", fx.own_student_id))
            .insert_header(("Authorization", fx.parent_token.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_parent_sees_only_own_students() {
        let fx = fixture().await;
        let app = init_app!(fx);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/students/{}", fx.other_student_id))
            .insert_header(("Authorization", fx.parent_token.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], NOT_ASSIGNED_MESSAGE);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/students/{}", fx.own_student_id))
            .insert_header(("Authorization", fx.parent_token.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_admin_passes_both_areas() {
        let fx = fixture().await;
        let app = init_app!(fx);

        let req = test::TestRequest::get()
            .uri(&format!("/api/v1/students/{}", fx.other_student_id))
            .insert_header(("Authorization", fx.admin_token.as_str()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/v1/admin/students")
            .insert_header(("Authorization", fx.admin_token.as_str()))
            .set_json(json!({ "name": "Cy", "grade": "3" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["student"]["name"], "Cy");
    }
}
