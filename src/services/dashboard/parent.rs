use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use futures_util::future::join_all;

use super::DashboardService;
use crate::models::dashboard::responses::{
    MaterialGroup, MaterialSort, ParentDashboardResponse, ParentMaterialsQuery,
    ParentMaterialsResponse, ParentStudentCard,
};
use crate::models::materials::entities::MaterialFile;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::students::access::{current_user, visible_students};

fn students_failed(e: impl std::fmt::Display) -> HttpResponse {
    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
        ErrorCode::InternalServerError,
        format!("Failed to load students: {e}"),
    ))
}

pub async fn parent_dashboard(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let auth_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let students = match visible_students(&storage, &auth_user).await {
        Ok(students) => students,
        Err(e) => return Ok(students_failed(e)),
    };

    let parents_only = !auth_user.is_admin();
    let cards = join_all(students.into_iter().map(|student| {
        let storage = storage.clone();
        async move {
            let (unread, latest) = futures_util::join!(
                storage.count_unread_feedback(student.id, parents_only),
                storage.get_latest_attendance(student.id),
            );
            match (unread, latest) {
                (Ok(unread), Ok(latest_attendance)) => Some(ParentStudentCard {
                    student,
                    unread,
                    latest_attendance,
                }),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!("Skipping dashboard card for student {}: {}", student.id, e);
                    None
                }
            }
        }
    }))
    .await;

    let items = cards.into_iter().flatten().collect();
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ParentDashboardResponse { items },
        "Dashboard retrieved successfully",
    )))
}

/// 按标题或文件名过滤并排序
pub(crate) fn filter_materials(
    mut materials: Vec<MaterialFile>,
    term: Option<&str>,
    sort: MaterialSort,
) -> Vec<MaterialFile> {
    if let Some(term) = term {
        materials.retain(|m| {
            m.title.to_lowercase().contains(term) || m.file_name.to_lowercase().contains(term)
        });
    }
    match sort {
        MaterialSort::Newest => {
            materials.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)))
        }
        MaterialSort::Oldest => {
            materials.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
        }
    }
    materials
}

pub async fn parent_materials(
    service: &DashboardService,
    request: &HttpRequest,
    query: ParentMaterialsQuery,
) -> ActixResult<HttpResponse> {
    let auth_user = match current_user(request) {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };
    let storage = service.get_storage(request);

    let students = match visible_students(&storage, &auth_user).await {
        Ok(students) => students,
        Err(e) => return Ok(students_failed(e)),
    };

    let term = query.search_term();
    let groups = join_all(students.into_iter().map(|student| {
        let storage = storage.clone();
        async move {
            match storage.list_materials_for_student(student.id).await {
                Ok(materials) => Some(MaterialGroup { student, materials }),
                Err(e) => {
                    tracing::warn!("Skipping materials for student {}: {}", student.id, e);
                    None
                }
            }
        }
    }))
    .await;

    let groups = groups
        .into_iter()
        .flatten()
        .map(|group| MaterialGroup {
            materials: filter_materials(group.materials, term.as_deref(), query.sort),
            student: group.student,
        })
        // 只有给出搜索词时才丢弃空分组
        .filter(|group| term.is_none() || !group.materials.is_empty())
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ParentMaterialsResponse { groups },
        "Materials retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(id: i64, title: &str, file_name: &str, created_secs: i64) -> MaterialFile {
        MaterialFile {
            id,
            student_id: 1,
            title: title.to_string(),
            file_path: format!("1/{id}-{file_name}"),
            file_name: file_name.to_string(),
            content_type: None,
            size: None,
            uploaded_by: None,
            created_at: chrono::DateTime::from_timestamp(created_secs, 0).unwrap(),
        }
    }

    fn sample() -> Vec<MaterialFile> {
        vec![
            material(1, "Math worksheet", "fractions.pdf", 100),
            material(2, "Reading list", "books.docx", 300),
            material(3, "Science lab", "MATH-appendix.pdf", 200),
        ]
    }

    #[test]
    fn test_filter_matches_title_or_file_name() {
        let ids: Vec<i64> = filter_materials(sample(), Some("math"), MaterialSort::Newest)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_sort_orders() {
        let newest: Vec<i64> = filter_materials(sample(), None, MaterialSort::Newest)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(newest, vec![2, 3, 1]);

        let oldest: Vec<i64> = filter_materials(sample(), None, MaterialSort::Oldest)
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(oldest, vec![1, 3, 2]);
    }
}
