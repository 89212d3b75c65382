use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::config::AppConfig;
use crate::models::system::responses::SystemInfoResponse;
use crate::models::{ApiResponse, AppStartTime};

pub(crate) fn uptime_seconds(start: &AppStartTime, now: chrono::DateTime<chrono::Utc>) -> i64 {
    now.signed_duration_since(start.start_datetime)
        .num_seconds()
        .max(0)
}

pub async fn get_info(
    _service: &SystemService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let uptime = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|start| uptime_seconds(start, chrono::Utc::now()))
        .unwrap_or_default();

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        SystemInfoResponse {
            system_name: config.app.system_name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: config.app.environment.clone(),
            uptime_seconds: uptime,
        },
        "System information retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uptime_seconds() {
        let start = AppStartTime {
            start_datetime: chrono::Utc::now() - chrono::Duration::seconds(90),
        };
        let uptime = uptime_seconds(&start, chrono::Utc::now());
        assert!((90..=91).contains(&uptime));

        let future = AppStartTime {
            start_datetime: chrono::Utc::now() + chrono::Duration::seconds(30),
        };
        assert_eq!(uptime_seconds(&future, chrono::Utc::now()), 0);
    }
}
