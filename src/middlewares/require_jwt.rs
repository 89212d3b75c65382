/*!
 * JWT 认证中间件
 *
 * 验证 `Authorization: Bearer <token>` 中的 access token，解析出当前会话用户
 * （登录凭据 + 角色资料），写入请求扩展供后续中间件和处理程序使用。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireJWT;
 *
 * web::scope("/api/v1/students")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_students));
 *
 * async fn list_students(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let user = RequireJWT::extract_auth_user(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 提取并校验 access token（签名、过期时间、令牌类型）
 * 2. 以 token 为键查询缓存中的 `AuthUser`
 * 3. 缓存未命中时从存储加载用户；首次登录的用户自动创建家长资料
 * 4. 非活跃用户返回 401
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{AuthUser, UserStatus};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

/// 缓存键
pub(crate) fn auth_cache_key(token: &str) -> String {
    format!("auth_user:{token}")
}

fn bearer_token(headers: &actix_web::http::header::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// 提取并验证 JWT access token，解析当前会话用户
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<AuthUser, String> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let cache = req
        .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
        .expect("Cache not found in app data")
        .get_ref()
        .clone();

    let cache_key = auth_cache_key(token);
    match cache.get_json::<AuthUser>(&cache_key).await {
        CacheResult::Found(auth_user) => return Ok(auth_user),
        CacheResult::NotFound => debug!("Session user not cached, loading from storage"),
        CacheResult::ExistsButNoValue => warn!("Cache backend unavailable, loading from storage"),
    }

    let user_id = JwtUtils::user_id(&claims).map_err(|_| "Invalid user ID in JWT".to_string())?;

    let storage = req
        .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
        .expect("Storage not found in app data")
        .get_ref()
        .clone();

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            warn!("Failed to load user {}: {}", user_id, e);
            "Failed to retrieve user from storage".to_string()
        })?
        .ok_or_else(|| "User not found".to_string())?;

    if user.status != UserStatus::Active {
        return Err("User is not active".to_string());
    }

    // 首次登录的用户在这里获得家长资料
    let profile = storage.ensure_profile(&user).await.map_err(|e| {
        warn!("Failed to resolve profile for user {}: {}", user.id, e);
        "Failed to resolve user profile".to_string()
    })?;

    let auth_user = AuthUser { user, profile };
    cache
        .insert_json(cache_key, &auth_user, AppConfig::get().cache.default_ttl)
        .await;

    Ok(auth_user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(auth_user) => {
                    debug!(
                        "JWT authentication successful for ID: {} ({})",
                        auth_user.id(),
                        auth_user.role()
                    );
                    req.extensions_mut().insert(auth_user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 当前会话用户，需在 RequireJWT 之后使用
    pub fn extract_auth_user(req: &HttpRequest) -> Option<AuthUser> {
        req.extensions().get::<AuthUser>().cloned()
    }

    /// 当前请求携带的 access token
    pub fn extract_token(req: &HttpRequest) -> Option<String> {
        bearer_token(req.headers()).map(str::to_string)
    }

    /// 使当前 token 的会话缓存失效（资料变更后调用）
    pub async fn invalidate_session(req: &HttpRequest) {
        let Some(token) = Self::extract_token(req) else {
            return;
        };
        if let Some(cache) = req.app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>() {
            cache.remove(&auth_cache_key(&token)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_bearer_token_parsing() {
        let req = TestRequest::default()
            .insert_header(("Authorization", "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(req.headers()), Some("abc.def.ghi"));

        let basic = TestRequest::default()
            .insert_header(("Authorization", "Basic dXNlcg=="))
            .to_http_request();
        assert_eq!(bearer_token(basic.headers()), None);

        let empty = TestRequest::default()
            .insert_header(("Authorization", "Bearer "))
            .to_http_request();
        assert_eq!(bearer_token(empty.headers()), None);
    }

    #[test]
    fn test_cache_key_is_token_scoped() {
        assert_eq!(auth_cache_key("t1"), "auth_user:t1");
        assert_ne!(auth_cache_key("t1"), auth_cache_key("t2"));
    }
}
