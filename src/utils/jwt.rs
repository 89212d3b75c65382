use crate::config::AppConfig;
use actix_web::cookie::{Cookie, SameSite};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

pub const ACCESS_TOKEN: &str = "access";
pub const REFRESH_TOKEN: &str = "refresh";
pub const DOWNLOAD_TOKEN: &str = "download";

const REFRESH_COOKIE: &str = "refresh_token";

// 会话 Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户 ID
    pub role: String,       // 签发时的角色，仅作参考，以角色资料为准
    pub token_type: String, // "access" 或 "refresh"
    pub exp: usize,
    pub iat: usize,
}

// 资料下载链接 Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadClaims {
    pub sub: String,  // 资料 ID
    pub path: String, // 对象存储键
    pub token_type: String,
    pub exp: usize,
    pub iat: usize,
}

// Token 对
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub struct JwtUtils;

impl JwtUtils {
    fn get_secret() -> String {
        AppConfig::get().jwt.secret.clone()
    }

    fn encode_with<T: Serialize>(
        secret: &str,
        claims: &T,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
    }

    fn decode_with<T: DeserializeOwned>(
        secret: &str,
        token: &str,
    ) -> Result<T, jsonwebtoken::errors::Error> {
        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        decode::<T>(token, &decoding_key, &Validation::default()).map(|data| data.claims)
    }

    fn session_claims(
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry: chrono::Duration,
    ) -> Claims {
        let now = chrono::Utc::now();
        Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            token_type: token_type.to_string(),
            exp: (now + expiry).timestamp() as usize,
            iat: now.timestamp() as usize,
        }
    }

    // 生成 Access Token
    pub fn generate_access_token(
        user_id: i64,
        role: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let config = AppConfig::get();
        Self::generate_token_with_expiry(
            user_id,
            role,
            ACCESS_TOKEN,
            chrono::Duration::minutes(config.jwt.access_token_expiry),
        )
    }

    // 生成 Refresh Token，未指定时使用默认有效期
    pub fn generate_refresh_token(
        user_id: i64,
        role: &str,
        token_expiry: Option<chrono::Duration>,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let expiry = token_expiry.unwrap_or_else(|| {
            chrono::Duration::days(AppConfig::get().jwt.refresh_token_expiry)
        });
        Self::generate_token_with_expiry(user_id, role, REFRESH_TOKEN, expiry)
    }

    pub fn generate_token_with_expiry(
        user_id: i64,
        role: &str,
        token_type: &str,
        expiry_duration: chrono::Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Self::session_claims(user_id, role, token_type, expiry_duration);
        Self::encode_with(&Self::get_secret(), &claims)
    }

    pub fn generate_token_pair(
        user_id: i64,
        role: &str,
        refresh_token_expiry: Option<chrono::Duration>,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        Ok(TokenPair {
            access_token: Self::generate_access_token(user_id, role)?,
            refresh_token: Self::generate_refresh_token(user_id, role, refresh_token_expiry)?,
        })
    }

    fn verify_type_with(
        secret: &str,
        token: &str,
        expected_type: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims: Claims = Self::decode_with(secret, token)?;
        if claims.token_type != expected_type {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    pub fn verify_access_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_type_with(&Self::get_secret(), token, ACCESS_TOKEN)
    }

    pub fn verify_refresh_token(token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::verify_type_with(&Self::get_secret(), token, REFRESH_TOKEN)
    }

    /// Claims 中的用户 ID
    pub fn user_id(claims: &Claims) -> Result<i64, jsonwebtoken::errors::Error> {
        claims
            .sub
            .parse::<i64>()
            .map_err(|_| jsonwebtoken::errors::ErrorKind::InvalidSubject.into())
    }

    // 使用 Refresh Token 生成新的 Access Token
    pub fn refresh_access_token(
        refresh_token: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = Self::verify_refresh_token(refresh_token)?;
        Self::generate_access_token(Self::user_id(&claims)?, &claims.role)
    }

    /// 生成资料下载令牌
    pub fn generate_download_token(
        material_id: i64,
        file_path: &str,
        expires_in_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        Self::download_token_with(
            &Self::get_secret(),
            material_id,
            file_path,
            expires_in_secs,
        )
    }

    fn download_token_with(
        secret: &str,
        material_id: i64,
        file_path: &str,
        expires_in_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = DownloadClaims {
            sub: material_id.to_string(),
            path: file_path.to_string(),
            token_type: DOWNLOAD_TOKEN.to_string(),
            exp: (now + chrono::Duration::seconds(expires_in_secs)).timestamp() as usize,
            iat: now.timestamp() as usize,
        };
        Self::encode_with(secret, &claims)
    }

    pub fn verify_download_token(
        token: &str,
    ) -> Result<DownloadClaims, jsonwebtoken::errors::Error> {
        Self::verify_download_with(&Self::get_secret(), token)
    }

    fn verify_download_with(
        secret: &str,
        token: &str,
    ) -> Result<DownloadClaims, jsonwebtoken::errors::Error> {
        let claims: DownloadClaims = Self::decode_with(secret, token)?;
        if claims.token_type != DOWNLOAD_TOKEN {
            return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
        }
        Ok(claims)
    }

    /// 创建 Refresh Token Cookie
    pub fn create_refresh_token_cookie(
        refresh_token: &str,
        expiry: chrono::Duration,
    ) -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(REFRESH_COOKIE, refresh_token.to_string())
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(
                expiry.num_seconds(),
            ))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    /// 创建空的 Refresh Token Cookie（用于注销）
    pub fn create_empty_refresh_token_cookie() -> Cookie<'static> {
        let config = AppConfig::get();
        Cookie::build(REFRESH_COOKIE, "")
            .path("/")
            .max_age(actix_web::cookie::time::Duration::seconds(0))
            .same_site(SameSite::Strict)
            .http_only(true)
            .secure(config.is_production())
            .finish()
    }

    pub fn extract_refresh_token_from_cookie(req: &actix_web::HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE)
            .map(|cookie| cookie.value().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_access_token_is_not_a_refresh_token() {
        let claims = JwtUtils::session_claims(7, "parent", ACCESS_TOKEN, chrono::Duration::minutes(5));
        let token = JwtUtils::encode_with(SECRET, &claims).unwrap();

        let verified = JwtUtils::verify_type_with(SECRET, &token, ACCESS_TOKEN).unwrap();
        assert_eq!(JwtUtils::user_id(&verified).unwrap(), 7);
        assert!(JwtUtils::verify_type_with(SECRET, &token, REFRESH_TOKEN).is_err());
        assert!(JwtUtils::verify_type_with("other-secret", &token, ACCESS_TOKEN).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = JwtUtils::session_claims(1, "admin", ACCESS_TOKEN, chrono::Duration::hours(-2));
        let token = JwtUtils::encode_with(SECRET, &claims).unwrap();
        assert!(JwtUtils::verify_type_with(SECRET, &token, ACCESS_TOKEN).is_err());
    }

    #[test]
    fn test_download_token_binds_material_and_path() {
        let token = JwtUtils::download_token_with(SECRET, 42, "3/1700000000000-notes.pdf", 600).unwrap();
        let claims = JwtUtils::verify_download_with(SECRET, &token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.path, "3/1700000000000-notes.pdf");

        let expired = JwtUtils::download_token_with(SECRET, 42, "3/x.pdf", -3600).unwrap();
        assert!(JwtUtils::verify_download_with(SECRET, &expired).is_err());

        // 会话令牌不能当下载令牌用
        let session = JwtUtils::encode_with(
            SECRET,
            &JwtUtils::session_claims(42, "admin", ACCESS_TOKEN, chrono::Duration::minutes(5)),
        )
        .unwrap();
        assert!(JwtUtils::verify_download_with(SECRET, &session).is_err());
    }
}
