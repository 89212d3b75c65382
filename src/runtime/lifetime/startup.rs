use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_ADMIN_EMAIL: &str = "admin@localhost";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 创建缓存实例
///
/// 配置的后端不可用时回退到 Moka 内存缓存。
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    match get_object_cache_plugin(cache_type) {
        Some(constructor) => match constructor().await {
            Ok(cache) => {
                warn!("Successfully created {} cache backend", cache_type);
                return Ok(Arc::from(cache));
            }
            Err(e) => warn!("Failed to create {} cache: {}", cache_type, e),
        },
        None => warn!("Cache backend '{}' not found in registry", cache_type),
    }

    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(fallback_constructor) = get_object_cache_plugin("moka") {
            match fallback_constructor().await {
                Ok(cache) => {
                    warn!("Successfully created fallback Moka cache backend");
                    return Ok(Arc::from(cache));
                }
                Err(fallback_e) => {
                    warn!("Failed to create fallback Moka cache: {}", fallback_e);
                }
            }
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 初始化默认管理员账号
///
/// 仅当系统中还没有任何管理员时创建 `admin@localhost`。
async fn seed_admin(storage: &Arc<dyn Storage>) {
    match storage.has_admin().await {
        Ok(true) => {
            debug!("Admin account already exists, skipping admin seed");
            return;
        }
        Ok(false) => {
            info!("No admin found in database, creating default admin account...");
        }
        Err(e) => {
            warn!("Failed to check admin accounts: {}, skipping admin seed", e);
            return;
        }
    }

    // 获取密码：优先从环境变量，否则生成随机密码
    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin_request = CreateUserRequest {
        email: DEFAULT_ADMIN_EMAIL.to_string(),
        password: password_hash,
        role: UserRole::Admin,
        full_name: Some("Administrator".to_string()),
    };

    match storage.create_user(admin_request).await {
        Ok(admin) => {
            info!(
                "Default admin account created successfully (ID: {}, email: {})",
                admin.user.id, admin.user.email
            );
        }
        Err(e) => {
            warn!("Failed to create admin account: {}", e);
        }
    }
}

/// 确保资料上传目录存在
async fn ensure_upload_dir() -> std::io::Result<()> {
    let upload_dir = &AppConfig::get().upload.dir;
    tokio::fs::create_dir_all(upload_dir).await?;
    debug!("Upload directory ready: {}", upload_dir);
    Ok(())
}

/// 准备服务器启动的上下文
/// 包括存储、缓存和上传目录
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    // 初始化默认管理员账号（如果需要）
    seed_admin(&storage).await;

    ensure_upload_dir()
        .await
        .expect("Failed to create upload directory");

    // 创建缓存实例
    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}
