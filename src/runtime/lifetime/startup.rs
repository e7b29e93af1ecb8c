use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::SchoolHubError;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const MEMORY_CACHE: &str = "moka";
const SEED_ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Result<Arc<dyn ObjectCache>, SchoolHubError> {
    let constructor = get_object_cache_plugin(name).ok_or_else(|| {
        SchoolHubError::cache_plugin_not_found(format!("Cache backend '{name}' is not registered"))
    })?;
    let cache = constructor().await?;
    Ok(Arc::from(cache))
}

/// 按配置创建缓存，失败时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, SchoolHubError> {
    let cache_type = AppConfig::get().cache.cache_type.as_str();
    warn!("Attempting to create {} cache backend", cache_type);

    match build_cache(cache_type).await {
        Ok(cache) => {
            warn!("Cache backend {} initialized", cache_type);
            Ok(cache)
        }
        Err(e) if cache_type != MEMORY_CACHE => {
            warn!(
                "Failed to create {} cache: {}; falling back to in-memory cache",
                cache_type, e
            );
            build_cache(MEMORY_CACHE).await
        }
        Err(e) => Err(e),
    }
}

/// 空库时创建超级管理员账号
///
/// 密码取自 `ADMIN_PASSWORD`，未设置时生成一次并打印到日志。
async fn seed_super_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!("Database already has {} user(s), skipping admin seed", count);
            return;
        }
        Ok(_) => info!("No users found, creating the initial super admin account"),
        Err(e) => {
            warn!("Failed to count users: {}, skipping admin seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let generated = generate_password(16);
        warn!("==========================================================");
        warn!("  ADMIN_PASSWORD is not set, generated a password instead");
        warn!("  Super admin password: {}", generated);
        warn!("  Store it now, it will not be shown again");
        warn!("==========================================================");
        generated
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping admin seed", e);
            return;
        }
    };

    let admin = CreateUserRequest {
        school_id: None,
        username: SEED_ADMIN_USERNAME.to_string(),
        email: "admin@schoolhub.local".to_string(),
        password: password_hash,
        role: UserRole::SchoolAdmin,
        is_super_admin: true,
        display_name: Some("Platform Administrator".to_string()),
        phone: None,
    };

    match storage.create_user(admin).await {
        Ok(user) => info!(
            "Super admin account created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create super admin account: {}", e),
    }
}

/// 启动前准备：存储（含迁移）、初始账号与缓存
pub async fn prepare_server_startup() -> Result<StartupContext, SchoolHubError> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_super_admin(&storage).await;

    let cache = create_cache().await?;

    Ok(StartupContext { storage, cache })
}
