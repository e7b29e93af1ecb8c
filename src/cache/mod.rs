//! 缓存层
//!
//! 通过插件注册表选择后端（moka 内存缓存 / redis），
//! 对外只暴露 `ObjectCache` trait。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    // 后端不可用等情况，调用方应视为未命中
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

impl dyn ObjectCache {
    /// 读取 JSON 序列化的对象，反序列化失败时删除脏数据
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.get_raw(key).await {
            CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::debug!("Dropping undecodable cache entry {}: {}", key, e);
                    self.remove(key).await;
                    None
                }
            },
            _ => None,
        }
    }

    /// 以 JSON 形式写入对象
    pub async fn insert_json<T: Serialize>(&self, key: String, value: &T, ttl: u64) {
        if let Ok(json) = serde_json::to_string(value) {
            self.insert_raw(key, json, ttl).await;
        }
    }
}

/// 缓存键
pub mod keys {
    pub const FEATURE_FLAGS: &str = "feature_flags:all";

    pub fn user_by_token(token: &str) -> String {
        format!("user:{token}")
    }
}

/// 声明缓存插件，在进程启动时自动注册到插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::SchoolHubError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    })
                }),
            );
        }
    };
}
