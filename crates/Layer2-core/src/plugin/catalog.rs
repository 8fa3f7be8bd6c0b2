//! Plugin Catalog - 로컬/원격 플러그인 목록
//!
//! - 로컬 카탈로그: 리소스 디렉토리의 `plugins.json`
//! - 원격 카탈로그: 프로젝트 설정의 URL 목록 (`http(s)://` 또는 `file://`)
//!
//! 원격 카탈로그는 URL마다 독립적으로 TTL 동안 캐시합니다.
//! 가져오기에 실패한 결과는 캐시하지 않습니다.

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use essentials_foundation::{Error, JsonStore, Result, TtlCache, TtlCacheStats};

use super::descriptor::PluginDescriptor;

/// 로컬 카탈로그 파일 이름
pub const LOCAL_CATALOG_FILE: &str = "plugins.json";

// ============================================================================
// PluginCatalog
// ============================================================================

/// 카탈로그 파일 구조
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginCatalog {
    #[serde(default = "default_catalog_version")]
    pub version: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub plugins: Vec<PluginDescriptor>,
}

fn default_catalog_version() -> String {
    "1.0".to_string()
}

impl Default for PluginCatalog {
    fn default() -> Self {
        Self {
            version: default_catalog_version(),
            name: String::new(),
            plugins: Vec::new(),
        }
    }
}

impl PluginCatalog {
    pub fn new(plugins: Vec<PluginDescriptor>) -> Self {
        Self {
            plugins,
            ..Default::default()
        }
    }

    /// 로컬 카탈로그 로드 (파일이 없으면 빈 카탈로그)
    pub fn load_local(resource_dir: &Path) -> Result<Self> {
        let store = JsonStore::new(resource_dir);
        Ok(store.load_optional(LOCAL_CATALOG_FILE)?.unwrap_or_default())
    }

    pub fn save_local(&self, resource_dir: &Path) -> Result<()> {
        JsonStore::new(resource_dir).save(LOCAL_CATALOG_FILE, self)
    }
}

// ============================================================================
// CatalogFetcher
// ============================================================================

/// 원격 카탈로그 가져오기
#[async_trait]
pub trait CatalogFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PluginCatalog>;
}

/// reqwest(`http(s)://`) + tokio fs(`file://`) 구현
pub struct HttpCatalogFetcher {
    client: Client,
}

impl HttpCatalogFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    async fn fetch_file(&self, url: &str, path: &str) -> Result<PluginCatalog> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::remote_catalog(url, e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| Error::remote_catalog(url, e.to_string()))
    }

    async fn fetch_http(&self, url: &str) -> Result<PluginCatalog> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", "Essentials")
            .send()
            .await
            .map_err(|e| Error::remote_catalog(url, e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::remote_catalog(
                url,
                format!("HTTP {}", response.status()),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| Error::remote_catalog(url, e.to_string()))
    }
}

impl Default for HttpCatalogFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogFetcher for HttpCatalogFetcher {
    async fn fetch(&self, url: &str) -> Result<PluginCatalog> {
        debug!("Fetching plugin catalog from {}", url);
        match url.strip_prefix("file://") {
            Some(path) => self.fetch_file(url, path).await,
            None if url.starts_with("http://") || url.starts_with("https://") => {
                self.fetch_http(url).await
            }
            None => Err(Error::remote_catalog(url, "unsupported catalog URL scheme")),
        }
    }
}

// ============================================================================
// RemoteCatalogCache
// ============================================================================

/// URL별 원격 카탈로그 캐시
pub struct RemoteCatalogCache {
    cache: Mutex<TtlCache<String, Vec<PluginDescriptor>>>,
}

impl RemoteCatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: Mutex::new(TtlCache::new(ttl)),
        }
    }

    pub fn get(&self, url: &str) -> Option<Vec<PluginDescriptor>> {
        self.cache.lock().get(&url.to_string())
    }

    pub fn insert(&self, url: &str, plugins: Vec<PluginDescriptor>) {
        self.cache.lock().insert(url.to_string(), plugins);
    }

    pub fn clear(&self) {
        self.cache.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    pub fn stats(&self) -> TtlCacheStats {
        self.cache.lock().stats()
    }
}
