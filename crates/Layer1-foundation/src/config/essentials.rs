//! Essentials Config - 통합 설정
//!
//! 글로벌(`~/.config/essentials/config.json`) 설정 위에 프로젝트
//! (`<root>/.essentials/config.json`) 설정을 병합합니다.

use crate::storage::JsonStore;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// 설정 파일명
pub const CONFIG_FILE: &str = "config.json";

/// 기본 프로젝트 네임스페이스
pub const DEFAULT_NAMESPACE: &str = "myproject";

/// 기본 빈 패키지
pub const DEFAULT_BEANS_PACKAGE: &str = "org.example.beans";

/// 기본 사이트 Java 소스 루트 (프로젝트 루트 기준)
pub const DEFAULT_SITE_JAVA_ROOT: &str = "site/src/main/java";

/// 원격 카탈로그 캐시 기본 유지 시간 (분)
pub const DEFAULT_CATALOG_TTL_MINUTES: u64 = 60;

/// 부모 빈이 없는 타입을 다시 시도하는 최대 횟수
pub const DEFAULT_MAX_BEAN_PASSES: usize = 5;

// ============================================================================
// Essentials Config
// ============================================================================

/// Essentials 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EssentialsConfig {
    /// 프로젝트 네임스페이스 prefix (예: "myproject")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_namespace: Option<String>,

    /// 생성되는 빈의 Java 패키지
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beans_package: Option<String>,

    /// 사이트 Java 소스 루트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_java_root: Option<String>,

    /// 커스텀 이미지셋 타입 (예: "myproject:imageset")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_namespace: Option<String>,

    /// 빈 생성 최대 반복 횟수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bean_passes: Option<usize>,

    /// 원격 카탈로그 캐시 유지 시간 (분)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_ttl_minutes: Option<u64>,

    /// 배포 리소스 디렉토리 (로컬 카탈로그, 리소스 설치 문서)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_dir: Option<String>,

    /// 프로젝트 설정
    #[serde(default)]
    pub settings: ProjectSettings,
}

impl EssentialsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Load / Save
    // ========================================================================

    /// 글로벌 + 프로젝트 병합 로드
    pub fn load(project_root: &Path) -> Result<Self> {
        let mut config = Self::new();

        // 1. 글로벌 설정
        if let Ok(global) = JsonStore::global() {
            if let Some(global_config) = global.load_optional::<EssentialsConfig>(CONFIG_FILE)? {
                config.merge(global_config);
            }
        }

        // 2. 프로젝트 설정
        let project = JsonStore::project(project_root);
        if let Some(project_config) = project.load_optional::<EssentialsConfig>(CONFIG_FILE)? {
            config.merge(project_config);
        }

        Ok(config)
    }

    /// 프로젝트 설정 저장
    pub fn save_project(&self, project_root: &Path) -> Result<()> {
        JsonStore::project(project_root).save(CONFIG_FILE, self)
    }

    // ========================================================================
    // Merge
    // ========================================================================

    /// 다른 설정과 병합 (other가 우선)
    pub fn merge(&mut self, other: EssentialsConfig) {
        if other.project_namespace.is_some() {
            self.project_namespace = other.project_namespace;
        }
        if other.beans_package.is_some() {
            self.beans_package = other.beans_package;
        }
        if other.site_java_root.is_some() {
            self.site_java_root = other.site_java_root;
        }
        if other.image_namespace.is_some() {
            self.image_namespace = other.image_namespace;
        }
        if other.max_bean_passes.is_some() {
            self.max_bean_passes = other.max_bean_passes;
        }
        if other.catalog_ttl_minutes.is_some() {
            self.catalog_ttl_minutes = other.catalog_ttl_minutes;
        }
        if other.resource_dir.is_some() {
            self.resource_dir = other.resource_dir;
        }
        self.settings.merge(other.settings);
    }

    // ========================================================================
    // 기본값이 적용된 접근자
    // ========================================================================

    pub fn namespace(&self) -> &str {
        self.project_namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn beans_package(&self) -> &str {
        self.beans_package.as_deref().unwrap_or(DEFAULT_BEANS_PACKAGE)
    }

    pub fn site_java_root(&self) -> &str {
        self.site_java_root.as_deref().unwrap_or(DEFAULT_SITE_JAVA_ROOT)
    }

    pub fn max_bean_passes(&self) -> usize {
        self.max_bean_passes.unwrap_or(DEFAULT_MAX_BEAN_PASSES).max(1)
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_minutes.unwrap_or(DEFAULT_CATALOG_TTL_MINUTES) * 60)
    }

    pub fn resource_dir(&self) -> &str {
        self.resource_dir.as_deref().unwrap_or(".essentials/resources")
    }

    // ========================================================================
    // Builder
    // ========================================================================

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.project_namespace = Some(namespace.into());
        self
    }

    pub fn with_image_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.image_namespace = Some(namespace.into());
        self
    }

    pub fn with_max_bean_passes(mut self, passes: usize) -> Self {
        self.max_bean_passes = Some(passes);
        self
    }
}

// ============================================================================
// Project Settings
// ============================================================================

/// 관리자가 설정하는 프로젝트 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    /// 원격 플러그인 카탈로그 URL 목록
    #[serde(default)]
    pub plugin_repositories: Vec<String>,

    /// 자동 설정 전에 파라미터 확인을 요구할지
    #[serde(default)]
    pub confirm_params: bool,

    /// 샘플 데이터 설치 여부
    #[serde(default = "default_true")]
    pub use_samples: bool,

    /// 템플릿 언어 (jsp, freemarker)
    #[serde(default = "default_template_language")]
    pub template_language: String,
}

fn default_true() -> bool {
    true
}

fn default_template_language() -> String {
    "freemarker".to_string()
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            plugin_repositories: Vec::new(),
            confirm_params: false,
            use_samples: true,
            template_language: default_template_language(),
        }
    }
}

impl ProjectSettings {
    fn merge(&mut self, other: ProjectSettings) {
        for repo in other.plugin_repositories {
            let repo = repo.trim().to_string();
            if !repo.is_empty() && !self.plugin_repositories.contains(&repo) {
                self.plugin_repositories.push(repo);
            }
        }
        self.confirm_params = other.confirm_params;
        self.use_samples = other.use_samples;
        if other.template_language != default_template_language() {
            self.template_language = other.template_language;
        }
    }

    /// 자동 설정에 사용하는 기본 파라미터
    pub fn default_parameters(&self) -> Vec<(String, String)> {
        vec![
            ("sampleData".to_string(), self.use_samples.to_string()),
            ("templateName".to_string(), self.template_language.clone()),
        ]
    }
}
