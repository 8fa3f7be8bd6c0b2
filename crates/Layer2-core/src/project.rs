//! Project Files - 프로젝트 의존성/저장소 기술자
//!
//! 빌드 파일 형식은 다루지 않습니다. 대상 모듈(project, cms, site, essentials)마다
//! JSON 기술자 하나를 두고 의존성과 저장소 목록만 관리합니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info};

use essentials_foundation::{JsonStore, Result};

// ============================================================================
// Types
// ============================================================================

/// 의존성이 추가될 대상 모듈
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetPom {
    Project,
    #[default]
    Cms,
    Site,
    Essentials,
}

impl TargetPom {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Cms => "cms",
            Self::Site => "site",
            Self::Essentials => "essentials",
        }
    }
}

/// 프로젝트 의존성
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(default)]
    pub target_pom: TargetPom,
}

impl Dependency {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
            scope: None,
            target_pom: TargetPom::default(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_target(mut self, target: TargetPom) -> Self {
        self.target_pom = target;
        self
    }

    /// `groupId:artifactId`
    pub fn coordinates(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }

    fn same_artifact(&self, other: &Dependency) -> bool {
        self.group_id == other.group_id && self.artifact_id == other.artifact_id
    }
}

/// 아티팩트 저장소
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    pub id: String,
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default = "default_repository_target")]
    pub target_pom: TargetPom,
}

fn default_repository_target() -> TargetPom {
    TargetPom::Project
}

impl Repository {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            name: None,
            target_pom: default_repository_target(),
        }
    }
}

// ============================================================================
// ProjectFileStore
// ============================================================================

/// 프로젝트 파일 협력자
#[async_trait]
pub trait ProjectFileStore: Send + Sync {
    async fn has_dependency(&self, dependency: &Dependency) -> Result<bool>;

    /// 추가 성공 여부 (이미 있으면 true)
    async fn add_dependency(&self, dependency: &Dependency) -> Result<bool>;

    async fn has_repository(&self, repository: &Repository) -> Result<bool>;

    /// 추가 성공 여부 (이미 있으면 true)
    async fn add_repository(&self, repository: &Repository) -> Result<bool>;
}

/// 대상 모듈 기술자 파일 구조
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDescriptor {
    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    #[serde(default)]
    pub repositories: Vec<Repository>,
}

/// JSON 기술자 기반 구현 (`<dir>/<target>.json`)
pub struct JsonProjectFiles {
    store: JsonStore,

    /// 읽기-수정-쓰기 직렬화
    lock: Mutex<()>,
}

impl JsonProjectFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(dir),
            lock: Mutex::new(()),
        }
    }

    fn file_name(target: TargetPom) -> String {
        format!("{}.json", target.as_str())
    }

    /// 대상 모듈 기술자 로드
    pub fn descriptor(&self, target: TargetPom) -> Result<ProjectDescriptor> {
        Ok(self
            .store
            .load_optional(&Self::file_name(target))?
            .unwrap_or_default())
    }

    fn save(&self, target: TargetPom, descriptor: &ProjectDescriptor) -> Result<()> {
        self.store.save(&Self::file_name(target), descriptor)
    }
}

#[async_trait]
impl ProjectFileStore for JsonProjectFiles {
    async fn has_dependency(&self, dependency: &Dependency) -> Result<bool> {
        let descriptor = self.descriptor(dependency.target_pom)?;
        Ok(descriptor
            .dependencies
            .iter()
            .any(|d| d.same_artifact(dependency)))
    }

    async fn add_dependency(&self, dependency: &Dependency) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut descriptor = self.descriptor(dependency.target_pom)?;
        if descriptor
            .dependencies
            .iter()
            .any(|d| d.same_artifact(dependency))
        {
            debug!("Dependency {} already present", dependency.coordinates());
            return Ok(true);
        }

        descriptor.dependencies.push(dependency.clone());
        self.save(dependency.target_pom, &descriptor)?;
        info!(
            "Added dependency {} to {}",
            dependency.coordinates(),
            dependency.target_pom.as_str()
        );
        Ok(true)
    }

    async fn has_repository(&self, repository: &Repository) -> Result<bool> {
        let descriptor = self.descriptor(repository.target_pom)?;
        Ok(descriptor
            .repositories
            .iter()
            .any(|r| r.url == repository.url))
    }

    async fn add_repository(&self, repository: &Repository) -> Result<bool> {
        let _guard = self.lock.lock().await;
        let mut descriptor = self.descriptor(repository.target_pom)?;
        if descriptor
            .repositories
            .iter()
            .any(|r| r.url == repository.url)
        {
            return Ok(true);
        }

        descriptor.repositories.push(repository.clone());
        self.save(repository.target_pom, &descriptor)?;
        info!("Added repository {}", repository.url);
        Ok(true)
    }
}
