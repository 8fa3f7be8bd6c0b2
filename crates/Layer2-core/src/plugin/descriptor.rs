//! Plugin Descriptor - 카탈로그에 기술된 플러그인 정보

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::state::InstallState;
use crate::project::{Dependency, Repository};

/// 플러그인 종류
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PluginType {
    Tool,
    #[default]
    Feature,
}

impl fmt::Display for PluginType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tool => write!(f, "tool"),
            Self::Feature => write!(f, "feature"),
        }
    }
}

/// 플러그인 기술자
///
/// `install_state`, `date_installed`는 목록 조회 시 계산되는 값입니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub plugin_type: PluginType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub dependencies: Vec<Dependency>,

    #[serde(default)]
    pub repositories: Vec<Repository>,

    /// 설정 instruction 패키지 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,

    /// 파라미터 없이 자동 설정 가능한지
    #[serde(default)]
    pub generalized_setup: bool,

    /// 설정 시 사용자 파라미터를 묻는지
    #[serde(default)]
    pub setup_parameters: bool,

    /// 설정 후 재빌드가 필요한지
    #[serde(default)]
    pub setup_requires_rebuild: bool,

    /// 설치 후 설정 화면이 있는지
    #[serde(default)]
    pub has_configuration: bool,

    #[serde(default)]
    pub install_state: InstallState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_installed: Option<DateTime<Utc>>,
}

impl PluginDescriptor {
    pub fn new(id: impl Into<String>, plugin_type: PluginType) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            plugin_type,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn with_repository(mut self, repository: Repository) -> Self {
        self.repositories.push(repository);
        self
    }

    pub fn with_package(mut self, package_id: impl Into<String>) -> Self {
        self.package_id = Some(package_id.into());
        self
    }

    pub fn with_generalized_setup(mut self, generalized: bool) -> Self {
        self.generalized_setup = generalized;
        self
    }

    pub fn with_setup_parameters(mut self, asks: bool) -> Self {
        self.setup_parameters = asks;
        self
    }

    pub fn with_rebuild_after_setup(mut self, requires_rebuild: bool) -> Self {
        self.setup_requires_rebuild = requires_rebuild;
        self
    }

    pub fn with_configuration(mut self, has_configuration: bool) -> Self {
        self.has_configuration = has_configuration;
        self
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    pub fn is_tool(&self) -> bool {
        self.plugin_type == PluginType::Tool
    }

    pub fn has_setup_package(&self) -> bool {
        self.package_id.is_some()
    }

    /// 프로젝트 파일 변경이 필요 없는 플러그인 (재빌드 없이 바로 사용 가능)
    pub fn is_packaged(&self) -> bool {
        self.dependencies.is_empty() && self.repositories.is_empty()
    }
}
