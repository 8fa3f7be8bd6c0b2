//! Instruction Packages
//!
//! 플러그인 하나의 설정 작업 묶음. `common` 패키지는 모든 설정 전에 먼저 실행됩니다.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use essentials_foundation::{Error, Result};

use super::spec::InstructionSpec;
use super::Instruction;

/// 모든 설정에 앞서 실행되는 패키지 ID
pub const COMMON_PACKAGE_ID: &str = "common";

/// 리소스 디렉토리 아래 패키지 파일 위치
pub const PACKAGE_DIR: &str = "packages";

/// Instruction 패키지
pub trait InstructionPackage: Send + Sync {
    fn id(&self) -> &str;

    /// 실행할 instruction 목록 (호출마다 새로 생성)
    fn instructions(&self) -> Vec<Box<dyn Instruction>>;

    /// 설정 후 재빌드가 필요한지
    fn requires_rebuild(&self) -> bool {
        false
    }
}

// ============================================================================
// DeclarativePackage
// ============================================================================

/// JSON으로 선언된 패키지
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarativePackage {
    pub id: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub requires_rebuild: bool,

    #[serde(default)]
    pub instructions: Vec<InstructionSpec>,
}

impl DeclarativePackage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: None,
            requires_rebuild: false,
            instructions: Vec::new(),
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<InstructionSpec>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    pub fn with_rebuild(mut self, requires_rebuild: bool) -> Self {
        self.requires_rebuild = requires_rebuild;
        self
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::InvalidInput(format!("invalid package file {}: {}", path.display(), e))
        })
    }
}

impl InstructionPackage for DeclarativePackage {
    fn id(&self) -> &str {
        &self.id
    }

    fn instructions(&self) -> Vec<Box<dyn Instruction>> {
        self.instructions
            .iter()
            .cloned()
            .map(InstructionSpec::into_instruction)
            .collect()
    }

    fn requires_rebuild(&self) -> bool {
        self.requires_rebuild
    }
}

// ============================================================================
// PackageRegistry
// ============================================================================

/// 패키지 ID → 패키지
#[derive(Default)]
pub struct PackageRegistry {
    packages: RwLock<HashMap<String, Arc<dyn InstructionPackage>>>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 디렉토리의 `*.json` 패키지 로드 (잘못된 파일은 경고 후 건너뜀)
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let registry = Self::new();
        let dir = dir.as_ref();
        if !dir.exists() {
            debug!("Package directory {} does not exist", dir.display());
            return Ok(registry);
        }

        let pattern = dir.join("*.json");
        let pattern = pattern.to_string_lossy();
        let entries =
            glob::glob(&pattern).map_err(|e| Error::InvalidInput(format!("glob: {}", e)))?;

        for entry in entries.flatten() {
            match DeclarativePackage::from_file(&entry) {
                Ok(package) => registry.register(Arc::new(package)),
                Err(e) => warn!("Skipping package {}: {}", entry.display(), e),
            }
        }
        debug!("Loaded {} instruction package(s)", registry.len());
        Ok(registry)
    }

    pub fn register(&self, package: Arc<dyn InstructionPackage>) {
        self.packages
            .write()
            .insert(package.id().to_string(), package);
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn InstructionPackage>> {
        self.packages.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.packages.read().contains_key(id)
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.packages.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.packages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.read().is_empty()
    }
}
