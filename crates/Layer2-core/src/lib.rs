//! essentials-core: Core Runtime for Essentials
//!
//! Layer2 - 플러그인 라이프사이클과 콘텐츠 빈 생성
//!
//! # 주요 모듈
//!
//! - `plugin`: 플러그인 발견/설치/설정/재빌드 감지
//! - `beans`: 콘텐츠 타입 기반 Java 빈 생성
//! - `instruction`: 플러그인 설정 작업 (instruction, package, executor)
//! - `content`: 콘텐츠 타입 모델
//! - `repository`: 콘텐츠 저장소 (세션 단위 변경)
//! - `project`: 프로젝트 의존성/저장소 기술자
//!
//! # 사용 예시
//!
//! ```ignore
//! use essentials_core::{PluginManager, SetupParameters};
//!
//! let manager = PluginManager::builder(".").build()?;
//!
//! for plugin in manager.list_plugins().await? {
//!     println!("{} [{}]", plugin.id, plugin.install_state);
//! }
//!
//! manager.install("news").await?;
//! manager.setup("news", &manager.default_parameters()).await?;
//!
//! let report = manager.synthesizer().synthesize("myproject").await?;
//! ```

// Core modules
pub mod beans;
pub mod content;
pub mod instruction;
pub mod plugin;
pub mod project;
pub mod repository;

// Re-exports: Plugin
pub use plugin::{
    AutoSetupReport, InstallState, InstallerDocument, PluginCatalog, PluginDescriptor,
    PluginManager, PluginManagerBuilder, PluginType, SetupParameters, SystemInfo,
};

// Re-exports: Beans
pub use beans::{BeanSynthesizer, ChangeKind, SynthesisReport, SynthesizerSettings};

// Re-exports: Instruction
pub use instruction::{
    DeclarativePackage, Instruction, InstructionContext, InstructionExecutor, InstructionPackage,
    InstructionSpec, InstructionStatus, PackageRegistry,
};

// Re-exports: Content / Repository / Project
pub use content::{ContentTypeDefinition, ContentTypeService};
pub use project::{Dependency, JsonProjectFiles, ProjectFileStore, Repository, TargetPom};
pub use repository::{ContentRepository, NodeData, RepositorySession};
