//! Config - 통합 설정 관리
//!
//! - `essentials.rs` - EssentialsConfig 통합 설정 + 프로젝트 설정

mod essentials;

pub use essentials::{
    EssentialsConfig, ProjectSettings, CONFIG_FILE, DEFAULT_BEANS_PACKAGE,
    DEFAULT_CATALOG_TTL_MINUTES, DEFAULT_MAX_BEAN_PASSES, DEFAULT_NAMESPACE,
    DEFAULT_SITE_JAVA_ROOT,
};
