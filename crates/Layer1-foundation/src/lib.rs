//! # essentials-foundation
//!
//! Foundation layer for Essentials:
//! - Error: 공통 에러 타입 (Error, Result)
//! - Storage: JsonStore (범용), DocumentStore (설치 상태 문서)
//! - Event: 진행 메시지 로그 (DisplayEvent)
//! - Cache: TTL 캐시 (원격 카탈로그)
//! - Config: 통합 설정 (EssentialsConfig, ProjectSettings)
//!
//! ## 아키텍처
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  essentials-cli                                          │
//! │                     │                                   │
//! │                     ▼                                   │
//! │  essentials-core (plugin / instruction / beans)         │
//! │                     │                                   │
//! │          ┌─────────┴─────────┐                         │
//! │          ▼                   ▼                         │
//! │   DocumentStore        EventLog / TtlCache             │
//! │   (installer state)    (messages / catalogs)           │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod event;
pub mod storage;

// ============================================================================
// Error
// ============================================================================
pub use error::{Error, Result};

// ============================================================================
// Config (설정)
// ============================================================================
pub use config::{EssentialsConfig, ProjectSettings, CONFIG_FILE};

// ============================================================================
// Storage (저장소)
// ============================================================================
pub use storage::{
    DocumentKind, DocumentStore, DocumentStoreExt, FileDocumentStore, JsonStore,
    ResourceDocumentStore, PROJECT_DIR,
};

// ============================================================================
// Event (진행 메시지)
// ============================================================================
pub use event::{global_event_log, DisplayEvent, DisplayType, EventId, EventLog};

// ============================================================================
// Cache (캐시)
// ============================================================================
pub use cache::{TtlCache, TtlCacheStats};
