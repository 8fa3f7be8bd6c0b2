//! # Plugin Lifecycle
//!
//! 플러그인 발견, 설치, 설정, 재빌드 감지
//!
//! ## 아키텍처
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       PluginManager                        │
//! │  ┌──────────────┐  ┌────────────────┐  ┌────────────────┐  │
//! │  │ PluginCatalog│  │ DocumentStore  │  │ PackageRegistry│  │
//! │  │ local/remote │  │ resource/proj. │  │ + Executor     │  │
//! │  └──────────────┘  └────────────────┘  └────────────────┘  │
//! │        setup gate (install/setup/auto_setup)               │
//! │        ping gate  (system_status)                          │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 설치 상태
//!
//! `discovered → boarding → onboard → installing → installed` (정방향만 허용,
//! 재설치만 예외). `boarding`/`installing`은 재빌드 대기 상태입니다.

pub mod catalog;
pub mod descriptor;
pub mod gate;
pub mod manager;
pub mod state;

pub use catalog::{
    CatalogFetcher, HttpCatalogFetcher, PluginCatalog, RemoteCatalogCache, LOCAL_CATALOG_FILE,
};
pub use descriptor::{PluginDescriptor, PluginType};
pub use gate::ExclusiveGate;
pub use manager::{
    AutoSetupFailure, AutoSetupReport, PluginManager, PluginManagerBuilder, SetupParameters,
    SystemInfo,
};
pub use state::{reconcile, InstallState, InstallerDocument, RECENT_INSTALL_DAYS};
