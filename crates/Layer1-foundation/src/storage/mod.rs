//! Storage module for Essentials
//!
//! - `json`: JSON - 범용 파일 저장/로드 (원자적 쓰기)
//! - `document`: id 기반 문서 저장소 (프로젝트 / 리소스)

mod document;
mod json;

// JSON Storage (범용)
pub use json::{JsonStore, PROJECT_DIR};

// Document Storage
pub use document::{
    DocumentKind, DocumentStore, DocumentStoreExt, FileDocumentStore, ResourceDocumentStore,
};
