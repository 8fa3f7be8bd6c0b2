//! Document Store - id 기반 설정 문서 저장소
//!
//! 플러그인 설치 문서 같은 작은 JSON 문서를 종류(kind)별로 id 키로 저장합니다.
//! 두 가지 구현이 있습니다:
//! - `FileDocumentStore`: 프로젝트 저장소 (읽기/쓰기, 문서 단위 원자적 쓰기)
//! - `ResourceDocumentStore`: 배포 리소스에 포함된 문서 (읽기 전용)

use super::json::JsonStore;
use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// 문서 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// 플러그인 설치 문서
    Installer,
    /// 프로젝트 설정 문서
    Settings,
}

impl DocumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Installer => "installer",
            Self::Settings => "settings",
        }
    }
}

/// 문서 저장소 trait
///
/// 유일하게 요구되는 보장은 "문서 하나의 쓰기는 원자적"이라는 것입니다.
pub trait DocumentStore: Send + Sync {
    /// 저장소 이름 (로그용)
    fn name(&self) -> &str;

    /// 문서 읽기 (없으면 None)
    fn read(&self, kind: DocumentKind, id: &str) -> Result<Option<Value>>;

    /// 문서 쓰기
    fn write(&self, kind: DocumentKind, id: &str, document: &Value) -> Result<()>;
}

/// 타입 기반 읽기/쓰기 헬퍼
pub trait DocumentStoreExt {
    fn read_as<T: DeserializeOwned>(&self, kind: DocumentKind, id: &str) -> Result<Option<T>>;
    fn write_as<T: Serialize>(&self, kind: DocumentKind, id: &str, document: &T) -> Result<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStoreExt for S {
    fn read_as<T: DeserializeOwned>(&self, kind: DocumentKind, id: &str) -> Result<Option<T>> {
        match self.read(kind, id)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn write_as<T: Serialize>(&self, kind: DocumentKind, id: &str, document: &T) -> Result<()> {
        let value = serde_json::to_value(document)?;
        self.write(kind, id, &value)
    }
}

/// id를 파일명으로 사용할 수 있도록 정리
fn file_name(kind: DocumentKind, id: &str) -> String {
    let safe: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("{}/{}.json", kind.as_str(), safe)
}

// ============================================================================
// FileDocumentStore - 프로젝트 저장소
// ============================================================================

/// 파일 시스템 기반 문서 저장소 (`<base>/<kind>/<id>.json`)
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    store: JsonStore,
}

impl FileDocumentStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(base_dir),
        }
    }
}

impl DocumentStore for FileDocumentStore {
    fn name(&self) -> &str {
        "project"
    }

    fn read(&self, kind: DocumentKind, id: &str) -> Result<Option<Value>> {
        self.store.load_optional(&file_name(kind, id))
    }

    fn write(&self, kind: DocumentKind, id: &str, document: &Value) -> Result<()> {
        self.store
            .save(&file_name(kind, id), document)
            .map_err(|e| Error::persistence(id, e.to_string()))?;
        debug!("Wrote {} document {}", kind.as_str(), id);
        Ok(())
    }
}

// ============================================================================
// ResourceDocumentStore - 배포 리소스 (읽기 전용)
// ============================================================================

/// 빌드 시점 리소스에 포함된 문서 저장소
#[derive(Debug, Clone)]
pub struct ResourceDocumentStore {
    store: JsonStore,
}

impl ResourceDocumentStore {
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self {
            store: JsonStore::new(resource_dir),
        }
    }
}

impl DocumentStore for ResourceDocumentStore {
    fn name(&self) -> &str {
        "resource"
    }

    fn read(&self, kind: DocumentKind, id: &str) -> Result<Option<Value>> {
        self.store.load_optional(&file_name(kind, id))
    }

    fn write(&self, _kind: DocumentKind, id: &str, _document: &Value) -> Result<()> {
        Err(Error::persistence(id, "resource documents are read-only"))
    }
}
