//! Error types for Essentials
//!
//! 모든 에러를 중앙에서 관리

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Essentials 에러 타입
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // 설정 관련
    // ========================================================================
    #[error("Configuration error: {0}")]
    Config(String),

    // ========================================================================
    // 저장소 관련
    // ========================================================================
    #[error("Storage error: {0}")]
    Storage(String),

    /// 문서 쓰기 실패 - 디스크 상태는 쓰기 이전 값 그대로 유지됨
    #[error("Persistence write failed for {id}: {message}")]
    Persistence { id: String, message: String },

    #[error("Repository access error: {0}")]
    RepositoryAccess(String),

    // ========================================================================
    // 플러그인 관련
    // ========================================================================
    #[error("Remote catalog unavailable: {url} - {message}")]
    RemoteCatalogUnavailable { url: String, message: String },

    #[error(
        "Dependency installation failed for {plugin}: dependencies [{}], repositories [{}]",
        .dependencies.join(", "),
        .repositories.join(", ")
    )]
    DependencyInstallation {
        plugin: String,
        dependencies: Vec<String>,
        repositories: Vec<String>,
    },

    #[error("Instruction execution failed for {plugin}: {instruction} - {message}")]
    InstructionFailed {
        plugin: String,
        instruction: String,
        message: String,
    },

    #[error("Invalid state for {id}: {message}")]
    InvalidState { id: String, message: String },

    // ========================================================================
    // 빈 생성 관련
    // ========================================================================
    #[error("Unresolved parent type for {content_type}: supertypes [{}]", .supertypes.join(", "))]
    UnresolvedParentType {
        content_type: String,
        supertypes: Vec<String>,
    },

    #[error("Unmapped type {type_name} for {property} in {content_type}")]
    UnmappedPropertyType {
        content_type: String,
        property: String,
        type_name: String,
    },

    // ========================================================================
    // 일반
    // ========================================================================
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ========================================================================
    // 외부 에러 변환
    // ========================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    // ========================================================================
    // 기타
    // ========================================================================
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// 재시도 가능한 에러인지 확인
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::RemoteCatalogUnavailable { .. } | Error::Http(_)
        )
    }

    /// 사용자에게 보여줄 수 있는 에러인지 확인
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::InvalidInput(_)
                | Error::InvalidState { .. }
                | Error::DependencyInstallation { .. }
                | Error::InstructionFailed { .. }
                | Error::UnresolvedParentType { .. }
                | Error::UnmappedPropertyType { .. }
        )
    }

    /// 원격 카탈로그 에러 생성 헬퍼
    pub fn remote_catalog(url: impl Into<String>, message: impl Into<String>) -> Self {
        Error::RemoteCatalogUnavailable {
            url: url.into(),
            message: message.into(),
        }
    }

    /// 영속화 에러 생성 헬퍼
    pub fn persistence(id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Persistence {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Instruction 실행 에러 생성 헬퍼
    pub fn instruction_failed(
        plugin: impl Into<String>,
        instruction: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Error::InstructionFailed {
            plugin: plugin.into(),
            instruction: instruction.into(),
            message: message.into(),
        }
    }

    /// 상태 에러 생성 헬퍼
    pub fn invalid_state(id: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidState {
            id: id.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// From 구현 (추가 변환)
// ============================================================================

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Internal(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Internal(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_installation_message() {
        let err = Error::DependencyInstallation {
            plugin: "news".to_string(),
            dependencies: vec!["org.example:news".to_string(), "org.example:tags".to_string()],
            repositories: vec![],
        };

        let msg = err.to_string();
        assert!(msg.contains("news"));
        assert!(msg.contains("org.example:news, org.example:tags"));
        assert!(err.is_user_facing());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_remote_catalog_is_retryable() {
        let err = Error::remote_catalog("https://example.com/plugins.json", "timeout");
        assert!(err.is_retryable());
        assert!(err.to_string().contains("timeout"));
    }
}
