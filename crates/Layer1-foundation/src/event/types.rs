//! Event Types - 관리 콘솔에 표시되는 진행 메시지

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Event ID
// ============================================================================

/// 이벤트 고유 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub String);

impl EventId {
    /// 새 이벤트 ID 생성
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Display Type
// ============================================================================

/// 메시지 표시 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayType {
    #[default]
    Plain,
    Strong,
    Error,
}

// ============================================================================
// DisplayEvent
// ============================================================================

/// 사람이 읽는 진행 메시지
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayEvent {
    pub id: EventId,

    /// 메시지 본문
    pub message: String,

    /// 메시지를 발생시킨 플러그인 또는 컴포넌트
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default)]
    pub display_type: DisplayType,

    /// true면 로그의 맨 앞에 추가
    #[serde(default)]
    pub add_as_first: bool,

    pub timestamp: DateTime<Utc>,
}

impl DisplayEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            id: EventId::new(),
            message: message.into(),
            source: None,
            display_type: DisplayType::Plain,
            add_as_first: false,
            timestamp: Utc::now(),
        }
    }

    pub fn strong(message: impl Into<String>) -> Self {
        Self::new(message).with_display_type(DisplayType::Strong)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message).with_display_type(DisplayType::Error)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_display_type(mut self, display_type: DisplayType) -> Self {
        self.display_type = display_type;
        self
    }

    pub fn first(mut self) -> Self {
        self.add_as_first = true;
        self
    }
}
