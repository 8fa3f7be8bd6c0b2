//! Install State - 플러그인 설치 상태와 설치 문서
//!
//! 설치 문서는 두 벌이 존재합니다:
//! - resource: 빌드 시점에 배포물에 포함된 복사본 (읽기 전용)
//! - project: 실행 중 갱신되는 복사본
//!
//! 두 복사본이 같은 재빌드 표식(`boarding`/`installing`)을 가지면
//! 재빌드가 끝난 것으로 보고 project 복사본을 다음 상태로 진행시킵니다.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// "최근 설치" 표시 기간 (일)
pub const RECENT_INSTALL_DAYS: i64 = 7;

/// 설치 상태
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallState {
    #[default]
    Discovered,
    Boarding,
    Installing,
    Installed,
    Onboard,
}

impl InstallState {
    /// 정방향 전이 가능 여부
    pub fn can_advance_to(self, next: InstallState) -> bool {
        use InstallState::*;
        matches!(
            (self, next),
            (Discovered, Boarding | Onboard | Installed)
                | (Boarding, Onboard | Installed)
                | (Onboard, Installing | Installed)
                | (Installing, Installed)
        )
    }

    /// 재빌드 대기 상태
    pub fn awaits_rebuild(self) -> bool {
        matches!(self, Self::Boarding | Self::Installing)
    }

    /// 프로젝트 파일 변경이 끝난(packaged) 이후 상태
    pub fn after_packaged(has_setup_package: bool) -> Self {
        if has_setup_package {
            Self::Onboard
        } else {
            Self::Installed
        }
    }

    /// 설정 화면 노출 가능 상태
    pub fn exposes_configuration(self) -> bool {
        matches!(self, Self::Onboard | Self::Installing | Self::Installed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Boarding => "boarding",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Onboard => "onboard",
        }
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// InstallerDocument
// ============================================================================

/// 플러그인 설치 문서
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallerDocument {
    pub id: String,

    pub installation_state: InstallState,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_installed: Option<DateTime<Utc>>,
}

impl InstallerDocument {
    pub fn new(id: impl Into<String>, state: InstallState) -> Self {
        Self {
            id: id.into(),
            installation_state: state,
            date_added: None,
            date_installed: None,
        }
    }

    /// 방금 설치된 문서
    pub fn installed_now(id: impl Into<String>, state: InstallState) -> Self {
        Self {
            date_installed: Some(Utc::now()),
            ..Self::new(id, state)
        }
    }

    /// 최근 7일 이내 설치된 경우의 설치 시각
    pub fn recent_install_date(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.date_installed
            .filter(|installed| now - *installed <= Duration::days(RECENT_INSTALL_DAYS))
    }
}

/// resource/project 문서를 비교해 현재 project 문서를 계산
///
/// 반환값: (현재 문서, project 문서를 다시 써야 하는지). 문서가 없으면 `None`.
pub fn reconcile(
    resource: Option<&InstallerDocument>,
    project: Option<InstallerDocument>,
    has_setup_package: bool,
) -> Option<(InstallerDocument, bool)> {
    let mut document = project?;
    let resource_state = resource.map(|r| r.installation_state);

    let advanced = match (document.installation_state, resource_state) {
        (InstallState::Boarding, Some(InstallState::Boarding)) => {
            Some(InstallState::after_packaged(has_setup_package))
        }
        (InstallState::Installing, Some(InstallState::Installing)) => Some(InstallState::Installed),
        _ => None,
    };

    match advanced {
        Some(next) => {
            document.installation_state = next;
            Some((document, true))
        }
        None => Some((document, false)),
    }
}
