//! Instruction 실행 상태

use serde::{Deserialize, Serialize};
use std::fmt;

/// Instruction 실행 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InstructionStatus {
    Success,
    Skipped,
    Failed,
}

impl InstructionStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }

    /// 여러 결과의 종합: 하나라도 실패면 FAILED, 하나라도 성공이면 SUCCESS, 그 외 SKIPPED
    pub fn combine<I: IntoIterator<Item = InstructionStatus>>(statuses: I) -> Self {
        let mut overall = Self::Skipped;
        for status in statuses {
            match status {
                Self::Failed => return Self::Failed,
                Self::Success => overall = Self::Success,
                Self::Skipped => {}
            }
        }
        overall
    }
}

impl fmt::Display for InstructionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "SUCCESS",
            Self::Skipped => "SKIPPED",
            Self::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}
