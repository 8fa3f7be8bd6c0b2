//! Instructions - 플러그인 설정 작업
//!
//! - `Instruction`: 단일 작업 (노드, 네임스페이스, 문서 타입, 빈 생성)
//! - `InstructionPackage`: 작업 묶음
//! - `InstructionExecutor`: 순차 실행

pub mod builtin;
pub mod context;
pub mod executor;
pub mod package;
pub mod spec;
pub mod status;

use async_trait::async_trait;

use essentials_foundation::Result;

pub use builtin::{
    BeanWriterInstruction, DocumentTypeInstruction, NamespaceInstruction, NodeAction,
    NodeInstruction, NodeSpec,
};
pub use context::InstructionContext;
pub use executor::{ExecutionReport, InstructionExecutor, InstructionOutcome};
pub use package::{
    DeclarativePackage, InstructionPackage, PackageRegistry, COMMON_PACKAGE_ID, PACKAGE_DIR,
};
pub use spec::InstructionSpec;
pub use status::InstructionStatus;

// ============================================================================
// Instruction Trait
// ============================================================================

/// 설정 작업 하나
#[async_trait]
pub trait Instruction: Send + Sync {
    /// 작업 종류 이름
    fn name(&self) -> &str;

    /// 사람이 읽을 수 있는 변경 설명 (미리보기용)
    fn describe(&self, ctx: &InstructionContext) -> String;

    /// 세션에 변경 적용
    async fn execute(&self, ctx: &mut InstructionContext) -> Result<InstructionStatus>;
}
