//! Instruction Executor
//!
//! instruction을 순서대로 실행하고, 첫 FAILED 또는 에러에서 중단합니다.

use serde::Serialize;
use tracing::{debug, warn};

use essentials_foundation::{Error, Result};

use super::{Instruction, InstructionContext, InstructionStatus};

/// 개별 instruction 결과
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionOutcome {
    pub instruction: String,
    pub description: String,
    pub status: InstructionStatus,
}

/// 실행 결과
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionReport {
    pub status: InstructionStatus,
    pub outcomes: Vec<InstructionOutcome>,
}

impl ExecutionReport {
    pub fn failed(&self) -> Option<&InstructionOutcome> {
        self.outcomes.iter().find(|o| o.status.is_failed())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InstructionExecutor;

impl InstructionExecutor {
    pub fn new() -> Self {
        Self
    }

    pub async fn execute(
        &self,
        instructions: &[Box<dyn Instruction>],
        ctx: &mut InstructionContext,
    ) -> Result<ExecutionReport> {
        let mut outcomes = Vec::with_capacity(instructions.len());

        for instruction in instructions {
            let description = instruction.describe(ctx);
            debug!("Executing instruction: {}", description);

            let status = instruction.execute(ctx).await.map_err(|e| {
                Error::instruction_failed(ctx.plugin_id(), instruction.name(), e.to_string())
            })?;

            outcomes.push(InstructionOutcome {
                instruction: instruction.name().to_string(),
                description,
                status,
            });

            if status.is_failed() {
                warn!(
                    "Instruction {} failed for plugin {}, stopping",
                    instruction.name(),
                    ctx.plugin_id()
                );
                break;
            }
        }

        let status = InstructionStatus::combine(outcomes.iter().map(|o| o.status));
        Ok(ExecutionReport { status, outcomes })
    }

    /// 실행 없이 설명만 수집
    pub fn preview(
        &self,
        instructions: &[Box<dyn Instruction>],
        ctx: &InstructionContext,
    ) -> Vec<String> {
        instructions.iter().map(|i| i.describe(ctx)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::builtin::{NamespaceInstruction, NodeInstruction, NodeSpec};
    use crate::repository::ContentRepository;

    #[tokio::test]
    async fn test_stops_at_first_failure() {
        let repo = ContentRepository::in_memory();
        let mut ctx = InstructionContext::new("news", "acme", repo.session());
        let instructions: Vec<Box<dyn Instruction>> = vec![
            Box::new(NamespaceInstruction::new("acme", "http://acme/1.0")),
            Box::new(NamespaceInstruction::new("acme", "http://acme/1.0")),
            Box::new(NodeInstruction::copy("/content/acme", NodeSpec::new("hippostd:folder"))),
        ];

        let report = InstructionExecutor::new()
            .execute(&instructions, &mut ctx)
            .await
            .unwrap();

        assert_eq!(report.status, InstructionStatus::Failed);
        assert_eq!(report.outcomes.len(), 2);
        assert!(!ctx.session().node_exists("/content/acme"));
    }

    #[tokio::test]
    async fn test_error_becomes_instruction_failure() {
        let repo = ContentRepository::in_memory();
        let mut ctx = InstructionContext::new("news", "acme", repo.session());
        let instructions: Vec<Box<dyn Instruction>> =
            vec![Box::new(NodeInstruction::default())];

        let err = InstructionExecutor::new()
            .execute(&instructions, &mut ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InstructionFailed { .. }));
    }

    #[test]
    fn test_preview() {
        let repo = ContentRepository::in_memory();
        let ctx = InstructionContext::new("news", "acme", repo.session());
        let instructions: Vec<Box<dyn Instruction>> =
            vec![Box::new(NodeInstruction::delete("/content/{{namespace}}/tmp"))];
        assert_eq!(
            InstructionExecutor::new().preview(&instructions, &ctx),
            vec!["Delete node /content/acme/tmp".to_string()]
        );
    }
}
