//! Instruction 선언 (JSON)
//!
//! ```json
//! { "type": "namespace", "prefix": "{{namespace}}", "uri": "http://..." }
//! ```

use serde::{Deserialize, Serialize};

use super::builtin::{
    BeanWriterInstruction, DocumentTypeInstruction, NamespaceInstruction, NodeInstruction,
};
use super::Instruction;

/// 직렬화 가능한 instruction 선언
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InstructionSpec {
    Node(NodeInstruction),
    Namespace(NamespaceInstruction),
    DocumentType(DocumentTypeInstruction),
    BeanWriter(BeanWriterInstruction),
}

impl InstructionSpec {
    pub fn into_instruction(self) -> Box<dyn Instruction> {
        match self {
            Self::Node(i) => Box::new(i),
            Self::Namespace(i) => Box::new(i),
            Self::DocumentType(i) => Box::new(i),
            Self::BeanWriter(i) => Box::new(i),
        }
    }
}

impl From<NodeInstruction> for InstructionSpec {
    fn from(i: NodeInstruction) -> Self {
        Self::Node(i)
    }
}

impl From<NamespaceInstruction> for InstructionSpec {
    fn from(i: NamespaceInstruction) -> Self {
        Self::Namespace(i)
    }
}

impl From<DocumentTypeInstruction> for InstructionSpec {
    fn from(i: DocumentTypeInstruction) -> Self {
        Self::DocumentType(i)
    }
}

impl From<BeanWriterInstruction> for InstructionSpec {
    fn from(i: BeanWriterInstruction) -> Self {
        Self::BeanWriter(i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_declarations() {
        let specs: Vec<InstructionSpec> = serde_json::from_value(json!([
            { "type": "namespace", "prefix": "{{namespace}}", "uri": "http://acme.org/nt/1.0" },
            { "type": "documentType", "name": "event", "properties": [
                { "name": "title", "type": "String" }
            ] },
            { "type": "node", "target": "/content/{{namespace}}/events",
              "node": { "primaryType": "hippostd:folder" } },
            { "type": "node", "action": "delete", "target": "/content/tmp" },
            { "type": "beanWriter" }
        ]))
        .unwrap();

        assert_eq!(specs.len(), 5);
        let names: Vec<String> = specs
            .into_iter()
            .map(|s| s.into_instruction().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["namespace", "documentType", "node", "node", "beanWriter"]
        );
    }
}
