//! Built-in Instructions
//!
//! - `NodeInstruction`: 노드 트리 복사/삭제
//! - `NamespaceInstruction`: 네임스페이스 등록
//! - `DocumentTypeInstruction`: 문서 타입 등록
//! - `BeanWriterInstruction`: 빈 생성 (세션 기준)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

use essentials_foundation::{Error, Result};

use super::{Instruction, InstructionContext, InstructionStatus};
use crate::content::{
    base_document_type, ChildNodeDefinition, ContentTypeDefinition, PropertyDefinition,
};
use crate::repository::NodeData;

// ============================================================================
// Node
// ============================================================================

/// 선언적 노드 트리
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeSpec {
    pub primary_type: String,

    #[serde(default)]
    pub properties: BTreeMap<String, Value>,

    #[serde(default)]
    pub children: BTreeMap<String, NodeSpec>,
}

impl NodeSpec {
    pub fn new(primary_type: impl Into<String>) -> Self {
        Self {
            primary_type: primary_type.into(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn with_child(mut self, name: impl Into<String>, child: NodeSpec) -> Self {
        self.children.insert(name.into(), child);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeAction {
    #[default]
    Copy,
    Delete,
}

/// 노드 복사/삭제
///
/// 복사 원본은 `node`(선언적 트리) 또는 `source`(기존 경로) 중 하나입니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInstruction {
    #[serde(default)]
    pub action: NodeAction,

    pub target: String,

    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub node: Option<NodeSpec>,

    #[serde(default)]
    pub overwrite: bool,
}

impl NodeInstruction {
    pub fn copy(target: impl Into<String>, node: NodeSpec) -> Self {
        Self {
            action: NodeAction::Copy,
            target: target.into(),
            node: Some(node),
            ..Default::default()
        }
    }

    pub fn copy_from(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            action: NodeAction::Copy,
            target: target.into(),
            source: Some(source.into()),
            ..Default::default()
        }
    }

    pub fn delete(target: impl Into<String>) -> Self {
        Self {
            action: NodeAction::Delete,
            target: target.into(),
            ..Default::default()
        }
    }

    pub fn overwriting(mut self) -> Self {
        self.overwrite = true;
        self
    }

    fn insert_tree(ctx: &mut InstructionContext, path: &str, spec: &NodeSpec) -> usize {
        let mut node = NodeData::new(ctx.interpolate(&spec.primary_type));
        for (name, value) in &spec.properties {
            node.properties
                .insert(name.clone(), interpolate_value(ctx, value));
        }
        ctx.session_mut().add_node(path, node);

        let mut count = 1;
        for (name, child) in &spec.children {
            let child_path = format!("{}/{}", path, ctx.interpolate(name));
            count += Self::insert_tree(ctx, &child_path, child);
        }
        count
    }
}

fn interpolate_value(ctx: &InstructionContext, value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(ctx.interpolate(s)),
        Value::Array(items) => Value::Array(items.iter().map(|v| interpolate_value(ctx, v)).collect()),
        other => other.clone(),
    }
}

#[async_trait]
impl Instruction for NodeInstruction {
    fn name(&self) -> &str {
        "node"
    }

    fn describe(&self, ctx: &InstructionContext) -> String {
        let target = ctx.interpolate(&self.target);
        match (self.action, &self.source) {
            (NodeAction::Delete, _) => format!("Delete node {}", target),
            (NodeAction::Copy, Some(source)) => {
                format!("Copy node {} to {}", ctx.interpolate(source), target)
            }
            (NodeAction::Copy, None) => format!("Add node {}", target),
        }
    }

    async fn execute(&self, ctx: &mut InstructionContext) -> Result<InstructionStatus> {
        let target = ctx.interpolate(&self.target);

        if self.action == NodeAction::Delete {
            let removed = ctx.session_mut().remove_subtree(&target);
            if removed == 0 {
                debug!("Node {} not present, nothing to delete", target);
                return Ok(InstructionStatus::Skipped);
            }
            info!("Deleted {} node(s) under {}", removed, target);
            return Ok(InstructionStatus::Success);
        }

        if ctx.session().node_exists(&target) {
            if !self.overwrite {
                debug!("Node {} already exists, skipping", target);
                return Ok(InstructionStatus::Skipped);
            }
            ctx.session_mut().remove_subtree(&target);
        }

        let count = match (&self.node, &self.source) {
            (Some(spec), _) => Self::insert_tree(ctx, &target, spec),
            (None, Some(source)) => {
                let source = ctx.interpolate(source);
                match ctx.session_mut().copy_subtree(&source, &target) {
                    Ok(count) => count,
                    Err(Error::NotFound(what)) => {
                        warn!("Cannot copy to {}: {} not found", target, what);
                        return Ok(InstructionStatus::Failed);
                    }
                    Err(e) => return Err(e),
                }
            }
            (None, None) => {
                return Err(Error::InvalidInput(format!(
                    "node instruction for {} has neither node nor source",
                    target
                )))
            }
        };

        info!("Added {} node(s) at {}", count, target);
        Ok(InstructionStatus::Success)
    }
}

// ============================================================================
// Namespace
// ============================================================================

/// 네임스페이스 등록 (이미 있으면 FAILED)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamespaceInstruction {
    pub prefix: String,
    pub uri: String,
}

impl NamespaceInstruction {
    pub fn new(prefix: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            uri: uri.into(),
        }
    }
}

#[async_trait]
impl Instruction for NamespaceInstruction {
    fn name(&self) -> &str {
        "namespace"
    }

    fn describe(&self, ctx: &InstructionContext) -> String {
        format!(
            "Register namespace {} ({})",
            ctx.interpolate(&self.prefix),
            ctx.interpolate(&self.uri)
        )
    }

    async fn execute(&self, ctx: &mut InstructionContext) -> Result<InstructionStatus> {
        let prefix = ctx.interpolate(&self.prefix);
        let uri = ctx.interpolate(&self.uri);

        if ctx.session().namespace_uri(&prefix).is_some() {
            warn!("Namespace {} is already registered", prefix);
            return Ok(InstructionStatus::Failed);
        }

        ctx.session_mut().register_namespace(&prefix, &uri)?;
        info!("Registered namespace {} -> {}", prefix, uri);
        Ok(InstructionStatus::Success)
    }
}

// ============================================================================
// Document type
// ============================================================================

/// 문서 타입 등록
///
/// `name`에 prefix가 없으면 프로젝트 네임스페이스를 붙이고,
/// `supertype`이 없으면 `<ns>:basedocument`를 상속합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTypeInstruction {
    pub name: String,

    #[serde(default)]
    pub supertype: Option<String>,

    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,

    #[serde(default)]
    pub children: Vec<ChildNodeDefinition>,
}

impl DocumentTypeInstruction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertype: None,
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertype = Some(supertype.into());
        self
    }

    pub fn with_property(
        mut self,
        name: impl Into<String>,
        type_name: impl Into<String>,
        multiple: bool,
    ) -> Self {
        self.properties.push(PropertyDefinition {
            name: name.into(),
            type_name: type_name.into(),
            multiple,
        });
        self
    }

    pub fn with_child(
        mut self,
        name: impl Into<String>,
        node_type: impl Into<String>,
        multiple: bool,
    ) -> Self {
        self.children.push(ChildNodeDefinition {
            name: name.into(),
            node_type: node_type.into(),
            multiple,
        });
        self
    }

    fn qualify(ctx: &InstructionContext, name: &str) -> String {
        let name = ctx.interpolate(name);
        if name.contains(':') {
            name
        } else {
            format!("{}:{}", ctx.namespace(), name)
        }
    }

    fn definition(&self, ctx: &InstructionContext) -> ContentTypeDefinition {
        let supertype = match &self.supertype {
            Some(s) => ctx.interpolate(s),
            None => base_document_type(ctx.namespace()),
        };
        let mut definition =
            ContentTypeDefinition::new(Self::qualify(ctx, &self.name)).with_supertype(supertype);

        for p in &self.properties {
            definition.properties.push(PropertyDefinition {
                name: Self::qualify(ctx, &p.name),
                type_name: p.type_name.clone(),
                multiple: p.multiple,
            });
        }
        for c in &self.children {
            definition.children.push(ChildNodeDefinition {
                name: Self::qualify(ctx, &c.name),
                node_type: ctx.interpolate(&c.node_type),
                multiple: c.multiple,
            });
        }
        definition
    }
}

#[async_trait]
impl Instruction for DocumentTypeInstruction {
    fn name(&self) -> &str {
        "documentType"
    }

    fn describe(&self, ctx: &InstructionContext) -> String {
        format!("Create document type {}", Self::qualify(ctx, &self.name))
    }

    async fn execute(&self, ctx: &mut InstructionContext) -> Result<InstructionStatus> {
        let definition = self.definition(ctx);

        if ctx.session().content_type(&definition.name).is_some() {
            warn!("Document type {} already exists", definition.name);
            return Ok(InstructionStatus::Failed);
        }

        let name = definition.name.clone();
        ctx.session_mut().register_content_type(definition)?;
        info!("Registered document type {}", name);
        Ok(InstructionStatus::Success)
    }
}

// ============================================================================
// Bean writer
// ============================================================================

/// 세션에 보이는 타입 기준으로 빈 생성
///
/// `imageSet`이 주어지면 생성 후 이미지 접근자를 해당 네임스페이스로 변환합니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanWriterInstruction {
    #[serde(default)]
    pub image_set: Option<String>,
}

impl BeanWriterInstruction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image_set(mut self, namespace: impl Into<String>) -> Self {
        self.image_set = Some(namespace.into());
        self
    }
}

#[async_trait]
impl Instruction for BeanWriterInstruction {
    fn name(&self) -> &str {
        "beanWriter"
    }

    fn describe(&self, ctx: &InstructionContext) -> String {
        match &self.image_set {
            Some(ns) => format!(
                "Generate content beans for {} (image set {})",
                ctx.namespace(),
                ctx.interpolate(ns)
            ),
            None => format!("Generate content beans for {}", ctx.namespace()),
        }
    }

    async fn execute(&self, ctx: &mut InstructionContext) -> Result<InstructionStatus> {
        let Some(synthesizer) = ctx.synthesizer().cloned() else {
            warn!("No bean synthesizer configured, skipping bean generation");
            return Ok(InstructionStatus::Skipped);
        };

        let report = synthesizer
            .synthesize_from(ctx.session(), ctx.namespace())
            .await?;
        let mut changed = report.has_changes();

        if let Some(ns) = &self.image_set {
            let converted = synthesizer
                .convert_image_methods(&ctx.interpolate(ns))
                .await?;
            changed |= converted.has_changes();
        }

        if changed {
            Ok(InstructionStatus::Success)
        } else {
            Ok(InstructionStatus::Skipped)
        }
    }
}
