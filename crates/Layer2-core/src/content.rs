//! Content Type Model - 콘텐츠 타입 정의 (읽기 전용 입력)
//!
//! 저장소의 타입 시스템을 표현합니다. 빈 생성기와 Instruction이 읽기만 하며,
//! 실제 소유자는 `ContentTypeService` 구현체입니다.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use essentials_foundation::Result;

/// 모든 compound 타입의 기본 supertype
pub const BASE_COMPOUND_TYPE: &str = "hippo:compound";

/// 이미지셋 타입이 상속하는 supertype
pub const RELAXED_IMAGE_TYPE: &str = "hippogallery:relaxed";

/// `prefix:name` 에서 prefix 부분
pub fn prefix_of(type_name: &str) -> &str {
    type_name.split_once(':').map(|(p, _)| p).unwrap_or("")
}

/// `prefix:name` 에서 name 부분
pub fn local_name(type_name: &str) -> &str {
    type_name.split_once(':').map(|(_, n)| n).unwrap_or(type_name)
}

/// 프로젝트 기본 문서 타입 (`<ns>:basedocument`)
pub fn base_document_type(namespace: &str) -> String {
    format!("{}:basedocument", namespace)
}

// ============================================================================
// Definitions
// ============================================================================

/// 스칼라 속성 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDefinition {
    pub name: String,

    /// 스칼라 타입 (String, Html, Date, Boolean, Long, Double ...)
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub multiple: bool,
}

/// 자식 노드 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildNodeDefinition {
    pub name: String,

    /// 노드 타입 (hippostd:html, hippogallerypicker:imagelink ...)
    pub node_type: String,

    #[serde(default)]
    pub multiple: bool,
}

impl ChildNodeDefinition {
    pub fn prefix(&self) -> &str {
        prefix_of(&self.node_type)
    }
}

/// 콘텐츠 타입 정의
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeDefinition {
    /// 타입 이름 (`prefix:name`)
    pub name: String,

    #[serde(default)]
    pub supertypes: BTreeSet<String>,

    #[serde(default)]
    pub properties: Vec<PropertyDefinition>,

    #[serde(default)]
    pub children: Vec<ChildNodeDefinition>,
}

impl ContentTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            supertypes: BTreeSet::new(),
            properties: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.insert(supertype.into());
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

    pub fn prefix(&self) -> &str {
        prefix_of(&self.name)
    }

    /// supertype이 정확히 하나이고 주어진 값과 같은지
    pub fn has_sole_supertype(&self, supertype: &str) -> bool {
        self.supertypes.len() == 1 && self.supertypes.contains(supertype)
    }
}

// ============================================================================
// ContentTypeService
// ============================================================================

/// 콘텐츠 타입 조회 서비스
///
/// 저장소 세션을 사용할 수 없으면 `Error::RepositoryAccess` 로 실패합니다.
#[async_trait]
pub trait ContentTypeService: Send + Sync {
    /// 네임스페이스의 타입 이름 → 정의
    async fn types_by_namespace(
        &self,
        prefix: &str,
    ) -> Result<BTreeMap<String, ContentTypeDefinition>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(prefix_of("myproject:news"), "myproject");
        assert_eq!(local_name("myproject:news"), "news");
        assert_eq!(local_name("plain"), "plain");
        assert_eq!(base_document_type("acme"), "acme:basedocument");
    }

    #[test]
    fn test_sole_supertype() {
        let def = ContentTypeDefinition::new("acme:link").with_supertype(BASE_COMPOUND_TYPE);
        assert!(def.has_sole_supertype(BASE_COMPOUND_TYPE));

        let def = def.with_supertype("hippostd:relaxed");
        assert!(!def.has_sole_supertype(BASE_COMPOUND_TYPE));
    }

    #[test]
    fn test_deserialize_definition() {
        let json = r#"{
            "name": "acme:news",
            "supertypes": ["acme:basedocument"],
            "properties": [{"name": "acme:title", "type": "String"}],
            "children": [{"name": "acme:body", "nodeType": "hippostd:html"}]
        }"#;
        let def: ContentTypeDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(def.properties[0].type_name, "String");
        assert!(!def.properties[0].multiple);
        assert_eq!(def.children[0].prefix(), "hippostd");
    }
}
