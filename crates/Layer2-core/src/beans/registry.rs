//! Bean Registry - 생성된 빈 메타데이터 (beans.json)
//!
//! 소스를 다시 파싱하는 대신, 생성한 클래스/메서드를 이 레지스트리에 기록하고
//! 재생성은 레지스트리와의 차이로 계산합니다.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use essentials_foundation::{JsonStore, Result};

use super::mapping::HIPPO_GALLERY_IMAGE_SET;

/// 레지스트리 파일명 (빈 패키지 디렉토리에 저장)
pub const REGISTRY_FILE: &str = "beans.json";

/// 생성된 접근자 메서드
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedMethod {
    pub method_name: String,

    /// 대응하는 속성/자식 노드 이름
    pub internal_name: String,

    /// 원소 타입
    pub return_type: String,

    #[serde(default)]
    pub multiple: bool,
}

/// 생성된 빈
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanRecord {
    pub content_type: String,
    pub class_name: String,

    /// 빈 패키지 디렉토리 기준 상대 경로
    pub file: String,

    pub extends: String,

    /// 클래스 import 경로
    pub import: String,

    #[serde(default)]
    pub methods: Vec<GeneratedMethod>,

    /// 클래스에 기록된 TODO 메모
    #[serde(default)]
    pub notes: Vec<String>,
}

impl BeanRecord {
    pub fn has_internal_name(&self, internal_name: &str) -> bool {
        self.methods.iter().any(|m| m.internal_name == internal_name)
    }

    pub fn method_mut(&mut self, method_name: &str) -> Option<&mut GeneratedMethod> {
        self.methods.iter_mut().find(|m| m.method_name == method_name)
    }

    pub fn is_image_set(&self) -> bool {
        self.extends == HIPPO_GALLERY_IMAGE_SET
    }
}

/// 빈 레지스트리
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeanRegistry {
    #[serde(default = "default_version")]
    pub version: String,

    /// content type → 빈
    #[serde(default)]
    pub beans: BTreeMap<String, BeanRecord>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for BeanRegistry {
    fn default() -> Self {
        Self {
            version: default_version(),
            beans: BTreeMap::new(),
        }
    }
}

impl BeanRegistry {
    pub fn load(store: &JsonStore) -> Result<Self> {
        Ok(store.load_optional(REGISTRY_FILE)?.unwrap_or_default())
    }

    pub fn save(&self, store: &JsonStore) -> Result<()> {
        store.save(REGISTRY_FILE, self)
    }

    pub fn get(&self, content_type: &str) -> Option<&BeanRecord> {
        self.beans.get(content_type)
    }

    pub fn get_mut(&mut self, content_type: &str) -> Option<&mut BeanRecord> {
        self.beans.get_mut(content_type)
    }

    pub fn contains(&self, content_type: &str) -> bool {
        self.beans.contains_key(content_type)
    }

    pub fn insert(&mut self, record: BeanRecord) {
        self.beans.insert(record.content_type.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.beans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beans.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &BeanRecord> {
        self.beans.values()
    }

    pub fn by_class(&self, class_name: &str) -> Option<&BeanRecord> {
        self.beans.values().find(|b| b.class_name == class_name)
    }

    /// 빈과 부모 체인에 이미 생성된 internal name 집합
    pub fn internal_names_with_parents(&self, content_type: &str) -> HashSet<String> {
        let mut names = HashSet::new();
        let mut visited = HashSet::new();
        let mut current = self.get(content_type);

        while let Some(record) = current {
            if !visited.insert(record.content_type.as_str()) {
                break;
            }
            names.extend(record.methods.iter().map(|m| m.internal_name.clone()));
            current = self.by_class(&record.extends);
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(content_type: &str, class: &str, extends: &str, methods: &[&str]) -> BeanRecord {
        BeanRecord {
            content_type: content_type.to_string(),
            class_name: class.to_string(),
            file: format!("{}.java", class),
            extends: extends.to_string(),
            import: format!("org.example.beans.{}", class),
            methods: methods
                .iter()
                .map(|name| GeneratedMethod {
                    method_name: format!("get{}", name),
                    internal_name: format!("acme:{}", name.to_lowercase()),
                    return_type: "String".to_string(),
                    multiple: false,
                })
                .collect(),
            notes: Vec::new(),
        }
    }

    #[test]
    fn test_parent_chain_names() {
        let mut registry = BeanRegistry::default();
        registry.insert(record("acme:basedocument", "BaseDocument", "HippoDocument", &["Title"]));
        registry.insert(record("acme:news", "News", "BaseDocument", &["Date"]));
        registry.insert(record("acme:event", "Event", "News", &["Location"]));

        let names = registry.internal_names_with_parents("acme:event");
        assert!(names.contains("acme:title"));
        assert!(names.contains("acme:date"));
        assert!(names.contains("acme:location"));
    }

    #[test]
    fn test_cycle_terminates() {
        let mut registry = BeanRegistry::default();
        registry.insert(record("acme:a", "A", "B", &["X"]));
        registry.insert(record("acme:b", "B", "A", &["Y"]));
        assert_eq!(registry.internal_names_with_parents("acme:a").len(), 2);
    }

    #[test]
    fn test_save_load() {
        let temp = TempDir::new().unwrap();
        let store = JsonStore::new(temp.path());
        let mut registry = BeanRegistry::load(&store).unwrap();
        assert!(registry.is_empty());

        registry.insert(record("acme:news", "News", "HippoDocument", &["Title"]));
        registry.save(&store).unwrap();

        let loaded = BeanRegistry::load(&store).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.get("acme:news").unwrap().has_internal_name("acme:title"));
    }
}
