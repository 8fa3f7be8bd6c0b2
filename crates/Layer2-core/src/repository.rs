//! Content Repository - 노드 트리 + 네임스페이스 + 타입 레지스트리
//!
//! 경로 기반 노드 맵을 메모리에 보관하고, 선택적으로 JSON 파일에 영속화합니다.
//!
//! 모든 변경은 `RepositorySession`(작업 복사본)을 통해서만 이루어집니다.
//! `commit()` 하지 않은 세션은 drop 시 그대로 버려집니다 (rollback).

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use essentials_foundation::{Error, JsonStore, Result};

use crate::content::{ContentTypeDefinition, ContentTypeService};

// ============================================================================
// Node / State
// ============================================================================

/// 저장소 노드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeData {
    pub primary_type: String,

    #[serde(default)]
    pub properties: BTreeMap<String, Value>,
}

impl NodeData {
    pub fn new(primary_type: impl Into<String>) -> Self {
        Self {
            primary_type: primary_type.into(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_property(mut self, name: impl Into<String>, value: Value) -> Self {
        self.properties.insert(name.into(), value);
        self
    }
}

/// 저장소 전체 상태 (직렬화 단위)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryState {
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeData>,

    /// prefix → uri
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,

    #[serde(default)]
    pub content_types: BTreeMap<String, ContentTypeDefinition>,
}

impl RepositoryState {
    fn types_by_namespace(&self, prefix: &str) -> BTreeMap<String, ContentTypeDefinition> {
        self.content_types
            .iter()
            .filter(|(_, def)| def.prefix() == prefix)
            .map(|(name, def)| (name.clone(), def.clone()))
            .collect()
    }
}

/// 경로 정규화: 선행 `/` 보장, 후행 `/` 제거
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

fn in_subtree(candidate: &str, root: &str) -> bool {
    candidate == root
        || (candidate.starts_with(root) && candidate[root.len()..].starts_with('/'))
}

// ============================================================================
// ContentRepository
// ============================================================================

/// 콘텐츠 저장소
pub struct ContentRepository {
    state: RwLock<RepositoryState>,

    /// 영속화 위치 (None이면 메모리 전용)
    store: Option<(JsonStore, String)>,
}

impl ContentRepository {
    /// 메모리 전용 저장소
    pub fn in_memory() -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(RepositoryState::default()),
            store: None,
        })
    }

    /// 초기 상태를 가진 메모리 저장소
    pub fn with_state(state: RepositoryState) -> Arc<Self> {
        Arc::new(Self {
            state: RwLock::new(state),
            store: None,
        })
    }

    /// 파일 기반 저장소 열기 (없으면 빈 상태)
    pub fn open(path: impl AsRef<Path>) -> Result<Arc<Self>> {
        let path = path.as_ref();
        let dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let file = path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .ok_or_else(|| Error::InvalidInput(format!("Invalid repository path: {}", path.display())))?;

        let store = JsonStore::new(dir);
        let state = store
            .load_optional::<RepositoryState>(&file)
            .map_err(|e| Error::RepositoryAccess(format!("{}: {}", path.display(), e)))?
            .unwrap_or_default();

        debug!(
            "Opened repository {} ({} nodes, {} types)",
            path.display(),
            state.nodes.len(),
            state.content_types.len()
        );

        Ok(Arc::new(Self {
            state: RwLock::new(state),
            store: Some((store, file)),
        }))
    }

    /// 작업 세션 시작
    pub fn session(self: &Arc<Self>) -> RepositorySession {
        RepositorySession {
            working: self.state.read().clone(),
            repository: Arc::clone(self),
            dirty: false,
            committed: false,
        }
    }

    /// 현재 커밋된 상태 복사본
    pub fn snapshot(&self) -> RepositoryState {
        self.state.read().clone()
    }

    pub fn node_exists(&self, path: &str) -> bool {
        self.state.read().nodes.contains_key(&normalize_path(path))
    }

    fn apply(&self, working: RepositoryState) -> Result<()> {
        if let Some((store, file)) = &self.store {
            store.save(file, &working)?;
        }
        *self.state.write() = working;
        Ok(())
    }
}

#[async_trait]
impl ContentTypeService for ContentRepository {
    async fn types_by_namespace(
        &self,
        prefix: &str,
    ) -> Result<BTreeMap<String, ContentTypeDefinition>> {
        Ok(self.state.read().types_by_namespace(prefix))
    }
}

// ============================================================================
// RepositorySession
// ============================================================================

/// 저장소 작업 세션
///
/// 한 작업 단위(설치, 설정) 동안만 유지됩니다.
pub struct RepositorySession {
    repository: Arc<ContentRepository>,
    working: RepositoryState,
    dirty: bool,
    committed: bool,
}

impl RepositorySession {
    // ========================================================================
    // Nodes
    // ========================================================================

    pub fn node(&self, path: &str) -> Option<&NodeData> {
        self.working.nodes.get(&normalize_path(path))
    }

    pub fn node_exists(&self, path: &str) -> bool {
        self.working.nodes.contains_key(&normalize_path(path))
    }

    /// 노드 추가 (기존 노드는 교체)
    pub fn add_node(&mut self, path: &str, node: NodeData) {
        self.working.nodes.insert(normalize_path(path), node);
        self.dirty = true;
    }

    pub fn set_property(&mut self, path: &str, name: &str, value: Value) -> Result<()> {
        let path = normalize_path(path);
        let node = self
            .working
            .nodes
            .get_mut(&path)
            .ok_or_else(|| Error::NotFound(format!("node {}", path)))?;
        node.properties.insert(name.to_string(), value);
        self.dirty = true;
        Ok(())
    }

    /// 하위 트리 삭제, 삭제된 노드 수 반환
    pub fn remove_subtree(&mut self, path: &str) -> usize {
        let root = normalize_path(path);
        let before = self.working.nodes.len();
        self.working.nodes.retain(|p, _| !in_subtree(p, &root));
        let removed = before - self.working.nodes.len();
        if removed > 0 {
            self.dirty = true;
        }
        removed
    }

    /// 하위 트리 복사, 복사된 노드 수 반환
    pub fn copy_subtree(&mut self, from: &str, to: &str) -> Result<usize> {
        let from = normalize_path(from);
        let to = normalize_path(to);
        let copies: Vec<(String, NodeData)> = self
            .working
            .nodes
            .iter()
            .filter(|(p, _)| in_subtree(p, &from))
            .map(|(p, n)| (format!("{}{}", to, &p[from.len()..]), n.clone()))
            .collect();

        if copies.is_empty() {
            return Err(Error::NotFound(format!("node {}", from)));
        }

        let count = copies.len();
        self.working.nodes.extend(copies);
        self.dirty = true;
        Ok(count)
    }

    /// 경로 아래의 노드 경로 목록
    pub fn subtree_paths(&self, path: &str) -> Vec<String> {
        let root = normalize_path(path);
        self.working
            .nodes
            .keys()
            .filter(|p| in_subtree(p, &root))
            .cloned()
            .collect()
    }

    // ========================================================================
    // Namespaces / Types
    // ========================================================================

    pub fn namespace_uri(&self, prefix: &str) -> Option<&str> {
        self.working.namespaces.get(prefix).map(String::as_str)
    }

    pub fn register_namespace(&mut self, prefix: &str, uri: &str) -> Result<()> {
        if self.working.namespaces.contains_key(prefix) {
            return Err(Error::invalid_state(prefix, "namespace already registered"));
        }
        self.working
            .namespaces
            .insert(prefix.to_string(), uri.to_string());
        self.dirty = true;
        Ok(())
    }

    pub fn content_type(&self, name: &str) -> Option<&ContentTypeDefinition> {
        self.working.content_types.get(name)
    }

    pub fn register_content_type(&mut self, definition: ContentTypeDefinition) -> Result<()> {
        if self.working.content_types.contains_key(&definition.name) {
            return Err(Error::invalid_state(&definition.name, "content type already exists"));
        }
        self.working
            .content_types
            .insert(definition.name.clone(), definition);
        self.dirty = true;
        Ok(())
    }

    // ========================================================================
    // Commit
    // ========================================================================

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// 변경 사항 반영
    pub fn commit(mut self) -> Result<()> {
        if self.dirty {
            let working = std::mem::take(&mut self.working);
            self.repository.apply(working)?;
            info!("Repository session committed");
        }
        self.committed = true;
        Ok(())
    }
}

impl Drop for RepositorySession {
    fn drop(&mut self) {
        if self.dirty && !self.committed {
            debug!("Rolling back uncommitted repository session");
        }
    }
}

#[async_trait]
impl ContentTypeService for RepositorySession {
    async fn types_by_namespace(
        &self,
        prefix: &str,
    ) -> Result<BTreeMap<String, ContentTypeDefinition>> {
        Ok(self.working.types_by_namespace(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_uncommitted_session_rolls_back() {
        let repo = ContentRepository::in_memory();
        {
            let mut session = repo.session();
            session.add_node("/content/news", NodeData::new("hippostd:folder"));
            assert!(session.node_exists("/content/news"));
        }
        assert!(!repo.node_exists("/content/news"));
    }

    #[test]
    fn test_commit_applies() {
        let repo = ContentRepository::in_memory();
        let mut session = repo.session();
        session.add_node("content/news/", NodeData::new("hippostd:folder"));
        session.commit().unwrap();
        assert!(repo.node_exists("/content/news"));
    }

    #[test]
    fn test_subtree_copy_and_remove() {
        let repo = ContentRepository::in_memory();
        let mut session = repo.session();
        session.add_node("/a", NodeData::new("nt:unstructured"));
        session.add_node("/a/b", NodeData::new("nt:unstructured").with_property("x", json!(1)));
        session.add_node("/ab", NodeData::new("nt:unstructured"));

        assert_eq!(session.copy_subtree("/a", "/c").unwrap(), 2);
        assert_eq!(session.node("/c/b").unwrap().properties["x"], json!(1));

        // "/ab" 는 "/a" 의 하위가 아님
        assert_eq!(session.remove_subtree("/a"), 2);
        assert!(session.node_exists("/ab"));
        assert!(session.copy_subtree("/missing", "/d").is_err());
    }

    #[test]
    fn test_namespace_registered_once() {
        let repo = ContentRepository::in_memory();
        let mut session = repo.session();
        session.register_namespace("acme", "http://acme/1.0").unwrap();
        assert!(session.register_namespace("acme", "http://acme/1.0").is_err());
    }

    #[tokio::test]
    async fn test_persisted_types_by_namespace() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("repository.json");

        let repo = ContentRepository::open(&path).unwrap();
        let mut session = repo.session();
        session
            .register_content_type(ContentTypeDefinition::new("acme:news"))
            .unwrap();
        session
            .register_content_type(ContentTypeDefinition::new("other:thing"))
            .unwrap();
        session.commit().unwrap();

        let reopened = ContentRepository::open(&path).unwrap();
        let types = reopened.types_by_namespace("acme").await.unwrap();
        assert_eq!(types.len(), 1);
        assert!(types.contains_key("acme:news"));
    }

    #[test]
    fn test_open_corrupt_file_is_repository_access_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("repository.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = ContentRepository::open(&path).err().unwrap();
        assert!(matches!(err, Error::RepositoryAccess(_)));
    }
}
