//! Bean Synthesizer - 콘텐츠 타입 → Java 빈 생성/갱신
//!
//! ## 처리 순서
//!
//! ```text
//! types_by_namespace(ns)
//!        │
//!        ▼
//!   ┌─ pass 1..=max_passes ─────────────────────────────┐
//!   │  missing = 레지스트리에 없는 타입 (pass 시작 시점) │
//!   │  부모 빈이 있거나 기본 타입 → 클래스 생성         │
//!   │  그 외 → 다음 pass로 연기                         │
//!   └───────────────────────────────────────────────────┘
//!        │
//!        ▼
//!   등록된 모든 빈의 누락 접근자 추가 (1회)
//!        │
//!        ▼
//!   남은 타입 → UnresolvedParentType
//! ```
//!
//! 파일 하나를 읽거나 쓰지 못해도 나머지 타입은 계속 처리하고
//! 실패는 `SynthesisReport::failed`에 남깁니다.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, error, info, warn};

use essentials_foundation::{DisplayEvent, Error, EssentialsConfig, EventLog, JsonStore, Result};

use super::mapping::{
    child_accessor, property_java_type, standard_import, Accessor, ImageSetClass, MethodSpec,
    HIPPO_DOCUMENT, HIPPO_GALLERY_IMAGE_SET, HIPPO_GALLERY_IMAGE_SET_BEAN,
};
use super::naming;
use super::registry::{BeanRecord, BeanRegistry, GeneratedMethod};
use super::source::JavaSource;
use crate::content::{
    base_document_type, ContentTypeDefinition, ContentTypeService, BASE_COMPOUND_TYPE,
    RELAXED_IMAGE_TYPE,
};

// ============================================================================
// Settings
// ============================================================================

/// 빈 생성 설정
#[derive(Debug, Clone)]
pub struct SynthesizerSettings {
    /// 빈 패키지 디렉토리 (소스 + beans.json)
    pub package_dir: PathBuf,

    /// Java 패키지 이름
    pub package: String,

    /// 커스텀 이미지셋 타입 또는 클래스 이름
    pub image_namespace: Option<String>,

    /// 최대 반복 횟수
    pub max_passes: usize,
}

impl SynthesizerSettings {
    pub fn from_config(project_root: &Path, config: &EssentialsConfig) -> Self {
        let package = config.beans_package().to_string();
        let package_dir = package
            .split('.')
            .fold(project_root.join(config.site_java_root()), |dir, part| {
                dir.join(part)
            });
        Self {
            package_dir,
            package,
            image_namespace: config.image_namespace.clone(),
            max_passes: config.max_bean_passes(),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// 변경 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    CreatedClass,
    CreatedMethod,
    ModifiedMethod,
    AddedNote,
    AdoptedClass,
}

/// 단일 변경
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanChange {
    pub kind: ChangeKind,
    pub class_name: String,
    pub file: String,

    /// 메서드 이름 또는 메모
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<String>,
}

/// 부모를 찾지 못한 타입
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedType {
    pub content_type: String,
    pub supertypes: Vec<String>,
}

/// 매핑할 수 없는 속성/자식 노드
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmappedProperty {
    pub content_type: String,
    pub property: String,
    pub type_name: String,
}

/// 처리하지 못한 타입 또는 소스 파일
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BeanFailure {
    /// 콘텐츠 타입 이름 또는 소스 경로
    pub target: String,
    pub message: String,
}

/// 생성 결과
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SynthesisReport {
    pub changes: Vec<BeanChange>,
    pub unresolved: Vec<UnresolvedType>,
    pub unmapped: Vec<UnmappedProperty>,
    pub failed: Vec<BeanFailure>,
    pub passes: usize,
}

impl SynthesisReport {
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn count(&self, kind: ChangeKind) -> usize {
        self.changes.iter().filter(|c| c.kind == kind).count()
    }

    pub fn is_failed(&self, target: &str) -> bool {
        self.failed.iter().any(|f| f.target == target)
    }

    /// 보고된 항목별 에러
    pub fn errors(&self) -> Vec<Error> {
        let unresolved = self.unresolved.iter().map(|u| Error::UnresolvedParentType {
            content_type: u.content_type.clone(),
            supertypes: u.supertypes.clone(),
        });
        let unmapped = self.unmapped.iter().map(|u| Error::UnmappedPropertyType {
            content_type: u.content_type.clone(),
            property: u.property.clone(),
            type_name: u.type_name.clone(),
        });
        let failed = self
            .failed
            .iter()
            .map(|f| Error::Storage(format!("{}: {}", f.target, f.message)));
        unresolved.chain(unmapped).chain(failed).collect()
    }
}

// ============================================================================
// BeanSynthesizer
// ============================================================================

/// 콘텐츠 빈 생성기
pub struct BeanSynthesizer {
    types: Arc<dyn ContentTypeService>,
    settings: SynthesizerSettings,
    events: Arc<EventLog>,
}

impl BeanSynthesizer {
    pub fn new(
        types: Arc<dyn ContentTypeService>,
        settings: SynthesizerSettings,
        events: Arc<EventLog>,
    ) -> Self {
        Self {
            types,
            settings,
            events,
        }
    }

    pub fn settings(&self) -> &SynthesizerSettings {
        &self.settings
    }

    fn registry_store(&self) -> JsonStore {
        JsonStore::new(&self.settings.package_dir)
    }

    /// 현재 레지스트리
    pub fn registry(&self) -> Result<BeanRegistry> {
        BeanRegistry::load(&self.registry_store())
    }

    // ========================================================================
    // synthesize
    // ========================================================================

    /// 네임스페이스의 누락된 빈과 접근자 생성
    pub async fn synthesize(&self, namespace: &str) -> Result<SynthesisReport> {
        self.synthesize_from(self.types.as_ref(), namespace).await
    }

    /// 주어진 타입 서비스(예: 커밋 전 세션)를 기준으로 생성
    pub async fn synthesize_from(
        &self,
        types: &dyn ContentTypeService,
        namespace: &str,
    ) -> Result<SynthesisReport> {
        let definitions = types.types_by_namespace(namespace).await?;
        let store = self.registry_store();
        let mut registry = BeanRegistry::load(&store)?;
        let mut report = SynthesisReport::default();
        let base_document = base_document_type(namespace);

        info!(
            "Synthesizing beans for namespace {} ({} types)",
            namespace,
            definitions.len()
        );

        let mut failed: HashSet<String> = HashSet::new();

        for pass in 1..=self.settings.max_passes {
            report.passes = pass;
            let snapshot = registry.clone();
            let mut created = 0;

            let missing: Vec<&ContentTypeDefinition> = definitions
                .values()
                .filter(|d| !snapshot.contains(&d.name) && !failed.contains(&d.name))
                .collect();

            for definition in missing {
                let Some((extends, import)) = resolve_parent(definition, &snapshot, &base_document)
                else {
                    debug!("Deferring {}: parent bean not available yet", definition.name);
                    continue;
                };
                match self
                    .create_bean(definition, &extends, import.as_deref(), &mut registry, &mut report)
                    .await
                {
                    Ok(()) => created += 1,
                    Err(e) => {
                        self.record_failure(&mut report, &definition.name, &e);
                        failed.insert(definition.name.clone());
                    }
                }
            }

            let remaining = definitions
                .values()
                .filter(|d| !registry.contains(&d.name) && !failed.contains(&d.name))
                .count();
            if remaining == 0 || created == 0 {
                break;
            }
        }

        // 자식 노드가 참조하는 프로젝트 빈이 모두 생성된 뒤에 접근자 추가
        for definition in definitions.values() {
            if !registry.contains(&definition.name) {
                continue;
            }
            if let Err(e) = self
                .sync_accessors(definition, namespace, &mut registry, &mut report)
                .await
            {
                self.record_failure(&mut report, &definition.name, &e);
            }
        }

        for definition in definitions.values() {
            if !registry.contains(&definition.name) && !failed.contains(&definition.name) {
                let supertypes: Vec<String> = definition.supertypes.iter().cloned().collect();
                error!(
                    "Not all beans were created: {} (supertypes: {})",
                    definition.name,
                    supertypes.join(", ")
                );
                report.unresolved.push(UnresolvedType {
                    content_type: definition.name.clone(),
                    supertypes,
                });
            }
        }

        if report.has_changes() {
            registry.save(&store)?;
        }

        info!(
            "Bean synthesis finished: {} changes, {} unresolved, {} passes",
            report.changes.len(),
            report.unresolved.len(),
            report.passes
        );
        Ok(report)
    }

    /// 클래스 생성. 이미 같은 타입의 소스가 있으면 등록만 합니다.
    ///
    /// 같은 클래스 이름의 파일이 다른 타입에 쓰이고 있으면 `InvalidState`.
    async fn create_bean(
        &self,
        definition: &ContentTypeDefinition,
        extends: &str,
        extends_import: Option<&str>,
        registry: &mut BeanRegistry,
        report: &mut SynthesisReport,
    ) -> Result<()> {
        let class_name = naming::class_name(&definition.name);
        let file = format!("{}.java", class_name);
        let path = self.settings.package_dir.join(&file);

        if fs::try_exists(&path).await? {
            let source = JavaSource::new(fs::read_to_string(&path).await?);
            match source.node_jcr_type() {
                Some(existing) if existing == definition.name => {}
                existing => {
                    let owner = existing
                        .map(|t| format!("the bean for {}", t))
                        .unwrap_or_else(|| "a source without @Node".to_string());
                    return Err(Error::invalid_state(
                        &definition.name,
                        format!("class name {} is already used by {}", class_name, owner),
                    ));
                }
            }
            let record = self.record_from_source(&source, file).ok_or_else(|| {
                Error::invalid_state(
                    &definition.name,
                    format!("no class declaration in {}", path.display()),
                )
            })?;
            self.record_change(report, ChangeKind::AdoptedClass, &record, None);
            registry.insert(record);
            return Ok(());
        }

        let source = JavaSource::new_bean(
            &self.settings.package,
            &class_name,
            &definition.name,
            extends,
            extends_import,
        );
        write_source(&path, &source).await?;

        let record = BeanRecord {
            content_type: definition.name.clone(),
            import: format!("{}.{}", self.settings.package, class_name),
            class_name,
            file,
            extends: extends.to_string(),
            methods: Vec::new(),
            notes: Vec::new(),
        };
        self.record_change(report, ChangeKind::CreatedClass, &record, None);
        registry.insert(record);
        Ok(())
    }

    /// 누락된 접근자 추가
    async fn sync_accessors(
        &self,
        definition: &ContentTypeDefinition,
        namespace: &str,
        registry: &mut BeanRegistry,
        report: &mut SynthesisReport,
    ) -> Result<()> {
        let existing = registry.internal_names_with_parents(&definition.name);
        let image_set = self.image_set_class(registry);
        let mut pending: Vec<MethodSpec> = Vec::new();
        let mut notes: Vec<String> = Vec::new();

        for property in &definition.properties {
            if existing.contains(&property.name) {
                continue;
            }
            match property_java_type(&property.type_name) {
                Some(java_type) => pending.push(MethodSpec {
                    method_name: naming::method_name(&property.name),
                    internal_name: property.name.clone(),
                    accessor: Accessor::Property {
                        java_type: java_type.to_string(),
                    },
                    multiple: property.multiple,
                    import: None,
                }),
                None => {
                    report.unmapped.push(UnmappedProperty {
                        content_type: definition.name.clone(),
                        property: property.name.clone(),
                        type_name: property.type_name.clone(),
                    });
                    notes.push(format!(
                        "TODO: Beanwriter: Failed to create getter for property: {} of type: {}",
                        property.name, property.type_name
                    ));
                }
            }
        }

        for child in &definition.children {
            if existing.contains(&child.name) {
                continue;
            }
            let mapped = child_accessor(&child.node_type, &image_set).or_else(|| {
                if child.prefix() != namespace {
                    return None;
                }
                registry.get(&child.node_type).map(|target| {
                    (
                        Accessor::Child {
                            class: target.class_name.clone(),
                        },
                        None,
                    )
                })
            });

            match mapped {
                Some((accessor, import)) => pending.push(MethodSpec {
                    method_name: naming::method_name(&child.name),
                    internal_name: child.name.clone(),
                    accessor,
                    multiple: child.multiple,
                    import: import.filter(|i| !self.in_package(i)),
                }),
                None => {
                    report.unmapped.push(UnmappedProperty {
                        content_type: definition.name.clone(),
                        property: child.name.clone(),
                        type_name: child.node_type.clone(),
                    });
                    notes.push(format!(
                        "TODO: Beanwriter: Failed to create getter for node type: {}",
                        child.node_type
                    ));
                }
            }
        }

        let Some(mut record) = registry.get(&definition.name).cloned() else {
            return Ok(());
        };
        notes.retain(|note| !record.notes.contains(note));
        if pending.is_empty() && notes.is_empty() {
            return Ok(());
        }

        let path = self.settings.package_dir.join(&record.file);
        if !fs::try_exists(&path).await? {
            warn!("Bean source missing for {}: {}", record.content_type, path.display());
            return Ok(());
        }
        let mut source = JavaSource::new(fs::read_to_string(&path).await?);
        let mut changes = Vec::new();

        for spec in pending {
            if source.has_method(&spec.method_name) {
                debug!(
                    "{} already declares {}, skipping",
                    record.class_name, spec.method_name
                );
                continue;
            }
            for import in spec.imports() {
                source.add_import(&import);
            }
            source.add_method(&spec.render());
            record.methods.push(GeneratedMethod {
                method_name: spec.method_name.clone(),
                internal_name: spec.internal_name.clone(),
                return_type: spec.accessor.element_type().to_string(),
                multiple: spec.multiple,
            });
            changes.push((ChangeKind::CreatedMethod, spec.method_name));
        }

        for note in notes {
            warn!("{}", note);
            source.add_class_note(&note);
            record.notes.push(note.clone());
            changes.push((ChangeKind::AddedNote, note));
        }

        if changes.is_empty() {
            return Ok(());
        }
        write_source(&path, &source).await?;

        for (kind, member) in changes {
            self.record_change(report, kind, &record, Some(member));
        }
        registry.insert(record);
        Ok(())
    }

    /// 이미지 링크가 사용할 이미지셋 클래스
    fn image_set_class(&self, registry: &BeanRegistry) -> ImageSetClass {
        self.settings
            .image_namespace
            .as_deref()
            .and_then(|ns| registry.get(ns).or_else(|| registry.by_class(ns)))
            .map(|record| ImageSetClass {
                class: record.class_name.clone(),
                import: record.import.clone(),
            })
            .unwrap_or_default()
    }

    fn in_package(&self, import: &str) -> bool {
        import
            .rsplit_once('.')
            .map(|(package, _)| package == self.settings.package)
            .unwrap_or(false)
    }

    // ========================================================================
    // convert_image_methods
    // ========================================================================

    /// 이미지셋을 반환하는 생성 접근자를 새 이미지 타입으로 교체
    pub async fn convert_image_methods(&self, new_namespace: &str) -> Result<SynthesisReport> {
        let store = self.registry_store();
        let mut registry = BeanRegistry::load(&store)?;
        let mut report = SynthesisReport::default();

        let mut image_types: HashMap<String, String> = HashMap::new();
        image_types.insert(
            HIPPO_GALLERY_IMAGE_SET.to_string(),
            standard_import(HIPPO_GALLERY_IMAGE_SET),
        );
        image_types.insert(
            HIPPO_GALLERY_IMAGE_SET_BEAN.to_string(),
            standard_import(HIPPO_GALLERY_IMAGE_SET_BEAN),
        );
        for record in registry.records().filter(|r| r.is_image_set()) {
            image_types.insert(record.class_name.clone(), record.import.clone());
        }

        let target = if new_namespace == HIPPO_GALLERY_IMAGE_SET
            || new_namespace == HIPPO_GALLERY_IMAGE_SET_BEAN
        {
            Some((
                HIPPO_GALLERY_IMAGE_SET.to_string(),
                standard_import(HIPPO_GALLERY_IMAGE_SET),
            ))
        } else {
            registry
                .get(new_namespace)
                .or_else(|| registry.by_class(new_namespace))
                .map(|r| (r.class_name.clone(), r.import.clone()))
        };
        let Some((new_type, new_import)) = target else {
            warn!(
                "Could not find return type for image set namespace: {}",
                new_namespace
            );
            return Ok(report);
        };
        info!("Converting existing image beans to new type: {}", new_type);

        let conversions: BTreeMap<String, Vec<GeneratedMethod>> = registry
            .records()
            .filter(|r| !r.is_image_set())
            .filter_map(|r| {
                let methods: Vec<GeneratedMethod> = r
                    .methods
                    .iter()
                    .filter(|m| image_types.contains_key(&m.return_type) && m.return_type != new_type)
                    .cloned()
                    .collect();
                (!methods.is_empty()).then(|| (r.content_type.clone(), methods))
            })
            .collect();

        for (content_type, methods) in conversions {
            let Some(record) = registry.get(&content_type).cloned() else {
                continue;
            };
            match self
                .convert_bean(record, methods, &new_type, &new_import, &mut report)
                .await
            {
                Ok(Some(updated)) => registry.insert(updated),
                Ok(None) => {}
                Err(e) => self.record_failure(&mut report, &content_type, &e),
            }
        }

        if report.has_changes() {
            registry.save(&store)?;
        }
        Ok(report)
    }

    /// 빈 하나의 이미지 접근자 교체 (변경이 없으면 None)
    async fn convert_bean(
        &self,
        mut record: BeanRecord,
        methods: Vec<GeneratedMethod>,
        new_type: &str,
        new_import: &str,
        report: &mut SynthesisReport,
    ) -> Result<Option<BeanRecord>> {
        let path = self.settings.package_dir.join(&record.file);
        if !fs::try_exists(&path).await? {
            warn!("Bean source missing for {}: {}", record.content_type, path.display());
            return Ok(None);
        }
        let mut source = JavaSource::new(fs::read_to_string(&path).await?);
        let mut replaced = Vec::new();

        for old in methods {
            if !source.remove_generated_method(&old.method_name) {
                warn!(
                    "Generated method {} not found in {}",
                    old.method_name,
                    path.display()
                );
                continue;
            }
            let spec = MethodSpec {
                method_name: old.method_name.clone(),
                internal_name: old.internal_name.clone(),
                accessor: Accessor::Linked {
                    class: new_type.to_string(),
                },
                multiple: old.multiple,
                import: Some(new_import.to_string()).filter(|i| !self.in_package(i)),
            };
            for import in spec.imports() {
                source.add_import(&import);
            }
            source.add_method(&spec.render());
            if let Some(method) = record.method_mut(&old.method_name) {
                method.return_type = new_type.to_string();
            }
            debug!(
                "Replaced old method: {} with new return type: {}",
                old.method_name, new_type
            );
            replaced.push(old.method_name);
        }

        if replaced.is_empty() {
            return Ok(None);
        }
        write_source(&path, &source).await?;
        for method in replaced {
            self.record_change(report, ChangeKind::ModifiedMethod, &record, Some(method));
        }
        Ok(Some(record))
    }

    // ========================================================================
    // adopt_existing_sources
    // ========================================================================

    /// 레지스트리에 없는 기존 빈 소스(`@Node`)를 등록
    pub async fn adopt_existing_sources(&self) -> Result<SynthesisReport> {
        let store = self.registry_store();
        let mut registry = BeanRegistry::load(&store)?;
        let mut report = SynthesisReport::default();

        let pattern = self.settings.package_dir.join("**").join("*.java");
        let entries = glob::glob(&pattern.to_string_lossy())
            .map_err(|e| Error::InvalidInput(format!("Invalid source pattern: {}", e)))?;

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!("Error reading java files: {}", e);
                    continue;
                }
            };
            let source = match fs::read_to_string(&path).await {
                Ok(text) => JavaSource::new(text),
                Err(e) => {
                    self.record_failure(&mut report, &path.display().to_string(), &Error::Io(e));
                    continue;
                }
            };
            let Some(content_type) = source.node_jcr_type() else {
                continue;
            };
            if registry.contains(&content_type) {
                continue;
            }

            let file = path
                .strip_prefix(&self.settings.package_dir)
                .unwrap_or(&path)
                .to_string_lossy()
                .replace('\\', "/");
            if let Some(record) = self.record_from_source(&source, file) {
                self.record_change(&mut report, ChangeKind::AdoptedClass, &record, None);
                registry.insert(record);
            }
        }

        if report.has_changes() {
            registry.save(&store)?;
        }
        Ok(report)
    }

    fn record_from_source(&self, source: &JavaSource, file: String) -> Option<BeanRecord> {
        let content_type = source.node_jcr_type()?;
        let class_name = source.class_name()?;
        let package = source
            .package()
            .unwrap_or_else(|| self.settings.package.clone());

        Some(BeanRecord {
            content_type,
            import: format!("{}.{}", package, class_name),
            class_name,
            file,
            extends: source.extends_class().unwrap_or_default(),
            methods: source
                .generated_methods()
                .into_iter()
                .map(|m| GeneratedMethod {
                    method_name: m.method_name,
                    internal_name: m.internal_name,
                    return_type: m.return_type,
                    multiple: m.multiple,
                })
                .collect(),
            notes: Vec::new(),
        })
    }

    // ========================================================================
    // 보고
    // ========================================================================

    fn record_failure(&self, report: &mut SynthesisReport, target: &str, error: &Error) {
        error!("Failed to process bean for {}: {}", target, error);
        self.events.publish(
            DisplayEvent::error(format!("Failed to process bean for {}: {}", target, error))
                .with_source("beans"),
        );
        report.failed.push(BeanFailure {
            target: target.to_string(),
            message: error.to_string(),
        });
    }

    fn record_change(
        &self,
        report: &mut SynthesisReport,
        kind: ChangeKind,
        record: &BeanRecord,
        member: Option<String>,
    ) {
        let message = match (kind, member.as_deref()) {
            (ChangeKind::CreatedClass, _) => format!("Created bean class: {}", record.class_name),
            (ChangeKind::AdoptedClass, _) => {
                format!("Registered existing bean class: {}", record.class_name)
            }
            (ChangeKind::CreatedMethod, Some(m)) => format!("Successfully created method: {}", m),
            (ChangeKind::ModifiedMethod, Some(m)) => {
                format!("Replaced method {} in {}", m, record.class_name)
            }
            (ChangeKind::AddedNote, Some(note)) => format!("{}: {}", record.class_name, note),
            (_, None) => format!("Updated {}", record.class_name),
        };
        debug!("{}", message);
        self.events
            .publish(DisplayEvent::new(message).with_source("beans"));

        report.changes.push(BeanChange {
            kind,
            class_name: record.class_name.clone(),
            file: record.file.clone(),
            member,
        });
    }
}

/// 부모 클래스 결정 (없으면 다음 pass로 연기)
fn resolve_parent(
    definition: &ContentTypeDefinition,
    existing: &BeanRegistry,
    base_document: &str,
) -> Option<(String, Option<String>)> {
    if definition.has_sole_supertype(BASE_COMPOUND_TYPE) || definition.name == base_document {
        return Some((HIPPO_DOCUMENT.to_string(), Some(standard_import(HIPPO_DOCUMENT))));
    }
    if definition.supertypes.contains(RELAXED_IMAGE_TYPE) {
        return Some((
            HIPPO_GALLERY_IMAGE_SET.to_string(),
            Some(standard_import(HIPPO_GALLERY_IMAGE_SET)),
        ));
    }
    if definition.has_sole_supertype(base_document) {
        return existing
            .get(base_document)
            .map(|parent| (parent.class_name.clone(), None));
    }
    definition
        .supertypes
        .iter()
        .filter(|s| s.as_str() != base_document)
        .find_map(|s| existing.get(s))
        .map(|parent| (parent.class_name.clone(), None))
}

async fn write_source(path: &Path, source: &JavaSource) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, source.text()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentTypeDefinition;
    use crate::repository::ContentRepository;
    use tempfile::TempDir;

    fn synthesizer(temp: &TempDir, types: Vec<ContentTypeDefinition>) -> BeanSynthesizer {
        let repo = ContentRepository::in_memory();
        let mut session = repo.session();
        for def in types {
            session.register_content_type(def).unwrap();
        }
        session.commit().unwrap();

        let settings = SynthesizerSettings {
            package_dir: temp.path().join("beans"),
            package: "org.example.beans".to_string(),
            image_namespace: None,
            max_passes: 5,
        };
        BeanSynthesizer::new(repo, settings, Arc::new(EventLog::new()))
    }

    #[tokio::test]
    async fn test_compound_creates_base_bean() {
        let temp = TempDir::new().unwrap();
        let synth = synthesizer(
            &temp,
            vec![ContentTypeDefinition::new("acme:link")
                .with_supertype(BASE_COMPOUND_TYPE)
                .with_property("acme:url", "String", false)],
        );

        let report = synth.synthesize("acme").await.unwrap();
        assert_eq!(report.count(ChangeKind::CreatedClass), 1);
        assert_eq!(report.count(ChangeKind::CreatedMethod), 1);

        let text = std::fs::read_to_string(temp.path().join("beans/Link.java")).unwrap();
        assert!(text.contains("public class Link extends HippoDocument {"));
        assert!(text.contains("import org.hippoecm.hst.content.beans.standard.HippoDocument;"));
        assert!(text.contains("return getProperty(\"acme:url\");"));
    }

    #[tokio::test]
    async fn test_child_waits_for_parent_pass() {
        let temp = TempDir::new().unwrap();
        let synth = synthesizer(
            &temp,
            vec![
                ContentTypeDefinition::new("acme:basedocument").with_supertype("hippo:document"),
                ContentTypeDefinition::new("acme:news").with_supertype("acme:basedocument"),
                ContentTypeDefinition::new("acme:event").with_supertype("acme:news"),
            ],
        );

        let report = synth.synthesize("acme").await.unwrap();
        assert_eq!(report.count(ChangeKind::CreatedClass), 3);
        assert_eq!(report.passes, 3);
        assert!(report.unresolved.is_empty());

        let registry = synth.registry().unwrap();
        assert_eq!(registry.get("acme:news").unwrap().extends, "Basedocument");
        assert_eq!(registry.get("acme:event").unwrap().extends, "News");
    }

    #[tokio::test]
    async fn test_unmapped_type_noted_once() {
        let temp = TempDir::new().unwrap();
        let synth = synthesizer(
            &temp,
            vec![ContentTypeDefinition::new("acme:link")
                .with_supertype(BASE_COMPOUND_TYPE)
                .with_property("acme:amount", "Decimal", false)
                .with_child("acme:widget", "other:widget", false)],
        );

        let first = synth.synthesize("acme").await.unwrap();
        assert_eq!(first.count(ChangeKind::AddedNote), 2);
        assert_eq!(first.errors().len(), 2);

        let second = synth.synthesize("acme").await.unwrap();
        assert!(!second.has_changes());

        let text = std::fs::read_to_string(temp.path().join("beans/Link.java")).unwrap();
        assert_eq!(text.matches("TODO: Beanwriter").count(), 2);
    }

    #[tokio::test]
    async fn test_hand_written_method_not_duplicated() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("beans");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("Link.java"),
            "package org.example.beans;\n\n@Node(jcrType = \"acme:link\")\npublic class Link extends HippoDocument {\n\n    public String getUrl() {\n        return \"fixed\";\n    }\n}\n",
        )
        .unwrap();

        let synth = synthesizer(
            &temp,
            vec![ContentTypeDefinition::new("acme:link")
                .with_supertype(BASE_COMPOUND_TYPE)
                .with_property("acme:url", "String", false)],
        );

        let report = synth.synthesize("acme").await.unwrap();
        assert_eq!(report.count(ChangeKind::AdoptedClass), 1);
        assert_eq!(report.count(ChangeKind::CreatedMethod), 0);

        let text = std::fs::read_to_string(dir.join("Link.java")).unwrap();
        assert_eq!(text.matches("getUrl()").count(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_source_does_not_stop_other_types() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("beans");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Aaa.java"), [0xff, 0xfe, 0x00]).unwrap();

        let synth = synthesizer(
            &temp,
            vec![
                ContentTypeDefinition::new("acme:aaa").with_supertype(BASE_COMPOUND_TYPE),
                ContentTypeDefinition::new("acme:zzz")
                    .with_supertype(BASE_COMPOUND_TYPE)
                    .with_property("acme:title", "String", false),
            ],
        );

        let report = synth.synthesize("acme").await.unwrap();
        assert!(report.is_failed("acme:aaa"));
        assert_eq!(report.failed.len(), 1);
        assert!(report.unresolved.is_empty());
        assert!(dir.join("Zzz.java").exists());

        let registry = synth.registry().unwrap();
        assert!(registry.contains("acme:zzz"));
        assert!(!registry.contains("acme:aaa"));
        assert_eq!(
            std::fs::read(dir.join("Aaa.java")).unwrap(),
            vec![0xff, 0xfe, 0x00]
        );
    }

    #[tokio::test]
    async fn test_adopt_skips_unreadable_source() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("beans");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Broken.java"), [0xff, 0xfe, 0x00]).unwrap();
        std::fs::write(
            dir.join("Product.java"),
            "package org.example.beans;\n\n@Node(jcrType = \"acme:product\")\npublic class Product extends HippoDocument {\n}\n",
        )
        .unwrap();

        let synth = synthesizer(&temp, Vec::new());
        let report = synth.adopt_existing_sources().await.unwrap();
        assert_eq!(report.count(ChangeKind::AdoptedClass), 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].target.ends_with("Broken.java"));
        assert!(synth.registry().unwrap().contains("acme:product"));
    }

    #[tokio::test]
    async fn test_child_of_later_pass_bean_gets_accessor_without_note() {
        let temp = TempDir::new().unwrap();
        let synth = synthesizer(
            &temp,
            vec![
                ContentTypeDefinition::new("acme:basedocument").with_supertype("hippo:document"),
                ContentTypeDefinition::new("acme:author").with_supertype("acme:basedocument"),
                ContentTypeDefinition::new("acme:news")
                    .with_supertype(BASE_COMPOUND_TYPE)
                    .with_child("acme:writer", "acme:author", false),
            ],
        );

        let report = synth.synthesize("acme").await.unwrap();
        assert_eq!(report.count(ChangeKind::CreatedClass), 3);
        assert!(report.unmapped.is_empty());
        assert_eq!(report.count(ChangeKind::AddedNote), 0);
        assert!(report.errors().is_empty());

        let text = std::fs::read_to_string(temp.path().join("beans/News.java")).unwrap();
        assert!(text.contains("public Author getWriter() {"));
        assert!(!text.contains("TODO: Beanwriter"));
        assert!(synth.registry().unwrap().get("acme:news").unwrap().notes.is_empty());
    }

    #[tokio::test]
    async fn test_class_name_collision_reported() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("beans");
        std::fs::create_dir_all(&dir).unwrap();
        let foreign = "package org.example.beans;\n\n@Node(jcrType = \"other:link\")\npublic class Link extends HippoDocument {\n}\n";
        std::fs::write(dir.join("Link.java"), foreign).unwrap();

        let synth = synthesizer(
            &temp,
            vec![ContentTypeDefinition::new("acme:link").with_supertype(BASE_COMPOUND_TYPE)],
        );

        let report = synth.synthesize("acme").await.unwrap();
        assert!(report.unresolved.is_empty());
        assert!(report.is_failed("acme:link"));
        assert!(report.failed[0].message.contains("already used by the bean for other:link"));
        assert_eq!(std::fs::read_to_string(dir.join("Link.java")).unwrap(), foreign);
    }

    #[tokio::test]
    async fn test_convert_unknown_namespace_is_noop() {
        let temp = TempDir::new().unwrap();
        let synth = synthesizer(&temp, Vec::new());
        let report = synth.convert_image_methods("acme:missing").await.unwrap();
        assert!(!report.has_changes());
    }
}
