//! 플러그인 라이프사이클 통합 테스트
//!
//! `cargo test -p essentials-core --test lifecycle_test`

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use essentials_core::instruction::{
    DeclarativePackage, NamespaceInstruction, NodeInstruction, NodeSpec, COMMON_PACKAGE_ID,
};
use essentials_core::project::{Dependency, JsonProjectFiles, ProjectFileStore, Repository};
use essentials_core::{
    ContentRepository, InstallState, InstallerDocument, PackageRegistry, PluginCatalog,
    PluginDescriptor, PluginManager, PluginType, SetupParameters, TargetPom,
};
use essentials_foundation::{
    DocumentKind, DocumentStoreExt, EssentialsConfig, EventLog, FileDocumentStore,
    Error, Result, PROJECT_DIR,
};
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

struct Fixture {
    dir: TempDir,
    config: EssentialsConfig,
    repository: Arc<ContentRepository>,
    packages: Arc<PackageRegistry>,
}

impl Fixture {
    fn new(plugins: Vec<PluginDescriptor>) -> Self {
        Self::with_config(plugins, EssentialsConfig::new().with_namespace("acme"))
    }

    fn with_config(plugins: Vec<PluginDescriptor>, config: EssentialsConfig) -> Self {
        let dir = TempDir::new().unwrap();
        PluginCatalog::new(plugins)
            .save_local(&dir.path().join(config.resource_dir()))
            .unwrap();
        Self {
            dir,
            config,
            repository: ContentRepository::in_memory(),
            packages: Arc::new(PackageRegistry::new()),
        }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn manager(&self) -> PluginManager {
        self.manager_with_files(Arc::new(self.project_files()))
    }

    fn manager_with_files(&self, files: Arc<dyn ProjectFileStore>) -> PluginManager {
        PluginManager::builder(self.root())
            .config(self.config.clone())
            .repository(self.repository.clone())
            .packages(self.packages.clone())
            .project_files(files)
            .events(Arc::new(EventLog::new()))
            .build()
            .unwrap()
    }

    fn project_files(&self) -> JsonProjectFiles {
        JsonProjectFiles::new(self.root().join(PROJECT_DIR).join("project"))
    }

    fn project_documents(&self) -> FileDocumentStore {
        FileDocumentStore::new(self.root().join(PROJECT_DIR))
    }

    /// 재빌드 시뮬레이션: 현재 project 문서를 배포 리소스로 복사
    fn rebuild(&self, id: &str) {
        let doc: InstallerDocument = self
            .project_documents()
            .read_as(DocumentKind::Installer, id)
            .unwrap()
            .unwrap();
        let resources = FileDocumentStore::new(self.root().join(self.config.resource_dir()));
        resources
            .write_as(DocumentKind::Installer, id, &doc)
            .unwrap();
    }

    fn set_state(&self, id: &str, state: InstallState) {
        self.project_documents()
            .write_as(
                DocumentKind::Installer,
                id,
                &InstallerDocument::new(id, state),
            )
            .unwrap();
    }
}

fn folder_package(id: &str) -> DeclarativePackage {
    DeclarativePackage::new(id).with_instruction(NodeInstruction::copy(
        "/content/{{namespace}}/{{pluginId}}",
        NodeSpec::new("hippostd:folder"),
    ))
}

/// 항상 실패하는 프로젝트 파일 저장소
struct ReadOnlyProjectFiles;

#[async_trait]
impl ProjectFileStore for ReadOnlyProjectFiles {
    async fn has_dependency(&self, _dependency: &Dependency) -> Result<bool> {
        Ok(false)
    }

    async fn add_dependency(&self, dependency: &Dependency) -> Result<bool> {
        Err(Error::Storage(format!("cannot write {}", dependency.coordinates())))
    }

    async fn has_repository(&self, _repository: &Repository) -> Result<bool> {
        Ok(false)
    }

    async fn add_repository(&self, _repository: &Repository) -> Result<bool> {
        Ok(false)
    }
}

// ============================================================================
// Install
// ============================================================================

#[tokio::test]
async fn test_install_adds_only_missing_dependency() {
    let existing = Dependency::new("org.example", "common-cms");
    let missing = Dependency::new("org.example", "news-cms");
    let plugin = PluginDescriptor::new("news", PluginType::Feature)
        .with_dependency(existing.clone())
        .with_dependency(missing.clone())
        .with_package("news");
    let fixture = Fixture::new(vec![plugin]);

    let files = fixture.project_files();
    files.add_dependency(&existing).await.unwrap();

    let manager = fixture.manager();
    let doc = manager.install("news").await.unwrap();
    assert_eq!(doc.installation_state, InstallState::Boarding);
    assert!(doc.date_installed.is_some());

    let descriptor = files.descriptor(TargetPom::Cms).unwrap();
    assert_eq!(descriptor.dependencies.len(), 2);
    assert_eq!(
        descriptor
            .dependencies
            .iter()
            .filter(|d| d.artifact_id == "common-cms")
            .count(),
        1
    );

    let listed = manager.get_plugin("news").await.unwrap();
    assert_eq!(listed.install_state, InstallState::Boarding);
}

#[tokio::test]
async fn test_dependency_failure_lists_coordinates_and_persists_nothing() {
    let plugin = PluginDescriptor::new("news", PluginType::Feature)
        .with_dependency(Dependency::new("org.example", "news-cms"))
        .with_repository(Repository::new("example", "https://repo.example.org/maven2"));
    let fixture = Fixture::new(vec![plugin]);
    let manager = fixture.manager_with_files(Arc::new(ReadOnlyProjectFiles));

    let err = manager.install("news").await.unwrap_err();
    match &err {
        Error::DependencyInstallation {
            plugin,
            dependencies,
            repositories,
        } => {
            assert_eq!(plugin, "news");
            assert_eq!(dependencies, &vec!["org.example:news-cms".to_string()]);
            assert_eq!(
                repositories,
                &vec!["https://repo.example.org/maven2".to_string()]
            );
        }
        other => panic!("unexpected error: {other}"),
    }

    let listed = manager.get_plugin("news").await.unwrap();
    assert_eq!(listed.install_state, InstallState::Discovered);
}

// ============================================================================
// Rebuild / Setup
// ============================================================================

#[tokio::test]
async fn test_full_lifecycle_across_rebuilds() {
    let plugin = PluginDescriptor::new("news", PluginType::Feature)
        .with_dependency(Dependency::new("org.example", "news-cms"))
        .with_package("news")
        .with_rebuild_after_setup(true);
    let fixture = Fixture::new(vec![plugin]);
    fixture.packages.register(Arc::new(folder_package("news")));
    let manager = fixture.manager();

    manager.install("news").await.unwrap();

    // 재빌드 전: boarding 유지
    let listed = manager.get_plugin("news").await.unwrap();
    assert_eq!(listed.install_state, InstallState::Boarding);

    fixture.rebuild("news");
    let listed = manager.get_plugin("news").await.unwrap();
    assert_eq!(listed.install_state, InstallState::Onboard);

    // project 문서도 다시 쓰였는지
    let stored: InstallerDocument = fixture
        .project_documents()
        .read_as(DocumentKind::Installer, "news")
        .unwrap()
        .unwrap();
    assert_eq!(stored.installation_state, InstallState::Onboard);

    let doc = manager
        .setup("news", &manager.default_parameters())
        .await
        .unwrap();
    assert_eq!(doc.installation_state, InstallState::Installing);
    assert!(doc.date_added.is_some());
    assert!(fixture.repository.node_exists("/content/acme/news"));

    fixture.rebuild("news");
    let listed = manager.get_plugin("news").await.unwrap();
    assert_eq!(listed.install_state, InstallState::Installed);

    // installed 상태의 재설정은 상태를 바꾸지 않음
    let doc = manager.setup("news", &SetupParameters::new()).await.unwrap();
    assert_eq!(doc.installation_state, InstallState::Installed);
}

#[tokio::test]
async fn test_failed_setup_rolls_back_session_and_keeps_state() {
    let plugin = PluginDescriptor::new("tags", PluginType::Feature).with_package("tags");
    let fixture = Fixture::new(vec![plugin]);
    fixture.packages.register(Arc::new(
        folder_package("tags").with_instruction(NamespaceInstruction::new("acme", "http://acme/1.0")),
    ));
    {
        let mut session = fixture.repository.session();
        session.register_namespace("acme", "http://acme/1.0").unwrap();
        session.commit().unwrap();
    }
    fixture.set_state("tags", InstallState::Onboard);
    let manager = fixture.manager();

    let err = manager
        .setup("tags", &SetupParameters::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InstructionFailed { .. }));
    assert!(!fixture.repository.node_exists("/content/acme/tags"));

    let listed = manager.get_plugin("tags").await.unwrap();
    assert_eq!(listed.install_state, InstallState::Onboard);
}

#[tokio::test]
async fn test_common_package_runs_before_plugin_package() {
    let plugin = PluginDescriptor::new("blog", PluginType::Feature).with_package("blog");
    let fixture = Fixture::new(vec![plugin]);
    fixture.packages.register(Arc::new(
        DeclarativePackage::new(COMMON_PACKAGE_ID).with_instruction(NodeInstruction::copy(
            "/content/{{namespace}}",
            NodeSpec::new("hippostd:folder"),
        )),
    ));
    fixture.packages.register(Arc::new(
        DeclarativePackage::new("blog")
            .with_instruction(NodeInstruction::copy_from("/content/{{namespace}}", "/backup/site")),
    ));
    fixture.set_state("blog", InstallState::Onboard);

    let manager = fixture.manager();
    let doc = manager.setup("blog", &SetupParameters::new()).await.unwrap();
    assert_eq!(doc.installation_state, InstallState::Installed);
    assert!(fixture.repository.node_exists("/backup/site"));
}

#[tokio::test]
async fn test_signal_setup() {
    let plugin = PluginDescriptor::new("news", PluginType::Feature)
        .with_package("news")
        .with_rebuild_after_setup(true);
    let fixture = Fixture::new(vec![plugin]);
    fixture.set_state("news", InstallState::Onboard);

    let doc = fixture.manager().signal_setup("news").await.unwrap();
    assert_eq!(doc.installation_state, InstallState::Installing);
    assert!(doc.date_added.is_some());
}

#[tokio::test]
async fn test_signal_setup_refuses_states_before_onboard() {
    let plugin = PluginDescriptor::new("news", PluginType::Feature)
        .with_package("news")
        .with_rebuild_after_setup(true);
    let fixture = Fixture::new(vec![plugin]);
    let manager = fixture.manager();

    // 설치되지 않은 플러그인
    let err = manager.signal_setup("news").await.unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    let doc: Option<InstallerDocument> = fixture
        .project_documents()
        .read_as(DocumentKind::Installer, "news")
        .unwrap();
    assert!(doc.is_none());

    // 재빌드 대기 중인 플러그인
    fixture.set_state("news", InstallState::Boarding);
    let err = manager.signal_setup("news").await.unwrap_err();
    assert!(matches!(err, Error::InvalidState { .. }));
    let doc: InstallerDocument = fixture
        .project_documents()
        .read_as(DocumentKind::Installer, "news")
        .unwrap()
        .unwrap();
    assert_eq!(doc.installation_state, InstallState::Boarding);
}

#[tokio::test]
async fn test_signal_setup_while_installing_keeps_state() {
    let plugin = PluginDescriptor::new("news", PluginType::Feature)
        .with_package("news")
        .with_rebuild_after_setup(true);
    let fixture = Fixture::new(vec![plugin]);
    fixture.set_state("news", InstallState::Installing);

    let doc = fixture.manager().signal_setup("news").await.unwrap();
    assert_eq!(doc.installation_state, InstallState::Installing);
}

#[tokio::test]
async fn test_unreadable_installer_document_blocks_install() {
    let plugin = PluginDescriptor::new("news", PluginType::Feature).with_package("news");
    let fixture = Fixture::new(vec![plugin]);
    let path = fixture.root().join(PROJECT_DIR).join("installer").join("news.json");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ \"id\": \"news\", \"installationState\": ").unwrap();

    let manager = fixture.manager();
    let listed = manager.get_plugin("news").await.unwrap();
    assert_eq!(listed.install_state, InstallState::Discovered);

    assert!(manager.install("news").await.is_err());
    // 문서는 덮어쓰지 않음
    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.ends_with("\"installationState\": "));
}

#[tokio::test]
async fn test_preview_interpolates_without_executing() {
    let plugin = PluginDescriptor::new("news", PluginType::Feature).with_package("news");
    let fixture = Fixture::new(vec![plugin]);
    fixture.packages.register(Arc::new(folder_package("news")));
    let manager = fixture.manager();

    let messages = manager
        .preview_changes("news", &SetupParameters::new())
        .await
        .unwrap();
    assert_eq!(messages, vec!["Add node /content/acme/news".to_string()]);
    assert!(!fixture.repository.node_exists("/content/acme/news"));
}

// ============================================================================
// Auto setup / status
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_auto_setup_is_serialized() {
    let plugins = vec![
        PluginDescriptor::new("news", PluginType::Feature)
            .with_package("news")
            .with_generalized_setup(true),
        PluginDescriptor::new("events", PluginType::Feature)
            .with_package("events")
            .with_generalized_setup(true),
    ];
    let fixture = Fixture::new(plugins);
    fixture.packages.register(Arc::new(folder_package("news")));
    fixture.packages.register(Arc::new(folder_package("events")));
    fixture.set_state("news", InstallState::Onboard);
    fixture.set_state("events", InstallState::Onboard);
    let manager = Arc::new(fixture.manager());

    let first = tokio::spawn({
        let manager = Arc::clone(&manager);
        async move { manager.auto_setup().await }
    });
    let second = tokio::spawn({
        let manager = Arc::clone(&manager);
        async move { manager.auto_setup().await }
    });
    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();

    assert!(first.failed.is_empty());
    assert!(second.failed.is_empty());
    let mut all: Vec<String> = first.set_up.into_iter().chain(second.set_up).collect();
    all.sort();
    assert_eq!(all, vec!["events".to_string(), "news".to_string()]);
}

#[tokio::test]
async fn test_auto_setup_respects_confirm_params() {
    let mut config = EssentialsConfig::new().with_namespace("acme");
    config.settings.confirm_params = true;
    let plugins = vec![
        PluginDescriptor::new("asks", PluginType::Feature)
            .with_package("asks")
            .with_generalized_setup(true)
            .with_setup_parameters(true),
        PluginDescriptor::new("silent", PluginType::Feature)
            .with_package("silent")
            .with_generalized_setup(true),
    ];
    let fixture = Fixture::with_config(plugins, config);
    fixture.packages.register(Arc::new(folder_package("asks")));
    fixture.packages.register(Arc::new(folder_package("silent")));
    fixture.set_state("asks", InstallState::Onboard);
    fixture.set_state("silent", InstallState::Onboard);

    let report = fixture.manager().auto_setup().await.unwrap();
    assert_eq!(report.set_up, vec!["silent".to_string()]);
}

#[tokio::test]
async fn test_auto_setup_isolates_failures() {
    let plugins = vec![
        PluginDescriptor::new("broken", PluginType::Feature)
            .with_package("missing")
            .with_generalized_setup(true),
        PluginDescriptor::new("news", PluginType::Feature)
            .with_package("news")
            .with_generalized_setup(true),
    ];
    let fixture = Fixture::new(plugins);
    fixture.packages.register(Arc::new(folder_package("news")));
    fixture.set_state("broken", InstallState::Onboard);
    fixture.set_state("news", InstallState::Onboard);

    let report = fixture.manager().auto_setup().await.unwrap();
    assert_eq!(report.set_up, vec!["news".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].plugin, "broken");
}

#[tokio::test]
async fn test_system_status_initializes_once() {
    let plugins = vec![
        PluginDescriptor::new("news", PluginType::Feature)
            .with_package("news")
            .with_generalized_setup(true),
        PluginDescriptor::new("manual", PluginType::Feature).with_package("manual"),
        PluginDescriptor::new("blog", PluginType::Feature)
            .with_dependency(Dependency::new("org.example", "blog")),
        PluginDescriptor::new("inspector", PluginType::Tool),
    ];
    let fixture = Fixture::new(plugins);
    fixture.packages.register(Arc::new(folder_package("news")));
    fixture.set_state("news", InstallState::Onboard);
    fixture.set_state("manual", InstallState::Onboard);
    fixture.set_state("blog", InstallState::Boarding);
    let manager = fixture.manager();
    assert!(!manager.is_initialized());

    let info = manager.system_status().await.unwrap();
    assert!(info.initialized);
    assert!(manager.is_initialized());
    assert_eq!(info.plugin_count, 4);
    assert_eq!(info.tool_count, 1);
    assert_eq!(info.installed_features, 3);
    assert_eq!(info.configurable_plugins, 1);
    assert!(info.needs_rebuild);
    assert_eq!(info.rebuild_plugins, vec!["blog".to_string()]);

    let listed = manager.get_plugin("news").await.unwrap();
    assert_eq!(listed.install_state, InstallState::Installed);
}

// ============================================================================
// Remote catalogs
// ============================================================================

#[tokio::test]
async fn test_remote_catalogs_merge_and_tolerate_failures() {
    let remote_dir = TempDir::new().unwrap();
    PluginCatalog::new(vec![
        PluginDescriptor::new("news", PluginType::Feature).with_name("Remote News"),
        PluginDescriptor::new("gallery", PluginType::Feature),
    ])
    .save_local(remote_dir.path())
    .unwrap();

    let mut config = EssentialsConfig::new().with_namespace("acme");
    config.settings.plugin_repositories = vec![
        format!("file://{}", remote_dir.path().join("plugins.json").display()),
        "file:///nonexistent/plugins.json".to_string(),
    ];
    let fixture = Fixture::with_config(
        vec![PluginDescriptor::new("news", PluginType::Feature).with_name("Local News")],
        config,
    );
    let manager = fixture.manager();

    let plugins = manager.list_plugins().await.unwrap();
    let ids: Vec<&str> = plugins.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["news", "gallery"]);
    assert_eq!(plugins[0].name, "Local News");

    // 캐시된 목록은 원격 파일이 사라져도 유지
    std::fs::remove_file(remote_dir.path().join("plugins.json")).unwrap();
    assert_eq!(manager.list_plugins().await.unwrap().len(), 2);

    manager.clear_remote_catalog_cache();
    assert_eq!(manager.list_plugins().await.unwrap().len(), 1);
}
