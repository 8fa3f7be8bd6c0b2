//! Plugin Manager - 플러그인 라이프사이클 관리
//!
//! ## 흐름
//!
//! ```text
//! discovered ──install──▶ boarding ──rebuild──▶ onboard ──setup──▶ installing ──rebuild──▶ installed
//!                    └──(packaged)──────────────▶ onboard / installed
//! ```
//!
//! - 설치 상태는 목록 조회 때마다 resource/project 설치 문서를 비교해 계산
//! - install/setup/auto_setup은 하나의 setup 게이트로 직렬화
//! - system_status(ping)는 별도의 ping 게이트 아래에서 최초 1회 자동 설정 수행

use chrono::Utc;
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

use essentials_foundation::{
    global_event_log, DisplayEvent, DocumentKind, DocumentStore, DocumentStoreExt,
    EssentialsConfig, EventLog, FileDocumentStore, ResourceDocumentStore, Error, Result,
    PROJECT_DIR,
};

use super::catalog::{CatalogFetcher, HttpCatalogFetcher, PluginCatalog, RemoteCatalogCache};
use super::descriptor::PluginDescriptor;
use super::gate::ExclusiveGate;
use super::state::{reconcile, InstallState, InstallerDocument};
use crate::beans::{BeanSynthesizer, SynthesizerSettings};
use crate::content::ContentTypeService;
use crate::instruction::{
    InstructionContext, InstructionExecutor, InstructionPackage, PackageRegistry,
    COMMON_PACKAGE_ID, PACKAGE_DIR,
};
use crate::project::{JsonProjectFiles, ProjectFileStore};
use crate::repository::ContentRepository;

/// 설정 파라미터 (placeholder로 전달)
pub type SetupParameters = BTreeMap<String, String>;

/// 프로젝트 저장소 아래 기본 파일 위치
pub const REPOSITORY_FILE: &str = "repository.json";
pub const PROJECT_FILES_DIR: &str = "project";

const EVENT_SOURCE: &str = "plugins";

const PING_CONTENTION: &str =
    "You appear to be using two dashboards at the same time. Essentials doesn't support that";
const SETUP_CONTENTION: &str = "Another plugin setup is in progress, waiting for it to finish";

// ============================================================================
// Reports
// ============================================================================

/// 자동 설정 실패 항목
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSetupFailure {
    pub plugin: String,
    pub message: String,
}

/// 자동 설정 결과
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoSetupReport {
    pub set_up: Vec<String>,
    pub failed: Vec<AutoSetupFailure>,
}

impl AutoSetupReport {
    pub fn is_empty(&self) -> bool {
        self.set_up.is_empty() && self.failed.is_empty()
    }
}

/// system_status 결과
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub initialized: bool,
    pub plugin_count: usize,
    pub tool_count: usize,
    pub installed_features: usize,
    pub configurable_plugins: usize,
    pub needs_rebuild: bool,
    pub rebuild_plugins: Vec<String>,
}

// ============================================================================
// Builder
// ============================================================================

/// PluginManager 빌더 - 지정하지 않은 협력자는 프로젝트 루트 기준 기본 구현 사용
pub struct PluginManagerBuilder {
    project_root: PathBuf,
    config: Option<EssentialsConfig>,
    project_store: Option<Arc<dyn DocumentStore>>,
    resource_store: Option<Arc<dyn DocumentStore>>,
    project_files: Option<Arc<dyn ProjectFileStore>>,
    repository: Option<Arc<ContentRepository>>,
    packages: Option<Arc<PackageRegistry>>,
    fetcher: Option<Arc<dyn CatalogFetcher>>,
    events: Option<Arc<EventLog>>,
    synthesizer: Option<Arc<BeanSynthesizer>>,
}

impl PluginManagerBuilder {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            config: None,
            project_store: None,
            resource_store: None,
            project_files: None,
            repository: None,
            packages: None,
            fetcher: None,
            events: None,
            synthesizer: None,
        }
    }

    pub fn config(mut self, config: EssentialsConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn project_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.project_store = Some(store);
        self
    }

    pub fn resource_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.resource_store = Some(store);
        self
    }

    pub fn project_files(mut self, files: Arc<dyn ProjectFileStore>) -> Self {
        self.project_files = Some(files);
        self
    }

    pub fn repository(mut self, repository: Arc<ContentRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn packages(mut self, packages: Arc<PackageRegistry>) -> Self {
        self.packages = Some(packages);
        self
    }

    pub fn fetcher(mut self, fetcher: Arc<dyn CatalogFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    pub fn events(mut self, events: Arc<EventLog>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn synthesizer(mut self, synthesizer: Arc<BeanSynthesizer>) -> Self {
        self.synthesizer = Some(synthesizer);
        self
    }

    pub fn build(self) -> Result<PluginManager> {
        let root = self.project_root;
        let config = match self.config {
            Some(config) => config,
            None => EssentialsConfig::load(&root)?,
        };
        let project_dir = root.join(PROJECT_DIR);
        let resource_dir = root.join(config.resource_dir());

        let repository = match self.repository {
            Some(repository) => repository,
            None => ContentRepository::open(project_dir.join(REPOSITORY_FILE))?,
        };
        let packages = match self.packages {
            Some(packages) => packages,
            None => Arc::new(PackageRegistry::load_dir(resource_dir.join(PACKAGE_DIR))?),
        };
        let events = self.events.unwrap_or_else(global_event_log);
        let synthesizer = self.synthesizer.unwrap_or_else(|| {
            let types: Arc<dyn ContentTypeService> = repository.clone();
            Arc::new(BeanSynthesizer::new(
                types,
                SynthesizerSettings::from_config(&root, &config),
                events.clone(),
            ))
        });

        Ok(PluginManager {
            project_store: self
                .project_store
                .unwrap_or_else(|| Arc::new(FileDocumentStore::new(&project_dir))),
            resource_store: self
                .resource_store
                .unwrap_or_else(|| Arc::new(ResourceDocumentStore::new(&resource_dir))),
            project_files: self.project_files.unwrap_or_else(|| {
                Arc::new(JsonProjectFiles::new(project_dir.join(PROJECT_FILES_DIR)))
            }),
            fetcher: self
                .fetcher
                .unwrap_or_else(|| Arc::new(HttpCatalogFetcher::new())),
            remote_cache: RemoteCatalogCache::new(config.catalog_ttl()),
            executor: InstructionExecutor::new(),
            setup_gate: ExclusiveGate::new("setup", SETUP_CONTENTION),
            ping_gate: ExclusiveGate::new("ping", PING_CONTENTION),
            initialized: AtomicBool::new(false),
            resource_dir,
            repository,
            packages,
            events,
            synthesizer,
            config,
        })
    }
}

// ============================================================================
// PluginManager
// ============================================================================

/// 플러그인 라이프사이클 매니저
pub struct PluginManager {
    config: EssentialsConfig,
    resource_dir: PathBuf,

    /// 실행 중 갱신되는 설치 문서
    project_store: Arc<dyn DocumentStore>,

    /// 빌드 시점 설치 문서 (읽기 전용)
    resource_store: Arc<dyn DocumentStore>,

    project_files: Arc<dyn ProjectFileStore>,
    repository: Arc<ContentRepository>,
    packages: Arc<PackageRegistry>,
    executor: InstructionExecutor,
    fetcher: Arc<dyn CatalogFetcher>,
    remote_cache: RemoteCatalogCache,
    events: Arc<EventLog>,
    synthesizer: Arc<BeanSynthesizer>,

    setup_gate: ExclusiveGate,
    ping_gate: ExclusiveGate,
    initialized: AtomicBool,
}

impl PluginManager {
    pub fn builder(project_root: impl Into<PathBuf>) -> PluginManagerBuilder {
        PluginManagerBuilder::new(project_root)
    }

    pub fn config(&self) -> &EssentialsConfig {
        &self.config
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }

    pub fn repository(&self) -> &Arc<ContentRepository> {
        &self.repository
    }

    pub fn packages(&self) -> &Arc<PackageRegistry> {
        &self.packages
    }

    pub fn synthesizer(&self) -> &Arc<BeanSynthesizer> {
        &self.synthesizer
    }

    pub fn events(&self) -> &Arc<EventLog> {
        &self.events
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    // ========================================================================
    // 목록
    // ========================================================================

    /// 로컬 + 원격 카탈로그의 플러그인 (id 기준 중복 제거, 먼저 나온 항목 우선)
    pub async fn list_plugins(&self) -> Result<Vec<PluginDescriptor>> {
        let mut plugins = PluginCatalog::load_local(&self.resource_dir)?.plugins;

        let remote = join_all(
            self.config
                .settings
                .plugin_repositories
                .iter()
                .map(|url| self.remote_plugins(url)),
        )
        .await;
        plugins.extend(remote.into_iter().flatten());

        let mut seen = HashSet::new();
        plugins.retain(|p| seen.insert(p.id.clone()));

        for plugin in &mut plugins {
            self.resolve_install_state(plugin);
        }
        Ok(plugins)
    }

    pub async fn get_plugin(&self, id: &str) -> Result<PluginDescriptor> {
        self.list_plugins()
            .await?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::NotFound(format!("plugin {}", id)))
    }

    pub fn clear_remote_catalog_cache(&self) {
        self.remote_cache.clear();
        info!("Remote plugin catalog cache cleared");
    }

    async fn remote_plugins(&self, url: &str) -> Vec<PluginDescriptor> {
        if let Some(plugins) = self.remote_cache.get(url) {
            debug!("Using cached plugin catalog for {}", url);
            return plugins;
        }
        match self.fetcher.fetch(url).await {
            Ok(catalog) => {
                self.remote_cache.insert(url, catalog.plugins.clone());
                catalog.plugins
            }
            Err(e) => {
                warn!("Ignoring plugin catalog: {}", e);
                Vec::new()
            }
        }
    }

    fn resolve_install_state(&self, plugin: &mut PluginDescriptor) {
        match self.determine_install_state(plugin) {
            Ok(Some(document)) => {
                plugin.install_state = document.installation_state;
                plugin.date_installed = document.recent_install_date(Utc::now());
            }
            Ok(None) => plugin.install_state = InstallState::Discovered,
            Err(e) => {
                warn!("Failed to read installer document for {}: {}", plugin.id, e);
                plugin.install_state = InstallState::Discovered;
            }
        }
        plugin.has_configuration =
            plugin.has_configuration && plugin.install_state.exposes_configuration();
    }

    fn determine_install_state(
        &self,
        plugin: &PluginDescriptor,
    ) -> Result<Option<InstallerDocument>> {
        let project: Option<InstallerDocument> =
            self.project_store.read_as(DocumentKind::Installer, &plugin.id)?;
        if project.is_none() {
            return Ok(None);
        }

        let resource: Option<InstallerDocument> = self
            .resource_store
            .read_as(DocumentKind::Installer, &plugin.id)
            .unwrap_or_else(|e| {
                warn!("Failed to read resource installer document for {}: {}", plugin.id, e);
                None
            });

        match reconcile(resource.as_ref(), project, plugin.has_setup_package()) {
            Some((document, true)) => {
                // 상태는 두 문서에서 다시 계산됨
                match self
                    .project_store
                    .write_as(DocumentKind::Installer, &plugin.id, &document)
                {
                    Ok(()) => info!(
                        "Plugin {} advanced to {} after rebuild",
                        plugin.id, document.installation_state
                    ),
                    Err(e) => warn!(
                        "Failed to record {} advancing to {}: {}",
                        plugin.id, document.installation_state, e
                    ),
                }
                Ok(Some(document))
            }
            Some((document, false)) => Ok(Some(document)),
            None => Ok(None),
        }
    }

    // ========================================================================
    // 설치
    // ========================================================================

    /// 발견된 플러그인 설치
    pub async fn install(&self, id: &str) -> Result<InstallerDocument> {
        let _guard = self.setup_gate.enter().await;
        let plugin = self.get_plugin(id).await?;

        // 읽을 수 없는 설치 문서는 설치를 막음
        let recorded: Option<InstallerDocument> =
            self.project_store.read_as(DocumentKind::Installer, id)?;
        let state = recorded
            .map(|doc| doc.installation_state)
            .unwrap_or(plugin.install_state);
        if state != InstallState::Discovered {
            return Err(Error::invalid_state(
                id,
                format!("cannot install plugin in state {}", state),
            ));
        }
        self.install_locked(&plugin).await
    }

    /// 상태와 무관하게 다시 설치
    pub async fn reinstall(&self, id: &str) -> Result<InstallerDocument> {
        let _guard = self.setup_gate.enter().await;
        let plugin = self.get_plugin(id).await?;
        info!("Reinstalling plugin {} (was {})", id, plugin.install_state);
        self.install_locked(&plugin).await
    }

    async fn install_locked(&self, plugin: &PluginDescriptor) -> Result<InstallerDocument> {
        let mut failed_dependencies = Vec::new();
        let mut failed_repositories = Vec::new();

        for dependency in &plugin.dependencies {
            if let Err(e) = self.ensure_dependency(dependency).await {
                warn!("Failed to add dependency {}: {}", dependency.coordinates(), e);
                failed_dependencies.push(dependency.coordinates());
            }
        }
        for repository in &plugin.repositories {
            if let Err(e) = self.ensure_repository(repository).await {
                warn!("Failed to add repository {}: {}", repository.url, e);
                failed_repositories.push(repository.url.clone());
            }
        }

        if !failed_dependencies.is_empty() || !failed_repositories.is_empty() {
            self.events.publish(
                DisplayEvent::error(format!("Failed to install {}", plugin.display_name()))
                    .with_source(EVENT_SOURCE),
            );
            return Err(Error::DependencyInstallation {
                plugin: plugin.id.clone(),
                dependencies: failed_dependencies,
                repositories: failed_repositories,
            });
        }

        let state = if plugin.is_packaged() {
            InstallState::after_packaged(plugin.has_setup_package())
        } else {
            InstallState::Boarding
        };
        let document = InstallerDocument::installed_now(&plugin.id, state);
        self.project_store
            .write_as(DocumentKind::Installer, &plugin.id, &document)?;

        info!("Installed plugin {} ({})", plugin.id, state);
        self.events.publish(
            DisplayEvent::strong(format!("Installed {}", plugin.display_name()))
                .with_source(EVENT_SOURCE),
        );
        if state == InstallState::Boarding {
            self.events.publish(
                DisplayEvent::new(format!(
                    "{} requires a rebuild of the project",
                    plugin.display_name()
                ))
                .with_source(EVENT_SOURCE),
            );
        }

        if state != InstallState::Onboard {
            return Ok(document);
        }

        let mut onboard = plugin.clone();
        onboard.install_state = state;
        match self.setup_if_possible(&onboard).await {
            Ok(Some(updated)) => Ok(updated),
            Ok(None) => Ok(document),
            Err(e) => {
                warn!("Automatic setup of {} failed: {}", plugin.id, e);
                Ok(document)
            }
        }
    }

    async fn ensure_dependency(&self, dependency: &crate::project::Dependency) -> Result<()> {
        if self.project_files.has_dependency(dependency).await? {
            return Ok(());
        }
        if self.project_files.add_dependency(dependency).await? {
            Ok(())
        } else {
            Err(Error::Storage(format!(
                "dependency {} was not added",
                dependency.coordinates()
            )))
        }
    }

    async fn ensure_repository(&self, repository: &crate::project::Repository) -> Result<()> {
        if self.project_files.has_repository(repository).await? {
            return Ok(());
        }
        if self.project_files.add_repository(repository).await? {
            Ok(())
        } else {
            Err(Error::Storage(format!("repository {} was not added", repository.url)))
        }
    }

    // ========================================================================
    // 설정
    // ========================================================================

    /// 플러그인 설정 (onboard → installing/installed, installed는 재실행)
    pub async fn setup(&self, id: &str, params: &SetupParameters) -> Result<InstallerDocument> {
        let _guard = self.setup_gate.enter().await;
        let plugin = self.get_plugin(id).await?;
        match plugin.install_state {
            InstallState::Onboard | InstallState::Installed => {}
            other => {
                return Err(Error::invalid_state(
                    id,
                    format!("cannot set up plugin in state {}", other),
                ))
            }
        }
        self.setup_locked(&plugin, params).await
    }

    /// 외부에서 설정이 끝났음을 알림 (설정 후 상태 갱신만 수행)
    pub async fn signal_setup(&self, id: &str) -> Result<InstallerDocument> {
        let _guard = self.setup_gate.enter().await;
        let plugin = self.get_plugin(id).await?;
        match plugin.install_state {
            InstallState::Onboard | InstallState::Installing | InstallState::Installed => {}
            other => {
                return Err(Error::invalid_state(
                    id,
                    format!("cannot signal setup of plugin in state {}", other),
                ))
            }
        }
        self.update_state_after_setup(&plugin, self.requires_rebuild(&plugin))
    }

    /// 자동 설정 가능한 모든 onboard 플러그인 설정
    pub async fn auto_setup(&self) -> Result<AutoSetupReport> {
        let _guard = self.setup_gate.enter().await;
        self.auto_setup_locked().await
    }

    /// 설정 instruction이 수행할 변경 설명 (실행하지 않음)
    pub async fn preview_changes(&self, id: &str, params: &SetupParameters) -> Result<Vec<String>> {
        let plugin = self.get_plugin(id).await?;
        let package = self.package_for(&plugin)?;
        let ctx = self.context(&plugin, params);
        Ok(self.executor.preview(&package.instructions(), &ctx))
    }

    /// 기본 파라미터 (sampleData, templateName)
    pub fn default_parameters(&self) -> SetupParameters {
        self.config.settings.default_parameters().into_iter().collect()
    }

    fn can_auto_setup(&self, plugin: &PluginDescriptor) -> bool {
        plugin.install_state == InstallState::Onboard
            && plugin.generalized_setup
            && (!self.config.settings.confirm_params || !plugin.setup_parameters)
    }

    fn requires_rebuild(&self, plugin: &PluginDescriptor) -> bool {
        plugin.setup_requires_rebuild
            || plugin
                .package_id
                .as_deref()
                .and_then(|id| self.packages.get(id))
                .map(|p| p.requires_rebuild())
                .unwrap_or(false)
    }

    async fn auto_setup_locked(&self) -> Result<AutoSetupReport> {
        let mut report = AutoSetupReport::default();
        let params = self.default_parameters();

        for plugin in self.list_plugins().await? {
            if !self.can_auto_setup(&plugin) {
                continue;
            }
            match self.setup_locked(&plugin, &params).await {
                Ok(_) => report.set_up.push(plugin.id.clone()),
                Err(e) => {
                    warn!("Automatic setup of {} failed: {}", plugin.id, e);
                    report.failed.push(AutoSetupFailure {
                        plugin: plugin.id.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        if !report.is_empty() {
            info!(
                "Automatic setup finished: {} succeeded, {} failed",
                report.set_up.len(),
                report.failed.len()
            );
        }
        Ok(report)
    }

    async fn setup_if_possible(
        &self,
        plugin: &PluginDescriptor,
    ) -> Result<Option<InstallerDocument>> {
        if !self.can_auto_setup(plugin) {
            debug!("Plugin {} requires manual setup", plugin.id);
            return Ok(None);
        }
        let params = self.default_parameters();
        self.setup_locked(plugin, &params).await.map(Some)
    }

    fn package_for(&self, plugin: &PluginDescriptor) -> Result<Arc<dyn InstructionPackage>> {
        let package_id = plugin.package_id.as_deref().ok_or_else(|| {
            Error::instruction_failed(&plugin.id, "package", "plugin has no setup package")
        })?;
        self.packages.get(package_id).ok_or_else(|| {
            Error::instruction_failed(
                &plugin.id,
                package_id,
                "instruction package is not registered",
            )
        })
    }

    fn context(&self, plugin: &PluginDescriptor, params: &SetupParameters) -> InstructionContext {
        InstructionContext::new(&plugin.id, self.config.namespace(), self.repository.session())
            .with_synthesizer(self.synthesizer.clone())
            .with_placeholders(params.clone())
    }

    async fn run_package(
        &self,
        plugin: &PluginDescriptor,
        package: &dyn InstructionPackage,
        ctx: &mut InstructionContext,
    ) -> Result<()> {
        debug!("Running package {} for {}", package.id(), plugin.id);
        let report = self.executor.execute(&package.instructions(), ctx).await?;
        match report.failed() {
            Some(failed) => Err(Error::instruction_failed(
                &plugin.id,
                &failed.instruction,
                &failed.description,
            )),
            None => Ok(()),
        }
    }

    async fn setup_locked(
        &self,
        plugin: &PluginDescriptor,
        params: &SetupParameters,
    ) -> Result<InstallerDocument> {
        let package = self.package_for(plugin)?;
        let mut ctx = self.context(plugin, params);

        let result = async {
            if let Some(common) = self.packages.get(COMMON_PACKAGE_ID) {
                self.run_package(plugin, common.as_ref(), &mut ctx).await?;
            }
            self.run_package(plugin, package.as_ref(), &mut ctx).await
        }
        .await;

        if let Err(e) = result {
            self.events.publish(
                DisplayEvent::error(format!("Setup of {} failed", plugin.display_name()))
                    .with_source(EVENT_SOURCE),
            );
            return Err(e);
        }

        ctx.into_session().commit()?;
        let document = self.update_state_after_setup(
            plugin,
            package.requires_rebuild() || plugin.setup_requires_rebuild,
        )?;

        self.events.publish(
            DisplayEvent::strong(format!("Set up {}", plugin.display_name()))
                .with_source(EVENT_SOURCE),
        );
        Ok(document)
    }

    fn update_state_after_setup(
        &self,
        plugin: &PluginDescriptor,
        requires_rebuild: bool,
    ) -> Result<InstallerDocument> {
        let mut document: InstallerDocument = self
            .project_store
            .read_as(DocumentKind::Installer, &plugin.id)?
            .unwrap_or_else(|| InstallerDocument::new(&plugin.id, InstallState::Discovered));

        let current = document.installation_state;
        let next = match current {
            InstallState::Installed => InstallState::Installed,
            _ if requires_rebuild => InstallState::Installing,
            _ => InstallState::Installed,
        };
        if next != current && !current.can_advance_to(next) {
            return Err(Error::invalid_state(
                &plugin.id,
                format!("cannot move from {} to {} after setup", current, next),
            ));
        }

        document.date_added = Some(Utc::now());
        document.installation_state = next;

        self.project_store
            .write_as(DocumentKind::Installer, &plugin.id, &document)?;
        info!("Plugin {} set up ({})", plugin.id, document.installation_state);
        Ok(document)
    }

    // ========================================================================
    // 상태 (ping)
    // ========================================================================

    /// 시스템 상태 조회 (최초 호출 시 자동 설정 수행)
    pub async fn system_status(&self) -> Result<SystemInfo> {
        let _guard = self.ping_gate.enter().await;

        if !self.is_initialized() {
            let report = {
                let _setup = self.setup_gate.enter().await;
                self.auto_setup_locked().await?
            };
            debug!("First-time initialization set up {} plugin(s)", report.set_up.len());
            self.initialized.store(true, Ordering::Release);
        }

        let plugins = self.list_plugins().await?;
        let mut info = SystemInfo {
            initialized: true,
            plugin_count: plugins.len(),
            ..Default::default()
        };

        for plugin in &plugins {
            if plugin.is_tool() {
                info.tool_count += 1;
                continue;
            }
            if plugin.install_state != InstallState::Discovered {
                info.installed_features += 1;
            }
            if plugin.install_state == InstallState::Onboard {
                info.configurable_plugins += 1;
            }
            if plugin.install_state.awaits_rebuild() {
                info.rebuild_plugins.push(plugin.id.clone());
            }
        }
        info.needs_rebuild = !info.rebuild_plugins.is_empty();
        Ok(info)
    }
}
