//! Essentials init command
//!
//! Initializes a project with `.essentials` configuration and an empty resource layout.

use std::fs;
use std::path::Path;

use essentials_core::instruction::PACKAGE_DIR;
use essentials_core::PluginCatalog;
use essentials_foundation::{EssentialsConfig, CONFIG_FILE, PROJECT_DIR};

/// Initialize Essentials configuration in the project directory
pub fn init_project(root: &Path, namespace: Option<String>, force: bool) -> anyhow::Result<()> {
    let essentials_dir = root.join(PROJECT_DIR);

    // Check if already initialized
    if essentials_dir.join(CONFIG_FILE).exists() && !force {
        println!("✓ Essentials already initialized in {}.", root.display());
        println!("  Use --force to reinitialize.");
        return Ok(());
    }

    println!("Initializing Essentials...");

    let mut config = EssentialsConfig::new();
    if let Some(namespace) = namespace {
        config = config.with_namespace(namespace);
    }
    config.save_project(root)?;
    println!("  Created {}/{}", PROJECT_DIR, CONFIG_FILE);

    let resource_dir = root.join(config.resource_dir());
    fs::create_dir_all(resource_dir.join(PACKAGE_DIR))?;
    if PluginCatalog::load_local(&resource_dir)?.plugins.is_empty() {
        PluginCatalog::default().save_local(&resource_dir)?;
    }
    println!("  Created {}", config.resource_dir());

    println!("\n✓ Essentials initialized (namespace: {})", config.namespace());
    Ok(())
}
