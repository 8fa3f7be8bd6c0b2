//! `essentials plugins ...` subcommands

use clap::Subcommand;

use essentials_core::{PluginDescriptor, PluginManager, SetupParameters};

#[derive(Subcommand, Debug)]
pub enum PluginCommand {
    /// List plugins from the local and remote catalogs
    List,
    /// Show a single plugin
    Show { id: String },
    /// Install a discovered plugin
    Install { id: String },
    /// Reinstall a plugin regardless of its state
    Reinstall { id: String },
    /// Run the setup instructions of a plugin
    Setup {
        id: String,

        /// Setup parameter (repeatable), e.g. --param sampleData=false
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Mark a plugin as set up without running instructions
    SignalSetup { id: String },
    /// Set up every plugin that can be configured without user input
    AutoSetup,
    /// Describe what the setup of a plugin would change
    Preview {
        id: String,

        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
    /// Show system status (first call runs automatic setup)
    Status,
    /// Drop cached remote catalogs
    ClearCache,
}

fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", s))
}

/// 기본 파라미터 위에 사용자 파라미터 적용
fn parameters(manager: &PluginManager, params: Vec<(String, String)>) -> SetupParameters {
    let mut merged = manager.default_parameters();
    merged.extend(params);
    merged
}

pub async fn run(manager: &PluginManager, command: PluginCommand, json: bool) -> anyhow::Result<()> {
    match command {
        PluginCommand::List => {
            let plugins = manager.list_plugins().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plugins)?);
            } else {
                print_plugins(&plugins);
            }
        }
        PluginCommand::Show { id } => {
            let plugin = manager.get_plugin(&id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&plugin)?);
            } else {
                print_plugin(&plugin);
            }
        }
        PluginCommand::Install { id } => {
            let doc = manager.install(&id).await?;
            print_json_or(json, &doc, || {
                println!("{} is now {}", id, doc.installation_state)
            })?;
        }
        PluginCommand::Reinstall { id } => {
            let doc = manager.reinstall(&id).await?;
            print_json_or(json, &doc, || {
                println!("{} is now {}", id, doc.installation_state)
            })?;
        }
        PluginCommand::Setup { id, params } => {
            let params = parameters(manager, params);
            let doc = manager.setup(&id, &params).await?;
            print_json_or(json, &doc, || {
                println!("{} is now {}", id, doc.installation_state)
            })?;
        }
        PluginCommand::SignalSetup { id } => {
            let doc = manager.signal_setup(&id).await?;
            print_json_or(json, &doc, || {
                println!("{} is now {}", id, doc.installation_state)
            })?;
        }
        PluginCommand::AutoSetup => {
            let report = manager.auto_setup().await?;
            print_json_or(json, &report, || {
                if report.is_empty() {
                    println!("No plugins to set up.");
                }
                for id in &report.set_up {
                    println!("✓ {}", id);
                }
                for failure in &report.failed {
                    println!("✗ {}: {}", failure.plugin, failure.message);
                }
            })?;
        }
        PluginCommand::Preview { id, params } => {
            let params = parameters(manager, params);
            let messages = manager.preview_changes(&id, &params).await?;
            print_json_or(json, &messages, || {
                for message in &messages {
                    println!("  - {}", message);
                }
            })?;
        }
        PluginCommand::Status => {
            let info = manager.system_status().await?;
            print_json_or(json, &info, || {
                println!("Plugins:            {}", info.plugin_count);
                println!("Tools:              {}", info.tool_count);
                println!("Installed features: {}", info.installed_features);
                println!("Configurable:       {}", info.configurable_plugins);
                if info.needs_rebuild {
                    println!(
                        "Rebuild required for: {}",
                        info.rebuild_plugins.join(", ")
                    );
                }
            })?;
        }
        PluginCommand::ClearCache => {
            manager.clear_remote_catalog_cache();
            if !json {
                println!("Remote catalog cache cleared.");
            }
        }
    }
    Ok(())
}

fn print_json_or<T: serde::Serialize>(
    json: bool,
    value: &T,
    text: impl FnOnce(),
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        text();
    }
    Ok(())
}

fn print_plugins(plugins: &[PluginDescriptor]) {
    if plugins.is_empty() {
        println!("No plugins found.");
        return;
    }

    println!("{:<24} {:<30} {:<8} {:<12}", "ID", "Name", "Type", "State");
    println!("{}", "-".repeat(76));
    for plugin in plugins {
        let name = plugin.display_name();
        let name_display = if name.chars().count() > 28 {
            format!("{}...", name.chars().take(25).collect::<String>())
        } else {
            name.to_string()
        };
        let recent = if plugin.date_installed.is_some() { " (new)" } else { "" };
        println!(
            "{:<24} {:<30} {:<8} {:<12}{}",
            plugin.id,
            name_display,
            plugin.plugin_type.to_string(),
            plugin.install_state.to_string(),
            recent
        );
    }
}

fn print_plugin(plugin: &PluginDescriptor) {
    println!("{} ({})", plugin.display_name(), plugin.id);
    println!("  type:   {}", plugin.plugin_type);
    println!("  state:  {}", plugin.install_state);
    if let Some(description) = &plugin.description {
        println!("  about:  {}", description);
    }
    if let Some(date) = plugin.date_installed {
        println!("  installed: {}", date.format("%Y-%m-%d %H:%M"));
    }
    for dependency in &plugin.dependencies {
        println!("  dependency: {} ({})", dependency.coordinates(), dependency.target_pom.as_str());
    }
    for repository in &plugin.repositories {
        println!("  repository: {}", repository.url);
    }
    if let Some(package) = &plugin.package_id {
        println!("  setup package: {}", package);
    }
}
