//! Essentials CLI - Main entry point

mod beans;
mod init;
mod plugins;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use essentials_core::PluginManager;
use essentials_foundation::{DisplayType, EssentialsConfig};

/// Essentials - plugin lifecycle and content bean tooling for CMS projects
#[derive(Parser, Debug)]
#[command(name = "essentials")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Project root directory
    #[arg(short = 'C', long, default_value = ".", global = true)]
    project: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize Essentials in the project directory
    Init {
        /// Project namespace prefix
        #[arg(short, long)]
        namespace: Option<String>,

        /// Force reinitialization even if already initialized
        #[arg(short, long)]
        force: bool,
    },
    /// Manage plugins
    #[command(subcommand)]
    Plugins(plugins::PluginCommand),
    /// Generate and maintain content beans
    #[command(subcommand)]
    Beans(beans::BeanCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match args.command {
        Command::Init { namespace, force } => init::init_project(&args.project, namespace, force),
        Command::Plugins(command) => {
            let manager = build_manager(&args.project)?;
            let result = plugins::run(&manager, command, args.json).await;
            print_messages(&manager, args.json);
            result
        }
        Command::Beans(command) => {
            let manager = build_manager(&args.project)?;
            let result = beans::run(&manager, command, args.json).await;
            print_messages(&manager, args.json);
            result
        }
    }
}

/// 실행 중 쌓인 진행 메시지 출력
fn print_messages(manager: &PluginManager, json: bool) {
    let events = manager.events().consume();
    if json || events.is_empty() {
        return;
    }
    println!();
    for event in events {
        match event.display_type {
            DisplayType::Error => println!("  ✗ {}", event.message),
            DisplayType::Strong => println!("  ✓ {}", event.message),
            _ => println!("  • {}", event.message),
        }
    }
}

fn build_manager(project: &Path) -> anyhow::Result<PluginManager> {
    let config = EssentialsConfig::load(project)?;
    tracing::debug!("Using namespace {}", config.namespace());
    Ok(PluginManager::builder(project).config(config).build()?)
}
