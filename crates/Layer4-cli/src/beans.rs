//! `essentials beans ...` subcommands

use clap::Subcommand;

use essentials_core::{PluginManager, SynthesisReport};

#[derive(Subcommand, Debug)]
pub enum BeanCommand {
    /// Create missing beans and accessors for a namespace
    Synthesize {
        /// Namespace prefix (defaults to the project namespace)
        namespace: Option<String>,
    },
    /// Switch generated image accessors to another image set type
    ConvertImages {
        /// Image set content type or class name
        image_set: String,
    },
    /// Register hand-written bean sources that are not yet tracked
    Adopt,
}

pub async fn run(manager: &PluginManager, command: BeanCommand, json: bool) -> anyhow::Result<()> {
    let synthesizer = manager.synthesizer();
    let report = match command {
        BeanCommand::Synthesize { namespace } => {
            let namespace = namespace.unwrap_or_else(|| manager.config().namespace().to_string());
            synthesizer.synthesize(&namespace).await?
        }
        BeanCommand::ConvertImages { image_set } => {
            synthesizer.convert_image_methods(&image_set).await?
        }
        BeanCommand::Adopt => synthesizer.adopt_existing_sources().await?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &SynthesisReport) {
    if !report.has_changes() && report.unresolved.is_empty() && report.failed.is_empty() {
        println!("Beans are up to date.");
        return;
    }

    for change in &report.changes {
        match &change.member {
            Some(member) => println!("  {:?} {}: {}", change.kind, change.class_name, member),
            None => println!("  {:?} {}", change.kind, change.class_name),
        }
    }
    for unresolved in &report.unresolved {
        println!(
            "  ✗ {} (no bean for any of: {})",
            unresolved.content_type,
            unresolved.supertypes.join(", ")
        );
    }
    for failure in &report.failed {
        println!("  ✗ {}: {}", failure.target, failure.message);
    }
    println!(
        "\n{} change(s), {} unresolved, {} failed, {} pass(es)",
        report.changes.len(),
        report.unresolved.len(),
        report.failed.len(),
        report.passes
    );
}
