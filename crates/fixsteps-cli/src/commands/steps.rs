use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use fixsteps_core::{AppConfig, StepRegistry};
use fixsteps_tui::{app::STATUS_BAR_HEIGHT, Document, DocumentLayout};

/// One registry entry as printed by `fixsteps steps`
#[derive(Debug, Serialize)]
struct StepRow {
    index: usize,
    id: String,
    top: u16,
    height: u16,
    bottom: u16,
    behavior: Vec<&'static str>,
}

pub fn run(config: &AppConfig, path: &Path, width: u16, height: u16, json: bool) -> Result<()> {
    let document =
        Document::load(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let viewport = height.saturating_sub(STATUS_BAR_HEIGHT).max(1);
    let layout = DocumentLayout::compute(&document, width, viewport)?;
    let registry = StepRegistry::discover(&layout)?;
    let rows = step_rows(&registry, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Steps ({}) at {}x{}:\n", rows.len(), width, viewport);
    for row in &rows {
        let behavior = if row.behavior.is_empty() {
            String::new()
        } else {
            format!("  [{}]", row.behavior.join(", "))
        };
        println!(
            "  {:>3}  {:<24} rows {}..{} ({}){}",
            row.index + 1,
            row.id,
            row.top,
            row.bottom,
            row.height,
            behavior
        );
    }

    Ok(())
}

fn step_rows(registry: &StepRegistry, config: &AppConfig) -> Vec<StepRow> {
    registry
        .iter()
        .map(|step| {
            let mut behavior = Vec::new();
            if let Some(steps) = config.steps.get(step.id()) {
                if steps.enter_front_end {
                    behavior.push("front-end");
                }
                if steps.hold_forward {
                    behavior.push("hold-forward");
                }
                if steps.hold_backward {
                    behavior.push("hold-backward");
                }
                if steps.enter_message.is_some() || steps.exit_message.is_some() {
                    behavior.push("messages");
                }
            }
            StepRow {
                index: step.index(),
                id: step.id().to_string(),
                top: step.top(),
                height: step.height(),
                bottom: step.bottom_edge(),
                behavior,
            }
        })
        .collect()
}
