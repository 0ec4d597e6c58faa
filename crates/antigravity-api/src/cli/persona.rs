//! Persona listing and switching commands.

use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use antigravity_types::error::ChatError;

use crate::state::AppState;

/// List personas, marking the active one.
pub async fn list_personas(state: &AppState, json: bool) -> anyhow::Result<()> {
    let personas = state.orchestrator.list_personas().await;
    let active = state.orchestrator.personas().active_id();

    if json {
        let body = serde_json::json!({ "active": active, "personas": personas });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    if personas.is_empty() {
        println!(
            "  {} No personas found in {}",
            style("✗").red(),
            style(state.config.profiles_dir().display()).dim()
        );
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("").fg(Color::White),
        Cell::new("Id").fg(Color::White),
        Cell::new("Name").fg(Color::White),
        Cell::new("Description").fg(Color::White),
    ]);

    for persona in &personas {
        let marker = if persona.id == active {
            Cell::new("●").fg(Color::Green)
        } else {
            Cell::new("○").fg(Color::DarkGrey)
        };
        table.add_row(vec![
            marker,
            Cell::new(&persona.id),
            Cell::new(&persona.name),
            Cell::new(&persona.description),
        ]);
    }

    println!();
    println!("{table}");
    println!(
        "  {}",
        style("Use `agbot persona <id>` or /profile <id> to switch.").dim()
    );
    println!();
    Ok(())
}

/// Show the active persona.
pub async fn show_active(state: &AppState, json: bool) -> anyhow::Result<()> {
    let summary = state.orchestrator.active_persona().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "  {} Active persona: {} ({})",
            style("●").green(),
            style(&summary.name).cyan().bold(),
            style(&summary.id).dim()
        );
        println!("    {}", summary.description);
    }
    Ok(())
}

/// Switch the active persona on behalf of `user_id`.
pub async fn switch(state: &AppState, user_id: &str, persona_id: &str, json: bool) -> anyhow::Result<()> {
    let summary = match state.orchestrator.switch_persona(user_id, persona_id).await {
        Ok(summary) => summary,
        Err(ChatError::Unauthorized) => {
            anyhow::bail!("only the administrator may switch personas")
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "  {} Switched to {} ({})",
            style("✓").green().bold(),
            style(&summary.name).cyan().bold(),
            style(&summary.id).dim()
        );
    }
    Ok(())
}
