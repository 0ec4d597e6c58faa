//! Status command.

use console::style;

use crate::state::AppState;

/// Print credential, persona and model status.
pub async fn status(state: &AppState, json: bool) -> anyhow::Result<()> {
    let status = state.orchestrator.status();
    let persona = state.orchestrator.active_persona().await.ok();

    if json {
        let mut body = serde_json::to_value(&status)?;
        body["active_persona_name"] = serde_json::json!(persona.as_ref().map(|p| &p.name));
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let check = |ok: bool| {
        if ok {
            format!("{}", style("✓").green())
        } else {
            format!("{}", style("✗").red())
        }
    };

    println!();
    println!("  {} Antigravity status", style("🏓").bold());
    println!();
    println!(
        "  {} Credentials: {} (current #{})",
        check(status.credentials > 0),
        status.credentials,
        status.credential_cursor
    );
    println!(
        "  {} Persona: {}",
        check(persona.is_some()),
        persona
            .as_ref()
            .map(|p| format!("{} ({})", p.name, p.id))
            .unwrap_or_else(|| format!("{} (fallback prompt)", status.active_persona))
    );
    println!("  {} Model: {} via {}", check(true), status.model, status.provider);
    println!("  {} Abbreviations: {}", check(true), status.abbreviations);
    println!();
    Ok(())
}
