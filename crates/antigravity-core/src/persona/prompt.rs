//! System prompt rendering.

use antigravity_types::persona::Persona;

/// Prompt used when neither the active nor the default persona loads.
pub const FALLBACK_PROMPT: &str = "Bạn là một trợ lý ảo thân thiện.";

/// Render a persona into its system prompt.
///
/// Section order is fixed: context, name, personality, rules, language style.
pub fn render_system_prompt(persona: &Persona) -> String {
    let rules = persona
        .rules
        .iter()
        .map(|rule| format!("- {rule}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{context}\n\nTên: {name}\nTính cách: {personality}\n\nQuy tắc:\n{rules}\n\nPhong cách: {style}\n",
        context = persona.context,
        name = persona.name,
        personality = persona.personality,
        style = persona.language_style,
    )
}
