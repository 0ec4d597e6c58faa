//! Terminal chat: one-shot `ask` and the interactive loop.

pub mod commands;
pub mod loop_runner;

use console::style;

use crate::state::AppState;

/// Send one message and print the reply.
pub async fn ask(state: &AppState, user_id: &str, message: &str, json: bool) -> anyhow::Result<()> {
    let reply = state.orchestrator.generate_reply(user_id, message).await;

    if json {
        let body = match &reply {
            Ok(reply) => serde_json::json!({ "reply": reply }),
            Err(e) => serde_json::json!({ "error": e.to_string(), "message": e.user_message() }),
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        match &reply {
            Ok(reply) => println!("{reply}"),
            Err(e) => eprintln!("{}", style(e.user_message()).red()),
        }
    }

    reply.map(|_| ()).map_err(anyhow::Error::from)
}
