//! Interactive chat loop.
//!
//! Reads lines from stdin until EOF or `/exit`. Chat errors are shown to the
//! user and never end the session.

use std::io::Write;
use std::time::Instant;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{persona, status};
use crate::state::AppState;

use super::commands::{self, ChatCommand};

/// Run the interactive chat loop for `user_id`.
pub async fn run_chat_loop(state: &AppState, user_id: &str) -> anyhow::Result<()> {
    print_banner(state, user_id);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{} ", style("bạn ›").green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        if let Some(command) = commands::parse(input) {
            let outcome = match command {
                ChatCommand::Help => {
                    commands::print_help();
                    Ok(())
                }
                ChatCommand::Exit => break,
                ChatCommand::Profiles => persona::list_personas(state, false).await,
                ChatCommand::Profile(None) => persona::show_active(state, false).await,
                ChatCommand::Profile(Some(id)) => persona::switch(state, user_id, &id, false).await,
                ChatCommand::History => {
                    print_history(state, user_id).await;
                    Ok(())
                }
                ChatCommand::Ping => status::status(state, false).await,
                ChatCommand::Unknown(cmd) => {
                    println!(
                        "  {} Unknown command {}. Type {} for the list.",
                        style("?").yellow(),
                        style(cmd).yellow(),
                        style("/help").cyan()
                    );
                    Ok(())
                }
            };
            if let Err(e) = outcome {
                println!("  {} {e}", style("✗").red());
            }
            continue;
        }

        let started = Instant::now();
        match state.orchestrator.generate_reply(user_id, input).await {
            Ok(reply) => {
                println!("{} {reply}", style("bot ›").cyan().bold());
                tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "reply printed");
            }
            Err(e) => {
                tracing::warn!(user_id, error = %e, "reply failed");
                println!("{} {}", style("bot ›").cyan().bold(), style(e.user_message()).red());
            }
        }
    }

    println!("  {}", style("Tạm biệt!").dim());
    Ok(())
}

fn print_banner(state: &AppState, user_id: &str) {
    let status = state.orchestrator.status();
    println!();
    println!(
        "  {} Antigravity chat as {}",
        style("🤖").bold(),
        style(user_id).cyan()
    );
    println!(
        "  {} persona {} · {} credential(s) · model {}",
        style("·").dim(),
        style(&status.active_persona).cyan(),
        status.credentials,
        style(&status.model).dim()
    );
    if status.credentials == 0 {
        println!(
            "  {} No API keys configured; replies will be refused.",
            style("!").yellow().bold()
        );
    }
    println!("  {}", style("Type /help for commands.").dim());
    println!();
}

async fn print_history(state: &AppState, user_id: &str) {
    let history = state.orchestrator.history(user_id).await;
    if history.is_empty() {
        println!("  {}", style("No history yet.").dim());
        return;
    }
    println!();
    for entry in history {
        println!("  {}", entry.to_line());
    }
    println!();
}
