//! Slash command parsing for the chat loop.
//!
//! Commands start with `/`; anything else is sent to the bot.

use console::style;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Exit the chat session.
    Exit,
    /// List personas.
    Profiles,
    /// Show the active persona, or switch to the given one.
    Profile(Option<String>),
    /// Show this user's recorded history.
    History,
    /// Show credential and model status.
    Ping,
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, Some(arg.trim()).filter(|a| !a.is_empty())),
        None => (trimmed, None),
    };

    match cmd.to_lowercase().as_str() {
        "/help" | "/h" | "/?" => Some(ChatCommand::Help),
        "/exit" | "/quit" | "/q" => Some(ChatCommand::Exit),
        "/profiles" => Some(ChatCommand::Profiles),
        "/profile" => Some(ChatCommand::Profile(arg.map(str::to_string))),
        "/history" => Some(ChatCommand::History),
        "/ping" | "/status" => Some(ChatCommand::Ping),
        other => Some(ChatCommand::Unknown(other.to_string())),
    }
}

/// Print the help text listing all available commands.
pub fn print_help() {
    println!();
    println!("  {}", style("Available commands:").bold());
    println!();
    println!("  {}          {}", style("/help").cyan(), "Show this help message");
    println!("  {}      {}", style("/profiles").cyan(), "List personas");
    println!("  {}  {}", style("/profile [id]").cyan(), "Show or switch the active persona (admin)");
    println!("  {}       {}", style("/history").cyan(), "Show your recorded history");
    println!("  {}          {}", style("/ping").cyan(), "Show credential and model status");
    println!("  {}          {}", style("/exit").cyan(), "End the chat session");
    println!();
    println!("  {}", style("Any other text is sent to the bot. Ctrl+D to exit.").dim());
    println!();
}
