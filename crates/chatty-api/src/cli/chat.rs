//! Chat history CLI commands: save, history.

use anyhow::{Context, Result};
use console::style;

use crate::state::AppState;

/// Save a message and report the stored sequence number.
///
/// # Examples
///
/// ```bash
/// chatty save alice "hello"
/// chatty save alice "hello" --json
/// ```
pub async fn save_message(state: &AppState, user_id: &str, message: &str, json: bool) -> Result<()> {
    let saved = state
        .chat_store
        .append(user_id, message)
        .await
        .with_context(|| format!("Failed to save message for '{user_id}'"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        println!(
            "  {} Saved message #{} for '{}'",
            style("✓").green().bold(),
            saved.seq,
            style(&saved.user_id).cyan()
        );
    }

    Ok(())
}

/// Print a user's history: rendered text, or the message records with `--json`.
pub async fn show_history(state: &AppState, user_id: &str, json: bool) -> Result<()> {
    if json {
        let messages = state
            .chat_store
            .messages(user_id)
            .await
            .with_context(|| format!("Failed to load history for '{user_id}'"))?;
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    let history = state
        .chat_store
        .get_history(user_id)
        .await
        .with_context(|| format!("Failed to load history for '{user_id}'"))?;

    if history.is_empty() {
        eprintln!(
            "  {} No messages for '{}'. Add one with: {}",
            style("i").blue().bold(),
            style(user_id).cyan(),
            style(format!("chatty save {user_id} \"...\"")).yellow()
        );
    } else {
        println!("{history}");
    }

    Ok(())
}
