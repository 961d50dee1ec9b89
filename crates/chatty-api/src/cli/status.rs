//! Status command: where the data lives and how much of it there is.

use anyhow::Result;
use console::style;

use chatty_core::chat::repository::ChatRepository;

use crate::state::AppState;

/// Display database location, user count, and message count.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let repo = state.chat_store.repo();
    let users = repo.count_users().await?;
    let messages = repo.count_messages().await?;

    if json {
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "database_url": state.database_url,
            "retry_on_failure": state.config.database.retry_on_failure,
            "users": users,
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Chatty v{}",
        style("⚡").bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!();
    println!("  {}", style("── Storage ──").dim());
    println!("  Data dir:  {}", state.data_dir.display());
    println!("  Database:  {}", state.database_url);
    println!(
        "  Retries:   {}",
        if state.config.database.retry_on_failure {
            style(format!("on (max {})", state.config.database.max_retries)).green()
        } else {
            style("off".to_string()).yellow()
        }
    );
    println!();
    println!("  {}", style("── History ──").dim());
    println!("  Users:     {}", style(users).bold());
    println!("  Messages:  {}", style(messages).bold());
    println!();

    Ok(())
}
