//! Conversation commands: list, send, edit, delete, regenerate.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use chatpair_types::message::{Message, MessageId, Sender};

use crate::state::AppState;

const PREVIEW_CHARS: usize = 60;

/// List every message as a table.
pub async fn list_messages(state: &AppState, json: bool) -> Result<()> {
    let messages = state.message_service.list().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&messages)?);
        return Ok(());
    }

    if messages.is_empty() {
        println!();
        println!(
            "  {} No messages yet. Start with: {}",
            style("i").blue().bold(),
            style("chatpair send \"Hello\"").yellow()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("ID").fg(Color::White),
        Cell::new("Sender").fg(Color::White),
        Cell::new("Content").fg(Color::White),
        Cell::new("Reply To").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for msg in &messages {
        let sender_cell = match msg.sender {
            Sender::User => Cell::new("user").fg(Color::Cyan),
            Sender::Bot => Cell::new("bot").fg(Color::Magenta),
        };

        let parent = msg
            .parent_message_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());

        table.add_row(vec![
            Cell::new(msg.id).fg(Color::DarkGrey),
            sender_cell,
            Cell::new(preview(&msg.content)),
            Cell::new(parent).fg(Color::DarkGrey),
            Cell::new(msg.updated_at.format("%Y-%m-%d %H:%M:%S").to_string())
                .fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} message{}",
        style(messages.len()).bold(),
        if messages.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

/// Send a user message; prints it alongside the bot's reply.
pub async fn send_message(
    state: &AppState,
    content: &str,
    parent: Option<MessageId>,
    json: bool,
) -> Result<()> {
    let message = state
        .message_service
        .create(content, Sender::User, parent)
        .await?;
    let reply = find_reply(state, message.id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "message": message,
                "reply": reply,
            }))?
        );
        return Ok(());
    }

    print_line(&message);
    if let Some(reply) = &reply {
        print_line(reply);
    }

    Ok(())
}

/// Edit a user message and show the regenerated reply.
pub async fn edit_message(state: &AppState, id: MessageId, content: &str, json: bool) -> Result<()> {
    let message = state.message_service.update(id, content).await?;
    let reply = find_reply(state, message.id).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "message": message,
                "reply": reply,
            }))?
        );
        return Ok(());
    }

    println!("  {} Message {} updated.", style("✓").green().bold(), id);
    print_line(&message);
    if let Some(reply) = &reply {
        print_line(reply);
    }

    Ok(())
}

/// Delete a user message and its reply, asking first unless forced.
pub async fn delete_message(state: &AppState, id: MessageId, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete message {} and its reply?",
                style(id).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let outcome = state.message_service.delete(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!(
            "  {} Deleted {} message{}.",
            style("✓").red().bold(),
            outcome.deleted.len(),
            if outcome.deleted.len() == 1 { "" } else { "s" }
        );
    }

    Ok(())
}

/// Regenerate a message from its parent.
pub async fn regenerate_message(state: &AppState, id: MessageId, json: bool) -> Result<()> {
    let message = state.message_service.regenerate(id).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&message)?);
        return Ok(());
    }

    println!("  {} Regenerated.", style("✓").green().bold());
    print_line(&message);

    Ok(())
}

async fn find_reply(state: &AppState, id: MessageId) -> Result<Option<Message>> {
    let messages = state.message_service.list().await?;
    Ok(messages
        .into_iter()
        .find(|m| m.parent_message_id == Some(id)))
}

fn print_line(message: &Message) {
    let who = match message.sender {
        Sender::User => style("you").cyan().bold(),
        Sender::Bot => style("bot").magenta().bold(),
    };
    println!(
        "  {} {} {}",
        style(format!("#{}", message.id)).dim(),
        who,
        message.content
    );
}

/// Single-line preview, cut on a char boundary.
fn preview(content: &str) -> String {
    let line = content.lines().next().unwrap_or_default();
    if content.chars().count() > PREVIEW_CHARS || line.len() < content.len() {
        let cut: String = line.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_content() {
        assert_eq!(preview("Hello"), "Hello");
    }

    #[test]
    fn preview_truncates_long_and_multiline_content() {
        let long = "é".repeat(100);
        let cut = preview(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), PREVIEW_CHARS);

        assert_eq!(preview("first\nsecond"), "first...");
    }
}
