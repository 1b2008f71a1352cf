//! Message formatting utilities for client display.

use natter_server::infrastructure::dto::websocket::{ChatMessageDto, OutgoingMessage};
use natter_shared::time::display_time;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format an incoming event, or `None` when there is nothing to show
    pub fn format_event(event: &OutgoingMessage, me: &str) -> Option<String> {
        match event {
            OutgoingMessage::NameAccepted => None,
            OutgoingMessage::NameRejected { reason } => {
                Some(Self::format_name_rejected(reason))
            }
            OutgoingMessage::UserList { users } => Some(Self::format_user_list(users, me)),
            OutgoingMessage::Typing { typing } => Self::format_typing(typing, me),
            OutgoingMessage::Message { message } => Some(Self::format_chat_message(message, me)),
        }
    }

    /// Format the messages fetched from `/history`
    pub fn format_history(messages: &[ChatMessageDto]) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\nHistory:\n", RULE));
        if messages.is_empty() {
            output.push_str("(No messages yet)\n");
        } else {
            for message in messages {
                output.push_str(&format!(
                    "[{}] @{}: {}\n",
                    display_time(&message.timestamp),
                    message.user,
                    message.text
                ));
            }
        }
        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format the list of online users, marking the current user
    pub fn format_user_list(users: &[String], me: &str) -> String {
        if users.is_empty() {
            return "\nOnline: (nobody)\n".to_string();
        }
        let names: Vec<String> = users
            .iter()
            .map(|user| {
                if user == me {
                    format!("{} (me)", user)
                } else {
                    user.clone()
                }
            })
            .collect();
        format!("\nOnline: {}\n", names.join(", "))
    }

    /// Format the typing indicator. Our own flag is not shown.
    pub fn format_typing(typing: &[String], me: &str) -> Option<String> {
        let others: Vec<&str> = typing
            .iter()
            .map(String::as_str)
            .filter(|user| *user != me)
            .collect();
        match others.as_slice() {
            [] => None,
            [one] => Some(format!("\n{} is typing...\n", one)),
            many => Some(format!("\n{} are typing...\n", many.join(", "))),
        }
    }

    pub fn format_chat_message(message: &ChatMessageDto, me: &str) -> String {
        let me_suffix = if message.user == me { " (me)" } else { "" };
        format!(
            "\n[{}] @{}{}: {}\n",
            display_time(&message.timestamp),
            message.user,
            me_suffix,
            message.text
        )
    }

    pub fn format_name_rejected(reason: &str) -> String {
        format!("\nName rejected: {}\n", reason)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
