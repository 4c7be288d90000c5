//! Message formatting utilities for client display.

use buzz_server::infrastructure::dto::websocket::MessageData;
use buzz_shared::time::format_clock_time;

const RULE: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the snapshot received right after connecting
    ///
    /// # Arguments
    ///
    /// * `messages` - Messages not shown yet, in id order
    /// * `local_user` - The current user's name (to mark as "me")
    pub fn format_initial_messages(messages: &[MessageData], local_user: &str) -> String {
        let mut output = String::new();
        output.push_str(&format!("\n\n{}\n", RULE));
        output.push_str("Recent messages:\n");

        if messages.is_empty() {
            output.push_str("(No new messages)\n");
        } else {
            for message in messages {
                output.push_str(&Self::format_line(message, local_user));
                output.push('\n');
            }
        }

        output.push_str(RULE);
        output.push('\n');
        output
    }

    /// Format a live message
    pub fn format_chat_message(message: &MessageData, local_user: &str) -> String {
        format!("\n{}\n", Self::format_line(message, local_user))
    }

    /// Format the "... is typing" notice
    ///
    /// Returns `None` when nobody is typing.
    pub fn format_typing_notice(users: &[&str]) -> Option<String> {
        match users {
            [] => None,
            [user] => Some(format!("\n{} is typing...\n", user)),
            [init @ .., last] => Some(format!(
                "\n{} and {} are typing...\n",
                init.join(", "),
                last
            )),
        }
    }

    /// Format a failed submission
    pub fn format_send_failure(reason: &str) -> String {
        format!("\n! Message not sent: {}\n", reason)
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }

    fn format_line(message: &MessageData, local_user: &str) -> String {
        let time = message
            .timestamp
            .as_deref()
            .and_then(format_clock_time)
            .map(|time| format!("[{}] ", time))
            .unwrap_or_default();
        let me_suffix = if message.user == local_user { " (me)" } else { "" };
        format!("{}@{}{}: {}", time, message.user, me_suffix, message.message)
    }
}
