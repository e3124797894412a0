//! Formatting utilities for CLI output.

use crate::services::modem::Operation;

/// ANSI color codes for terminal output
pub struct Colors;

impl Colors {
    /// Reset all formatting
    pub const RESET: &'static str = "\x1b[0m";
    /// Bold text
    pub const BOLD: &'static str = "\x1b[1m";
    /// Dim text
    pub const DIM: &'static str = "\x1b[2m";

    /// Red color
    pub const RED: &'static str = "\x1b[31m";
    /// Green color
    pub const GREEN: &'static str = "\x1b[32m";
    /// Yellow color
    pub const YELLOW: &'static str = "\x1b[33m";
    /// Cyan color
    pub const CYAN: &'static str = "\x1b[36m";
}

/// Formats section headers with styling
pub fn format_header(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::CYAN, text, Colors::RESET)
}

/// Formats a `label: value` line with the label highlighted
pub fn format_field(label: &str, value: &str) -> String {
    format!("{}{}:{} {}", Colors::BOLD, label, Colors::RESET, value)
}

/// Formats hints on what to do next
pub fn format_hint(text: &str) -> String {
    format!("{}{}{}", Colors::YELLOW, text, Colors::RESET)
}

/// Formats descriptions with muted styling
pub fn format_description(text: &str) -> String {
    format!("{}{}{}", Colors::DIM, text, Colors::RESET)
}

/// Formats replies from the network with success styling
pub fn format_reply(text: &str) -> String {
    format!("{}{}{}", Colors::GREEN, text, Colors::RESET)
}

/// Formats error messages with red styling
pub fn format_error(text: &str) -> String {
    format!("{}{}{}{}", Colors::BOLD, Colors::RED, text, Colors::RESET)
}

/// Formats the line shown while waiting for the modem to answer
pub fn format_progress(operation: Operation) -> String {
    let waiting = match operation {
        Operation::Enumerate => "Looking for modems",
        Operation::Enable => "Enabling modem",
        Operation::Disable => "Disabling modem",
        Operation::ReadIdentity => "Reading SIM identity",
        Operation::UssdInitiate => "Waiting for the network",
    };
    format_description(&format!("{waiting}..."))
}

/// Formats a country for listings: `code  name`, or just the code when
/// the name is unknown.
pub fn format_country(name: Option<&str>, code: &str) -> String {
    match name {
        Some(name) => format!("{code}  {}", format_description(name)),
        None => code.to_string(),
    }
}
