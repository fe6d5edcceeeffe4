//! Pretty output formatting.

use harsh_core::entity::User;
use harsh_core::mapper::{ModelState, Projection};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Format a user for display.
pub fn format_user(user: &User) -> String {
    let id = user
        .id()
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}\n  ID: {}\n  Joined: {}\n  Last seen: {}",
        user.username(),
        id,
        user.join_time().format(TIME_FORMAT),
        user.last_seen_time().format(TIME_FORMAT)
    )
}

/// Format users for display.
pub fn format_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }
    let mut output = format!("USERS ({})\n", users.len());
    output.push_str(&"-".repeat(40));
    for user in users {
        output.push_str(&format!("\n{}", format_user(user)));
        output.push('\n');
    }
    output
}

/// Format a projected row as `name=value` pairs on one line.
pub fn format_projection(row: &Projection) -> String {
    let fields: Vec<String> = row
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    format!("  {}", fields.join("  "))
}

/// Format a model state: its message, then either its data or its errors.
pub fn format_state<T>(state: &ModelState<T>, item: impl Fn(&T) -> String) -> String {
    let mut output = state.message().to_string();
    if state.valid() {
        for data in state.data() {
            output.push_str(&format!("\n{}", item(data)));
        }
    } else {
        for error in state.errors() {
            output.push_str(&format!("\n  error: {error}"));
        }
    }
    output
}
