//! Display helpers for names and epoch timestamps.

use chrono::{DateTime, Utc};

/// `"January 2, 2024"` for a member's join date; `"Unknown"` when absent.
pub fn format_epoch_date(epoch_seconds: Option<i64>) -> String {
    match epoch_seconds.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)) {
        Some(dt) => dt.format("%B %-d, %Y").to_string(),
        None => "Unknown".to_string(),
    }
}

/// `"02-01-2024 15:04:05"` (UTC) for integration tables; `"-"` when absent.
pub fn format_epoch_datetime(epoch_seconds: Option<i64>) -> String {
    match epoch_seconds.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)) {
        Some(dt) => dt.format("%d-%m-%Y %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}

/// Title-cased `first last`, or `fallback` verbatim when both parts are blank.
pub fn format_display_name(first: Option<&str>, last: Option<&str>, fallback: &str) -> String {
    let joined = [first.unwrap_or(""), last.unwrap_or("")]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if joined.is_empty() {
        return fallback.to_string();
    }
    capitalize_label(&joined)
}

/// `"super_admin"` → `"Super Admin"`, `"OWNER"` → `"Owner"`.
pub fn capitalize_label(value: &str) -> String {
    value
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Avatar initials. Email addresses collapse to their first character.
pub fn initials(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    if name.contains('@') {
        return name
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default();
    }
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
