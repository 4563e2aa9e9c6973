//! Table display helpers for CLI commands

use crate::error::{CliError, CliResult};

/// Truncate a string for table display, handling Unicode safely.
///
/// If the string exceeds `max_len`, it is truncated with "..." appended.
/// Uses character boundaries to avoid panicking on multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Validate a page size against the facade's accepted range (1 to 1000).
pub fn validate_page_size(page_size: u32) -> CliResult<()> {
    if !(1..=1000).contains(&page_size) {
        return Err(CliError::Validation(
            "Page size must be between 1 and 1000.".to_string(),
        ));
    }
    Ok(())
}
