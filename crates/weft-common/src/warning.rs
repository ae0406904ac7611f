//! Parser diagnostics with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the tokenizer and the tree builder to report parse errors.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report a diagnostic (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("HTML Parser", "unexpected-end-tag </p>");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{YELLOW}[Weft {component}] ⚠ {message}{RESET}");
    }
}

/// Clear all recorded warnings (call before parsing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Number of distinct warnings printed since the last [`clear_warnings`].
#[must_use]
pub fn warning_count() -> usize {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .map_or(0, HashSet::len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_warning_is_recorded_once() {
        clear_warnings();
        warn_once("Test", "same message");
        warn_once("Test", "same message");
        warn_once("Other", "same message");
        assert_eq!(warning_count(), 2);

        clear_warnings();
        assert_eq!(warning_count(), 0);
    }
}
