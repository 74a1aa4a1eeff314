//! Engine warnings routed through the `log` facade.
//!
//! Provides deduplication to avoid spamming the same warning multiple times.
//! Used by the box tree and the layer tree to report unsupported style features.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about an unsupported feature (emits once per unique message)
///
/// Returns `true` if this call emitted the warning, `false` if the same
/// message was already reported.
///
/// # Example
/// ```
/// use strata_common::warning::warn_once;
///
/// let first = warn_once("position", "sticky positioning is painted as relative");
/// let second = warn_once("position", "sticky positioning is painted as relative");
/// assert!(first || !second);
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        log::warn!(target: "strata", "[{component}] {message}");
    }
    should_emit
}

/// Clear all recorded warnings (call before painting a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
