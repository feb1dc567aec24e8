//! Destination key derivation.
//!
//! Key format: `{prefix}/{timestamp_ms}_{sanitized-name}`. The timestamp is
//! process-wide monotonic (strictly increasing), so identical file names in
//! one batch, or in rapid batches from the same client, always resolve to
//! distinct keys without an existence round trip to the store.

use crate::traits::{StorageError, StorageResult};
use chrono::Utc;
use std::sync::atomic::{AtomicI64, Ordering};

static LAST_KEY_TIMESTAMP_MS: AtomicI64 = AtomicI64::new(0);

/// Next millisecond timestamp for key minting, clamped to strictly exceed
/// the previously minted one.
fn next_key_timestamp_ms() -> i64 {
    loop {
        let now = Utc::now().timestamp_millis();
        let last = LAST_KEY_TIMESTAMP_MS.load(Ordering::SeqCst);
        let candidate = now.max(last + 1);
        if LAST_KEY_TIMESTAMP_MS
            .compare_exchange(last, candidate, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return candidate;
        }
    }
}

/// Sanitize an original file name into a storage-safe object name.
///
/// Lower-cases the base name, maps whitespace runs to a single `_`, strips
/// characters outside `[a-z0-9._-]` and collapses repeated separators.
pub fn sanitize_object_name(filename: &str) -> String {
    const MAX: usize = 255;

    let base = std::path::Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);

    let mut out = String::with_capacity(base.len().min(MAX));
    let mut last_was_sep = false;
    for c in base.to_lowercase().chars().take(MAX) {
        if c.is_whitespace() || c == '_' {
            if !last_was_sep && !out.is_empty() {
                out.push('_');
                last_was_sep = true;
            }
        } else if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
            out.push(c);
            last_was_sep = false;
        }
        // Everything else is stripped.
    }
    let trimmed = out.trim_matches('_');

    if trimmed.is_empty() || trimmed.contains("..") || trimmed.chars().all(|c| c == '.') {
        return "file".to_string();
    }
    trimmed.to_string()
}

/// Resolve the destination key for a file under the given path prefix.
pub fn resolve_object_key(prefix: &str, original_name: &str) -> StorageResult<String> {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        return Err(StorageError::InvalidKey(
            "Path prefix must not be empty".to_string(),
        ));
    }
    if prefix.contains("..") {
        return Err(StorageError::InvalidKey(
            "Path prefix must not contain '..'".to_string(),
        ));
    }

    let name = sanitize_object_name(original_name);
    let timestamp = next_key_timestamp_ms();
    Ok(format!("{}/{}_{}", prefix, timestamp, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_lowercases_and_replaces_whitespace() {
        assert_eq!(sanitize_object_name("Panel A Front.JPG"), "panel_a_front.jpg");
    }

    #[test]
    fn test_sanitize_collapses_repeated_separators() {
        assert_eq!(sanitize_object_name("a   b\t\tc.png"), "a_b_c.png");
        assert_eq!(sanitize_object_name("a___b.png"), "a_b.png");
    }

    #[test]
    fn test_sanitize_strips_disallowed_characters() {
        assert_eq!(sanitize_object_name("inverter#7 (east)!.png"), "inverter7_east.png");
        assert_eq!(sanitize_object_name("métrage.png"), "mtrage.png");
    }

    #[test]
    fn test_sanitize_degenerate_names() {
        assert_eq!(sanitize_object_name(""), "file");
        assert_eq!(sanitize_object_name("???"), "file");
        assert_eq!(sanitize_object_name("..."), "file");
    }

    #[test]
    fn test_sanitize_uses_base_name_only() {
        assert_eq!(sanitize_object_name("/tmp/up/../shot.png"), "shot.png");
    }

    #[test]
    fn test_resolve_key_format() {
        let key = resolve_object_key("maintenance-reports", "Shot 1.png").unwrap();
        let (dir, rest) = key.split_once('/').unwrap();
        assert_eq!(dir, "maintenance-reports");
        let (ts, name) = rest.split_once('_').unwrap();
        assert!(ts.parse::<i64>().is_ok());
        assert_eq!(name, "shot_1.png");
    }

    #[test]
    fn test_resolve_key_trims_prefix_slashes() {
        let key = resolve_object_key("/reports/", "a.png").unwrap();
        assert!(key.starts_with("reports/"));
    }

    #[test]
    fn test_resolve_key_rejects_bad_prefix() {
        assert!(resolve_object_key("", "a.png").is_err());
        assert!(resolve_object_key("../escape", "a.png").is_err());
    }

    #[test]
    fn test_identical_names_resolve_to_distinct_keys() {
        let a = resolve_object_key("reports", "same.png").unwrap();
        let b = resolve_object_key("reports", "same.png").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_timestamps_strictly_increase() {
        let mut previous = 0;
        for _ in 0..100 {
            let ts = next_key_timestamp_ms();
            assert!(ts > previous);
            previous = ts;
        }
    }
}
