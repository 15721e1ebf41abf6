//! Shared key generation for storage backends.
//!
//! Key format: `visitor_photos/{society_id}/{unix_ms}_{filename}`. The
//! timestamp prefix keeps keys collision-resistant when two visitors upload
//! a photo with the same filename in the same society.

use uuid::Uuid;

/// Generate a storage key for a visitor photo.
///
/// `uploaded_at_ms` is the submission's Unix timestamp in milliseconds;
/// the filename is sanitized before it enters the key. All backends must
/// use this format for consistency.
pub fn photo_key(society_id: Uuid, filename: &str, uploaded_at_ms: i64) -> String {
    format!(
        "visitor_photos/{}/{}_{}",
        society_id,
        uploaded_at_ms,
        sanitize_filename(filename)
    )
}

/// Reduce a client-supplied filename to a safe key segment: ASCII
/// alphanumerics, `.`, `-`, and `_` pass through; everything else becomes
/// `_`. Dot runs are collapsed and leading dots stripped so the segment can
/// never contain `..` or start hidden.
pub fn sanitize_filename(filename: &str) -> String {
    let mut cleaned = String::with_capacity(filename.len());
    let mut last_was_dot = false;
    for c in filename.chars() {
        let mapped = if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        if mapped == '.' {
            if last_was_dot {
                continue;
            }
            last_was_dot = true;
        } else {
            last_was_dot = false;
        }
        cleaned.push(mapped);
    }
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "photo".to_string()
    } else {
        cleaned
    }
}
