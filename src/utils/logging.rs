use serde::Serialize;

/// Truncated, lossy UTF-8 rendering of an upstream body for log lines.
pub(crate) fn body_preview(bytes: &[u8], max_chars: usize) -> String {
    let raw = String::from_utf8_lossy(bytes);
    format!("{:.len$}", raw, len = max_chars)
}

/// Runs `log_action` with a pretty-printed JSON rendering of `value`, but only
/// when DEBUG is enabled so the serialization cost is skipped otherwise.
pub(crate) fn with_pretty_json_debug<T, F>(value: &T, log_action: F)
where
    T: Serialize + ?Sized,
    F: FnOnce(&str),
{
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return;
    }

    let pretty_json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|error| format!("<pretty serialize failed: {error}>"));
    log_action(pretty_json.as_str());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_by_chars_not_bytes() {
        assert_eq!(body_preview("héllo wörld".as_bytes(), 5), "héllo");
        assert_eq!(body_preview(b"short", 300), "short");
    }

    #[test]
    fn preview_replaces_invalid_utf8() {
        assert_eq!(body_preview(&[0x61, 0xff, 0x62], 10), "a\u{fffd}b");
    }
}
