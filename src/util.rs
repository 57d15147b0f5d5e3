//! Small shared helpers.

/// Current wall-clock time as epoch milliseconds.
///
/// Used only for `created_at` stamps the Kotatsu format requires; everything
/// else a writer emits is a pure function of its input.
pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

/// Strip a UTF-8 BOM (byte order mark) if present.
pub(crate) fn strip_bom(data: &[u8]) -> &[u8] {
    // UTF-8 BOM: EF BB BF
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom(&[0xEF, 0xBB, 0xBF, b'[', b']']), b"[]");
        assert_eq!(strip_bom(b"[]"), b"[]");
        assert_eq!(strip_bom(b""), b"");
    }
}
