//! Deterministic identifier synthesis.
//!
//! Kotatsu records carry numeric manga and chapter ids that Mihon backups do
//! not, so converting toward Kotatsu requires inventing ids. These must be
//! stable across runs and across conversion directions or verification round
//! trips would never line up, so they are pure functions of the canonical
//! source id plus a per-item value.
//!
//! The hash is the classic multiplicative rolling hash (`h = 31*h + unit`)
//! over UTF-16 code units, wrapped to a two's-complement `i64`. UTF-16 units
//! rather than bytes keep the values identical to what a JVM-based reader
//! computes for the same strings. Collisions are accepted, not guarded
//! against.

/// Synthesize a stable manga id from `(source, url)`.
pub fn manga_id(url: &str, source: &str) -> String {
    manga_id_i64(url, source).to_string()
}

/// Synthesize a stable tag/chapter id from `(source, title)`.
pub fn tag_id(title: &str, source: &str) -> String {
    tag_id_i64(title, source).to_string()
}

/// [`manga_id`] before decimal rendering, for formats with integer id fields.
pub fn manga_id_i64(url: &str, source: &str) -> i64 {
    hash64(source, url)
}

/// [`tag_id`] before decimal rendering.
pub fn tag_id_i64(title: &str, source: &str) -> i64 {
    hash64(source, title)
}

fn hash64(source: &str, value: &str) -> i64 {
    let mut h: i64 = 0;
    for unit in source.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(unit as i64);
    }
    for unit in ":".encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(unit as i64);
    }
    for unit in value.encode_utf16() {
        h = h.wrapping_mul(31).wrapping_add(unit as i64);
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = manga_id("/manga/one-piece", "2499283573021220255");
        let b = manga_id("/manga/one-piece", "2499283573021220255");
        assert_eq!(a, b);
    }

    #[test]
    fn test_distinguishes_inputs() {
        let base = manga_id("/manga/one-piece", "0");
        assert_ne!(base, manga_id("/manga/one-punch", "0"));
        assert_ne!(base, manga_id("/manga/one-piece", "9"));
        // tag_id and manga_id hash the same concatenation; they differ only
        // when their inputs do.
        assert_eq!(base, tag_id("/manga/one-piece", "0"));
    }

    #[test]
    fn test_known_values() {
        // h("a") = 'a' = 97; h(":a") = ':'*31 + 'a' = 58*31 + 97 = 1895
        // h("b:a") = ('b'*31 + ':')*31 + 'a' = (98*31 + 58)*31 + 97 = 96073
        assert_eq!(manga_id("a", "b"), "96073");
        // Empty value still includes the separator: h("b:") = 98*31 + 58
        assert_eq!(manga_id("", "b"), "3096");
    }

    #[test]
    fn test_non_ascii_uses_utf16_units() {
        // '漫' is U+6F2B, a single UTF-16 unit (0x6F2B = 28459).
        // h(":漫") = 58*31 + 28459 = 30257
        assert_eq!(manga_id("漫", ""), "30257");
    }

    #[test]
    fn test_wraps_instead_of_overflowing() {
        let long: String = "x".repeat(10_000);
        // Just needs to terminate and stay stable.
        assert_eq!(manga_id(&long, "0"), manga_id(&long, "0"));
    }
}
