//! The pluggable string/regex matcher engine.
//!
//! A [`Matcher`] is selected once per search from the pattern text and the case-sensitivity
//! flag, in the precedence order fixed by the design: regex first, then case-insensitive
//! substring, then plain substring for single-byte patterns, then Rabin-Karp for patterns that
//! contain a non-ASCII byte, and Boyer-Moore-Horspool otherwise. Every variant is a pure
//! function over `(haystack, pattern, precomputed tables)`; none of them touch shared state.

use crate::error::{NgpError, Result};
use regex::Regex;

/// A compiled matcher ready to scan line-sized byte slices.
pub enum Matcher {
    Regex(Box<Regex>),
    CaseInsensitiveSubstring { pattern: Vec<u8> },
    PlainByte { byte: u8 },
    RabinKarp(RabinKarp),
    Horspool(Horspool),
}

impl Matcher {
    /// Build a matcher for `pattern`, selecting an implementation per the precedence rules.
    pub fn new(pattern: &str, is_regex: bool, case_insensitive: bool) -> Result<Self> {
        if is_regex {
            let regex = Regex::new(pattern).map_err(NgpError::from)?;
            return Ok(Matcher::Regex(Box::new(regex)));
        }

        let bytes = pattern.as_bytes();
        if case_insensitive {
            return Ok(Matcher::CaseInsensitiveSubstring {
                pattern: bytes.to_ascii_lowercase(),
            });
        }

        if bytes.len() == 1 {
            return Ok(Matcher::PlainByte { byte: bytes[0] });
        }

        if bytes.iter().any(|&b| b & 0x80 != 0) {
            return Ok(Matcher::RabinKarp(RabinKarp::new(bytes)));
        }

        Ok(Matcher::Horspool(Horspool::new(bytes)))
    }

    /// Return true if `haystack` contains the pattern this matcher was built for.
    pub fn is_match(&self, haystack: &[u8]) -> bool {
        match self {
            Matcher::Regex(re) => {
                // Lossily decode: lines are truncated byte slices that may straddle UTF-8
                // boundaries near the 256-byte cut; regex matching on the best-effort string
                // is the same tradeoff the rest of the pipeline makes at that boundary.
                re.is_match(&String::from_utf8_lossy(haystack))
            }
            Matcher::CaseInsensitiveSubstring { pattern } => {
                case_insensitive_substring(haystack, pattern)
            }
            Matcher::PlainByte { byte } => haystack.contains(byte),
            Matcher::RabinKarp(rk) => rk.is_match(haystack),
            Matcher::Horspool(bmh) => bmh.is_match(haystack),
        }
    }
}

fn case_insensitive_substring(haystack: &[u8], lowered_pattern: &[u8]) -> bool {
    if lowered_pattern.is_empty() {
        return true;
    }
    if haystack.len() < lowered_pattern.len() {
        return false;
    }
    haystack
        .windows(lowered_pattern.len())
        .any(|window| window.eq_ignore_ascii_case(lowered_pattern))
}

/// Boyer-Moore-Horspool matcher with a precomputed 256-entry skip table.
pub struct Horspool {
    pattern: Vec<u8>,
    skip: [usize; 256],
}

impl Horspool {
    pub fn new(pattern: &[u8]) -> Self {
        let mut skip = [pattern.len(); 256];
        for (i, &byte) in pattern.iter().enumerate().take(pattern.len().saturating_sub(1)) {
            skip[byte as usize] = pattern.len() - 1 - i;
        }
        Self {
            pattern: pattern.to_vec(),
            skip,
        }
    }

    pub fn is_match(&self, haystack: &[u8]) -> bool {
        let m = self.pattern.len();
        if m == 0 {
            return true;
        }
        if haystack.len() < m {
            return false;
        }

        let mut i = 0usize;
        while i + m <= haystack.len() {
            let last = haystack[i + m - 1];
            // A high-bit byte at the alignment point means we're looking at a multibyte UTF-8
            // continuation sequence; skip the whole pattern width rather than risk a false
            // positive straddling a codepoint boundary.
            if last & 0x80 != 0 {
                i += m;
                continue;
            }
            if last == self.pattern[m - 1]
                && haystack[i] == self.pattern[0]
                && haystack[i..i + m] == self.pattern[..]
            {
                return true;
            }
            i += self.skip[last as usize];
        }
        false
    }
}

/// Rabin-Karp rolling-hash matcher, used for patterns containing non-ASCII bytes.
pub struct RabinKarp {
    pattern: Vec<u8>,
    pattern_hash: u64,
    d: u64,
}

impl RabinKarp {
    pub fn new(pattern: &[u8]) -> Self {
        let m = pattern.len();
        let d = if m == 0 { 1 } else { 1u64 << (m - 1) };
        let mut hash = 0u64;
        for &byte in pattern {
            hash = (hash << 1).wrapping_add(byte as u64);
        }
        Self {
            pattern: pattern.to_vec(),
            pattern_hash: hash,
            d,
        }
    }

    pub fn is_match(&self, haystack: &[u8]) -> bool {
        let m = self.pattern.len();
        if m == 0 {
            return true;
        }
        if haystack.len() < m {
            return false;
        }

        let mut hash = 0u64;
        for &byte in &haystack[0..m] {
            hash = (hash << 1).wrapping_add(byte as u64);
        }

        let last = haystack.len() - m;
        let mut i = 0usize;
        loop {
            if hash == self.pattern_hash && &haystack[i..i + m] == self.pattern.as_slice() {
                return true;
            }
            if i == last {
                break;
            }
            let outgoing = haystack[i] as u64;
            let incoming = haystack[i + m] as u64;
            hash = ((hash.wrapping_sub(outgoing.wrapping_mul(self.d))) << 1).wrapping_add(incoming);
            i += 1;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn horspool_finds_match_at_various_positions() {
        let bmh = Horspool::new(b"needle");
        assert!(bmh.is_match(b"hay needle stack"));
        assert!(bmh.is_match(b"needle at start"));
        assert!(bmh.is_match(b"ends with needle"));
        assert!(!bmh.is_match(b"no match here"));
    }

    #[test]
    fn horspool_skips_multibyte_continuation_bytes() {
        // "caf\xc3\xa9" is "café" in UTF-8; searching for a 2-byte ASCII pattern must not
        // falsely align inside the 0xC3 0xA9 sequence.
        let bmh = Horspool::new(b"fe");
        assert!(!bmh.is_match("café".as_bytes()));
    }

    #[test]
    fn rabin_karp_matches_high_bit_pattern() {
        let pattern = "café".as_bytes();
        let rk = RabinKarp::new(pattern);
        let haystack = "my café is nice".as_bytes();
        assert!(rk.is_match(haystack));
        assert!(!rk.is_match("no match here".as_bytes()));
    }

    #[test]
    fn rabin_karp_and_horspool_agree_on_ascii_patterns() {
        let haystacks: &[&[u8]] = &[b"hello world", b"abcabcabc", b"", b"xxxxx", b"zzzzzzzzzz"];
        for &pattern in &[&b"abc"[..], &b"xyz"[..], &b"a"[..]] {
            let bmh = Horspool::new(pattern);
            let rk = RabinKarp::new(pattern);
            for haystack in haystacks {
                assert_eq!(
                    bmh.is_match(haystack),
                    rk.is_match(haystack),
                    "pattern {:?} haystack {:?}",
                    pattern,
                    haystack
                );
            }
        }
    }

    #[test]
    fn matcher_selection_regex() {
        let m = Matcher::new("a.c", true, false).unwrap();
        assert!(matches!(m, Matcher::Regex(_)));
        assert!(m.is_match(b"xabcx"));
    }

    #[test]
    fn matcher_selection_case_insensitive() {
        let m = Matcher::new("Hello", false, true).unwrap();
        assert!(matches!(m, Matcher::CaseInsensitiveSubstring { .. }));
        assert!(m.is_match(b"say HELLO there"));
        assert!(!m.is_match(b"say goodbye"));
    }

    #[test]
    fn matcher_selection_single_byte() {
        let m = Matcher::new("x", false, false).unwrap();
        assert!(matches!(m, Matcher::PlainByte { .. }));
        assert!(m.is_match(b"abcxdef"));
    }

    #[test]
    fn matcher_selection_high_bit_uses_rabin_karp() {
        let m = Matcher::new("café", false, false).unwrap();
        assert!(matches!(m, Matcher::RabinKarp(_)));
    }

    #[test]
    fn matcher_selection_default_is_horspool() {
        let m = Matcher::new("needle", false, false).unwrap();
        assert!(matches!(m, Matcher::Horspool(_)));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let result = Matcher::new("(unterminated", true, false);
        assert!(result.is_err());
    }

    proptest! {
        /// Horspool, Rabin-Karp, and a plain case-sensitive substring check must always agree
        /// on whether an ASCII pattern occurs in an ASCII haystack.
        #[test]
        fn matcher_equivalence_law_holds_for_ascii_patterns(
            pattern in "[a-zA-Z0-9]{1,6}",
            haystack in "[a-zA-Z0-9 ]{0,200}",
        ) {
            let bmh = Horspool::new(pattern.as_bytes());
            let rk = RabinKarp::new(pattern.as_bytes());
            let expected = haystack.contains(pattern.as_str());

            prop_assert_eq!(bmh.is_match(haystack.as_bytes()), expected);
            prop_assert_eq!(rk.is_match(haystack.as_bytes()), expected);
        }
    }
}
