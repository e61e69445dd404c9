//! Exact byte-sequence search.

/// First occurrence of `pattern` in `data`.
///
/// An empty pattern matches at 0, even in an empty buffer.
pub fn find(data: &[u8], pattern: &[u8]) -> Option<usize> {
    find_from(data, pattern, 0)
}

/// First occurrence of `pattern` starting at or after `start`
pub fn find_from(data: &[u8], pattern: &[u8], start: usize) -> Option<usize> {
    if start > data.len() {
        return None;
    }
    if pattern.is_empty() {
        return Some(start);
    }
    if pattern.len() > data.len() - start {
        return None;
    }
    data[start..]
        .windows(pattern.len())
        .position(|w| w == pattern)
        .map(|p| p + start)
}

/// Every match offset, overlapping matches included.
///
/// Unlike [`find`], an empty pattern yields no offsets: it would match at
/// every position and callers listing matches have nothing useful to show.
pub fn find_all(data: &[u8], pattern: &[u8]) -> Vec<usize> {
    if pattern.is_empty() || pattern.len() > data.len() {
        return Vec::new();
    }
    data.windows(pattern.len())
        .enumerate()
        .filter(|(_, w)| *w == pattern)
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: [u8; 5] = [0x48, 0x65, 0x6C, 0x6C, 0x6F];

    #[test]
    fn finds_first_occurrence() {
        assert_eq!(find(&HELLO, &[0x6C, 0x6C]), Some(2));
        assert_eq!(find(&HELLO, &[0x6C]), Some(2));
        assert_eq!(find(&HELLO, &HELLO), Some(0));
        assert_eq!(find(&HELLO, &[0x6F]), Some(4));
    }

    #[test]
    fn empty_pattern_matches_at_zero() {
        assert_eq!(find(&HELLO, &[]), Some(0));
        assert_eq!(find(&[], &[]), Some(0));
    }

    #[test]
    fn no_match() {
        assert_eq!(find(&[], &[0x01]), None);
        assert_eq!(find(&HELLO, &[0x6C, 0x6F, 0x00]), None);
        assert_eq!(find(&[0x48], &[0x48, 0x65]), None);
        assert_eq!(find(&HELLO, &[0x00]), None);
    }

    #[test]
    fn overlapping_candidates() {
        assert_eq!(find(&[1, 1, 1, 2], &[1, 1, 2]), Some(1));
        assert_eq!(find_all(&[1, 1, 1, 2], &[1, 1]), vec![0, 1]);
    }

    #[test]
    fn find_all_skips_empty_pattern() {
        assert_eq!(find(&HELLO, &[]), Some(0));
        assert!(find_all(&HELLO, &[]).is_empty());
    }

    #[test]
    fn find_from_skips_earlier_matches() {
        let data = [0xAA, 0xBB, 0xAA, 0xBB];
        assert_eq!(find_from(&data, &[0xAA, 0xBB], 1), Some(2));
        assert_eq!(find_from(&data, &[0xAA, 0xBB], 3), None);
        assert_eq!(find_from(&data, &[], 4), Some(4));
        assert_eq!(find_from(&data, &[0xAA], 5), None);
    }
}
