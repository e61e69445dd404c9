//! Hex string codec used by the search prompt, the go-to prompt and keystroke filtering.

use std::fmt::Write as _;

use super::GridError;

/// Returns true for `[0-9A-Fa-f]`
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// Value of a single hex digit
pub fn digit_value(ch: char) -> Option<u8> {
    ch.to_digit(16).map(|d| d as u8)
}

/// Parse a hex string (e.g. "DE AD BE EF") into bytes.
///
/// All whitespace is ignored. Length is checked before digits, so "ABZ" reports
/// `MalformedLength` rather than the bad character. Reported indices count
/// characters after whitespace removal.
pub fn parse(text: &str) -> Result<Vec<u8>, GridError> {
    let digits: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();

    if digits.len() % 2 != 0 {
        return Err(GridError::MalformedLength {
            digits: digits.len(),
        });
    }

    let mut values = Vec::with_capacity(digits.len());
    for (index, &ch) in digits.iter().enumerate() {
        match digit_value(ch) {
            Some(v) => values.push(v),
            None => return Err(GridError::InvalidDigit { index, ch }),
        }
    }

    Ok(values
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Format bytes as uppercase, space separated hex ("DE AD")
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{:02X}", byte);
    }
    out
}

/// Parse a go-to address.
///
/// Always hexadecimal; an optional `0x` prefix or `h` suffix is accepted.
pub fn parse_address(text: &str) -> Result<usize, GridError> {
    let input = text.trim();
    let digits = if let Some(rest) = input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        rest
    } else if let Some(rest) = input.strip_suffix('h').or_else(|| input.strip_suffix('H')) {
        rest
    } else {
        input
    };

    if digits.is_empty() || !digits.chars().all(is_hex_digit) {
        return Err(GridError::InvalidAddress(input.to_string()));
    }

    usize::from_str_radix(digits, 16).map_err(|_| GridError::InvalidAddress(input.to_string()))
}
