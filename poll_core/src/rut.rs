//! Validation and formatting of the Chilean national identifier (RUT).
//!
//! A RUT is a number followed by a check character computed with a
//! modulus-11 scheme. The check character is a digit or `k`.
//!
//! ```
//! use poll_core::rut;
//!
//! assert!(rut::validate("12.345.678-5"));
//! assert!(!rut::validate("12.345.678-4"));
//! assert_eq!(rut::format("123456785"), "12.345.678-5");
//! ```

use log::debug;
use std::fmt::Display;

/// Removes the formatting punctuation and splits the identifier into its
/// number and its check character.
///
/// Returns `None` when what is left is not 7 or 8 digits optionally
/// followed by a digit or `k`.
pub fn normalize(raw: &str) -> Option<(String, char)> {
    let stripped: String = raw.chars().filter(|c| *c != '.' && *c != '-').collect();
    let mut cleaned = stripped.trim().to_lowercase();
    if !is_well_formed(&cleaned) {
        return None;
    }
    let check = cleaned.pop()?;
    Some((cleaned, check))
}

// Same shape as the pattern ^\d{7,8}[0-9k]?$ with ASCII digits.
fn is_well_formed(s: &str) -> bool {
    let bytes = s.as_bytes();
    match bytes.split_last() {
        Some((&b'k', body)) => (7..=8).contains(&body.len()) && body.iter().all(u8::is_ascii_digit),
        Some(_) => (7..=9).contains(&bytes.len()) && bytes.iter().all(u8::is_ascii_digit),
        None => false,
    }
}

/// The check character expected for a number.
///
/// Digits are weighted from the right with the cycle 2, 3, 4, 5, 6, 7, 2, ...
/// Returns `None` if `digits` contains anything other than ASCII digits.
pub fn compute_check_digit(digits: &str) -> Option<char> {
    // Reduced as it goes, so any length fits.
    let mut sum: u32 = 0;
    let mut multiplier: u32 = 2;
    for c in digits.chars().rev() {
        sum = (sum + c.to_digit(10)? * multiplier) % 11;
        multiplier = if multiplier == 7 { 2 } else { multiplier + 1 };
    }
    let expected = match 11 - (sum % 11) {
        11 => '0',
        10 => 'k',
        d => (b'0' + d as u8) as char,
    };
    Some(expected)
}

/// Checks that an identifier is well formed and that its check character
/// matches its number. Punctuation and the case of `k` are ignored.
pub fn validate(raw: &str) -> bool {
    let (digits, check) = match normalize(raw) {
        Some(p) => p,
        None => {
            debug!("validate: malformed identifier {:?}", raw);
            return false;
        }
    };
    let expected = compute_check_digit(&digits);
    debug!(
        "validate: {:?} digits: {} check: {} expected: {:?}",
        raw, digits, check, expected
    );
    expected == Some(check)
}

/// Renders an identifier as `12.345.678-5`.
///
/// Everything except digits and `k` is dropped first. The result is not
/// validated: any input gets a best-effort rendering, and inputs with zero
/// or one character left are returned as they are.
pub fn format(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == 'k' || *c == 'K')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if cleaned.len() <= 1 {
        return cleaned;
    }
    let (body, check) = cleaned.split_at(cleaned.len() - 1);
    format!("{}-{}", group_thousands(body), check)
}

// Inserts a dot before every position that starts a run of digits whose
// length is a non-zero multiple of three, never at the very start.
// A stray `k` inside the body ends a run without being grouped itself.
fn group_thousands(body: &str) -> String {
    let chars: Vec<char> = body.chars().collect();
    let mut run_from = vec![0usize; chars.len() + 1];
    for idx in (0..chars.len()).rev() {
        if chars[idx].is_ascii_digit() {
            run_from[idx] = run_from[idx + 1] + 1;
        }
    }
    let mut res = String::with_capacity(chars.len() + chars.len() / 3);
    for (idx, c) in chars.iter().enumerate() {
        if idx > 0 && run_from[idx] > 0 && run_from[idx] % 3 == 0 {
            res.push('.');
        }
        res.push(*c);
    }
    res
}

/// An identifier that passed validation, kept in its formatted form.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Rut(String);

impl Rut {
    pub fn parse(raw: &str) -> Option<Rut> {
        if validate(raw) {
            Some(Rut(format(raw)))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The number, without separators.
    pub fn number(&self) -> String {
        let (number, _) = self.0.split_at(self.0.len() - 1);
        number.chars().filter(char::is_ascii_digit).collect()
    }

    pub fn check_digit(&self) -> char {
        self.0.chars().last().unwrap_or('0')
    }
}

impl Display for Rut {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
