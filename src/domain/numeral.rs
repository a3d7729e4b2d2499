//! Bijective base-26 conversion between numeric and alphabetic token values.
//!
//! Letters `a`-`z` stand for 1-26 and there is no symbol for zero, so every
//! positive integer has exactly one alphabetic spelling: `a` = 1, `z` = 26,
//! `aa` = 27, `az` = 52, `ba` = 53.

const RADIX: u64 = 26;

/// Error returned when a value lies outside the domain of a conversion.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidToken {
    /// Numeric tokens must be at least 1; zero has no alphabetic spelling.
    #[error("invalid token '{0}': numeric value must be at least 1")]
    Zero(String),

    /// The value does not fit in a 64-bit unsigned integer.
    #[error("invalid token '{0}': value does not fit in 64 bits")]
    Overflow(String),

    /// Alphabetic tokens must contain at least one letter.
    #[error("invalid token: alphabetic value must not be empty")]
    Empty,

    /// Alphabetic tokens may only contain the letters `a`-`z`.
    #[error("invalid token '{0}': expected only lowercase letters (a-z)")]
    NotLowercase(String),
}

/// Spells a positive integer in bijective base-26.
///
/// # Errors
///
/// Returns [`InvalidToken::Zero`] if `n` is zero.
///
/// # Examples
///
/// ```
/// use luhmann::domain::numeral::numeric_to_alpha;
///
/// assert_eq!(numeric_to_alpha(1).unwrap(), "a");
/// assert_eq!(numeric_to_alpha(26).unwrap(), "z");
/// assert_eq!(numeric_to_alpha(27).unwrap(), "aa");
/// assert!(numeric_to_alpha(0).is_err());
/// ```
pub fn numeric_to_alpha(n: u64) -> Result<String, InvalidToken> {
    if n == 0 {
        return Err(InvalidToken::Zero(n.to_string()));
    }

    let mut remaining = n;
    let mut letters = Vec::new();
    while remaining > 0 {
        remaining -= 1;
        // always below 26
        #[allow(clippy::cast_possible_truncation)]
        let offset = (remaining % RADIX) as u8;
        letters.push(b'a' + offset);
        remaining /= RADIX;
    }
    letters.reverse();

    Ok(letters.into_iter().map(char::from).collect())
}

/// Reads a bijective base-26 spelling back into its integer value.
///
/// # Errors
///
/// Returns an error if `s` is empty, contains anything other than `a`-`z`,
/// or spells a value larger than [`u64::MAX`].
///
/// # Examples
///
/// ```
/// use luhmann::domain::numeral::alpha_to_numeric;
///
/// assert_eq!(alpha_to_numeric("a").unwrap(), 1);
/// assert_eq!(alpha_to_numeric("aa").unwrap(), 27);
/// assert!(alpha_to_numeric("A").is_err());
/// ```
pub fn alpha_to_numeric(s: &str) -> Result<u64, InvalidToken> {
    if s.is_empty() {
        return Err(InvalidToken::Empty);
    }

    s.bytes().try_fold(0_u64, |acc, byte| {
        if !byte.is_ascii_lowercase() {
            return Err(InvalidToken::NotLowercase(s.to_string()));
        }
        let digit = u64::from(byte - b'a' + 1);
        acc.checked_mul(RADIX)
            .and_then(|acc| acc.checked_add(digit))
            .ok_or_else(|| InvalidToken::Overflow(s.to_string()))
    })
}
