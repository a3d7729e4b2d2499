//! Typed tokens of a Luhmann ID and the tokenizer that produces them.

use std::{fmt, ops::Deref, str::FromStr, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;

use crate::domain::numeral::{self, InvalidToken};

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[0-9]+|[a-z]+").expect("token pattern is valid"));

/// A validated run of ASCII decimal digits ([0-9]+).
///
/// The digit text is kept verbatim so that leading zeros in a file name
/// survive a rename that leaves the token alone.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Numeral(String);

impl Numeral {
    /// Creates a `Numeral` spelling the given value in decimal.
    #[must_use]
    pub fn from_value(value: u64) -> Self {
        Self(value.to_string())
    }

    /// Returns the digit text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the integer value of the digits.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidToken::Overflow`] if the value does not fit in a
    /// `u64`.
    pub fn value(&self) -> Result<u64, InvalidToken> {
        self.0
            .parse()
            .map_err(|_| InvalidToken::Overflow(self.0.clone()))
    }
}

impl fmt::Display for Numeral {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated string containing only lowercase ASCII letters ([a-z]+).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Letters(NonEmptyString);

impl Letters {
    /// Creates a new `Letters` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidToken::Empty`] if the string is empty, or
    /// [`InvalidToken::NotLowercase`] if it contains anything other than
    /// `a`-`z`.
    pub fn new(s: String) -> Result<Self, InvalidToken> {
        if !s.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(InvalidToken::NotLowercase(s));
        }
        NonEmptyString::new(s)
            .map(Self)
            .map_err(|_| InvalidToken::Empty)
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Letters {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Letters {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Letters {
    type Err = InvalidToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// One segment of a Luhmann ID.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Token {
    /// A run of decimal digits, e.g. the `12` in `1a12`.
    Numeric(Numeral),
    /// A run of lowercase letters, e.g. the `cc` in `3cc`.
    Alpha(Letters),
}

/// The kind of a [`Token`], without its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// Decimal digits.
    Numeric,
    /// Lowercase letters.
    Alpha,
}

impl Token {
    /// A numeric token spelling `value` in decimal.
    #[must_use]
    pub fn numeric(value: u64) -> Self {
        Self::Numeric(Numeral::from_value(value))
    }

    /// An alphabetic token.
    ///
    /// # Errors
    ///
    /// Returns an error if `letters` is empty or not all lowercase `a`-`z`.
    pub fn alpha(letters: &str) -> Result<Self, InvalidToken> {
        letters.parse().map(Self::Alpha)
    }

    /// Returns which kind of token this is.
    #[must_use]
    pub const fn tag(&self) -> Tag {
        match self {
            Self::Numeric(_) => Tag::Numeric,
            Self::Alpha(_) => Tag::Alpha,
        }
    }

    /// Returns the literal text of the token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Numeric(numeral) => numeral.as_str(),
            Self::Alpha(letters) => letters.as_str(),
        }
    }

    /// Re-spells the token in the other alphabet, keeping its value.
    ///
    /// `Numeric(28)` becomes `Alpha("ab")` and `Alpha("ab")` becomes
    /// `Numeric(28)`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidToken`] if the value is zero or overflows a `u64`.
    pub fn convert(&self) -> Result<Self, InvalidToken> {
        match self {
            Self::Numeric(numeral) => {
                let letters = numeral::numeric_to_alpha(numeral.value()?)?;
                Ok(Self::Alpha(Letters::new(letters)?))
            }
            Self::Alpha(letters) => {
                let value = numeral::alpha_to_numeric(letters)?;
                Ok(Self::numeric(value))
            }
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a string into maximal runs of digits and lowercase letters.
///
/// Every other character is dropped, so `"1a.2"` yields the same tokens as
/// `"1a2"`, and a string without any digits or letters yields nothing.
///
/// ```
/// use luhmann::domain::token::{Token, tokenize};
///
/// let tokens = tokenize("3cc42");
/// assert_eq!(
///     tokens,
///     vec![Token::numeric(3), Token::alpha("cc").unwrap(), Token::numeric(42)]
/// );
/// ```
#[must_use]
pub fn tokenize(input: &str) -> Vec<Token> {
    TOKEN_PATTERN
        .find_iter(input)
        .filter_map(|m| {
            let run = m.as_str();
            if run.starts_with(|c: char| c.is_ascii_digit()) {
                Some(Token::Numeric(Numeral(run.to_string())))
            } else {
                NonEmptyString::new(run.to_string())
                    .ok()
                    .map(|letters| Token::Alpha(Letters(letters)))
            }
        })
        .collect()
}
