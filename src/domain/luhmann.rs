//! Luhmann IDs and the rebase algebra.
//!
//! A Luhmann ID is a sequence of tokens that alternate between decimal
//! numbers and lowercase letters, e.g. `1a2c`. Each switch of alphabet is one
//! level deeper in the note hierarchy. Rebasing moves a note (and its
//! descendants) under a new parent by replacing the leading prefix of its ID.

use std::{convert::Infallible, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::domain::{
    numeral::InvalidToken,
    token::{Token, tokenize},
};

/// A Luhmann ID, stored as its sequence of tokens.
///
/// Any string can be parsed into a `LuhmannId`; characters that are not
/// digits or lowercase letters are dropped. Parsing does not enforce the
/// alternation grammar, see [`LuhmannId::is_alternating`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LuhmannId {
    tokens: Vec<Token>,
}

impl LuhmannId {
    /// Build an ID from an already tokenized sequence.
    #[must_use]
    pub const fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Returns `true` if no two adjacent tokens share a tag.
    #[must_use]
    pub fn is_alternating(&self) -> bool {
        self.tokens.windows(2).all(|pair| pair[0].tag() != pair[1].tag())
    }

    /// The tokens left after dropping the first `strip` tokens.
    ///
    /// Stripping more tokens than the ID has leaves nothing.
    #[must_use]
    pub fn remainder(&self, strip: usize) -> &[Token] {
        self.tokens.get(strip..).unwrap_or_default()
    }

    /// Replace the first `strip` tokens of this ID with `target`.
    ///
    /// The spliced sequence is passed through [`resolve_adjacency`] so that
    /// the seam between `target` and the remainder alternates again.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidToken`] if a token at the seam has to change alphabet
    /// but has no spelling in the other one (e.g. a `0`).
    pub fn rebase(&self, strip: usize, target: &Self) -> Result<Self, InvalidToken> {
        let spliced = target
            .tokens
            .iter()
            .chain(self.remainder(strip))
            .cloned()
            .collect();
        resolve_adjacency(spliced).map(Self::from_tokens)
    }
}

impl FromStr for LuhmannId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<&str> for LuhmannId {
    fn from(value: &str) -> Self {
        Self::from_tokens(tokenize(value))
    }
}

impl fmt::Display for LuhmannId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.tokens.iter().try_for_each(|token| write!(f, "{token}"))
    }
}

/// How many leading tokens of an old ID belong to the source prefix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripRule {
    /// Drop as many tokens as the source prefix tokenizes into.
    ///
    /// `4d` strips two tokens from `4d2a`, leaving `2a`.
    #[default]
    Tokens,

    /// Drop as many tokens as the source prefix has characters.
    ///
    /// This matches the prefix length only when every token of the prefix
    /// is a single character; `12a` strips three tokens, not two.
    Characters,
}

impl StripRule {
    /// The number of leading tokens to strip for the given source prefix.
    #[must_use]
    pub fn count(self, source_prefix: &str) -> usize {
        match self {
            Self::Tokens => tokenize(source_prefix).len(),
            Self::Characters => source_prefix.chars().count(),
        }
    }
}

/// Rebase `id` from `source_prefix` onto `target_prefix`.
///
/// ```
/// use luhmann::{rebase, StripRule};
///
/// let id = rebase("4d2a", "4d", "5e", StripRule::Tokens).unwrap();
/// assert_eq!(id.to_string(), "5e2a");
/// ```
///
/// # Errors
///
/// Returns [`InvalidToken`] if the seam cannot be repaired.
pub fn rebase(
    id: &str,
    source_prefix: &str,
    target_prefix: &str,
    rule: StripRule,
) -> Result<LuhmannId, InvalidToken> {
    LuhmannId::from(id).rebase(rule.count(source_prefix), &LuhmannId::from(target_prefix))
}

/// Restore alternation after two token sequences have been joined.
///
/// Walks the sequence once from left to right. Whenever a token has the same
/// tag as the token before it, it is re-spelled in the other alphabet
/// (`2` becomes `b`, `a` becomes `1`).
///
/// Each pair is inspected exactly once, after any change to its left token.
/// Earlier pairs are never revisited and the pass does not repeat until
/// stable; callers rely on the exact single-pass output.
///
/// # Errors
///
/// Returns [`InvalidToken`] if a token that must be converted has no
/// spelling in the other alphabet.
pub fn resolve_adjacency(mut tokens: Vec<Token>) -> Result<Vec<Token>, InvalidToken> {
    for i in 1..tokens.len() {
        if tokens[i - 1].tag() == tokens[i].tag() {
            tracing::trace!("converting '{}' after '{}'", tokens[i], tokens[i - 1]);
            tokens[i] = tokens[i].convert()?;
        }
    }
    Ok(tokens)
}
