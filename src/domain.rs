//! Domain models for Luhmann IDs.
//!
//! This module contains the core ID algebra: tokens, the bijective base-26
//! numerals that let a token switch alphabet, and the rebase operation, along
//! with the per-directory configuration.

/// Bijective base-26 conversions.
pub mod numeral;
pub use numeral::InvalidToken;

/// Typed tokens and the tokenizer.
pub mod token;
pub use token::{Tag, Token, tokenize};

/// Luhmann IDs, adjacency repair and rebasing.
pub mod luhmann;
pub use luhmann::{LuhmannId, StripRule, rebase, resolve_adjacency};

mod config;
pub use config::Config;
