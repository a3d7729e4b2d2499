//! Rebase Luhmann-numbered notes
//!
//! Notes are files named `<ID> <title>.<ext>`, where the ID follows the
//! Zettelkasten numbering scheme of alternating numbers and letters
//! (`1a2c`). Moving a note to a new place in the hierarchy renames it and all
//! of its descendants, and can rewrite references to the old IDs.

pub mod domain;
pub use domain::{
    Config, InvalidToken, LuhmannId, StripRule, Tag, Token, rebase, resolve_adjacency, tokenize,
};

/// Filesystem access: note files, renames and reference rewriting.
pub mod storage;
pub use storage::{Directory, RebaseError, RebaseOptions, RebaseReport, Rename};
