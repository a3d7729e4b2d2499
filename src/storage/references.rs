//! Rewriting references to a renamed note.
//!
//! Reference files are treated as ISO-8859-1 (Latin-1) text. Every byte is
//! one character, so replacement works directly on the raw bytes and any
//! byte outside 7-bit ASCII is written back unchanged.

use std::{
    ffi::OsStr,
    fmt::Write,
    fs, io,
    path::{Path, PathBuf},
};

use regex::bytes::{NoExpand, Regex, RegexBuilder};
use walkdir::WalkDir;

use crate::{domain::Config, storage::CONFIG_DIR};

/// A file whose content was rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewrittenFile {
    /// The path of the rewritten file.
    pub path: PathBuf,
    /// How many occurrences were replaced.
    pub replacements: usize,
}

/// Replace every occurrence of `old` with `new` in the text files under
/// `root`.
///
/// The match is a plain substring match with no word boundaries: `4d2a` is
/// also replaced inside `4d2ab`. Files that contain no occurrence are not
/// written, so their modification time is unchanged.
///
/// # Errors
///
/// Fails on the first file that cannot be read or written, leaving files
/// already rewritten in place. Also fails if either token contains a
/// character outside Latin-1.
pub fn propagate_references(
    root: &Path,
    old: &str,
    new: &str,
    config: &Config,
) -> Result<Vec<RewrittenFile>, PropagateError> {
    let old_bytes = encode_latin1(old)?;
    let new_bytes = encode_latin1(new)?;

    if old_bytes.is_empty() || old_bytes == new_bytes {
        tracing::debug!("Nothing to replace for '{old}' -> '{new}'");
        return Ok(Vec::new());
    }

    let pattern = literal_pattern(&old_bytes)?;
    let mut rewritten = Vec::new();
    for path in collect_text_paths(root, config) {
        let content = fs::read(&path).map_err(|source| PropagateError::Io {
            path: path.clone(),
            source,
        })?;

        let (updated, replacements) = replace_all(&content, &pattern, &new_bytes);
        if replacements == 0 {
            continue;
        }

        fs::write(&path, updated).map_err(|source| PropagateError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(
            "Rewrote {replacements} reference(s) to {old} in {}",
            path.display()
        );
        rewritten.push(RewrittenFile { path, replacements });
    }

    Ok(rewritten)
}

fn collect_text_paths(root: &Path, config: &Config) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != OsStr::new(CONFIG_DIR))
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(OsStr::to_str)
                .is_some_and(|ext| config.is_reference_extension(ext))
        })
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// A pattern matching exactly the bytes of `needle`.
///
/// Each byte is written as a `\xHH` escape with Unicode disabled, so bytes
/// above 0x7F match themselves rather than a UTF-8 sequence.
fn literal_pattern(needle: &[u8]) -> Result<Regex, PropagateError> {
    let escaped = needle.iter().fold(String::new(), |mut pattern, b| {
        let _ = write!(pattern, "\\x{b:02X}");
        pattern
    });
    Ok(RegexBuilder::new(&escaped).unicode(false).build()?)
}

/// Replace every non-overlapping match, scanning left to right. Returns the
/// new content and the number of replacements.
fn replace_all(haystack: &[u8], pattern: &Regex, replacement: &[u8]) -> (Vec<u8>, usize) {
    let count = pattern.find_iter(haystack).count();
    let output = pattern.replace_all(haystack, NoExpand(replacement));
    (output.into_owned(), count)
}

fn encode_latin1(s: &str) -> Result<Vec<u8>, PropagateError> {
    s.chars()
        .map(|c| {
            u8::try_from(u32::from(c)).map_err(|_| PropagateError::Unencodable(s.to_string()))
        })
        .collect()
}

/// Errors raised while rewriting references.
#[derive(Debug, thiserror::Error)]
pub enum PropagateError {
    /// A reference file could not be read or written.
    #[error("failed to rewrite references in {}: {source}", path.display())]
    Io {
        /// The file being processed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// The ID cannot be represented in the single-byte reference encoding.
    #[error("'{0}' contains characters outside ISO-8859-1")]
    Unencodable(String),

    /// The search pattern for an ID could not be built.
    #[error("cannot search for the old ID: {0}")]
    Pattern(#[from] regex::Error),
}
