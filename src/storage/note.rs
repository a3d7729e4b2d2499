//! Note file names of the form `<ID> <title>.<ext>`.

use std::path::{Path, PathBuf};

use crate::domain::LuhmannId;

/// A note file whose name begins with a Luhmann ID.
///
/// The ID is everything before the first space. A name without a space
/// (`4d2a.md`) has no title, so the ID stops at the extension instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFile {
    path: PathBuf,
    /// Byte offset in the file name where the ID ends.
    id_end: usize,
}

impl NoteFile {
    /// Split a note file's name into ID and tail.
    ///
    /// Returns `None` if the path has no file name or the name is not valid
    /// UTF-8.
    #[must_use]
    pub fn new(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        let id_end = name.find(' ').map_or_else(
            || {
                Path::new(name)
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .map_or(name.len(), str::len)
            },
            |space| space,
        );
        Some(Self { path, id_end })
    }

    /// The full path of the note.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The file name of the note.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
    }

    /// The raw ID text at the start of the file name.
    ///
    /// Surrounding whitespace is not part of the ID.
    #[must_use]
    pub fn id(&self) -> &str {
        self.file_name()[..self.id_end].trim()
    }

    /// Everything after the raw ID: separator, title and extension.
    #[must_use]
    pub fn tail(&self) -> &str {
        &self.file_name()[self.id_end..]
    }

    /// The ID without any trailing extension, as it appears in references.
    #[must_use]
    pub fn reference(&self) -> &str {
        strip_extension(self.id())
    }

    /// The file name this note would have with `id` in place of its own.
    #[must_use]
    pub fn renamed(&self, id: &LuhmannId) -> String {
        format!("{id}{}", self.tail())
    }
}

/// Strip a trailing `.ext` from an ID string.
///
/// IDs normally carry no extension; this only matters for a name whose ID
/// ran into its extension.
fn strip_extension(id: &str) -> &str {
    match id.rfind('.') {
        Some(dot) if dot > 0 => &id[..dot],
        _ => id,
    }
}
