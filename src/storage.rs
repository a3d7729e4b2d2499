pub mod directory;
pub mod note;
pub mod references;

pub use directory::{Directory, RebaseError, RebaseOptions, RebaseReport, Rename};
pub use note::NoteFile;
pub use references::{PropagateError, RewrittenFile, propagate_references};

/// Name of the per-directory settings folder, relative to the note root.
///
/// It holds `config.toml` and is never scanned for references.
pub const CONFIG_DIR: &str = ".luhmann";
