//! A filesystem backed directory of Luhmann-numbered notes.
//!
//! The [`Directory`] finds the notes under a source prefix, plans their new
//! names and carries out the renames, optionally rewriting references to each
//! renamed note across the whole tree.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use crate::{
    domain::{Config, InvalidToken, LuhmannId},
    storage::{
        note::NoteFile,
        CONFIG_DIR,
        references::{PropagateError, RewrittenFile, propagate_references},
    },
};

/// A directory of note files named `<ID> <title>.<ext>`.
#[derive(Debug)]
pub struct Directory {
    /// The directory the notes live in.
    root: PathBuf,
    config: Config,
}

/// Switches for [`Directory::rebase`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebaseOptions {
    /// Rewrite references to each renamed note in the text files under the
    /// root.
    pub propagate_references: bool,

    /// Plan the renames without touching the filesystem.
    pub dry_run: bool,
}

/// One planned rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    /// The current path of the note.
    pub from: PathBuf,
    /// The path the note is moved to.
    pub to: PathBuf,
    /// The old ID as it appears in references (extension stripped).
    pub old_id: String,
    /// The new ID.
    pub new_id: String,
}

impl Rename {
    /// Returns `true` if the rename would leave the file where it is.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }
}

/// The outcome of a rebase.
#[derive(Debug, Default)]
pub struct RebaseReport {
    /// Renames in the order they were performed (or planned, for a dry run).
    pub renames: Vec<Rename>,
    /// Files whose references were rewritten.
    pub rewritten: Vec<RewrittenFile>,
}

impl Directory {
    /// Opens the note directory at `root`, loading its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RebaseError::DirectoryNotFound`] if `root` is not an
    /// existing directory.
    pub fn open(root: PathBuf) -> Result<Self, RebaseError> {
        let config = load_config(&root);
        Self::with_config(root, config)
    }

    /// Opens the note directory at `root` with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RebaseError::DirectoryNotFound`] if `root` is not an
    /// existing directory.
    pub fn with_config(root: PathBuf, config: Config) -> Result<Self, RebaseError> {
        if !root.is_dir() {
            return Err(RebaseError::DirectoryNotFound(root));
        }
        Ok(Self { root, config })
    }

    /// Find the files directly inside the root whose name starts with
    /// `prefix`, sorted by name.
    ///
    /// Subdirectories and names that are not valid UTF-8 are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed.
    pub fn notes_with_prefix(&self, prefix: &str) -> Result<Vec<NoteFile>, RebaseError> {
        let entries = fs::read_dir(&self.root).map_err(|source| RebaseError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut notes: Vec<_> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| {
                let note = NoteFile::new(path);
                if note.is_none() {
                    tracing::debug!("Skipping entry with a non UTF-8 name");
                }
                note
            })
            .filter(|note| note.file_name().starts_with(prefix))
            .collect();

        notes.sort_by(|a, b| a.file_name().cmp(b.file_name()));
        Ok(notes)
    }

    /// Work out the new name of every note under `source_prefix`.
    ///
    /// Nothing on disk is changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be listed, or if the ID of a
    /// matching note cannot be rebased.
    pub fn plan(
        &self,
        source_prefix: &str,
        target_prefix: &str,
    ) -> Result<Vec<Rename>, RebaseError> {
        let strip = self.config.strip().count(source_prefix);
        let target = LuhmannId::from(target_prefix);

        self.notes_with_prefix(source_prefix)?
            .into_iter()
            .map(|note| {
                let new_id = LuhmannId::from(note.id())
                    .rebase(strip, &target)
                    .map_err(|source| RebaseError::InvalidToken {
                        path: note.path().to_path_buf(),
                        source,
                    })?;
                if !new_id.is_alternating() {
                    tracing::warn!("{new_id} has adjacent tokens of the same kind");
                }
                Ok(Rename {
                    from: note.path().to_path_buf(),
                    to: self.root.join(note.renamed(&new_id)),
                    old_id: note.reference().to_string(),
                    new_id: new_id.to_string(),
                })
            })
            .collect()
    }

    /// Carry out a single planned rename.
    ///
    /// When `propagate` is set, every reference to the old ID in
    /// the text files under the root is replaced with the new ID after the
    /// file has been moved.
    ///
    /// # Errors
    ///
    /// Fails if the source file no longer exists, if a file already exists
    /// at the new path, or if the rename or a reference rewrite fails.
    pub fn apply(
        &self,
        rename: &Rename,
        propagate: bool,
    ) -> Result<Vec<RewrittenFile>, RebaseError> {
        if rename.is_noop() {
            tracing::debug!("{} already has the target name", rename.from.display());
            return Ok(Vec::new());
        }

        if !exists(&rename.from)? {
            return Err(RebaseError::FileVanished(rename.from.clone()));
        }
        if exists(&rename.to)? {
            return Err(RebaseError::TargetExists(rename.to.clone()));
        }

        fs::rename(&rename.from, &rename.to).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => RebaseError::FileVanished(rename.from.clone()),
            _ => RebaseError::Io {
                path: rename.from.clone(),
                source,
            },
        })?;
        tracing::info!(
            "Renamed {} -> {}",
            rename.from.display(),
            rename.to.display()
        );

        if propagate {
            Ok(propagate_references(
                &self.root,
                &rename.old_id,
                &rename.new_id,
                &self.config,
            )?)
        } else {
            Ok(Vec::new())
        }
    }

    /// Rebase every note under `source_prefix` onto `target_prefix`.
    ///
    /// All renames are planned first, then performed one at a time. The
    /// first failure stops the batch; renames and rewrites already done are
    /// left in place.
    ///
    /// # Errors
    ///
    /// See [`Directory::plan`] and [`Directory::apply`].
    pub fn rebase(
        &self,
        source_prefix: &str,
        target_prefix: &str,
        options: RebaseOptions,
    ) -> Result<RebaseReport, RebaseError> {
        self.rebase_with(source_prefix, target_prefix, options, &mut |_| {})
    }

    /// Like [`Directory::rebase`], calling `before_rename` with each rename
    /// just before it is carried out.
    ///
    /// A dry run performs no renames, so `before_rename` is never called.
    ///
    /// # Errors
    ///
    /// See [`Directory::plan`] and [`Directory::apply`].
    pub fn rebase_with(
        &self,
        source_prefix: &str,
        target_prefix: &str,
        options: RebaseOptions,
        before_rename: &mut dyn FnMut(&Rename),
    ) -> Result<RebaseReport, RebaseError> {
        let renames = self.plan(source_prefix, target_prefix)?;
        tracing::debug!(
            "Planned {} rename(s) from '{source_prefix}' to '{target_prefix}'",
            renames.len()
        );

        if options.dry_run {
            return Ok(RebaseReport {
                renames,
                rewritten: Vec::new(),
            });
        }

        let mut report = RebaseReport::default();
        for rename in renames {
            before_rename(&rename);
            let rewritten = self.apply(&rename, options.propagate_references)?;
            report.rewritten.extend(rewritten);
            report.renames.push(rename);
        }
        Ok(report)
    }
}

fn exists(path: &Path) -> Result<bool, RebaseError> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(RebaseError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_DIR).join("config.toml");
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Config::default();
    }
    Config::load(&path).unwrap_or_else(|e| {
        tracing::warn!("{e}; using default configuration");
        Config::default()
    })
}

/// Errors that stop a rebase.
#[derive(Debug, thiserror::Error)]
pub enum RebaseError {
    /// The note directory does not exist.
    #[error("directory '{}' does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    /// A note disappeared between planning and renaming.
    #[error("{} vanished before it could be renamed", .0.display())]
    FileVanished(PathBuf),

    /// The new name is already taken.
    #[error("cannot rename to {}: file already exists", .0.display())]
    TargetExists(PathBuf),

    /// A note's ID could not be rebased.
    #[error("cannot rebase {}: {source}", path.display())]
    InvalidToken {
        /// The note being rebased.
        path: PathBuf,
        /// The conversion that failed.
        source: InvalidToken,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },

    /// Rewriting references failed.
    #[error(transparent)]
    References(#[from] PropagateError),
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::domain::StripRule;

    fn setup_temp_directory(names: &[&str]) -> (TempDir, Directory) {
        let tmp = TempDir::new().expect("failed to create temp dir");
        for name in names {
            fs::write(tmp.path().join(name), format!("# {name}\n")).unwrap();
        }
        let dir = Directory::open(tmp.path().to_path_buf()).unwrap();
        (tmp, dir)
    }

    fn file_names(dir: &Directory) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(&dir.root)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn open_missing_directory_fails() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing");
        assert!(matches!(
            Directory::open(missing),
            Err(RebaseError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn open_file_fails() {
        let (tmp, _dir) = setup_temp_directory(&["1 note.md"]);
        assert!(matches!(
            Directory::open(tmp.path().join("1 note.md")),
            Err(RebaseError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn notes_with_prefix_matches_literal_start() {
        let (tmp, dir) =
            setup_temp_directory(&["4d note.md", "4d2a child.md", "4e other.md", "14d x.md"]);
        fs::create_dir(tmp.path().join("4d folder")).unwrap();

        let names: Vec<_> = dir
            .notes_with_prefix("4d")
            .unwrap()
            .iter()
            .map(|note| note.file_name().to_string())
            .collect();

        assert_eq!(names, vec!["4d note.md", "4d2a child.md"]);
    }

    #[test]
    fn rebase_renames_matching_note() {
        let (_tmp, dir) = setup_temp_directory(&["4d2a note.md"]);

        let report = dir.rebase("4d", "5e", RebaseOptions::default()).unwrap();

        assert_eq!(report.renames.len(), 1);
        assert_eq!(report.renames[0].old_id, "4d2a");
        assert_eq!(report.renames[0].new_id, "5e2a");
        assert_eq!(file_names(&dir), vec!["5e2a note.md"]);
    }

    #[test]
    fn rebase_repairs_seam() {
        let (_tmp, dir) = setup_temp_directory(&["4d2a note.md"]);

        dir.rebase("4d", "4", RebaseOptions::default()).unwrap();

        assert_eq!(file_names(&dir), vec!["4b1 note.md"]);
    }

    #[test]
    fn rebase_moves_whole_subtree() {
        let (_tmp, dir) = setup_temp_directory(&[
            "3b parent.md",
            "3b1 child.md",
            "3b1a grandchild.md",
            "3c sibling.md",
        ]);

        dir.rebase("3b", "7a", RebaseOptions::default()).unwrap();

        assert_eq!(
            file_names(&dir),
            vec![
                "3c sibling.md",
                "7a parent.md",
                "7a1 child.md",
                "7a1a grandchild.md"
            ]
        );
    }

    #[test]
    fn rebase_keeps_file_content() {
        let (tmp, dir) = setup_temp_directory(&["4d2a note.md"]);

        dir.rebase("4d", "5e", RebaseOptions::default()).unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("5e2a note.md")).unwrap(),
            "# 4d2a note.md\n"
        );
    }

    #[test]
    fn dry_run_changes_nothing() {
        let (_tmp, dir) = setup_temp_directory(&["4d2a note.md"]);

        let report = dir
            .rebase(
                "4d",
                "5e",
                RebaseOptions {
                    dry_run: true,
                    ..RebaseOptions::default()
                },
            )
            .unwrap();

        assert_eq!(report.renames.len(), 1);
        assert!(report.renames[0].to.ends_with("5e2a note.md"));
        assert_eq!(file_names(&dir), vec!["4d2a note.md"]);
    }

    #[test]
    fn existing_target_aborts() {
        let (_tmp, dir) = setup_temp_directory(&["4d2a note.md", "5e2a note.md"]);

        let error = dir.rebase("4d", "5e", RebaseOptions::default()).unwrap_err();

        assert!(matches!(error, RebaseError::TargetExists(_)));
        assert_eq!(file_names(&dir), vec!["4d2a note.md", "5e2a note.md"]);
    }

    #[test]
    fn vanished_file_aborts() {
        let (tmp, dir) = setup_temp_directory(&["4d2a note.md"]);
        let plan = dir.plan("4d", "5e").unwrap();
        fs::remove_file(tmp.path().join("4d2a note.md")).unwrap();

        let error = dir.apply(&plan[0], false).unwrap_err();

        assert!(matches!(error, RebaseError::FileVanished(_)));
    }

    #[test]
    fn unconvertible_token_fails_before_any_rename() {
        let (_tmp, dir) = setup_temp_directory(&["1b note.md", "1b0 zero.md"]);

        let error = dir.rebase("1b", "2", RebaseOptions::default()).unwrap_err();

        assert!(matches!(
            error,
            RebaseError::InvalidToken {
                source: InvalidToken::Zero(_),
                ..
            }
        ));
        assert_eq!(file_names(&dir), vec!["1b note.md", "1b0 zero.md"]);
    }

    #[test]
    fn hook_sees_each_rename_before_it_happens() {
        let (tmp, dir) = setup_temp_directory(&["3b parent.md", "3b1 child.md"]);
        let mut seen = Vec::new();

        let report = dir
            .rebase_with("3b", "7a", RebaseOptions::default(), &mut |rename| {
                assert!(rename.from.exists());
                assert!(!rename.to.exists());
                seen.push(rename.clone());
            })
            .unwrap();

        assert_eq!(seen, report.renames);
        assert_eq!(seen.len(), 2);
        assert!(tmp.path().join("7a1 child.md").exists());
    }

    #[test]
    fn hook_is_not_called_on_dry_run() {
        let (_tmp, dir) = setup_temp_directory(&["4d2a note.md"]);
        let mut calls = 0;

        let report = dir
            .rebase_with(
                "4d",
                "5e",
                RebaseOptions {
                    dry_run: true,
                    ..RebaseOptions::default()
                },
                &mut |_| calls += 1,
            )
            .unwrap();

        assert_eq!(calls, 0);
        assert_eq!(report.renames.len(), 1);
    }

    #[test]
    fn same_prefix_is_a_no_op() {
        let (_tmp, dir) = setup_temp_directory(&["4d2a note.md"]);

        let report = dir.rebase("4d", "4d", RebaseOptions::default()).unwrap();

        assert!(report.renames[0].is_noop());
        assert_eq!(file_names(&dir), vec!["4d2a note.md"]);
    }

    #[test]
    fn propagates_references_after_rename() {
        let (tmp, dir) = setup_temp_directory(&["4d2a note.md"]);
        fs::write(tmp.path().join("index.md"), "see 4d2a and 4d2ab").unwrap();

        let report = dir
            .rebase(
                "4d",
                "5e",
                RebaseOptions {
                    propagate_references: true,
                    ..RebaseOptions::default()
                },
            )
            .unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("index.md")).unwrap(),
            "see 5e2a and 5e2ab"
        );
        // the renamed note mentions its own old name too
        assert_eq!(
            fs::read_to_string(tmp.path().join("5e2a note.md")).unwrap(),
            "# 5e2a note.md\n"
        );
        assert_eq!(report.rewritten.len(), 2);
    }

    #[test]
    fn references_untouched_without_propagation() {
        let (tmp, dir) = setup_temp_directory(&["4d2a note.md"]);
        fs::write(tmp.path().join("index.md"), "see 4d2a").unwrap();

        dir.rebase("4d", "5e", RebaseOptions::default()).unwrap();

        assert_eq!(
            fs::read_to_string(tmp.path().join("index.md")).unwrap(),
            "see 4d2a"
        );
    }

    #[test]
    fn config_file_selects_strip_rule() {
        let (tmp, _dir) = setup_temp_directory(&["12a3b note.md"]);
        fs::create_dir(tmp.path().join(CONFIG_DIR)).unwrap();
        let mut config = Config::default();
        config.set_strip(StripRule::Characters);
        config
            .save(&tmp.path().join(CONFIG_DIR).join("config.toml"))
            .unwrap();

        let dir = Directory::open(tmp.path().to_path_buf()).unwrap();
        dir.rebase("12a", "9c", RebaseOptions::default()).unwrap();

        assert_eq!(file_names(&dir), vec![CONFIG_DIR, "9c2 note.md"]);
    }

    #[test]
    fn invalid_config_falls_back_to_default() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(CONFIG_DIR)).unwrap();
        fs::write(
            tmp.path().join(CONFIG_DIR).join("config.toml"),
            "not toml [",
        )
        .unwrap();

        let dir = Directory::open(tmp.path().to_path_buf()).unwrap();

        assert_eq!(dir.config, Config::default());
    }
}
