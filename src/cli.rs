use std::path::PathBuf;

mod terminal;

use clap::ArgAction;
use luhmann::{Directory, RebaseOptions, RebaseReport};
use terminal::{Colorize, DescribeRename};
use tracing::instrument;

/// Rename files in a directory using Luhmann-style numbering.
///
/// Every file whose name starts with SOURCE_PREFIX is renamed so that the
/// prefix is replaced by TARGET_PREFIX, keeping the rest of its ID, its title
/// and its extension.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// The source prefix to match files
    source_prefix: String,

    /// The target prefix for renamed files
    target_prefix: String,

    /// The directory containing the files to rename
    directory: PathBuf,

    /// Also rewrite references to each renamed note in the text files under
    /// the directory
    #[arg(long, short)]
    references: bool,

    /// Show what would be renamed without making changes
    #[arg(long, short = 'n')]
    dry_run: bool,

    /// Suppress per-file output
    #[arg(long, short)]
    quiet: bool,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.rebase()
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }

    #[instrument(skip_all)]
    fn rebase(self) -> anyhow::Result<()> {
        let directory = Directory::open(self.directory)?;
        let options = RebaseOptions {
            propagate_references: self.references,
            dry_run: self.dry_run,
        };

        let quiet = self.quiet;
        let report = directory.rebase_with(
            &self.source_prefix,
            &self.target_prefix,
            options,
            &mut |rename| {
                if !quiet {
                    println!("{}", rename.describe("Renaming"));
                }
            },
        )?;

        if quiet {
            return Ok(());
        }

        if report.renames.is_empty() {
            println!(
                "{}",
                format!("No files start with '{}'", self.source_prefix).warning()
            );
        } else if self.dry_run {
            for rename in &report.renames {
                println!("{}", rename.describe("Would rename"));
            }
        } else {
            print_summary(&report, self.references);
        }

        Ok(())
    }
}

fn print_summary(report: &RebaseReport, references: bool) {
    let renamed = report.renames.iter().filter(|r| !r.is_noop()).count();
    println!("{}", format!("✅ Renamed {renamed} file(s)").success());
    if references {
        println!(
            "{}",
            format!("   Updated references in {} file(s)", report.rewritten.len()).dim()
        );
    }
}
