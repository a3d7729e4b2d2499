//! Coloured console output for rename progress and summaries.
//!
//! Colour is only used when stdout supports it; otherwise every helper
//! returns the text unchanged, so piped output stays plain.

use luhmann::Rename;
use owo_colors::{OwoColorize, colors::css};

/// Detects whether colored output should be enabled
fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Styles for the lines the rebase command prints.
pub trait Colorize {
    /// A finished batch (green)
    fn success(&self) -> String;
    /// Nothing matched (amber)
    fn warning(&self) -> String;
    /// Secondary detail
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Green>().to_string())
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), |s| s.fg::<css::Orange>().to_string())
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), |s| s.dimmed().to_string())
    }
}

fn paint(text: &str, style: impl FnOnce(&str) -> String) -> String {
    if supports_color() {
        style(text)
    } else {
        text.to_string()
    }
}

/// One line of output per rename.
pub trait DescribeRename {
    /// `<verb>: <old path> -> <new path>`, with the new path highlighted.
    fn describe(&self, verb: &str) -> String;
}

impl DescribeRename for Rename {
    fn describe(&self, verb: &str) -> String {
        rename_line(verb, self, supports_color())
    }
}

fn rename_line(verb: &str, rename: &Rename, color: bool) -> String {
    let (from, to) = (rename.from.display(), rename.to.display());
    if color {
        format!("{verb}: {from} -> {}", to.fg::<css::LightBlue>())
    } else {
        format!("{verb}: {from} -> {to}")
    }
}
