pub mod describe;
pub mod list;
pub mod new;
pub mod promote;
pub mod set;

use colored::Colorize;
use std::fmt::Display;

/// Print a `✓ message` confirmation line.
pub(crate) fn print_done(message: impl Display) {
    println!("{} {message}", "✓".green().bold());
}

/// Render a list the way it appears in confirmation lines: `[a, b]`.
pub(crate) fn format_list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}
