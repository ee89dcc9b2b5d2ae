//! Injected output sink.
//!
//! Session components never print directly; they write through a
//! [`Console`] handed in by the caller, so tests can capture everything a
//! session says without touching process-global state.

use crate::chat::{Role, Turn};
use crate::ui::Style;

/// Output capability injected into the session loop, command handling,
/// and the completion client.
pub trait Console {
    /// A plain line to stdout.
    fn plain(&self, text: &str);

    /// A dimmed status notice.
    fn notice(&self, text: &str);

    /// An error line to stderr.
    fn error(&self, text: &str);

    /// Renders one transcript turn.
    ///
    /// `raw` shows assistant replies as literal text; otherwise the
    /// content goes through whatever display formatting the console
    /// implements. System turns produce no output.
    fn turn(&self, turn: &Turn, raw: bool);
}

/// The real terminal console.
pub struct TermConsole;

impl Console for TermConsole {
    fn plain(&self, text: &str) {
        println!("{text}");
    }

    fn notice(&self, text: &str) {
        println!("{}", Style::secondary(text));
    }

    fn error(&self, text: &str) {
        eprintln!("{} {text}", Style::error("Error:"));
    }

    fn turn(&self, turn: &Turn, raw: bool) {
        match turn.role {
            Role::System => {}
            Role::User => println!("> {}", turn.content),
            Role::Assistant => {
                if raw {
                    println!("{} {}", Style::speaker("Assistant:"), turn.content);
                } else {
                    // Formatted display starts the reply on its own line
                    println!("{}", Style::speaker("Assistant:"));
                    println!("{}", turn.content.trim_end());
                    println!();
                }
            }
        }
    }
}
