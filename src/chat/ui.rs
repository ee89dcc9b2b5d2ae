//! Chat session UI text.

use super::command::SLASH_COMMANDS;
use crate::ui::Style;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn banner() -> String {
    format!(
        "{} {} - type {} to display available commands",
        Style::header("chat"),
        Style::version(format!("v{VERSION}")),
        Style::command("/help"),
    )
}

pub fn help() -> String {
    let mut lines = vec![Style::header("Available commands")];
    for (cmd, desc) in SLASH_COMMANDS {
        lines.push(format!(
            "  {} {}",
            Style::command(format!("{cmd:<18}")),
            Style::secondary(desc)
        ));
    }
    lines.join("\n")
}

pub fn total_tokens_line(total: u64) -> String {
    format!(
        "{} {}",
        Style::header("Total tokens used:"),
        Style::value(total)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_command() {
        let help = help();
        for (cmd, _) in SLASH_COMMANDS {
            assert!(help.contains(cmd), "help is missing {cmd}");
        }
    }

    #[test]
    fn test_banner_mentions_help() {
        assert!(banner().contains("/help"));
    }
}
