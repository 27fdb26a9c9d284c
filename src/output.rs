// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output helpers shared by the CLI commands

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::IsTerminal;

use crate::search::MatchStrategy;
use crate::store::ReferenceLine;

/// Print a value as JSON, pretty unless `compact`
pub fn print_json<T: Serialize + ?Sized>(value: &T, compact: bool) -> Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    println!("{}", rendered);
    Ok(())
}

/// Colors only when stdout is a terminal and NO_COLOR is unset
pub fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// `page:line` locator, or `-` for lines without one
pub fn format_location(line: &ReferenceLine) -> String {
    match (line.page, line.line) {
        (Some(page), Some(line)) => format!("{}:{}", page, line),
        (Some(page), None) => format!("{}", page),
        _ => "-".to_string(),
    }
}

pub fn colorize_location(location: &str) -> String {
    if use_colors() {
        location.cyan().to_string()
    } else {
        location.to_string()
    }
}

/// Score as a fixed three-decimal string, colored by confidence
pub fn colorize_score(score: f64) -> String {
    let text = format!("{:.3}", score);
    if !use_colors() {
        return text;
    }
    if score >= 0.8 {
        text.green().bold().to_string()
    } else if score >= 0.5 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

pub fn colorize_strategy(strategy: MatchStrategy) -> String {
    if use_colors() {
        strategy.label().dimmed().to_string()
    } else {
        strategy.label().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(page: Option<u32>, number: Option<u32>) -> ReferenceLine {
        ReferenceLine {
            id: 1,
            text: "ਸਚੁ".to_string(),
            page,
            line: number,
            raag: None,
            author: None,
        }
    }

    #[test]
    fn location_formats() {
        assert_eq!(format_location(&line(Some(1), Some(4))), "1:4");
        assert_eq!(format_location(&line(Some(7), None)), "7");
        assert_eq!(format_location(&line(None, None)), "-");
    }

    #[test]
    fn plain_score_has_three_decimals() {
        // Tests never run attached to a terminal.
        if !use_colors() {
            assert_eq!(colorize_score(0.45), "0.450");
        }
    }
}
