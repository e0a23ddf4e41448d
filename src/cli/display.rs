// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal display helpers for the indexer CLI: box drawing plus a handful
//! of padding/size/timing formatters shared by the four subcommands.
//!
//! Colors are a fixed set of the 16 standard ANSI codes, applied only when
//! stdout is a TTY and `NO_COLOR` isn't set.

// Width between the │ border characters, excluding the borders themselves.
pub const BOX_WIDTH: usize = 80;

pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const WHITE: &str = "\x1b[37m";
    pub const GRAY: &str = "\x1b[90m";
    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
}

pub use colors::*;

/// TTY and `NO_COLOR` detection; every coloring helper below defers to this.
pub fn use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stdout)
}

/// Concatenate style codes around `text`, or return it plain when colors are off.
pub fn styled(styles: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", styles.join(""), text, RESET)
    } else {
        text.to_string()
    }
}

/// Apply one named color plus optional modifiers (e.g. `BOLD`).
pub fn themed(color: &str, modifiers: &[&str], text: &str) -> String {
    if use_colors() {
        format!("{}{}{}{}", modifiers.join(""), color, text, RESET)
    } else {
        text.to_string()
    }
}

/// Length of `s` once ANSI escape sequences are stripped out.
pub fn visible_len(s: &str) -> usize {
    let mut in_escape = false;
    let mut len = 0;
    for c in s.chars() {
        if c == '\x1b' {
            in_escape = true;
        } else if in_escape && c == 'm' {
            in_escape = false;
        } else if !in_escape {
            len += 1;
        }
    }
    len
}

// ─── box drawing ────────────────────────────────────────────────────────────

/// `│ content              │`
pub fn row(content: &str) {
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{GRAY}│{RESET}{content}{}{GRAY}│{RESET}", " ".repeat(pad));
}

/// `┌─ LABEL ───────────────┐`
pub fn section_top(label: &str) {
    let label_part = format!("─ {} ", themed(CYAN, &[BOLD], label));
    let remaining = BOX_WIDTH.saturating_sub(visible_len(&label_part));
    println!("{GRAY}┌{RESET}{label_part}{GRAY}{}{RESET}", "─".repeat(remaining));
}

/// `└───────────────────────┘`
pub fn section_bot() {
    println!("{GRAY}└{}┘{RESET}", "─".repeat(BOX_WIDTH));
}

/// `╔═══════════════════════╗`
pub fn double_header() {
    println!("{BLUE}╔{}╗{RESET}", "═".repeat(BOX_WIDTH));
}

/// `╠═══════════════════════╣`
pub fn double_divider() {
    println!("{BLUE}╠{}╣{RESET}", "═".repeat(BOX_WIDTH));
}

/// `╚═══════════════════════╝`
pub fn double_footer() {
    println!("{BLUE}╚{}╝{RESET}", "═".repeat(BOX_WIDTH));
}

/// `║ content               ║`
pub fn row_double(content: &str) {
    let pad = BOX_WIDTH.saturating_sub(visible_len(content));
    println!("{BLUE}║{RESET}{content}{}{BLUE}║{RESET}", " ".repeat(pad));
}

/// Centered, bold title line inside a double-line box.
pub fn title(text: &str) {
    let colored = themed(BRIGHT_CYAN, &[BOLD], text);
    let total_pad = BOX_WIDTH.saturating_sub(visible_len(&colored));
    let left = total_pad / 2;
    let right = total_pad - left;
    println!("{BLUE}║{RESET}{}{colored}{}{BLUE}║{RESET}", " ".repeat(left), " ".repeat(right));
}

// ─── formatters ─────────────────────────────────────────────────────────────

/// Left-pad a (possibly styled) string to a fixed visible width.
pub fn pad_left(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{}{s}", " ".repeat(width - visible))
    }
}

/// Right-pad a (possibly styled) string to a fixed visible width.
pub fn pad_right(s: &str, width: usize) -> String {
    let visible = visible_len(s);
    if visible >= width {
        s.to_string()
    } else {
        format!("{s}{}", " ".repeat(width - visible))
    }
}

/// Format a byte count as a human-readable size.
pub fn format_size(bytes: usize) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / 1024.0 / 1024.0)
    } else if bytes >= 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{bytes} B")
    }
}

/// Truncate a path to `max_len` bytes, prefixing with `...` when shortened.
pub fn truncate_path(path: &str, max_len: usize) -> String {
    if path.len() <= max_len {
        path.to_string()
    } else {
        format!("...{}", &path[path.len() - max_len + 3..])
    }
}

/// Color-coded elapsed time in milliseconds: green=fast, yellow=middling, red=slow.
pub fn timing_ms(value: f64) -> String {
    if !use_colors() {
        return format!("{value:>10.3}");
    }
    let color = if value < 5.0 {
        GREEN
    } else if value < 20.0 {
        YELLOW
    } else {
        RED
    };
    format!("{color}{value:>10.3}{RESET}")
}

/// Color-coded relevance score: brighter green the higher it ranks.
pub fn score_value(score: f64) -> String {
    if !use_colors() {
        return format!("{score:>7.0}");
    }
    let color = if score >= 100.0 {
        BRIGHT_GREEN
    } else if score >= 50.0 {
        GREEN
    } else if score >= 20.0 {
        YELLOW
    } else {
        GRAY
    };
    format!("{color}{score:>7.0}{RESET}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_len_no_escapes() {
        assert_eq!(visible_len("hello"), 5);
        assert_eq!(visible_len(""), 0);
    }

    #[test]
    fn test_visible_len_with_escapes() {
        let colored = format!("{GREEN}hello{RESET}");
        assert_eq!(visible_len(&colored), 5);
    }

    #[test]
    fn pad_left_accounts_for_ansi_codes() {
        let colored = themed(GREEN, &[BOLD], "ok");
        let padded = pad_left(&colored, 5);
        assert_eq!(visible_len(&padded), 5);
    }

    #[test]
    fn format_size_picks_the_right_unit() {
        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
