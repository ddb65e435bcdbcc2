// Output formatting utilities

use crate::models::{Stage, Task};
use std::io::IsTerminal;

// ANSI escape codes for terminal formatting
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_RESET: &str = "\x1b[0m";

/// Map a color name to its ANSI foreground code
fn color_name_to_fg(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "black" => Some("\x1b[30m"),
        "red" => Some("\x1b[31m"),
        "green" => Some("\x1b[32m"),
        "yellow" => Some("\x1b[33m"),
        "blue" => Some("\x1b[34m"),
        "magenta" | "purple" => Some("\x1b[35m"),
        "cyan" => Some("\x1b[36m"),
        "white" => Some("\x1b[37m"),
        _ => None,
    }
}

/// Check if stdout is a terminal (TTY)
pub fn is_tty() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width dynamically
///
/// Uses the `terminal_size` crate for reliable detection, with fallback to
/// COLUMNS environment variable and a sensible default.
pub fn get_terminal_width() -> usize {
    if let Some((terminal_size::Width(w), _)) = terminal_size::terminal_size() {
        if w > 0 {
            return w as usize;
        }
    }

    if let Ok(cols) = std::env::var("COLUMNS") {
        if let Ok(width) = cols.parse::<usize>() {
            if width > 0 && width < 10000 {
                return width;
            }
        }
    }

    120
}

/// Apply bold formatting if in TTY mode
fn bold_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_BOLD, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn dim_if_tty(text: &str, is_tty: bool) -> String {
    if is_tty {
        format!("{}{}{}", ANSI_DIM, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

/// Stage label in the stage's color (bold), plain when not a TTY
pub fn stage_label(stage: Stage, is_tty: bool) -> String {
    match (is_tty, color_name_to_fg(stage.color())) {
        (true, Some(fg)) => format!("{}{}{}{}", ANSI_BOLD, fg, stage.label(), ANSI_RESET),
        _ => stage.label().to_string(),
    }
}

/// Cut `text` to at most `max` characters, marking the cut with `...`
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= 3 {
        return text.chars().take(max).collect();
    }
    let mut cut: String = text.chars().take(max - 3).collect();
    cut.push_str("...");
    cut
}

/// One task line: id, title and (if any) the first line of the description
fn format_task_line(task: &Task, width: usize, is_tty: bool) -> String {
    let prefix = format!("  {}  ", task.id);
    let available = width.saturating_sub(prefix.chars().count()).max(10);

    let title = truncate(&task.title, available);
    let mut line = format!("{}{}", prefix, title);

    let summary = task.description.lines().next().unwrap_or("").trim();
    let used = title.chars().count();
    if !summary.is_empty() && used + 3 < available {
        let rest = truncate(summary, available - used - 3);
        line.push_str(&dim_if_tty(&format!(" - {}", rest), is_tty));
    }
    line
}

/// Render one column: a `Label (count)` header, then its tasks
pub fn format_stage(stage: Stage, tasks: &[&Task], width: usize, is_tty: bool) -> String {
    let mut out = format!("{} ({})\n", stage_label(stage, is_tty), tasks.len());
    if tasks.is_empty() {
        out.push_str(&dim_if_tty("  (no tasks)", is_tty));
        out.push('\n');
    }
    for task in tasks {
        out.push_str(&format_task_line(task, width, is_tty));
        out.push('\n');
    }
    out
}

/// Render every column in stage order, separated by blank lines
pub fn format_board(columns: &[(Stage, Vec<&Task>)], width: usize, is_tty: bool) -> String {
    columns
        .iter()
        .map(|(stage, tasks)| format_stage(*stage, tasks, width, is_tty))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Table of stages with their colors and task counts
pub fn format_stages_table(counts: &[(Stage, usize)], is_tty: bool) -> String {
    let id_width = Stage::all().iter().map(|s| s.id().len()).max().unwrap_or(5).max(2);
    let label_width = Stage::all().iter().map(|s| s.label().len()).max().unwrap_or(5).max(5);

    let header = format!(
        "{:<id_w$}  {:<label_w$}  {:<7}  {}",
        "Id", "Label", "Color", "Tasks",
        id_w = id_width,
        label_w = label_width,
    );
    let mut lines = vec![bold_if_tty(&header, is_tty)];
    for (stage, count) in counts {
        // Pad before coloring so escape codes don't skew alignment
        let label = format!("{:<label_w$}", stage.label(), label_w = label_width);
        let label = if is_tty {
            match color_name_to_fg(stage.color()) {
                Some(fg) => format!("{}{}{}", fg, label, ANSI_RESET),
                None => label,
            }
        } else {
            label
        };
        lines.push(format!(
            "{:<id_w$}  {}  {:<7}  {}",
            stage.id(), label, stage.color(), count,
            id_w = id_width,
        ));
    }
    lines.join("\n")
}
