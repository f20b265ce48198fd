//! Consistent colored terminal output for the depsort CLI.
//!
//! Colors are automatically disabled when stdout/stderr is not a TTY.

use colored::Colorize;

// ---------- Headers ----------

/// Format a header line: "=== Title ==="
pub fn header(title: &str) -> String {
    format!("=== {} ===", title.bold())
}

/// "depsort: 3 unit(s) from /path/to/depsort.toml"
pub fn project_header(unit_count: usize, config_path: &str) -> String {
    format!(
        "{}: {} unit(s) {}",
        "depsort".bold().cyan(),
        unit_count.to_string().bold(),
        format!("from {}", config_path).dimmed()
    )
}

// ---------- Status indicators ----------

/// Green checkmark + message (success)
pub fn success(msg: &str) -> String {
    format!("{} {}", "✓".green().bold(), msg)
}

/// Red error + message
pub fn error(msg: &str) -> String {
    format!("{} {}", "✗".red().bold(), msg)
}

/// Dim info/hint message
pub fn hint(msg: &str) -> String {
    format!("{}", msg.dimmed())
}

// ---------- Order output ----------

/// "  1. label  (4 files)"
pub fn order_entry(position: usize, label: &str, tree_size: usize) -> String {
    format!(
        "  {} {} {}",
        format!("{}.", position).dimmed(),
        label.bold(),
        format!("({} file(s))", tree_size).dimmed()
    )
}

/// Format a key-value summary line with aligned values
pub fn summary_line(key: &str, value: &str) -> String {
    format!("  {:<20} {}", format!("{}:", key).dimmed(), value)
}
