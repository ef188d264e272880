//! ANSI color helpers for terminal output.

use colored::Colorize;

pub fn header(text: &str) -> String {
    text.bold().underline().to_string()
}

pub fn label(text: &str) -> String {
    text.white().dimmed().to_string()
}

pub fn success(text: &str) -> String {
    format!("{} {}", "✓".green(), text)
}

pub fn error(text: &str) -> String {
    format!("{} {}", "✗".red(), text)
}

pub fn highlight(text: &str) -> String {
    text.black().on_yellow().to_string()
}

pub fn position_label(label: &str) -> String {
    match label {
        "start" => label.cyan().to_string(),
        "end" => label.magenta().to_string(),
        "cross" => label.yellow().to_string(),
        other => other.to_string(),
    }
}

/// Format count with comma separators.
pub fn format_count(n: i64) -> String {
    let s = n.to_string();
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(*c);
    }

    result
}
