//! Terminal output helpers for consistent CLI formatting

use std::io::IsTerminal;

/// Check if color output is enabled
fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal()
}

/// Wrap `text` in an ANSI escape when color is enabled
fn paint(code: &str, text: &str) -> String {
    if use_color() {
        format!("\x1b[{code}m{text}\x1b[0m")
    } else {
        text.to_string()
    }
}

/// Print a success message (green checkmark)
pub fn print_success(message: &str) {
    if use_color() {
        println!("{} {message}", paint("32", "✓"));
    } else {
        println!("OK: {message}");
    }
}

/// Print a warning message (yellow)
pub fn print_warning(message: &str) {
    eprintln!("{} {message}", paint("33", "Warning:"));
}

/// Print an info message (blue)
pub fn print_info(message: &str) {
    if use_color() {
        println!("{} {message}", paint("34", "ℹ"));
    } else {
        println!("Info: {message}");
    }
}

/// Print a key-value pair with consistent formatting
pub fn print_key_value(key: &str, value: &str) {
    println!("  {} {value}", paint("1", &format!("{key}:")));
}

/// Print a list of next steps
pub fn print_next_steps(steps: &[String]) {
    println!("\nNext steps:");
    for (i, step) in steps.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }
}
