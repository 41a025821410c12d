//! Unified output formatting for consistent CLI presentation.
//!
//! Every user-initiated command reports through these helpers so messages
//! share one color scheme: red for errors, yellow for warnings, green for
//! success, bright_black for secondary detail.

use colored::*;

/// Formats and prints an error message with consistent styling
///
/// # Format
/// ```text
///
/// ✕ Error: <message>
///
/// ```
pub fn print_error(message: &str) {
    println!("\n{} {}\n", "✕ Error:".red(), message.white());
}

/// Formats and prints a warning line
///
/// # Format
/// ```text
/// ⚠ <message>
/// ```
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow(), message.white());
}

/// Formats and prints a success message with consistent styling
///
/// # Format
/// ```text
///
/// ✓ <message>
/// ```
pub fn print_success(message: &str) {
    println!("\n{} {}", "✓".green(), message.white());
}

/// Formats and prints an informational message with consistent styling
pub fn print_info(message: &str) {
    println!("\n{}\n", message.white());
}

/// Formats and prints a section header with consistent styling
///
/// # Format
/// ```text
///
/// <header>:
///
/// ```
pub fn print_section_header(header: &str) {
    println!("\n{}:\n", header.white());
}

/// `  label  value`, label muted.
pub fn print_field(label: &str, value: &str) {
    println!("  {:<12} {}", label.bright_black(), value.white());
}

/// `[index] text`, the way numbered pickers render entries.
pub fn format_numbered(index: usize, text: &str) -> String {
    format!(
        "{}{}{} {}",
        "[".bright_black(),
        index.to_string().white(),
        "]".bright_black(),
        text
    )
}
