use crate::core::{
    error::Result, format_numbered, presenter::menu, print_section_header, session::Session,
};
use colored::*;

/// Status line followed by the action menu. Git entries only appear inside
/// a repository.
pub async fn execute_status(session: &Session) -> Result<()> {
    println!();
    session.render_status().await;
    print_menu(session.repo().is_repository());
    Ok(())
}

pub fn print_menu(repository_detected: bool) {
    print_section_header("Actions");
    for (index, entry) in menu(repository_detected).iter().enumerate() {
        println!(
            "{} {}",
            format_numbered(index + 1, &format!("{:<30}", entry.label())),
            format!("den {}", entry.command()).bright_black()
        );
    }
    println!();
}
