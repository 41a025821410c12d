use crate::core::{
    error::Result, print_field, print_section_header, print_success, session::Session,
};

/// Show the settings file location and the effective settings. A missing
/// file is created with defaults first.
pub fn execute_settings(session: &Session, path_only: bool) -> Result<()> {
    let path = session.settings_path()?;

    if path_only {
        println!("{}", path.display());
        return Ok(());
    }

    if !path.exists() {
        session.settings().save_to(&path)?;
        print_success(&format!("Created settings file at {}", path.display()));
    }

    print_section_header("Settings");
    print_field("File", &path.display().to_string());
    println!("\n{}\n", serde_json::to_string_pretty(&session.settings())?);
    Ok(())
}
