use crate::core::{
    error::Result, print_field, print_info, print_section_header, session::Session,
};
use colored::*;

pub fn execute_info(session: &Session) -> Result<()> {
    let Some(loaded) = session.load_config() else {
        print_info("No configuration file found. Run 'den init' to create one.");
        return Ok(());
    };
    let record = &loaded.record;

    print_section_header("Configuration");
    print_field("Name", &record.name);
    print_field("Version", &record.version);
    print_field("Environment", &record.environment);
    print_field("Tools", &format!("{} tool(s)", record.tools.len()));
    for tool in &record.tools {
        println!("    {} {}", "-".bright_black(), tool.blue());
    }
    if !record.settings.is_empty() {
        print_field("Settings", &format!("{} key(s)", record.settings.len()));
    }
    print_field("Source", &loaded.source.display().to_string());
    println!();
    Ok(())
}
