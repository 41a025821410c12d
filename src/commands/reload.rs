use crate::core::{
    error::Result, print_info, print_success, session::Session,
};

/// Drop the cache and load the configuration from disk again.
pub fn execute_reload(session: &Session) -> Result<()> {
    session.config().lock().clear_cache();
    match session.load_config() {
        Some(loaded) => print_success(&format!(
            "Configuration reloaded: {} ({})",
            loaded.record.name,
            loaded.source.display()
        )),
        None => print_info("Configuration reloaded: no config found"),
    }
    Ok(())
}

/// Drop every cached configuration.
pub fn execute_clear_cache(session: &Session) -> Result<()> {
    session.config().lock().clear_cache();
    print_success("Configuration cache cleared");
    Ok(())
}

/// Re-read the settings file and apply it to the running session.
pub fn execute_reload_settings(session: &Session) -> Result<()> {
    let settings = session.reload_settings()?;
    print_success(&format!(
        "Settings reloaded from {}",
        session.settings_path()?.display()
    ));
    print_info(&format!(
        "Monitored branches: {}",
        settings.git.monitored_branches.join(", ")
    ));
    Ok(())
}
