use crate::core::error::DenError;
use std::path::PathBuf;

pub fn get_config_directory() -> Result<PathBuf, DenError> {
    let base = match std::env::consts::OS {
        "linux" | "freebsd" | "netbsd" | "openbsd" => std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|_| {
                dirs::home_dir()
                    .map(|home| home.join(".config"))
                    .ok_or(DenError::SettingsDirectoryNotFound)
            })?,
        "macos" => dirs::home_dir()
            .ok_or(DenError::SettingsDirectoryNotFound)?
            .join("Library/Application Support"),
        _ => dirs::config_dir().ok_or(DenError::SettingsDirectoryNotFound)?,
    };

    Ok(base.join("den"))
}

pub fn get_settings_file() -> Result<PathBuf, DenError> {
    Ok(get_config_directory()?.join("settings.json"))
}
