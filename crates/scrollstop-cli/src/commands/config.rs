use std::path::Path;

use anyhow::Result;

use scrollstop_core::AppConfig;

/// Print the config file location and the effective settings
pub fn run(config: &AppConfig, path: Option<&Path>, init: bool) -> Result<()> {
    let default_path = AppConfig::config_path();
    let path = path.unwrap_or(default_path.as_path());

    if init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, AppConfig::default().to_toml()?)?;
            println!("Wrote default config to {}", path.display());
        }
        return Ok(());
    }

    let state = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("# {}{}", path.display(), state);
    println!("# log file: {}", config.log_path().display());
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
