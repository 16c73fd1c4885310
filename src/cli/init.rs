//! Init command implementation

use anyhow::{Context, Result, bail};
use std::path::PathBuf;

use taskxp::config::Config;

/// Default configuration content for taskxp init
pub const DEFAULT_CONFIG: &str = r#"# taskxp configuration
# ====================

[database]
# SQLite database file (default: ~/.taskxp/taskxp.db)
# path = "/path/to/taskxp.db"

[settings]
# Log filter used when RUST_LOG is not set (error, warn, info, debug, trace)
log_level = "info"
"#;

/// Write the default configuration
/// By default creates the global config at ~/.taskxp/config.toml
/// Use --config to specify a custom path
pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write config: {}", config_path.display()))?;
    println!("Created: {}", config_path.display());

    Ok(())
}
