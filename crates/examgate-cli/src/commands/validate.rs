//! The `examgate validate` command.

use std::path::PathBuf;

use anyhow::Result;

use examgate_core::config::{load_config_from, validate_config};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    if config.accounts.is_empty() {
        println!("Config: built-in accounts (3 accounts)");
    } else {
        println!("Config: {} accounts", config.accounts.len());
    }

    let warnings = validate_config(&config);
    for w in &warnings {
        let prefix = w
            .username
            .as_ref()
            .map(|name| format!("  [{name}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    // Warnings are advisory; a directory that cannot be built is an error.
    config.build_directory()?;

    if warnings.is_empty() {
        println!("Config valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
