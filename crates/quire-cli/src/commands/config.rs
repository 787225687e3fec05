//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::{Config, API_KEY_VAR};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub async fn execute_config(
    args: ConfigArgs,
    config: &Config,
    path: &Path,
    formatter: &Formatter,
) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(config, path, formatter),
        ConfigAction::Init { force } => init_config(path, force, formatter),
    }
}

/// Print the effective configuration.
fn show_config(config: &Config, path: &Path, formatter: &Formatter) -> Result<()> {
    let source = if path.exists() {
        format!("Configuration file: {}", path.display())
    } else {
        format!("No file at {}; showing defaults", path.display())
    };
    println!("{}", formatter.info(&source));
    print!("{}", config.to_toml()?);

    let key_state = if std::env::var(API_KEY_VAR).is_ok() {
        "set"
    } else {
        "not set"
    };
    println!("\n# {} is {}", API_KEY_VAR, key_state);
    Ok(())
}

/// Write a default configuration file.
fn init_config(path: &Path, force: bool, formatter: &Formatter) -> Result<()> {
    write_default(path, force)?;
    println!(
        "{}",
        formatter.success(&format!("Wrote {}", path.display()))
    );
    Ok(())
}

fn write_default(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(CliError::Config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    Config::default().save_to(path)
}
