//! Command implementations.

pub mod analyze;
pub mod config;
pub mod windows;

pub use self::analyze::execute_analyze;
pub use self::config::execute_config;
pub use self::windows::execute_windows;

use crate::cli::WindowingArgs;
use crate::error::Result;
use quire_extractor::ExtractorConfig;

/// Apply command-line windowing overrides to `base` and validate the result.
pub fn resolve_windowing(base: &ExtractorConfig, args: &WindowingArgs) -> Result<ExtractorConfig> {
    let mut config = base.clone();
    if let Some(window_size) = args.window_size {
        config.window_size = window_size;
    }
    if let Some(overlap) = args.overlap {
        config.overlap_size = overlap;
    }
    config.validate()?;
    Ok(config)
}
