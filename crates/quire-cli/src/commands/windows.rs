//! Windows command implementation.

use super::resolve_windowing;
use crate::cli::WindowsArgs;
use crate::config::{Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use crate::source::read_lines;
use quire_extractor::WindowSegmenter;

/// Execute the windows command.
pub async fn execute_windows(
    args: WindowsArgs,
    config: &Config,
    format: OutputFormat,
    formatter: &Formatter,
) -> Result<()> {
    let extractor_config = resolve_windowing(&config.extractor, &args.windowing)?;
    let segmenter = WindowSegmenter::from_config(&extractor_config)?;
    let lines = read_lines(&args.file)?;
    let plan = segmenter.plan(lines.len());

    if format == OutputFormat::Table {
        println!(
            "{}",
            formatter.info(&format!(
                "{} lines, window {} / overlap {} (step {}): {} model call(s)",
                lines.len(),
                extractor_config.window_size,
                extractor_config.overlap_size,
                segmenter.step_size(),
                plan.len()
            ))
        );
    }
    println!("{}", formatter.format_plan(&plan)?);

    Ok(())
}
