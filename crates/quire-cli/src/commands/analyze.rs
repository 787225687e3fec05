//! Analyze command implementation.

use super::resolve_windowing;
use crate::cli::AnalyzeArgs;
use crate::config::{api_key, Config, OutputFormat};
use crate::error::Result;
use crate::output::Formatter;
use crate::source::read_lines;
use crate::transcript::TranscriptWriter;
use quire_domain::traits::LlmProvider;
use quire_extractor::{Analyzer, ExtractorConfig, LlmOracle};
use tracing::info;

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    config: &Config,
    format: OutputFormat,
    formatter: Formatter,
) -> Result<()> {
    let formatter = formatter.with_text(args.show_text);
    let extractor_config = resolve_analysis_config(&config.extractor, &args)?;
    let lines = read_lines(&args.file)?;

    let mut provider_settings = config.provider.clone();
    if let Some(model) = args.model {
        provider_settings.model = model;
    }
    let provider = provider_settings.build(&api_key()?)?;
    info!(
        "Using model {} at {}",
        provider.model_name(),
        provider.base_url()
    );

    let mut oracle = LlmOracle::new(provider);
    if let Some(path) = &args.transcript {
        oracle = oracle.with_inference_hook(TranscriptWriter::open(path)?.into_hook());
    }

    let analyzer = Analyzer::new(oracle, extractor_config);
    let source_id = args.file.display().to_string();
    let result = analyzer.analyze_source(&source_id, &lines).await?;

    if format == OutputFormat::Table {
        println!(
            "{}",
            formatter.success(&format!(
                "Analyzed {} lines: {} document(s)",
                lines.len(),
                result.extracts.len()
            ))
        );
        if !result.overlapping_extracts().is_empty() {
            println!(
                "{}",
                formatter.warning("Some accepted documents overlap; see the log for details")
            );
        }
    }
    println!("{}", formatter.format_result(&result)?);

    Ok(())
}

/// Windowing flags plus `--timeout`, on top of the configured values.
fn resolve_analysis_config(base: &ExtractorConfig, args: &AnalyzeArgs) -> Result<ExtractorConfig> {
    let mut config = base.clone();
    if let Some(secs) = args.timeout {
        config.oracle_timeout_secs = secs;
    }
    resolve_windowing(&config, &args.windowing)
}
