//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use quire_domain::{AccumulatedResult, DocumentExtract, MultiField, ScalarField, SubjectProfile};
use std::ops::Range;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
    show_text: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
            show_text: false,
        }
    }

    /// Include each extract's text in table output.
    pub fn with_text(mut self, show_text: bool) -> Self {
        self.show_text = show_text;
        self
    }

    /// Format an analysis result.
    pub fn format_result(&self, result: &AccumulatedResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
            OutputFormat::Table => {
                let mut output = format!(
                    "{}\n\n{}",
                    self.format_profile_table(&result.profile),
                    self.format_extracts_table(&result.extracts)
                );
                if !result.extracts.is_empty() {
                    output.push_str("\n\n");
                    if self.show_text {
                        output.push_str(&self.format_extract_texts(&result.extracts));
                    } else {
                        output.push_str(&self.info(
                            "Document text omitted; use --show-text or --format json to see it",
                        ));
                    }
                }
                Ok(output)
            }
        }
    }

    /// Format a segmentation plan.
    pub fn format_plan(&self, plan: &[Range<usize>]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let windows: Vec<serde_json::Value> = plan
                    .iter()
                    .enumerate()
                    .map(|(index, range)| {
                        serde_json::json!({
                            "index": index,
                            "start_index": range.start,
                            "end_index": range.end,
                            "line_count": range.len(),
                        })
                    })
                    .collect();
                Ok(serde_json::to_string_pretty(&windows)?)
            }
            OutputFormat::Table => Ok(self.format_plan_table(plan)),
        }
    }

    fn format_profile_table(&self, profile: &SubjectProfile) -> String {
        if profile.is_empty() {
            return self.colorize("No subject information found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);

        for field in ScalarField::ALL {
            if let Some(value) = profile.get(field) {
                builder.push_record([field.key(), value]);
            }
        }
        for field in MultiField::ALL {
            let values = profile.candidates(field);
            if !values.is_empty() {
                builder.push_record([field.key(), values.join(", ").as_str()]);
            }
        }

        self.render(builder)
    }

    fn format_extracts_table(&self, extracts: &[DocumentExtract]) -> String {
        if extracts.is_empty() {
            return self.colorize("No documents found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Title", "Lines", "Count"]);

        for (index, extract) in extracts.iter().enumerate() {
            builder.push_record([
                (index + 1).to_string(),
                extract.title.clone(),
                format!("{}-{}", extract.start_line, extract.end_line),
                extract.line_count.to_string(),
            ]);
        }

        self.render(builder)
    }

    fn format_extract_texts(&self, extracts: &[DocumentExtract]) -> String {
        let blocks: Vec<String> = extracts
            .iter()
            .map(|extract| {
                let header = self.colorize(
                    &format!(
                        "── {} (lines {}-{}) ──",
                        extract.title, extract.start_line, extract.end_line
                    ),
                    "blue",
                );
                format!("{}\n{}", header, extract.window_lines.join("\n"))
            })
            .collect();
        blocks.join("\n\n")
    }

    fn format_plan_table(&self, plan: &[Range<usize>]) -> String {
        if plan.is_empty() {
            return self.colorize("No windows: the file is empty.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Window", "Start", "End", "Lines"]);

        for (index, range) in plan.iter().enumerate() {
            builder.push_record([
                index.to_string(),
                // absolute 1-based line numbers, as the model sees them
                (range.start + 1).to_string(),
                range.end.to_string(),
                range.len().to_string(),
            ]);
        }

        self.render(builder)
    }

    fn render(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
