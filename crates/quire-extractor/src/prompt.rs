//! Oracle context construction for one window

use quire_domain::{AccumulatedResult, MultiField, ScalarField, SubjectProfile, Window};

/// Builds the context string sent to the oracle for one window
///
/// The context always carries the boundary-detection instructions and the
/// window's lines numbered with their absolute line numbers. Once at least
/// one document has been accepted, an incremental notice is prepended with
/// the current profile and every accepted document range.
pub struct ContextBuilder<'a> {
    window: &'a Window,
    accumulated: &'a AccumulatedResult,
}

impl<'a> ContextBuilder<'a> {
    /// Create a builder for `window` given the state accumulated so far
    pub fn new(window: &'a Window, accumulated: &'a AccumulatedResult) -> Self {
        Self {
            window,
            accumulated,
        }
    }

    /// Whether the context will carry the incremental notice
    pub fn is_incremental(&self) -> bool {
        !self.accumulated.extracts.is_empty()
    }

    /// Build the complete context
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. What earlier windows already found
        if self.is_incremental() {
            prompt.push_str(&self.incremental_notice());
            prompt.push_str("\n\n");
        }

        // 2. Instructions and expected shape
        prompt.push_str(BOUNDARY_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 3. The numbered window
        prompt.push_str(&format!(
            "Text to analyze (lines {}-{}):\n",
            self.window.start_index + 1,
            self.window.end_index()
        ));
        prompt.push_str("---\n");
        for line in self.window.numbered_lines() {
            prompt.push_str(&line);
            prompt.push('\n');
        }
        prompt.push_str("---\n\n");

        // 4. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }

    fn incremental_notice(&self) -> String {
        let mut notice = String::from(INCREMENTAL_NOTICE);
        notice.push_str("\n\nHere's the current patient information:\n");
        notice.push_str(&profile_snapshot(&self.accumulated.profile));

        notice.push('\n');
        notice.push_str(OVERLAP_NOTICE);
        notice.push_str("\nHere's a list of the current documents' titles and start-end lines:\n");
        for extract in &self.accumulated.extracts {
            notice.push_str(&format!(
                "- {} (lines {}-{})\n",
                extract.title, extract.start_line, extract.end_line
            ));
        }
        notice.trim_end().to_string()
    }
}

/// Build the oracle context for `window`
pub fn build_context(window: &Window, accumulated: &AccumulatedResult) -> String {
    ContextBuilder::new(window, accumulated).build()
}

/// One `key: value` line per profile field; unknown values read `N/A`
fn profile_snapshot(profile: &SubjectProfile) -> String {
    let mut snapshot = String::new();
    for field in ScalarField::ALL {
        snapshot.push_str(&format!(
            "  {}: {}\n",
            field.key(),
            profile.get(field).unwrap_or("N/A")
        ));
    }
    for field in MultiField::ALL {
        let values = profile.candidates(field);
        let rendered = if values.is_empty() {
            "N/A".to_string()
        } else {
            values.join(", ")
        };
        snapshot.push_str(&format!("  {}: {}\n", field.key(), rendered));
    }
    snapshot
}

const INCREMENTAL_NOTICE: &str = r#"You are being shown one window of a sliding window over a larger file.
Results from previous windows are listed below so that you can extract information
completely and without repeating earlier findings.

If any patient data has changed, or if this window has evidence to fill in fields
marked as N/A, return the patient data with the new values replacing the outdated
ones. If no change is necessary, repeat the existing patient data in your output."#;

const OVERLAP_NOTICE: &str = r#"If any documents in this window overlap with the documents already identified,
disregard them. Do not return documents overlapping with these line ranges.
Only return new, fully complete documents from this window."#;

const BOUNDARY_INSTRUCTIONS: &str = r#"You are provided with a chunk of text with line numbers. These lines are part of a
sliding window across a larger file composed of many distinct documents whose
boundaries may be difficult to discern. Determine where each document within this
window begins and ends, and extract the patient information.

Rules:
- Documents that begin or end at the edges of this window are partial: ignore them.
  Only report complete documents.
- The line ranges of different documents never overlap.
- There are few lines between documents, no more than 2-3. Expect ranges such as
  1-45, 48-87, not 1-45, 78-103.
- Use the line numbers exactly as printed at the start of each line.

Return a JSON object in this shape:
{
  "patient": {
    "name": string,
    "possibleSpecies": string,
    "possibleBreed": string,
    "sex": string,
    "date_of_birth": string,  // yyyy-MM-dd
    "weight": string,
    "height": string,
    "color": string
  },
  "documents": [
    { "title": string, "start_line": number, "end_line": number }
  ]
}"#;

const OUTPUT_FORMAT_REMINDER: &str =
    "Remember: Return ONLY a valid JSON object, no markdown code blocks, no explanations.";
