//! Incremental merge of one window's oracle response into the run state
//!
//! Profile rules, field by field:
//! - scalar fields take any non-empty proposal (last writer wins)
//! - multi-valued fields append proposals not already present, first-seen order
//!
//! Document rule: a candidate is admitted unless an accepted extract already
//! starts on the same absolute line. Admitted extracts are appended in oracle
//! order and never revisited.

use crate::types::{DocumentCandidate, MergeOutcome, OracleResponse, SubjectCandidate};
use quire_domain::{AccumulatedResult, DocumentExtract, MultiField, ScalarField, SubjectProfile, Window};
use tracing::debug;

/// Fold `response`, produced for `window`, into `accumulated`
pub fn merge(
    accumulated: &mut AccumulatedResult,
    response: OracleResponse,
    window: &Window,
) -> MergeOutcome {
    let profile_updates = response
        .subject
        .as_ref()
        .map_or(0, |subject| merge_profile(&mut accumulated.profile, subject));

    let (accepted, duplicates) = admit_documents(accumulated, response.documents, window);

    MergeOutcome {
        accepted,
        duplicates,
        profile_updates,
    }
}

/// Apply a subject candidate to the profile, returning the number of fields changed
pub fn merge_profile(profile: &mut SubjectProfile, subject: &SubjectCandidate) -> usize {
    let mut updates = 0;

    for field in ScalarField::ALL {
        if let Some(value) = subject.scalar(field) {
            if profile.set_scalar(field, value) {
                updates += 1;
            }
        }
    }

    for field in MultiField::ALL {
        for value in subject.candidates(field) {
            if profile.add_candidate(field, value) {
                updates += 1;
            }
        }
    }

    updates
}

/// Append every non-duplicate candidate, returning `(accepted, duplicates)`
pub fn admit_documents(
    accumulated: &mut AccumulatedResult,
    candidates: Vec<DocumentCandidate>,
    window: &Window,
) -> (usize, usize) {
    let mut accepted = 0;
    let mut duplicates = 0;

    for candidate in candidates {
        if accumulated.has_start_line(candidate.start_line) {
            debug!(
                title = %candidate.title,
                start_line = candidate.start_line,
                "Skipping document already accepted at this start line"
            );
            duplicates += 1;
            continue;
        }

        let window_lines = window.slice_absolute(candidate.start_line, candidate.end_line);
        accumulated.push_extract(DocumentExtract::new(
            candidate.title,
            candidate.start_line,
            candidate.end_line,
            window_lines,
        ));
        accepted += 1;
    }

    (accepted, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(start: usize, n: usize) -> Window {
        let lines: Vec<String> = (start..start + n).map(|i| format!("line {}", i)).collect();
        Window::new(start, &lines)
    }

    fn docs(specs: &[(&str, i64, i64)]) -> Vec<DocumentCandidate> {
        specs
            .iter()
            .map(|(t, s, e)| DocumentCandidate::new(*t, *s, *e))
            .collect()
    }

    #[test]
    fn test_merge_accepts_new_documents_in_order() {
        let mut acc = AccumulatedResult::new();
        let response = OracleResponse {
            subject: None,
            documents: docs(&[("Lab Report", 1, 45), ("Progress Note", 48, 87)]),
        };

        let outcome = merge(&mut acc, response, &window(0, 300));

        assert_eq!(outcome.accepted, 2);
        assert_eq!(outcome.duplicates, 0);
        assert_eq!(acc.extracts[0].title, "Lab Report");
        assert_eq!(acc.extracts[1].title, "Progress Note");
        assert_eq!(acc.extracts[1].line_count, 39);
    }

    #[test]
    fn test_window_lines_are_sliced_by_window_offset() {
        let mut acc = AccumulatedResult::new();
        let response = OracleResponse {
            subject: None,
            documents: docs(&[("Radiology", 210, 215)]),
        };

        merge(&mut acc, response, &window(200, 250));

        let extract = &acc.extracts[0];
        assert_eq!(extract.window_lines.len(), 5);
        assert_eq!(extract.window_lines[0], "line 210");
        assert_eq!(extract.window_lines[4], "line 214");
    }

    #[test]
    fn test_out_of_window_range_is_clamped() {
        let mut acc = AccumulatedResult::new();
        let response = OracleResponse {
            subject: None,
            documents: docs(&[("Spill", 290, 320)]),
        };

        merge(&mut acc, response, &window(0, 300));

        let extract = &acc.extracts[0];
        assert_eq!(extract.line_count, 30);
        assert_eq!(extract.window_lines.len(), 10);
    }

    #[test]
    fn test_same_start_line_is_a_duplicate() {
        let mut acc = AccumulatedResult::new();
        merge(
            &mut acc,
            OracleResponse {
                subject: None,
                documents: docs(&[("Lab Report", 250, 280)]),
            },
            &window(0, 300),
        );

        let outcome = merge(
            &mut acc,
            OracleResponse {
                subject: None,
                documents: docs(&[("Lab Report (cont.)", 250, 290), ("Invoice", 292, 310)]),
            },
            &window(200, 250),
        );

        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(acc.extracts.len(), 2);
        // the first acceptance is kept untouched
        assert_eq!(acc.extracts[0].title, "Lab Report");
        assert_eq!(acc.extracts[0].end_line, 280);
    }

    #[test]
    fn test_duplicates_within_one_response() {
        let mut acc = AccumulatedResult::new();
        let outcome = merge(
            &mut acc,
            OracleResponse {
                subject: None,
                documents: docs(&[("A", 10, 20), ("B", 10, 30)]),
            },
            &window(0, 100),
        );
        assert_eq!(outcome.accepted, 1);
        assert_eq!(outcome.duplicates, 1);
        assert_eq!(acc.extracts[0].title, "A");
    }

    #[test]
    fn test_shifted_boundary_is_not_deduplicated() {
        let mut acc = AccumulatedResult::new();
        merge(
            &mut acc,
            OracleResponse {
                subject: None,
                documents: docs(&[("Lab Report", 250, 280)]),
            },
            &window(0, 300),
        );
        merge(
            &mut acc,
            OracleResponse {
                subject: None,
                documents: docs(&[("Lab Report", 251, 280)]),
            },
            &window(200, 250),
        );
        assert_eq!(acc.extracts.len(), 2);
        assert_eq!(acc.overlapping_extracts(), vec![(0, 1)]);
    }

    #[test]
    fn test_profile_merge_rules() {
        let mut acc = AccumulatedResult::new();
        let first = SubjectCandidate::new()
            .with_scalar(ScalarField::Name, "Bella")
            .with_scalar(ScalarField::Sex, "female")
            .with_candidate(MultiField::PossibleSpecies, "Canine");
        let second = SubjectCandidate::new()
            .with_scalar(ScalarField::Name, "Bella Rose")
            .with_scalar(ScalarField::Sex, "")
            .with_candidate(MultiField::PossibleSpecies, "Canine")
            .with_candidate(MultiField::PossibleSpecies, "Vulpine");

        let w = window(0, 10);
        let first_outcome = merge(
            &mut acc,
            OracleResponse {
                subject: Some(first),
                documents: Vec::new(),
            },
            &w,
        );
        let second_outcome = merge(
            &mut acc,
            OracleResponse {
                subject: Some(second),
                documents: Vec::new(),
            },
            &w,
        );

        assert_eq!(first_outcome.profile_updates, 3);
        assert_eq!(second_outcome.profile_updates, 2);
        assert_eq!(acc.profile.get(ScalarField::Name), Some("Bella Rose"));
        assert_eq!(acc.profile.get(ScalarField::Sex), Some("female"));
        assert_eq!(
            acc.profile.candidates(MultiField::PossibleSpecies),
            &["Canine".to_string(), "Vulpine".to_string()]
        );
    }

    #[test]
    fn test_merging_candidate_twice_is_idempotent() {
        let subject =
            SubjectCandidate::new().with_candidate(MultiField::PossibleBreed, "Beagle");

        let mut once = SubjectProfile::new();
        merge_profile(&mut once, &subject);

        let mut twice = SubjectProfile::new();
        merge_profile(&mut twice, &subject);
        assert_eq!(merge_profile(&mut twice, &subject), 0);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_extract_count_never_decreases() {
        let mut acc = AccumulatedResult::new();
        let rounds = [
            docs(&[("A", 1, 40), ("B", 42, 90)]),
            docs(&[("B", 42, 90)]),
            docs(&[]),
            docs(&[("C", 95, 140), ("A", 1, 40)]),
        ];

        let mut previous = Vec::new();
        for round in rounds {
            merge(
                &mut acc,
                OracleResponse {
                    subject: None,
                    documents: round,
                },
                &window(0, 300),
            );
            assert!(acc.extracts.len() >= previous.len());
            assert_eq!(&acc.extracts[..previous.len()], &previous[..]);
            previous = acc.extracts.clone();
        }
        assert_eq!(acc.extracts.len(), 3);
    }
}
