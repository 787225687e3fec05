//! Integration tests for the Analyzer

#[cfg(test)]
mod tests {
    use crate::{Analyzer, ExtractorConfig, ExtractorError, LlmOracle, OracleError};
    use quire_domain::{MultiField, ScalarField};
    use quire_llm::MockProvider;
    use std::sync::Arc;
    use std::time::Duration;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("record line {}", i + 1)).collect()
    }

    fn analyzer(provider: &MockProvider, config: ExtractorConfig) -> Analyzer<LlmOracle<MockProvider>> {
        Analyzer::new(LlmOracle::new(provider.clone()), config)
    }

    #[tokio::test]
    async fn test_single_window_run() {
        let provider = MockProvider::default().with_response(
            r#"{"patient": {"name": "Bella"},
                "documents": [{"title": "Full Record", "start_line": 1, "end_line": 250}]}"#,
        );
        let analyzer = analyzer(&provider, ExtractorConfig::default());

        let result = analyzer.analyze(&lines(250)).await.unwrap();

        assert_eq!(provider.call_count(), 1);
        assert_eq!(result.extracts.len(), 1);
        let extract = &result.extracts[0];
        assert_eq!(extract.start_line, 1);
        assert_eq!(extract.end_line, 250);
        assert_eq!(extract.line_count, 249);
        assert_eq!(extract.window_lines.len(), 249);
        assert_eq!(result.profile.get(ScalarField::Name), Some("Bella"));
    }

    #[tokio::test]
    async fn test_document_seen_by_two_windows_is_kept_once() {
        let provider = MockProvider::default()
            .with_response(
                r#"{"documents": [
                    {"title": "Intake", "start_line": 1, "end_line": 200},
                    {"title": "Lab Report", "start_line": 230, "end_line": 280}
                ]}"#,
            )
            .with_response(
                r#"{"documents": [
                    {"title": "Lab Report", "start_line": 230, "end_line": 280},
                    {"title": "Discharge", "start_line": 283, "end_line": 450}
                ]}"#,
            );
        let config = ExtractorConfig {
            window_size: 300,
            overlap_size: 100,
            ..ExtractorConfig::default()
        };
        let analyzer = analyzer(&provider, config);

        let result = analyzer.analyze(&lines(450)).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        let titles: Vec<_> = result.extracts.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Intake", "Lab Report", "Discharge"]);
        assert_eq!(
            result.extracts.iter().filter(|e| e.start_line == 230).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_second_window_sees_incremental_notice() {
        let provider = MockProvider::default()
            .with_response(
                r#"{"patient": {"sex": "female", "possibleSpecies": "Canine"},
                    "documents": [{"title": "Lab Report", "start_line": 12, "end_line": 95}]}"#,
            )
            .with_response(r#"{"documents": []}"#);
        let analyzer = analyzer(&provider, ExtractorConfig::default());

        analyzer.analyze(&lines(450)).await.unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 2);
        assert!(!prompts[0].contains("Here's the current patient information"));
        assert!(prompts[0].contains("1: record line 1\n"));

        assert!(prompts[1].contains("Here's the current patient information"));
        assert!(prompts[1].contains("  sex: female\n"));
        assert!(prompts[1].contains("  possibleSpecies: Canine\n"));
        assert!(prompts[1].contains("- Lab Report (lines 12-95)"));
        assert!(prompts[1].contains("201: record line 201\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_on_second_window_fails_the_run() {
        let provider = MockProvider::default()
            .with_response(
                r#"{"documents": [{"title": "Intake", "start_line": 1, "end_line": 150}]}"#,
            )
            .with_delayed_response(Duration::from_secs(600), r#"{"documents": []}"#);
        let config = ExtractorConfig {
            window_size: 200,
            overlap_size: 50,
            oracle_timeout_secs: 30,
        };
        let analyzer = analyzer(&provider, config);

        // 500 lines → windows at 0, 150, 300
        let result = analyzer.analyze(&lines(500)).await;

        match result {
            Err(ExtractorError::Timeout { window, secs }) => {
                assert_eq!(window, 1);
                assert_eq!(secs, 30);
            }
            other => panic!("expected a timeout, got {:?}", other.map(|r| r.extracts)),
        }
        // the third window is never queried
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_oracle_failure_fails_the_run() {
        let provider = MockProvider::default()
            .with_response(
                r#"{"documents": [{"title": "Intake", "start_line": 1, "end_line": 150}]}"#,
            )
            .with_error("connection reset by peer");
        let analyzer = analyzer(&provider, ExtractorConfig::default());

        let err = analyzer.analyze(&lines(900)).await.unwrap_err();

        assert!(err.is_oracle_failure());
        assert!(matches!(
            err,
            ExtractorError::OracleCall {
                window: 1,
                source: OracleError::Llm(_)
            }
        ));
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_non_json_reply_fails_the_run() {
        let provider = MockProvider::new("Sorry, I can't help with that.");
        let analyzer = analyzer(&provider, ExtractorConfig::default());

        let err = analyzer.analyze(&lines(10)).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractorError::OracleCall {
                source: OracleError::InvalidFormat(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_empty_scalar_never_overwrites() {
        let provider = MockProvider::default()
            .with_response(r#"{"patient": {"sex": "female"}, "documents": []}"#)
            .with_response(r#"{"patient": {"sex": ""}, "documents": []}"#);
        let analyzer = analyzer(&provider, ExtractorConfig::default());

        let result = analyzer.analyze(&lines(450)).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(result.profile.get(ScalarField::Sex), Some("female"));
    }

    #[tokio::test]
    async fn test_profile_accumulates_across_windows() {
        let provider = MockProvider::default()
            .with_response(
                r#"{"patient": {"name": "Bella", "possibleBreed": ["Beagle"]}, "documents": []}"#,
            )
            .with_response(
                r#"{"patient": {"name": "Bella Rose", "possibleBreed": ["Beagle", "Harrier"], "weight": 12.5}}"#,
            );
        let analyzer = analyzer(&provider, ExtractorConfig::default());

        let result = analyzer.analyze(&lines(450)).await.unwrap();

        assert_eq!(result.profile.get(ScalarField::Name), Some("Bella Rose"));
        assert_eq!(result.profile.get(ScalarField::Weight), Some("12.5"));
        assert_eq!(
            result.profile.candidates(MultiField::PossibleBreed),
            &["Beagle".to_string(), "Harrier".to_string()]
        );
    }

    #[tokio::test]
    async fn test_malformed_entries_are_skipped() {
        let provider = MockProvider::default().with_response(
            r#"{"patient": {"name": 7, "sex": ["female"], "color": "tan"},
                "documents": [
                    {"title": "Lab Report", "start_line": 1, "end_line": 40},
                    {"start_line": 42, "end_line": 60},
                    {"title": "Backwards", "start_line": 80, "end_line": 70},
                    "not a document",
                    {"title": "Radiology", "start_line": 62, "end_line": 99}
                ]}"#,
        );
        let analyzer = analyzer(&provider, ExtractorConfig::default());

        let result = analyzer.analyze(&lines(100)).await.unwrap();

        let titles: Vec<_> = result.extracts.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Lab Report", "Radiology"]);
        assert_eq!(result.profile.get(ScalarField::Color), Some("tan"));
        assert_eq!(result.profile.get(ScalarField::Sex), None);
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_any_call() {
        let provider = MockProvider::default();
        let config = ExtractorConfig {
            window_size: 100,
            overlap_size: 100,
            ..ExtractorConfig::default()
        };
        let analyzer = analyzer(&provider, config);

        let err = analyzer.analyze(&lines(500)).await.unwrap_err();

        assert!(matches!(err, ExtractorError::Config(_)));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_calls() {
        let provider = MockProvider::default();
        let analyzer = analyzer(&provider, ExtractorConfig::default());

        let result = analyzer.analyze(&[]).await.unwrap();

        assert!(result.extracts.is_empty());
        assert!(result.profile.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_run_on_same_source_is_rejected() {
        let provider = MockProvider::default()
            .with_delayed_response(Duration::from_secs(5), r#"{"documents": []}"#);
        let analyzer = analyzer(&provider, ExtractorConfig::default());
        let input = lines(50);

        let (first, second) = tokio::join!(
            analyzer.analyze_source("records.txt", &input),
            analyzer.analyze_source("records.txt", &input),
        );

        assert!(first.is_ok());
        assert!(matches!(second, Err(ExtractorError::RunInProgress(id)) if id == "records.txt"));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_different_sources_run_independently() {
        let provider = MockProvider::default()
            .with_delayed_response(Duration::from_secs(5), r#"{"documents": []}"#);
        let analyzer = analyzer(&provider, ExtractorConfig::default());
        let input = lines(50);

        let (first, second) = tokio::join!(
            analyzer.analyze_source("a.txt", &input),
            analyzer.analyze_source("b.txt", &input),
        );

        assert!(first.is_ok());
        assert!(second.is_ok());
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_run_releases_its_source() {
        let provider = MockProvider::default()
            .with_delayed_response(Duration::from_secs(60), r#"{"documents": []}"#);
        let analyzer = analyzer(&provider, ExtractorConfig::default());
        let input = lines(50);

        // dropping the future cancels the run at its pending oracle call
        let cancelled = tokio::time::timeout(
            Duration::from_secs(1),
            analyzer.analyze_source("records.txt", &input),
        )
        .await;
        assert!(cancelled.is_err());

        let result = analyzer.analyze_source("records.txt", &input).await;
        assert!(result.is_ok());
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_shared_oracle_across_analyzers() {
        let provider = MockProvider::default();
        let oracle = Arc::new(LlmOracle::new(provider.clone()));
        let compact = Analyzer::new(Arc::clone(&oracle), ExtractorConfig::compact());
        let wide = Analyzer::new(oracle, ExtractorConfig::wide());

        compact.analyze(&lines(400)).await.unwrap();
        wide.analyze(&lines(400)).await.unwrap();

        // compact: 0, 100, 200, 300; wide: 0
        assert_eq!(provider.call_count(), 5);
    }
}
