//! Integration tests for the classifier pipeline

#[cfg(test)]
mod tests {
    use crate::{
        summarize_batch, CitationClassifier, ClassificationMethod, ClassificationRequest,
        ClassifierConfig, ClassifierError, ClassifierMode, COERCED_CONFIDENCE, FALLBACK_MARKER,
    };
    use astrolit_domain::{AnalyzedBy, Category, HypothesisSignal, Paper};
    use astrolit_llm::MockProvider;
    use std::time::{Duration, Instant};

    fn config(mode: ClassifierMode) -> ClassifierConfig {
        ClassifierConfig {
            mode,
            request_delay_ms: 0,
            ..ClassifierConfig::default()
        }
    }

    fn cited() -> Paper {
        Paper::new("2019ApJ...100..001S")
            .unwrap()
            .with_title("A Binary Companion to the Host Star")
            .with_abstract("We propose that a binary companion shapes the disk.")
            .with_year(2019)
    }

    fn citing(n: usize, text: &str) -> Paper {
        Paper::new(format!("2021MNRAS.{:03}..001A", n))
            .unwrap()
            .with_abstract(text)
            .with_year(2020 + (n % 3) as i32)
    }

    #[test]
    fn test_unreachable_model_falls_back_to_patterns() {
        let provider = MockProvider::unavailable();
        let classifier = CitationClassifier::new(config(ClassifierMode::Model), Some(provider.clone()));

        let result = classifier
            .classify_pair(
                &citing(1, "Our results rule out the binary companion hypothesis at >5σ significance."),
                Some(&cited()),
            )
            .unwrap();

        assert_eq!(result.category, Category::Refuting);
        assert_eq!(result.method, ClassificationMethod::PatternFallback);
        assert!(result.reasoning.contains(FALLBACK_MARKER));
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_missing_credential_falls_back() {
        let classifier = CitationClassifier::<MockProvider>::new(config(ClassifierMode::Model), None);

        let result = classifier
            .classify_pair(&citing(1, "We confirm the companion."), Some(&cited()))
            .unwrap();
        assert_eq!(result.method, ClassificationMethod::PatternFallback);
        assert_eq!(result.category, Category::Supporting);
    }

    #[test]
    fn test_model_only_reports_unavailable() {
        let classifier = CitationClassifier::new(
            config(ClassifierMode::ModelOnly),
            Some(MockProvider::unavailable()),
        );

        let err = classifier
            .classify_pair(&citing(1, "We confirm the companion."), Some(&cited()))
            .unwrap_err();
        assert!(matches!(err, ClassifierError::Unavailable(_)));
    }

    #[test]
    fn test_model_only_without_provider() {
        let classifier = CitationClassifier::<MockProvider>::new(config(ClassifierMode::ModelOnly), None);
        let request = ClassificationRequest {
            citing_abstract: Some("Anything.".to_string()),
            ..Default::default()
        };
        assert!(classifier.classify(&request).is_err());
    }

    #[test]
    fn test_model_answer_in_fenced_block() {
        let provider = MockProvider::new(
            "```json\n{\"classification\": \"CONTRASTING\", \"confidence\": 0.72, \"reasoning\": \"Finds a lower mass.\"}\n```",
        );
        let classifier = CitationClassifier::new(config(ClassifierMode::Model), Some(provider));

        let result = classifier
            .classify_pair(&citing(1, "We find a lower disk mass."), Some(&cited()))
            .unwrap();
        assert_eq!(result.category, Category::Contrasting);
        assert_eq!(result.confidence.value(), 0.72);
        assert_eq!(result.reasoning, "Finds a lower mass.");
        assert_eq!(result.method.analyzed_by(), AnalyzedBy::Llm);
    }

    #[test]
    fn test_unknown_label_is_neutral_not_fallback() {
        let provider = MockProvider::new(r#"{"classification": "DUBIOUS", "confidence": 0.9}"#);
        let classifier = CitationClassifier::new(config(ClassifierMode::Model), Some(provider));

        let result = classifier
            .classify_pair(&citing(1, "We confirm the companion."), Some(&cited()))
            .unwrap();
        assert_eq!(result.category, Category::Neutral);
        assert_eq!(result.confidence.value(), COERCED_CONFIDENCE);
        assert_eq!(result.method, ClassificationMethod::Model);
    }

    #[test]
    fn test_prompt_carries_cited_title() {
        let mut provider = MockProvider::new(r#"{"classification": "NEUTRAL"}"#);
        provider.add_response(
            "Title: A Binary Companion to the Host Star",
            r#"{"classification": "METHODOLOGICAL", "confidence": 0.8}"#,
        );
        let classifier = CitationClassifier::new(config(ClassifierMode::Model), Some(provider));

        let result = classifier
            .classify_pair(&citing(1, "We use their pipeline."), Some(&cited()))
            .unwrap();
        assert_eq!(result.category, Category::Methodological);
    }

    #[test]
    fn test_corpus_keeps_every_pair() {
        let mut provider = MockProvider::new(
            r#"{"classification": "SUPPORTING", "confidence": 0.9, "reasoning": "agrees"}"#,
        );
        provider.add_error("second");
        let classifier = CitationClassifier::new(config(ClassifierMode::ModelOnly), Some(provider));

        let papers = vec![
            citing(1, "The first paper."),
            citing(2, "The second paper."),
            Paper::new("2022A&A...003..001C").unwrap(),
        ];

        let entries = classifier.classify_corpus(&cited(), &papers);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].citing_bibcode, papers[0].bibcode);
        assert!(entries[0].result.is_ok());
        assert!(matches!(entries[1].result, Err(ClassifierError::Unavailable(_))));

        let skipped = entries[2].result.as_ref().unwrap();
        assert_eq!(skipped.method, ClassificationMethod::Skipped);
        assert_eq!(skipped.category, Category::Neutral);

        let summary = summarize_batch(&entries);
        assert_eq!(summary.total_citations, 2);
        assert_eq!(summary.counts[Category::Supporting], 1);
        assert_eq!(summary.counts[Category::Neutral], 1);
    }

    #[test]
    fn test_corpus_summary_by_year() {
        let classifier = CitationClassifier::<MockProvider>::new(ClassifierConfig::offline(), None);
        let papers = vec![
            citing(1, "We confirm the companion."),
            citing(2, "Our data rule out the companion at more than 5 sigma."),
            citing(4, "We confirm the orbit."),
        ];

        let entries = classifier.classify_corpus(&cited(), &papers);
        let summary = summarize_batch(&entries);

        assert_eq!(summary.total_citations, 3);
        assert_eq!(summary.refuting_count, 1);
        assert_eq!(summary.refuting_bibcodes, vec![papers[1].bibcode.clone()]);
        assert_eq!(summary.hypothesis_status, HypothesisSignal::PossiblyRuledOut);
        // years 2021, 2022, 2021
        assert_eq!(summary.by_year.get(&2021), Some(&2));
        assert_eq!(summary.by_year.get(&2022), Some(&1));
        // (2 - 2) / (2 + 2)
        assert_eq!(summary.consensus_indicator, 0.0);
    }

    fn paced(mode: ClassifierMode, delay_ms: u64) -> ClassifierConfig {
        ClassifierConfig {
            mode,
            request_delay_ms: delay_ms,
            ..ClassifierConfig::default()
        }
    }

    #[test]
    fn test_corpus_pauses_after_each_model_call() {
        let provider = MockProvider::new(r#"{"classification": "SUPPORTING", "confidence": 0.8}"#);
        let classifier = CitationClassifier::new(paced(ClassifierMode::Model, 40), Some(provider.clone()));
        let papers = vec![
            citing(1, "We confirm the companion."),
            citing(2, "We confirm the orbit."),
            citing(3, "We confirm the mass."),
        ];

        let started = Instant::now();
        let entries = classifier.classify_corpus(&cited(), &papers);

        assert!(started.elapsed() >= Duration::from_millis(3 * 40));
        assert_eq!(provider.call_count(), 3);
        assert!(entries.iter().all(|e| e.result.is_ok()));
    }

    #[test]
    fn test_failed_model_call_is_still_paced() {
        let provider = MockProvider::unavailable();
        let classifier = CitationClassifier::new(paced(ClassifierMode::Model, 40), Some(provider.clone()));
        let papers = vec![citing(1, "We confirm it."), citing(2, "We confirm it again.")];

        let started = Instant::now();
        classifier.classify_corpus(&cited(), &papers);

        assert!(started.elapsed() >= Duration::from_millis(2 * 40));
        assert_eq!(provider.call_count(), 2);
    }

    #[test]
    fn test_pattern_mode_never_pauses() {
        let classifier = CitationClassifier::<MockProvider>::new(paced(ClassifierMode::Pattern, 2_000), None);
        let papers = vec![citing(1, "We confirm it."), citing(2, "We rule it out.")];

        let started = Instant::now();
        let entries = classifier.classify_corpus(&cited(), &papers);

        assert!(started.elapsed() < Duration::from_millis(2_000));
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_skipped_pairs_do_not_pause() {
        let provider = MockProvider::new(r#"{"classification": "SUPPORTING"}"#);
        let classifier = CitationClassifier::new(paced(ClassifierMode::Model, 2_000), Some(provider.clone()));
        let papers = vec![
            Paper::new("2022A&A...003..001C").unwrap(),
            Paper::new("2022A&A...004..001D").unwrap(),
        ];

        let started = Instant::now();
        let entries = classifier.classify_corpus(&cited(), &papers);

        assert!(started.elapsed() < Duration::from_millis(2_000));
        assert_eq!(provider.call_count(), 0);
        assert!(entries.iter().all(|e| e.result.is_ok()));
    }

    #[test]
    fn test_entry_to_citation_uses_method_tag() {
        let classifier = CitationClassifier::<MockProvider>::new(ClassifierConfig::offline(), None);
        let entries = classifier.classify_corpus(&cited(), &[citing(1, "We confirm it.")]);

        let citation = entries[0].to_citation().unwrap().unwrap();
        assert_eq!(citation.analyzed_by, AnalyzedBy::Regex);
        assert_eq!(citation.category, Category::Supporting);
        assert_eq!(citation.cited_bibcode, cited().bibcode);
    }
}
