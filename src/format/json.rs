//! JSON output formatter

use crate::aggregate::UniformityReport;
use crate::comparison::ComparisonReport;
use crate::error::Result;
use crate::format::ReportFormatter;

/// JSON formatter - outputs full reports as pretty-printed JSON
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Full JSON report"
    }

    fn format_comparison(&self, report: &ComparisonReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_uniformity(&self, report: &UniformityReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{evaluate_uniformity, ExpectedCache, TrialOutcome, UniformitySettings};
    use crate::comparison::compare_sources;
    use crate::entropy::TestSettings;
    use crate::source::pseudo::SeededPseudoSource;
    use crate::source::EntropySource;

    #[test]
    fn test_json_comparison() {
        let source = SeededPseudoSource::new(1, 12345);
        let sources: [&dyn EntropySource; 1] = [&source];
        let report = compare_sources(&sources, 512, &TestSettings::default(), false).unwrap();

        let output = JsonFormatter.format_comparison(&report).unwrap();

        // Verify it's valid JSON
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.get("id").is_some());
        assert!(parsed.get("settings").is_some());
        assert_eq!(parsed["sources"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_json_uniformity() {
        let source = SeededPseudoSource::new(4, 12345);
        let outcomes: Vec<TrialOutcome> = (0..10)
            .map(|trial| TrialOutcome {
                trial,
                counts: source.draw(1024).unwrap(),
            })
            .collect();
        let report = evaluate_uniformity(
            source.name(),
            &outcomes,
            &UniformitySettings::default(),
            &ExpectedCache::new(),
        )
        .unwrap();

        let output = JsonFormatter.format_uniformity(&report).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["samples"], 10 * 1024);
        assert!(parsed["expected"].get("10").is_some());
        assert!(parsed["deviations"].is_array());
    }

    #[test]
    fn test_json_formatter_info() {
        let formatter = JsonFormatter;
        assert_eq!(formatter.name(), "json");
        assert!(!formatter.description().is_empty());
    }
}
