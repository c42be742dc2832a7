use crate::error::Result;
use crate::matcher::SimilarityResult;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const CSV_HEADER: &str = "case_id,similarity,matched_features,weighted_score";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

/// Serialize a ranked list
///
/// `Json` is a pretty-printed array of results. `Csv` has one row per result
/// with matched feature labels joined by `;` and the weighted score to three
/// decimals; fields are quoted when they contain a comma, quote or newline.
pub fn export_results(results: &[SimilarityResult], format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Json => Ok(serde_json::to_string_pretty(results)?),
        ExportFormat::Csv => Ok(to_csv(results)),
    }
}

fn to_csv(results: &[SimilarityResult]) -> String {
    let mut out = String::from(CSV_HEADER);
    for r in results {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            "\n{},{},{},{:.3}",
            csv_field(&r.case_id),
            r.similarity,
            csv_field(&r.matched_features.join(";")),
            r.weighted_score
        );
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::SimilarityDetails;

    fn result(case_id: &str, matched: &[&str], weighted_score: f64) -> SimilarityResult {
        SimilarityResult {
            case_id: case_id.to_string(),
            similarity: 88,
            matched_features: matched.iter().map(|s| s.to_string()).collect(),
            weighted_score,
            details: SimilarityDetails {
                feature_scores: [("length", 0.9)].into_iter().collect(),
                normalized_score: 0.88,
            },
        }
    }

    #[test]
    fn test_csv_layout() {
        let csv = export_results(
            &[result("case-1", &["Length", "Hardness"], 0.12345)],
            ExportFormat::Csv,
        )
        .unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "case_id,similarity,matched_features,weighted_score");
        assert_eq!(lines[1], "case-1,88,Length;Hardness,0.123");
    }

    #[test]
    fn test_csv_quotes_special_fields() {
        let csv = export_results(
            &[result("a,\"b\"", &["Surface, finish"], 1.0)],
            ExportFormat::Csv,
        )
        .unwrap();
        assert_eq!(csv.lines().nth(1), Some("\"a,\"\"b\"\"\",88,\"Surface, finish\",1.000"));
    }

    #[test]
    fn test_csv_empty_results_has_header_only() {
        assert_eq!(export_results(&[], ExportFormat::Csv).unwrap(), CSV_HEADER);
    }

    #[test]
    fn test_json_array() {
        let json = export_results(&[result("case-1", &[], 0.5)], ExportFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["caseId"], "case-1");
        assert_eq!(parsed[0]["details"]["featureScores"]["length"], 0.9);
        assert!(json.contains('\n'));
    }
}
