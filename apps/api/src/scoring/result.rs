use serde::{Deserialize, Serialize};

/// Outcome of one scoring run, whether AI-derived or rule-based.
/// Built fresh per invocation, projected onto the application row, returned
/// to the caller, then discarded — never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// ATS compatibility score, always within 0–100.
    pub score: i32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: ScoreSummary,
}

/// Explanation attached to a score. The AI's JSON reply carries a one-line
/// summary; the labeled reply format and the rule-based scorer produce a
/// per-criterion breakdown. Serializes untagged so callers see either a
/// plain string or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreSummary {
    Line(String),
    Breakdown(ScoreBreakdown),
}

/// Per-criterion narrative mirroring the scoring rubric weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub overall_score: i32,
    pub skills_analysis: String,
    pub experience_analysis: String,
    pub education_analysis: String,
    pub additional_factors: String,
    pub cgpa: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_line_serializes_as_plain_string() {
        let summary = ScoreSummary::Line("Good fit.".to_string());
        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            serde_json::json!("Good fit.")
        );
    }

    #[test]
    fn test_summary_breakdown_serializes_as_object() {
        let summary = ScoreSummary::Breakdown(ScoreBreakdown {
            overall_score: 50,
            skills_analysis: "a".to_string(),
            experience_analysis: "b".to_string(),
            education_analysis: "c".to_string(),
            additional_factors: "d".to_string(),
            cgpa: Some(3.2),
        });
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["overall_score"], 50);
        assert_eq!(value["cgpa"], 3.2);
    }
}
