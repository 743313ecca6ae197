//! Parsing of AI scoring replies.
//!
//! The model is prompted for a labeled text format, but replies also arrive
//! as bare JSON objects (sometimes wrapped in Markdown code fences). Both
//! shapes normalize into the same `ScoreResult`; anything else is
//! `Unparsable` and the caller decides what to do. Parsing never errors.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use crate::scoring::result::{ScoreBreakdown, ScoreResult, ScoreSummary};

const LABEL_SKILLS: &str = "Skills Analysis:";
const LABEL_EXPERIENCE: &str = "Experience Analysis:";
const LABEL_EDUCATION: &str = "Education Analysis:";
const LABEL_ADDITIONAL: &str = "Additional Factors:";
const LABEL_MATCHED: &str = "Matched Skills:";
const LABEL_MISSING: &str = "Missing Skills:";

/// A scoring reply in one of the two shapes the model produces.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedReply {
    Json(JsonReply),
    Labeled(LabeledReply),
    Unparsable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JsonReply {
    pub score: i32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledReply {
    pub score: Option<i32>,
    pub skills_analysis: String,
    pub experience_analysis: String,
    pub education_analysis: String,
    pub additional_factors: String,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub cgpa: Option<f64>,
}

impl ParsedReply {
    /// Normalizes into a `ScoreResult`, or `None` when the reply is unusable:
    /// no integer score in [0,100], or no skill information at all.
    pub fn into_score_result(self) -> Option<ScoreResult> {
        match self {
            ParsedReply::Unparsable => None,
            ParsedReply::Json(json) => {
                if json.matched_skills.is_empty() && json.missing_skills.is_empty() {
                    return None;
                }
                Some(ScoreResult {
                    score: json.score,
                    matched_skills: json.matched_skills,
                    missing_skills: json.missing_skills,
                    summary: ScoreSummary::Line(
                        json.summary
                            .unwrap_or_else(|| "No summary provided.".to_string()),
                    ),
                })
            }
            ParsedReply::Labeled(labeled) => {
                let score = labeled.score?;
                if !(0..=100).contains(&score) {
                    return None;
                }
                if labeled.matched_skills.is_empty() && labeled.missing_skills.is_empty() {
                    return None;
                }
                Some(ScoreResult {
                    score,
                    matched_skills: labeled.matched_skills,
                    missing_skills: labeled.missing_skills,
                    summary: ScoreSummary::Breakdown(ScoreBreakdown {
                        overall_score: score,
                        skills_analysis: labeled.skills_analysis,
                        experience_analysis: labeled.experience_analysis,
                        education_analysis: labeled.education_analysis,
                        additional_factors: labeled.additional_factors,
                        cgpa: labeled.cgpa,
                    }),
                })
            }
        }
    }
}

/// Best-effort parse of a raw model reply. Never errors.
pub fn parse_reply(raw: &str) -> ParsedReply {
    let text = strip_code_fences(raw);

    if let Some(json) = try_json(text) {
        return ParsedReply::Json(json);
    }
    if let Some(labeled) = try_labeled(text) {
        return ParsedReply::Labeled(labeled);
    }
    ParsedReply::Unparsable
}

// ────────────────────────────────────────────────────────────────────────────
// JSON form
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct RawJsonReply {
    score: Option<serde_json::Number>,
    #[serde(default)]
    matched_skills: Vec<String>,
    #[serde(default)]
    missing_skills: Vec<String>,
    summary: Option<String>,
}

/// Accepts the reply as JSON only when `score` is an integer in [0,100].
fn try_json(text: &str) -> Option<JsonReply> {
    let raw: RawJsonReply = serde_json::from_str(text).ok()?;
    let score = raw.score.as_ref()?.as_i64()?;
    if !(0..=100).contains(&score) {
        return None;
    }
    Some(JsonReply {
        score: score as i32,
        matched_skills: raw.matched_skills,
        missing_skills: raw.missing_skills,
        summary: raw.summary,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Labeled text form
// ────────────────────────────────────────────────────────────────────────────

fn score_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Score:\s*(\d+)").expect("valid regex"))
}

fn cgpa_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)CGPA\s*[:\-]?\s*(\d*\.?\d+)").expect("valid regex"))
}

/// Recovers a CGPA value from free text (`CGPA: 3.75`, `cgpa - 3.2`, …).
pub(crate) fn extract_cgpa(text: &str) -> Option<f64> {
    cgpa_re()
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
}

/// A section runs from its label to the next expected label, or to the end
/// of the text when that label never appears.
fn labeled_section<'a>(text: &'a str, label: &str, next_label: Option<&str>) -> Option<&'a str> {
    let start = text.find(label)? + label.len();
    let rest = &text[start..];
    let end = next_label
        .and_then(|next| rest.find(next))
        .unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn split_skills(section: Option<&str>) -> Vec<String> {
    section
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

fn try_labeled(text: &str) -> Option<LabeledReply> {
    let score = score_re()
        .captures(text)
        .and_then(|caps| caps[1].parse::<i32>().ok());

    let skills_analysis = labeled_section(text, LABEL_SKILLS, Some(LABEL_EXPERIENCE));
    let experience_analysis = labeled_section(text, LABEL_EXPERIENCE, Some(LABEL_EDUCATION));
    let education_analysis = labeled_section(text, LABEL_EDUCATION, Some(LABEL_ADDITIONAL));
    let additional_factors = labeled_section(text, LABEL_ADDITIONAL, Some(LABEL_MATCHED));
    let matched_section = labeled_section(text, LABEL_MATCHED, Some(LABEL_MISSING));
    let missing_section = labeled_section(text, LABEL_MISSING, None);

    // Nothing recognizably labeled in the reply at all.
    if score.is_none()
        && skills_analysis.is_none()
        && matched_section.is_none()
        && missing_section.is_none()
    {
        return None;
    }

    let education_analysis = education_analysis
        .unwrap_or("No education analysis provided.")
        .to_string();
    // CGPA recovery is independent of whether the score itself is usable.
    let cgpa = extract_cgpa(&education_analysis);

    Some(LabeledReply {
        score,
        skills_analysis: skills_analysis
            .unwrap_or("No skills analysis provided.")
            .to_string(),
        experience_analysis: experience_analysis
            .unwrap_or("No experience analysis provided.")
            .to_string(),
        education_analysis,
        additional_factors: additional_factors
            .unwrap_or("No additional factors provided.")
            .to_string(),
        matched_skills: split_skills(matched_section),
        missing_skills: split_skills(missing_section),
        cgpa,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Code fences
// ────────────────────────────────────────────────────────────────────────────

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
