//! Rule-based resume scorer.
//!
//! The terminal safety net for the scoring pipeline: pure, deterministic,
//! no network. Substring skill matching plus coarse experience/education
//! tiers, combined with the same rubric weights the AI is prompted with.

use std::sync::OnceLock;

use regex::Regex;

use crate::scoring::parser::extract_cgpa;
use crate::scoring::result::{ScoreBreakdown, ScoreResult, ScoreSummary};

/// Fixed contribution for the additional-factors criterion; the rule-based
/// path does not analyze certifications.
const ADDITIONAL_FACTORS_SCORE: i32 = 10;

fn experience_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s*(?:year|yr)s?\s*(?:of\s*)?(?:experience|exp)").expect("valid regex")
    })
}

/// Scores a resume against the required skills without any AI involvement.
/// Pure function; identical inputs always produce identical output.
pub fn fallback_score(required_skills: &[String], resume_text: &str) -> ScoreResult {
    let resume_lower = resume_text.to_lowercase();

    let skills_lower: Vec<String> = required_skills.iter().map(|s| s.to_lowercase()).collect();
    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) = skills_lower
        .iter()
        .cloned()
        .partition(|skill| resume_lower.contains(skill.as_str()));

    // A zero skill ratio still scores 1, never 0.
    let skills_score = if skills_lower.is_empty() {
        1
    } else {
        let pct =
            ((matched_skills.len() as f64 / skills_lower.len() as f64) * 100.0).round() as i32;
        if pct == 0 {
            1
        } else {
            pct
        }
    };

    let years_of_experience = experience_re()
        .captures(&resume_lower)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .unwrap_or(0);
    let experience_score = match years_of_experience {
        y if y >= 5 => 90,
        y if y >= 3 => 70,
        y if y >= 1 => 50,
        _ => 0,
    };

    let has_degree = ["bachelor", "master", "phd"]
        .iter()
        .any(|keyword| resume_lower.contains(keyword));
    let cgpa = extract_cgpa(&resume_lower);
    let education_score = match cgpa {
        Some(c) if has_degree && c >= 3.5 => 90,
        Some(c) if has_degree && c >= 3.0 => 70,
        Some(c) if has_degree && c > 0.0 => 50,
        Some(_) => 30,
        None if has_degree => 30,
        None => 0,
    };

    let final_score = (skills_score as f64 * 0.4
        + experience_score as f64 * 0.3
        + education_score as f64 * 0.2
        + ADDITIONAL_FACTORS_SCORE as f64 * 0.1)
        .round() as i32;
    let final_score = final_score.clamp(0, 100);

    let skills_analysis = format!(
        "Fallback: Matched {} out of {} skills. Missing skills: {}.",
        matched_skills.len(),
        skills_lower.len(),
        if missing_skills.is_empty() {
            "none".to_string()
        } else {
            missing_skills.join(", ")
        }
    );
    let education_analysis = if has_degree {
        format!(
            "Fallback: Detected a degree with CGPA {}.",
            cgpa.map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        )
    } else {
        "Fallback: No degree detected.".to_string()
    };

    ScoreResult {
        score: final_score,
        matched_skills,
        missing_skills,
        summary: ScoreSummary::Breakdown(ScoreBreakdown {
            overall_score: final_score,
            skills_analysis,
            experience_analysis: format!(
                "Fallback: Detected {years_of_experience} years of experience."
            ),
            education_analysis,
            additional_factors: "Fallback: No additional factors analyzed.".to_string(),
            cgpa,
        }),
    }
}
