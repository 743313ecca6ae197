//! Prompt construction for resume scoring.
//!
//! One prompt, one rubric. The model is asked for the labeled reply format;
//! the parser additionally accepts a bare JSON object, so older reply shapes
//! keep working.

/// Hard cap on embedded resume text. Longer resumes are cut mid-word; the
/// truncation is not sentence-aware.
pub const RESUME_TEXT_MAX_CHARS: usize = 3000;

pub const SCORING_SYSTEM: &str = "You are an expert ATS analyzer. \
    You evaluate resumes against job requirements and respond strictly in the \
    requested format with no additional commentary.";

const SCORING_PROMPT_TEMPLATE: &str = r#"Analyze the resume against the job requirements and provide a detailed score based on multiple criteria.

JOB REQUIREMENTS:
- Skills: {required_skills}
- Preferred Experience: At least 2 years of relevant experience (if not specified, assume this as a baseline).
- Preferred Education: Bachelor's degree or higher, with a CGPA of 3.0 or above (if not specified, assume this as a baseline).

RESUME CONTENT:
{resume_text}

ANALYSIS INSTRUCTIONS:
1. Skills Analysis:
   - Check for each required skill, including variations and related terms (e.g., 'js' for 'javascript', 'reactjs' for 'react').
   - Evaluate expertise level for each skill based on years of experience, project complexity, or specific achievements.
2. Experience Analysis:
   - Identify the candidate's total years of relevant work experience.
   - Evaluate the relevance of their experience to the job requirements.
3. Education Analysis:
   - Extract the candidate's highest degree and CGPA (if mentioned).
   - Assess if the degree is relevant to the job.
   - Consider a CGPA of 3.0 or above as good; below 3.0 as average.
4. Additional Factors:
   - Look for certifications, awards, or achievements that align with the job requirements.
5. Scoring:
   - Skills (40%): 90-100 for all skills with strong evidence, 70-89 for most skills with good evidence, 50-69 for some skills with moderate evidence, 30-49 for few skills with limited evidence, 0-29 for minimal or no skills.
   - Experience (30%): 90-100 for more than 5 years of relevant experience, 70-89 for 3-5 years, 50-69 for 1-2 years, 30-49 for less than 1 year, 0-29 for no relevant experience.
   - Education (20%): 90-100 for relevant degree with CGPA 3.5 or above, 70-89 for relevant degree with CGPA 3.0-3.5, 50-69 for relevant degree with CGPA below 3.0, 30-49 for non-relevant degree or no CGPA, 0-29 for no degree.
   - Additional Factors (10%): 90-100 for multiple relevant certifications or achievements, 70-89 for some, 50-69 for minimal, 0-49 for none.
   - Combine the weighted scores for a final score out of 100.

RESPONSE FORMAT:
Score: [0-100]
Skills Analysis: [Detailed explanation of skill matches and expertise]
Experience Analysis: [Details of relevant experience, years, and relevance]
Education Analysis: [Degree, CGPA (if found), and relevance]
Additional Factors: [Certifications, awards, or other relevant details]
Matched Skills: [Comma-separated list of matched skills]
Missing Skills: [Comma-separated list of missing skills]"#;

/// Builds the scoring prompt. Pure; always yields a prompt, whatever the
/// inputs look like.
pub fn build_scoring_prompt(required_skills: &[String], resume_text: &str) -> String {
    SCORING_PROMPT_TEMPLATE
        .replace("{required_skills}", &required_skills.join(", "))
        .replace("{resume_text}", truncate_resume_text(resume_text))
}

/// Hard cut at `RESUME_TEXT_MAX_CHARS` characters, respecting UTF-8
/// boundaries.
fn truncate_resume_text(text: &str) -> &str {
    match text.char_indices().nth(RESUME_TEXT_MAX_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
