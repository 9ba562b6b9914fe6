//! Resume vs job-posting match scoring.
//!
//! Deterministic keyword-overlap heuristic: no model inference, no resume
//! parsing. The scorer sits behind the `MatchScorer` trait so the handler
//! never cares which backend produced the report.

use async_trait::async_trait;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::state::AppState;

/// Keywords counted toward the overlap bonus.
const SCORING_KEYWORDS: &[&str] = &[
    "rust",
    "javascript",
    "python",
    "react",
    "axum",
    "api",
    "json",
    "git",
    "linux",
    "ai",
    "llm",
    "cloud",
    "docker",
    "sql",
];

/// Core skills used to derive strengths and improvement suggestions.
const CORE_SKILLS: &[&str] = &["rust", "javascript", "python", "react", "axum"];

const BASE_SCORE: u32 = 50;
const KEYWORD_BONUS: u32 = 3;
const MAX_SCORE: u32 = 90;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job: String,
}

/// Structured match report returned by `POST /api/analyze-resume`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_score: u32,
    pub summary: String,
    pub strengths: String,
    pub improvements: String,
}

/// The match scorer seam. Implement this to swap scoring backends without
/// touching the endpoint or handler code.
///
/// Carried in `AppState` as `Arc<dyn MatchScorer>`.
#[async_trait]
pub trait MatchScorer: Send + Sync {
    async fn score(&self, resume: &str, job: &str) -> Result<MatchReport, AppError>;
}

/// Keyword-overlap scorer. Fast, deterministic, no LLM call.
///
/// Algorithm: start at 50, add 3 per keyword present in both texts, cap at
/// 90. Strengths list the core skills the resume mentions; improvements
/// list the ones only the posting mentions.
pub struct KeywordMatchScorer;

#[async_trait]
impl MatchScorer for KeywordMatchScorer {
    async fn score(&self, resume: &str, job: &str) -> Result<MatchReport, AppError> {
        Ok(compute_keyword_match(resume, job))
    }
}

/// POST /api/analyze-resume
///
/// Scores the resume against the job posting. Empty input is rejected
/// here, not in the client.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<MatchReport>, AppError> {
    if request.resume.is_empty() || request.job.is_empty() {
        return Err(AppError::Validation(
            "resume and job fields are required".to_string(),
        ));
    }

    let report = state.scorer.score(&request.resume, &request.job).await?;
    Ok(Json(report))
}

fn compute_keyword_match(resume: &str, job: &str) -> MatchReport {
    let resume = resume.to_lowercase();
    let job = job.to_lowercase();

    let mut bonuses = 0;
    for kw in SCORING_KEYWORDS {
        if resume.contains(kw) && job.contains(kw) {
            bonuses += KEYWORD_BONUS;
        }
    }
    let match_score = (BASE_SCORE + bonuses).min(MAX_SCORE);

    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    for kw in CORE_SKILLS {
        if resume.contains(kw) {
            strengths.push(*kw);
        } else if job.contains(kw) {
            improvements.push(*kw);
        }
    }

    let strengths = if strengths.is_empty() {
        "General web dev skills.".to_string()
    } else {
        format!("Mentions: {}", strengths.join(", "))
    };
    let improvements = if improvements.is_empty() {
        "You already mention most of the core technologies from the posting.".to_string()
    } else {
        format!("Consider adding: {}", improvements.join(", "))
    };

    MatchReport {
        match_score,
        summary: "Heuristic analysis based on keywords that overlap between the resume \
                  and the job posting."
            .to_string(),
        strengths,
        improvements,
    }
}
