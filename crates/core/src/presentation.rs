use crate::RecommendationResult;
use chrono::{DateTime, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Shown when a recommendation carries no application deadline.
pub const DEFAULT_DEADLINE: &str = "2025-10-15";

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ScoreTier {
    High,
    Medium,
    Low,
}

impl ScoreTier {
    pub fn classify(score: f64) -> Self {
        if score >= 0.8 {
            Self::High
        } else if score >= 0.6 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for ScoreTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DisplayRow {
    pub rank: usize,
    pub score_percent: u32,
    pub tier: ScoreTier,
    pub title: String,
    pub company: String,
    pub location: String,
    pub stipend: String,
    pub duration_weeks: u32,
    pub sector: String,
    pub education_requirement: String,
    pub skills_required: Vec<String>,
    pub reason: String,
    pub description: String,
    pub apply_url: String,
    pub apply_by: String,
}

/// Integer match percentage for a similarity score.
pub fn score_label(score: f64) -> u32 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u32
}

/// Normalizes a deadline to `YYYY-MM-DD`. Missing values use
/// `DEFAULT_DEADLINE`; values that are not dates are shown unchanged.
pub fn format_deadline(deadline: Option<&str>) -> String {
    let raw = deadline
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_DEADLINE);

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|at| at.date_naive()))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Ranks follow input order: the service already sorted by relevance.
pub fn present(results: &[RecommendationResult]) -> Vec<DisplayRow> {
    results
        .iter()
        .enumerate()
        .map(|(position, result)| DisplayRow {
            rank: position + 1,
            score_percent: score_label(result.similarity_score),
            tier: ScoreTier::classify(result.similarity_score),
            title: result.title.clone(),
            company: result.company.clone(),
            location: format!("{}, {}", result.location_city, result.location_state),
            stipend: result.stipend.clone(),
            duration_weeks: result.duration_weeks,
            sector: result.sector.clone(),
            education_requirement: result.education_requirement.clone(),
            skills_required: result.skills_required.clone(),
            reason: result.reason.clone(),
            description: result.description.clone(),
            apply_url: result.apply_url.clone(),
            apply_by: format_deadline(result.application_deadline.as_deref()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, score: f64) -> RecommendationResult {
        RecommendationResult {
            id: 1,
            title: title.to_string(),
            company: "Acme".to_string(),
            sector: "Technology".to_string(),
            location_city: "Pune".to_string(),
            location_state: "Maharashtra".to_string(),
            stipend: "₹8,000/month".to_string(),
            duration_weeks: 8,
            skills_required: vec!["Python".to_string()],
            education_requirement: "B.Tech".to_string(),
            description: "Build things".to_string(),
            similarity_score: score,
            reason: "Skill overlap".to_string(),
            apply_url: "https://example.org/apply".to_string(),
            eligibility_criteria: Vec::new(),
            learning_outcomes: Vec::new(),
            application_deadline: None,
        }
    }

    #[test]
    fn score_label_bounds_and_rounding() {
        assert_eq!(score_label(0.0), 0);
        assert_eq!(score_label(1.0), 100);
        assert_eq!(score_label(0.824), 82);
        assert_eq!(score_label(0.826), 83);
    }

    #[test]
    fn score_label_is_monotonic() {
        let labels: Vec<u32> = (0..=1000).map(|step| score_label(step as f64 / 1000.0)).collect();
        assert!(labels.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(ScoreTier::classify(0.8), ScoreTier::High);
        assert_eq!(ScoreTier::classify(0.79), ScoreTier::Medium);
        assert_eq!(ScoreTier::classify(0.6), ScoreTier::Medium);
        assert_eq!(ScoreTier::classify(0.59), ScoreTier::Low);
    }

    #[test]
    fn ranks_follow_input_order_without_resorting() {
        let rows = present(&[result("first", 0.4), result("second", 0.9), result("third", 0.7)]);
        let summary: Vec<(usize, &str)> = rows
            .iter()
            .map(|row| (row.rank, row.title.as_str()))
            .collect();
        assert_eq!(summary, vec![(1, "first"), (2, "second"), (3, "third")]);
        assert_eq!(rows[1].tier, ScoreTier::High);
        assert_eq!(rows[0].location, "Pune, Maharashtra");
    }

    #[test]
    fn deadline_defaults_and_normalizes() {
        assert_eq!(format_deadline(None), DEFAULT_DEADLINE);
        assert_eq!(format_deadline(Some("")), DEFAULT_DEADLINE);
        assert_eq!(format_deadline(Some("2025-11-30T00:00:00Z")), "2025-11-30");
        assert_eq!(format_deadline(Some("rolling")), "rolling");
    }
}
