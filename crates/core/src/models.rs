use crate::error::FormError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EducationLevel {
    #[serde(rename = "B.Tech")]
    BTech,
    #[serde(rename = "B.E")]
    BE,
    #[serde(rename = "BCA")]
    Bca,
    #[serde(rename = "MCA")]
    Mca,
    #[serde(rename = "M.Tech")]
    MTech,
    #[serde(rename = "B.Com")]
    BCom,
    #[serde(rename = "BBA")]
    Bba,
    #[serde(rename = "MBA")]
    Mba,
    #[serde(rename = "CA")]
    Ca,
    #[serde(rename = "M.Com")]
    MCom,
    #[serde(rename = "MBBS")]
    Mbbs,
    #[serde(rename = "B.Pharma")]
    BPharma,
    #[serde(rename = "BDS")]
    Bds,
    #[serde(rename = "BAMS")]
    Bams,
    #[serde(rename = "B.Sc Nursing")]
    BScNursing,
    #[serde(rename = "BSc")]
    BSc,
    #[serde(rename = "B.Sc Agriculture")]
    BScAgriculture,
    #[serde(rename = "B.Tech Agricultural")]
    BTechAgricultural,
    #[serde(rename = "M.Sc Agriculture")]
    MScAgriculture,
    #[serde(rename = "B.Ed")]
    BEd,
    #[serde(rename = "M.Ed")]
    MEd,
    #[serde(rename = "BA")]
    Ba,
    #[serde(rename = "MA")]
    Ma,
    #[serde(rename = "MSc")]
    MSc,
    #[serde(rename = "Diploma")]
    Diploma,
    #[serde(rename = "ITI")]
    Iti,
    #[serde(rename = "Mass Communication")]
    MassCommunication,
}

impl EducationLevel {
    pub const ALL: [EducationLevel; 27] = [
        Self::BTech,
        Self::BE,
        Self::Bca,
        Self::Mca,
        Self::MTech,
        Self::BCom,
        Self::Bba,
        Self::Mba,
        Self::Ca,
        Self::MCom,
        Self::Mbbs,
        Self::BPharma,
        Self::Bds,
        Self::Bams,
        Self::BScNursing,
        Self::BSc,
        Self::BScAgriculture,
        Self::BTechAgricultural,
        Self::MScAgriculture,
        Self::BEd,
        Self::MEd,
        Self::Ba,
        Self::Ma,
        Self::MSc,
        Self::Diploma,
        Self::Iti,
        Self::MassCommunication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BTech => "B.Tech",
            Self::BE => "B.E",
            Self::Bca => "BCA",
            Self::Mca => "MCA",
            Self::MTech => "M.Tech",
            Self::BCom => "B.Com",
            Self::Bba => "BBA",
            Self::Mba => "MBA",
            Self::Ca => "CA",
            Self::MCom => "M.Com",
            Self::Mbbs => "MBBS",
            Self::BPharma => "B.Pharma",
            Self::Bds => "BDS",
            Self::Bams => "BAMS",
            Self::BScNursing => "B.Sc Nursing",
            Self::BSc => "BSc",
            Self::BScAgriculture => "B.Sc Agriculture",
            Self::BTechAgricultural => "B.Tech Agricultural",
            Self::MScAgriculture => "M.Sc Agriculture",
            Self::BEd => "B.Ed",
            Self::MEd => "M.Ed",
            Self::Ba => "BA",
            Self::Ma => "MA",
            Self::MSc => "MSc",
            Self::Diploma => "Diploma",
            Self::Iti => "ITI",
            Self::MassCommunication => "Mass Communication",
        }
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EducationLevel {
    type Err = FormError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|level| level.as_str() == trimmed)
            .ok_or_else(|| FormError::UnknownEducation(value.to_string()))
    }
}

/// Number of recommendations to ask for. Only the values offered by the
/// search form are representable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub struct MaxResults(u8);

impl MaxResults {
    pub const ALLOWED: [u8; 4] = [3, 5, 7, 10];

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for MaxResults {
    fn default() -> Self {
        Self(5)
    }
}

impl TryFrom<u8> for MaxResults {
    type Error = FormError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(Self(value))
        } else {
            Err(FormError::UnsupportedMaxResults(value))
        }
    }
}

impl From<MaxResults> for u8 {
    fn from(value: MaxResults) -> Self {
        value.0
    }
}

/// A validated search submission. Built only by `SearchForm::validate_for_submit`,
/// so it always has an education level and between one and ten skills.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    pub education: EducationLevel,
    pub skills: Vec<String>,
    pub sectors: Vec<String>,
    pub location_state: Option<String>,
    pub max_results: MaxResults,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectorsResponse {
    #[serde(default)]
    pub sectors: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkillsResponse {
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Locations {
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub total_internships: u64,
    pub total_sectors: u64,
    pub total_companies: u64,
    pub total_locations: u64,
    #[serde(default)]
    pub sector_distribution: BTreeMap<String, u64>,
    #[serde(default)]
    pub sectors: Vec<String>,
    #[serde(default)]
    pub top_companies: Vec<String>,
}

/// Vocabularies used to populate the search form. Any field may be empty
/// when its fetch failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub sectors: Vec<String>,
    pub skills: Vec<String>,
    pub locations: Locations,
    pub stats: Option<Stats>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationResult {
    pub id: u64,
    pub title: String,
    pub company: String,
    pub sector: String,
    pub location_city: String,
    pub location_state: String,
    pub stipend: String,
    pub duration_weeks: u32,
    #[serde(default)]
    pub skills_required: Vec<String>,
    pub education_requirement: String,
    pub description: String,
    pub similarity_score: f64,
    pub reason: String,
    pub apply_url: String,
    #[serde(default)]
    pub eligibility_criteria: Vec<String>,
    #[serde(default)]
    pub learning_outcomes: Vec<String>,
    #[serde(default)]
    pub application_deadline: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn education_round_trips_through_service_labels() {
        for level in EducationLevel::ALL {
            assert_eq!(level.as_str().parse::<EducationLevel>(), Ok(level));
        }
        assert_eq!(
            serde_json::to_value(EducationLevel::BScNursing).ok(),
            Some(json!("B.Sc Nursing"))
        );
    }

    #[test]
    fn unknown_education_is_rejected() {
        assert_eq!(
            "PhD".parse::<EducationLevel>(),
            Err(FormError::UnknownEducation("PhD".to_string()))
        );
    }

    #[test]
    fn max_results_only_accepts_offered_counts() {
        assert_eq!(MaxResults::default().get(), 5);
        assert!(MaxResults::try_from(7).is_ok());
        assert_eq!(
            MaxResults::try_from(4),
            Err(FormError::UnsupportedMaxResults(4))
        );
        assert!(serde_json::from_value::<MaxResults>(json!(6)).is_err());
    }

    #[test]
    fn profile_serializes_to_request_body() -> Result<(), Box<dyn std::error::Error>> {
        let profile = Profile {
            education: EducationLevel::BTech,
            skills: vec!["Python".to_string()],
            sectors: Vec::new(),
            location_state: None,
            max_results: MaxResults::default(),
        };

        let body = serde_json::to_value(&profile)?;
        assert_eq!(
            body,
            json!({
                "education": "B.Tech",
                "skills": ["Python"],
                "sectors": [],
                "location_state": null,
                "max_results": 5,
            })
        );
        Ok(())
    }

    #[test]
    fn recommendation_tolerates_missing_optional_fields() -> Result<(), Box<dyn std::error::Error>> {
        let parsed: RecommendationResult = serde_json::from_value(json!({
            "id": 7,
            "title": "Data Intern",
            "company": "Acme",
            "sector": "Technology",
            "location_city": "Hyderabad",
            "location_state": "Telangana",
            "stipend": "₹10,000/month",
            "duration_weeks": 12,
            "education_requirement": "B.Tech",
            "description": "Work with data",
            "similarity_score": 0.82,
            "reason": "Matches Python",
            "apply_url": "https://example.org/apply/7",
        }))?;

        assert!(parsed.skills_required.is_empty());
        assert_eq!(parsed.application_deadline, None);
        Ok(())
    }
}
