use crate::autocomplete::filter_skills;
use crate::{EducationLevel, FormError, MaxResults, Profile, ValidationError};

pub const MAX_SKILLS: usize = 10;

/// Editable search criteria plus the autocomplete input state. Nothing here
/// reaches the network; `validate_for_submit` hands out an owned `Profile`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchForm {
    education: Option<EducationLevel>,
    skills: Vec<String>,
    sectors: Vec<String>,
    location_state: Option<String>,
    max_results: MaxResults,
    skill_query: String,
    dropdown_open: bool,
}

impl SearchForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn education(&self) -> Option<EducationLevel> {
        self.education
    }

    pub fn skills(&self) -> &[String] {
        &self.skills
    }

    pub fn sectors(&self) -> &[String] {
        &self.sectors
    }

    pub fn location_state(&self) -> Option<&str> {
        self.location_state.as_deref()
    }

    pub fn max_results(&self) -> MaxResults {
        self.max_results
    }

    pub fn skill_query(&self) -> &str {
        &self.skill_query
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    pub fn set_education(&mut self, education: Option<EducationLevel>) {
        self.education = education;
    }

    /// False once the skill limit is reached; the skill input is disabled then.
    pub fn can_add_skill(&self) -> bool {
        self.skills.len() < MAX_SKILLS
    }

    /// Appends `skill` unless the list is full, the skill is blank, or it is
    /// already chosen. Returns whether the skill was added.
    pub fn add_skill(&mut self, skill: &str) -> bool {
        let skill = skill.trim();
        if skill.is_empty() || !self.can_add_skill() || self.skills.iter().any(|s| s == skill) {
            return false;
        }

        self.skills.push(skill.to_string());
        self.skill_query.clear();
        self.dropdown_open = false;
        true
    }

    pub fn remove_skill(&mut self, skill: &str) {
        self.skills.retain(|chosen| chosen != skill);
    }

    pub fn toggle_sector(&mut self, sector: &str) {
        if let Some(position) = self.sectors.iter().position(|chosen| chosen == sector) {
            self.sectors.remove(position);
        } else {
            self.sectors.push(sector.to_string());
        }
    }

    pub fn set_location_state(&mut self, state: Option<&str>) {
        self.location_state = state
            .map(str::trim)
            .filter(|state| !state.is_empty())
            .map(ToOwned::to_owned);
    }

    pub fn set_max_results(&mut self, count: u8) -> Result<(), FormError> {
        self.max_results = MaxResults::try_from(count)?;
        Ok(())
    }

    pub fn set_skill_query(&mut self, query: &str) {
        self.skill_query = query.to_string();
        self.dropdown_open = true;
    }

    pub fn open_dropdown(&mut self) {
        self.dropdown_open = true;
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    /// Autocomplete entries for the current query.
    pub fn suggestions(&self, vocabulary: &[String]) -> Vec<String> {
        filter_skills(&self.skill_query, vocabulary, &self.skills)
    }

    /// Visible dropdown entries: empty while the dropdown is closed.
    pub fn visible_suggestions(&self, vocabulary: &[String]) -> Vec<String> {
        if self.dropdown_open {
            self.suggestions(vocabulary)
        } else {
            Vec::new()
        }
    }

    pub fn validate_for_submit(&self) -> Result<Profile, ValidationError> {
        let education = self.education.ok_or(ValidationError::MissingEducation)?;
        if self.skills.is_empty() {
            return Err(ValidationError::NoSkills);
        }

        Ok(Profile {
            education,
            skills: self.skills.clone(),
            sectors: self.sectors.clone(),
            location_state: self.location_state.clone(),
            max_results: self.max_results,
        })
    }
}
