pub mod autocomplete;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod orchestrator;
pub mod presentation;
pub mod reference;
pub mod settings;
pub mod traits;

pub use autocomplete::{filter_skills, MAX_SUGGESTIONS};
pub use client::{bounded, http_error, ApiClient};
pub use config::{ClientConfig, RequestControl, DEFAULT_API_BASE_URL};
pub use error::{ClientError, FormError, SettingsError, SubmitError, ValidationError};
pub use form::{SearchForm, MAX_SKILLS};
pub use models::{
    EducationLevel, Locations, MaxResults, Profile, RecommendationResult, ReferenceData,
    SectorsResponse, SkillsResponse, Stats,
};
pub use orchestrator::{
    AbandonReason, Notice, Orchestrator, Outcome, Phase, ResultsView, ReturnPolicy, Screen,
    SearchView, SessionState,
};
pub use presentation::{format_deadline, present, score_label, DisplayRow, ScoreTier};
pub use reference::load_reference_data;
pub use settings::{
    is_supported_language, FileSettings, LanguagePreference, MemorySettings, SUPPORTED_LANGUAGES,
};
pub use traits::{MatchingService, SettingsStore};
