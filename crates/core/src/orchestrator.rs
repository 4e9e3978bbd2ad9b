use crate::client::bounded;
use crate::config::RequestControl;
use crate::form::SearchForm;
use crate::presentation::{present, DisplayRow};
use crate::reference::load_reference_data;
use crate::traits::MatchingService;
use crate::{
    ClientError, Profile, RecommendationResult, ReferenceData, SubmitError, ValidationError,
};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Search,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbandonReason {
    TimedOut(Duration),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Results { count: usize },
    NoMatches,
    Failed { message: String },
    Abandoned(AbandonReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Settled(Outcome),
}

/// User-visible, dismissible message on the search screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Invalid(ValidationError),
    NoMatches,
    RequestFailed(String),
    Abandoned(AbandonReason),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(error) => write!(f, "{error}"),
            Self::NoMatches => f.write_str(
                "No matching internships found. Please try different skills or sectors.",
            ),
            Self::RequestFailed(message) => f.write_str(message),
            Self::Abandoned(AbandonReason::TimedOut(limit)) => write!(
                f,
                "The search gave no answer within {}s and was abandoned. Please try again.",
                limit.as_secs()
            ),
            Self::Abandoned(AbandonReason::Cancelled) => f.write_str("The search was cancelled."),
        }
    }
}

/// What happens to the last query and results when leaving the results screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReturnPolicy {
    #[default]
    RememberLastSearch,
    ClearLastSearch,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub is_loading: bool,
    pub last_profile: Option<Profile>,
    pub last_results: Vec<RecommendationResult>,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchView {
    pub is_loading: bool,
    pub submit_enabled: bool,
    pub notice: Option<Notice>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    /// Nothing to show; the screen offers a way back to the search.
    Empty,
    Ranked {
        query: Option<Profile>,
        rows: Vec<DisplayRow>,
    },
}

/// Owns the session state for the search and results screens and is the
/// only place that mutates it.
pub struct Orchestrator<S> {
    service: S,
    session: SessionState,
    phase: Phase,
    screen: Screen,
    notice: Option<Notice>,
    reference: Option<ReferenceData>,
    return_policy: ReturnPolicy,
}

impl<S> Orchestrator<S>
where
    S: MatchingService + Send + Sync,
{
    pub fn new(service: S) -> Self {
        Self {
            service,
            session: SessionState::default(),
            phase: Phase::Idle,
            screen: Screen::Search,
            notice: None,
            reference: None,
            return_policy: ReturnPolicy::default(),
        }
    }

    pub fn with_return_policy(mut self, policy: ReturnPolicy) -> Self {
        self.return_policy = policy;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn reference(&self) -> Option<&ReferenceData> {
        self.reference.as_ref()
    }

    /// Loads reference data the first time the search screen becomes active
    /// and reuses it afterwards.
    pub async fn enter_search_screen(&mut self) -> &ReferenceData {
        self.screen = Screen::Search;
        if self.reference.is_none() {
            let data = load_reference_data(&self.service).await;
            self.reference = Some(data);
        }
        self.reference.get_or_insert_with(ReferenceData::default)
    }

    /// Records a validation failure as a notice; the form is left to the caller.
    pub fn reject(&mut self, error: ValidationError) {
        debug!(%error, "submission blocked by validation");
        self.notice = Some(Notice::Invalid(error));
    }

    /// Enters `Loading` for `profile`. Fails with `Busy` while a request is
    /// already in flight. Results of the previous search are discarded so
    /// `last_results` always answers `last_profile`.
    pub fn begin(&mut self, profile: Profile) -> Result<(), SubmitError> {
        if self.session.is_loading {
            return Err(SubmitError::Busy);
        }

        debug!(education = %profile.education, skills = profile.skills.len(), "search started");
        self.session.is_loading = true;
        self.session.last_error = None;
        self.session.last_profile = Some(profile);
        self.session.last_results.clear();
        self.notice = None;
        self.phase = Phase::Loading;
        Ok(())
    }

    /// Applies the answer of the in-flight request. Returns `None` when no
    /// request was in flight.
    pub fn settle(
        &mut self,
        result: Result<Vec<RecommendationResult>, ClientError>,
    ) -> Option<Outcome> {
        if !self.session.is_loading {
            debug!("ignoring answer with no search in flight");
            return None;
        }
        self.session.is_loading = false;

        let outcome = match result {
            Ok(results) if results.is_empty() => {
                info!("search returned no matches");
                self.notice = Some(Notice::NoMatches);
                Outcome::NoMatches
            }
            Ok(results) => {
                let count = results.len();
                info!(count, "search returned results");
                self.session.last_results = results;
                self.screen = Screen::Results;
                Outcome::Results { count }
            }
            Err(error) => {
                warn!(%error, "recommendation request failed");
                self.session.last_error = Some(error.to_string());
                match error {
                    ClientError::Timeout(limit) => {
                        let reason = AbandonReason::TimedOut(limit);
                        self.notice = Some(Notice::Abandoned(reason));
                        Outcome::Abandoned(reason)
                    }
                    ClientError::Cancelled => {
                        self.notice = Some(Notice::Abandoned(AbandonReason::Cancelled));
                        Outcome::Abandoned(AbandonReason::Cancelled)
                    }
                    other => {
                        let message = other.to_string();
                        self.notice = Some(Notice::RequestFailed(message.clone()));
                        Outcome::Failed { message }
                    }
                }
            }
        };

        self.phase = Phase::Settled(outcome.clone());
        Some(outcome)
    }

    /// Validates `form`, issues the single recommendation request under
    /// `control`, and settles the session with its answer.
    pub async fn submit(
        &mut self,
        form: &SearchForm,
        control: &RequestControl,
    ) -> Result<Outcome, SubmitError> {
        if self.session.is_loading {
            return Err(SubmitError::Busy);
        }

        let profile = match form.validate_for_submit() {
            Ok(profile) => profile,
            Err(error) => {
                self.reject(error);
                return Err(error.into());
            }
        };

        self.begin(profile.clone())?;
        let result = bounded(self.service.recommend(&profile), control).await;
        Ok(self
            .settle(result)
            .unwrap_or(Outcome::Abandoned(AbandonReason::Cancelled)))
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Shows the results screen regardless of whether a search succeeded.
    pub fn open_results(&mut self) {
        self.screen = Screen::Results;
    }

    pub fn back_to_search(&mut self) {
        self.screen = Screen::Search;
        if !self.session.is_loading {
            self.phase = Phase::Idle;
        }
        if self.return_policy == ReturnPolicy::ClearLastSearch {
            self.session.last_profile = None;
            self.session.last_results.clear();
        }
    }

    pub fn search_view(&self) -> SearchView {
        SearchView {
            is_loading: self.session.is_loading,
            submit_enabled: !self.session.is_loading,
            notice: self.notice.clone(),
        }
    }

    pub fn results_view(&self) -> ResultsView {
        if self.session.last_results.is_empty() {
            return ResultsView::Empty;
        }

        ResultsView::Ranked {
            query: self.session.last_profile.clone(),
            rows: present(&self.session.last_results),
        }
    }
}
