use crate::{
    ClientError, Locations, Profile, RecommendationResult, SectorsResponse, SettingsError,
    SkillsResponse, Stats,
};
use async_trait::async_trait;

/// Read and scoring endpoints of the remote matching service.
#[async_trait]
pub trait MatchingService {
    async fn sectors(&self) -> Result<SectorsResponse, ClientError>;

    async fn skills(&self) -> Result<SkillsResponse, ClientError>;

    async fn locations(&self) -> Result<Locations, ClientError>;

    async fn stats(&self) -> Result<Stats, ClientError>;

    /// Returns results already ordered by relevance. An empty list is a valid
    /// answer and is not an error.
    async fn recommend(
        &self,
        profile: &Profile,
    ) -> Result<Vec<RecommendationResult>, ClientError>;
}

/// Named string preferences that outlive a session.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), SettingsError>;
}
