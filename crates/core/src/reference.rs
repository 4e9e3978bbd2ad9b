use crate::traits::MatchingService;
use crate::{ClientError, Locations, ReferenceData};
use tracing::{info, warn};

/// Fetches sectors, skills, locations and stats concurrently. A failed fetch
/// is logged and replaced by that field's empty default, so this never fails.
pub async fn load_reference_data<S>(service: &S) -> ReferenceData
where
    S: MatchingService + ?Sized,
{
    let (sectors, skills, locations, stats) = tokio::join!(
        service.sectors(),
        service.skills(),
        service.locations(),
        service.stats()
    );

    let data = ReferenceData {
        sectors: absorb("sectors", sectors).unwrap_or_default().sectors,
        skills: absorb("skills", skills).unwrap_or_default().skills,
        locations: absorb::<Locations>("locations", locations).unwrap_or_default(),
        stats: absorb("stats", stats),
    };

    info!(
        sectors = data.sectors.len(),
        skills = data.skills.len(),
        states = data.locations.states.len(),
        stats_loaded = data.stats.is_some(),
        "reference data loaded"
    );

    data
}

fn absorb<T>(field: &str, result: Result<T, ClientError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            warn!(field, %error, "reference data fetch failed, using empty default");
            None
        }
    }
}
