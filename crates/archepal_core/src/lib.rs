//! Core record access layer for ArchePal.
//! Owns the role-gated create path, record listing and the catalog projections
//! built on top of it.

pub mod clock;
pub mod config;
pub mod db;
pub mod identity;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod weather;

pub use clock::{Clock, ManualClock, SystemClock, MILLIS_PER_DAY};
pub use config::{CoreConfig, ConfigError};
pub use identity::facade::{IdentityFacade, ListenerId};
pub use identity::provider::{IdentityError, IdentityProvider, OAuthProvider};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::artifact::{
    Artifact, ArtifactDraft, ArtifactId, ArtifactType, ArtifactValidationError, Condition,
    Material, Significance,
};
pub use model::identity::{ArchaeologistProfile, Identity, IdentityId, ANONYMOUS_CREATOR};
pub use model::site::{Location, Site, SiteDraft, SiteId, SiteStatus, SiteValidationError};
pub use repo::record_store::{ArchaeologistRegistry, RecordStore, StoreError, StoreResult};
pub use repo::sqlite_store::SqliteRecordStore;
pub use search::explore::{explore, explore_with, location_label, ExploreView, SiteListItem};
pub use search::filter::filter_sites;
pub use search::recency::{humanize_elapsed, is_recent, recent_sites, RECENT_WINDOW_DAYS};
pub use service::mutation_gate::{
    AuthorizationError, CreateAuthorizer, CreatePermit, MutationGate,
};
pub use service::record_cache::{ArtifactListCache, CacheState, RecordCache, SiteListCache};
pub use service::record_client::{RecordError, RecordStoreClient, ValidationError};
pub use service::role_resolver::{ArchaeologistStatus, RoleResolver};
pub use weather::{SiteConditions, WeatherClient, WeatherError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
