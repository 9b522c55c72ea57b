use crate::domain::result::DomainResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Event kind recorded when the caller does not supply one.
pub const DEFAULT_EVENT_KIND: &str = "PlayerRespawn";

/// A species login: one row of `species_logins`.
///
/// `ts` is the time the record was written, not a time carried by the inbound event.
/// Records are only ever inserted; nothing in this system updates or deletes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeciesLogin {
    pub ts: DateTime<Utc>,
    pub aid: String,
    pub species: String,
    pub event_type: String,
}

/// Repository trait for species login storage.
/// Infrastructure layer (postgres) implements this trait.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait SpeciesLoginRepository: Send + Sync {
    /// Insert a single species login row.
    ///
    /// Every call inserts a new row. Duplicate deliveries of the same event therefore
    /// produce duplicate rows.
    async fn insert_species_login(&self, login: &SpeciesLogin) -> DomainResult<()>;
}
