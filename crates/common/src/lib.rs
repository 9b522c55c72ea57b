pub mod domain;
pub mod postgres;
pub mod redis;
pub mod telemetry;

pub use domain::*;
pub use postgres::*;
pub use self::redis::*;

// Re-export mocks when testing feature is enabled
#[cfg(any(test, feature = "testing"))]
pub use domain::MockPubSubConnector;
#[cfg(any(test, feature = "testing"))]
pub use domain::MockPubSubSubscription;
#[cfg(any(test, feature = "testing"))]
pub use domain::MockSpeciesLoginRepository;
