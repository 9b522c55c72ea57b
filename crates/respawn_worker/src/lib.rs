pub mod domain;
pub mod pubsub;
pub mod respawn_worker;

pub use domain::*;
pub use pubsub::*;
pub use respawn_worker::*;
