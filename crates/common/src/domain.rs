mod pubsub;
mod result;
mod species_login;

pub use pubsub::*;
pub use result::*;
pub use species_login::*;
