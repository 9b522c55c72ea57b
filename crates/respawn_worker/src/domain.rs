mod error;
mod event_decoder;
mod event_filter;
mod field_extractor;
mod respawn_event_service;
mod species_login_sink;

pub use error::*;
pub use event_decoder::*;
pub use event_filter::*;
pub use field_extractor::*;
pub use respawn_event_service::*;
pub use species_login_sink::*;
