mod client;
mod config;
mod species_login_repository;

pub use client::*;
pub use config::*;
pub use species_login_repository::*;
