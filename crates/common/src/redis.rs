mod client;
mod subscription;

pub use client::*;
pub use subscription::*;
