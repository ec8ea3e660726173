//! Data models for the application

mod media;
mod response;

pub use media::*;
pub use response::*;
