//! HTTP Handlers

mod ping;
mod synthesis;
mod voices;

pub use ping::*;
pub use synthesis::*;
pub use voices::*;
