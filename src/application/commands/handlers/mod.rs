//! Command Handlers 实现

mod synthesis_handlers;

pub use synthesis_handlers::*;
