//! Inference Runtime Adapters

mod fake_runtime;
mod http_runtime;

pub use fake_runtime::{FakeRuntime, FakeRuntimeConfig};
pub use http_runtime::{HttpRuntime, HttpRuntimeConfig};
