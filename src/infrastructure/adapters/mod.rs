//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod backends;
pub mod runtime;
pub mod transcoder;

pub use backends::{register_builtin_backends, with_builtin_backends, CoquiBackend, MmsBackend};
pub use runtime::{FakeRuntime, FakeRuntimeConfig, HttpRuntime, HttpRuntimeConfig};
pub use transcoder::AudioTranscoder;
