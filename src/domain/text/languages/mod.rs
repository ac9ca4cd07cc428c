//! 内置语言规则

mod catalan;
mod ladino;

pub use catalan::Catalan;
pub use ladino::Ladino;
