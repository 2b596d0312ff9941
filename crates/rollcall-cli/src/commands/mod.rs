mod context;
pub mod mode;
pub mod query;
mod render;

pub use context::Context;
