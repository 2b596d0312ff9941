//! Patient domain module.

mod model;

pub use model::Patient;
