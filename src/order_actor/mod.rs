//! Order records. Status transitions are actions so each one is checked and
//! applied inside the order actor in a single step.

mod actions;
pub mod entity;

pub use actions::*;
