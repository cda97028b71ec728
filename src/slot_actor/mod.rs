//! Sales slot records and their activation actions.

mod actions;
pub mod entity;

pub use actions::*;
