//! System orchestration, startup, and shutdown logic.

pub mod sales_system;
pub mod tracing;

pub use self::sales_system::*;
pub use self::tracing::*;
