//! Common utility functions shared by the domain and the engine.
//!
//! Pure functions only: no side effects, no I/O.

pub mod lenient;
pub mod string;

// Re-export commonly used functions at crate root for convenience
pub use lenient::parse_leading_int;
pub use string::{none_if_blank, or_default_name};
