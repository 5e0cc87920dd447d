#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Effective world-transform composition (group × local).
pub mod compose;

/// Rigid delta solving and multiplicative application.
pub mod delta;

/// Error types for pose operations.
pub mod error;

/// Fixed-width matrix formatting for console reports.
pub mod fmt;

pub use compose::{effective_transform, scan_effective_transform};
pub use delta::{apply_delta, compute_delta};
pub use error::PoseError;
