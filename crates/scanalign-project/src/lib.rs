#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Project chunk context owning groups, scans, and images.
pub mod chunk;

/// Error types for project model operations.
pub mod error;

/// Image assets and visibility masks.
pub mod image;

/// Host collaborator contracts for importing scan assets.
pub mod import;

/// Label normalization and uniqueness helpers.
pub mod label;

/// Image-to-scan association strategies.
pub mod link;

/// Scan entities and scan groups.
pub mod scan;

pub use error::ProjectError;
