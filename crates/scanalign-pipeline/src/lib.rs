#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Import pipeline driver and per-file reports.
pub mod driver;

/// Error types for the pipeline.
pub mod error;

/// Deterministic image pairing for attribute transfer.
pub mod pairing;

/// Mask transfer between paired images.
pub mod transfer;

pub use driver::{
    discover_scan_files, EntityReport, FileReport, FileStatus, ImportPipeline, PipelineConfig,
    PipelineRun, SkipReason,
};
pub use error::PipelineError;
pub use pairing::{attached_images, pair_images};
pub use transfer::{transfer_masks, TransferReport};
