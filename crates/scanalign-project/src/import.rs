use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::ProjectChunk;
use crate::error::ProjectError;

/// Identifier for a scan file format understood by the host importer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanFormat {
    /// ASTM E57 interchange format.
    E57,
}

impl ScanFormat {
    /// Canonical lowercase file extension for the format, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ScanFormat::E57 => "e57",
        }
    }
}

impl std::fmt::Display for ScanFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Host primitive that ingests scan files into a project chunk.
///
/// The importer never returns the entities it created; callers detect them by
/// snapshotting [`ProjectChunk::scan_keys`] around the call and diffing.
pub trait ScanImporter {
    /// Resolve the format identifier for the scan file type.
    ///
    /// Must fail with [`ProjectError::FormatUnavailable`] when the host build
    /// does not expose the format; no alignment is possible without correct
    /// import semantics, so this aborts the whole run.
    fn resolve_format(&self) -> Result<ScanFormat, ProjectError>;

    /// Import the scan file at `path` into `chunk`, adding scan entities (and
    /// possibly image assets) as a side effect. A single call may add more
    /// than one entity for multi-asset inputs.
    fn import_scan(
        &mut self,
        chunk: &mut ProjectChunk,
        path: &Path,
        format: ScanFormat,
        laser_scan: bool,
        replace_existing: bool,
    ) -> Result<(), ProjectError>;
}
