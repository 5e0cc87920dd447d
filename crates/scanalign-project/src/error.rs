/// An error type for project model operations and host collaborators.
#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    /// An entity with the same key already exists in the chunk.
    #[error("entity with key {0} already exists in the chunk")]
    DuplicateKey(i64),

    /// No scan entity with the given key.
    #[error("no scan entity with key {0}")]
    UnknownScan(i64),

    /// No group with the given key.
    #[error("no group with key {0}")]
    UnknownGroup(i64),

    /// No image asset with the given key.
    #[error("no image asset with key {0}")]
    UnknownImage(i64),

    /// The host build does not expose the requested scan format.
    #[error("scan format '{0}' is not available in this host build")]
    FormatUnavailable(String),

    /// The host importer failed to ingest a file.
    #[error("import failed for '{path}': {reason}")]
    ImportFailed {
        /// Path of the file that failed to import.
        path: String,
        /// Host-reported failure reason.
        reason: String,
    },
}
