use scanalign_project::ProjectError;

/// An error type for pipeline runs. All variants are fatal pre-flight
/// conditions; per-file and per-entity problems are reported and skipped
/// instead of raised.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The input directory could not be read.
    #[error("cannot read input directory '{path}': {source}")]
    DirectoryUnreadable {
        /// Directory that failed to enumerate.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// No scan files with the expected extension in the input directory.
    #[error("no .{extension} files found in '{path}'")]
    NoInputFiles {
        /// Directory that was searched.
        path: String,
        /// Extension that was searched for.
        extension: String,
    },

    /// The chunk contains no laser-scan entities to match against.
    #[error("no reference laser scans found in chunk '{0}'")]
    NoReferenceScans(String),

    /// A project model or host collaborator failure.
    #[error(transparent)]
    Project(#[from] ProjectError),
}
