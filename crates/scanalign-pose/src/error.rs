/// An error type for pose operations.
#[derive(thiserror::Error, Debug)]
pub enum PoseError {
    /// The transform cannot be inverted.
    #[error("transform is singular (determinant {determinant:.3e})")]
    SingularTransform {
        /// Determinant of the offending transform.
        determinant: f64,
    },
}
