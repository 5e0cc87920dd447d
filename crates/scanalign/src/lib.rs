#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use scanalign_project as project;

#[doc(inline)]
pub use scanalign_pose as pose;

#[doc(inline)]
pub use scanalign_pipeline as pipeline;
