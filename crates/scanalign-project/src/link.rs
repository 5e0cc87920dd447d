use crate::chunk::ProjectChunk;
use crate::image::ImageAsset;

/// Strategy used to decide whether an image asset belongs to a scan entity.
///
/// Host builds differ in which link field they expose, so the concrete
/// strategy is resolved once per run rather than re-probed per image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStrategy {
    /// The image carries a direct back-reference to its scan.
    DirectBackRef,
    /// Legacy builds expose a dense-cloud identifier matching the scan key.
    DenseCloudId,
}

/// Image-to-scan association predicate with a fixed strategy.
#[derive(Debug, Clone, Copy)]
pub struct LinkResolver {
    strategy: LinkStrategy,
}

impl LinkResolver {
    /// Probe the chunk's images and pick the first strategy they support, in
    /// priority order: direct back-reference, then dense-cloud identifier.
    /// Strategies are never combined. An empty or unlinked image set falls
    /// back to the direct strategy (the predicate is then vacuously false).
    pub fn detect(chunk: &ProjectChunk) -> Self {
        let strategy = if chunk.images().iter().any(|i| i.scan_key().is_some()) {
            LinkStrategy::DirectBackRef
        } else if chunk.images().iter().any(|i| i.dense_cloud_id().is_some()) {
            LinkStrategy::DenseCloudId
        } else {
            LinkStrategy::DirectBackRef
        };
        Self { strategy }
    }

    /// Build a resolver with an explicit strategy, bypassing detection.
    pub fn with_strategy(strategy: LinkStrategy) -> Self {
        Self { strategy }
    }

    /// Strategy in use for this run.
    pub fn strategy(&self) -> LinkStrategy {
        self.strategy
    }

    /// Whether `image` belongs to the scan entity with `scan_key`.
    pub fn belongs_to(&self, image: &ImageAsset, scan_key: i64) -> bool {
        match self.strategy {
            LinkStrategy::DirectBackRef => image.scan_key() == Some(scan_key),
            LinkStrategy::DenseCloudId => image.dense_cloud_id() == Some(scan_key),
        }
    }
}
