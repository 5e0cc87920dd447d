/// Opaque per-image visibility mask.
///
/// The pipeline never inspects mask content; it only clears masks and copies
/// them between images. Copies are deep, so a transferred mask never aliases
/// its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    data: Vec<u8>,
}

impl Mask {
    /// Wrap raw mask payload bytes.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Raw mask payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A 2D image/camera associated with at most one scan entity.
///
/// The association is not an explicit foreign key: depending on the host build
/// the image carries either a direct back-reference (`scan_key`) or a legacy
/// dense-cloud identifier. See [`crate::link`] for strategy resolution.
#[derive(Debug, Clone)]
pub struct ImageAsset {
    key: i64,
    label: String,
    mask: Option<Mask>,
    scan_key: Option<i64>,
    dense_cloud_id: Option<i64>,
}

impl ImageAsset {
    /// Create a new image asset with a host-assigned key.
    pub fn new(key: i64, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            mask: None,
            scan_key: None,
            dense_cloud_id: None,
        }
    }

    /// Attach a visibility mask (builder style).
    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.mask = Some(mask);
        self
    }

    /// Set the direct back-reference to the owning scan (builder style).
    pub fn with_scan_key(mut self, scan_key: i64) -> Self {
        self.scan_key = Some(scan_key);
        self
    }

    /// Set the legacy dense-cloud identifier (builder style).
    pub fn with_dense_cloud_id(mut self, id: i64) -> Self {
        self.dense_cloud_id = Some(id);
        self
    }

    /// Host-assigned identifier.
    #[inline]
    pub fn key(&self) -> i64 {
        self.key
    }

    /// Display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Visibility mask, if any.
    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// Replace or clear the visibility mask.
    pub fn set_mask(&mut self, mask: Option<Mask>) {
        self.mask = mask;
    }

    /// Direct back-reference to the owning scan, if the host exposes one.
    pub fn scan_key(&self) -> Option<i64> {
        self.scan_key
    }

    /// Legacy dense-cloud identifier, if the host exposes one.
    pub fn dense_cloud_id(&self) -> Option<i64> {
        self.dense_cloud_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_copies_are_independent() {
        let mask = Mask::new(vec![1, 2, 3]);
        let copy = mask.clone();
        drop(mask);
        assert_eq!(copy.data(), &[1, 2, 3]);
    }

    #[test]
    fn test_image_link_fields() {
        let image = ImageAsset::new(10, "cam_000")
            .with_scan_key(4)
            .with_mask(Mask::new(vec![0xff]));
        assert_eq!(image.scan_key(), Some(4));
        assert_eq!(image.dense_cloud_id(), None);
        assert!(image.mask().is_some());
    }
}
