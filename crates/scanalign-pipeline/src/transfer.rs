use serde::{Deserialize, Serialize};

use scanalign_project::chunk::ProjectChunk;
use scanalign_project::link::LinkResolver;

use crate::pairing::{attached_images, pair_images};

/// Counts reported by a mask transfer between two scans' attached images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReport {
    /// Images attached to the source (reference) scan.
    pub source_count: usize,
    /// Images attached to the target (imported) scan.
    pub target_count: usize,
    /// Target-side masks cleared before copying.
    pub cleared: usize,
    /// Masks copied onto target images.
    pub copied: usize,
}

impl TransferReport {
    /// True when the pairing could not cover every image on both sides.
    pub fn is_partial(&self) -> bool {
        self.source_count != self.target_count
    }
}

/// Transfer masks from the source scan's images to the target scan's images.
///
/// Target-side masks are cleared unconditionally first, so no stale mask from
/// a prior import survives even when nothing gets copied. Copies are deep.
/// An empty side or a count mismatch is reported, not raised; per-image
/// mutation failures are logged and the loop continues.
pub fn transfer_masks(
    chunk: &mut ProjectChunk,
    resolver: &LinkResolver,
    source_key: i64,
    target_key: i64,
) -> TransferReport {
    let source_images = attached_images(chunk, resolver, source_key);
    let target_images = attached_images(chunk, resolver, target_key);

    log::info!(
        "cameras attached | src: {} | new: {}",
        source_images.len(),
        target_images.len()
    );

    let mut report = TransferReport {
        source_count: source_images.len(),
        target_count: target_images.len(),
        cleared: 0,
        copied: 0,
    };

    for &key in &target_images {
        match chunk.clear_image_mask(key) {
            Ok(()) => report.cleared += 1,
            Err(err) => log::warn!("failed to clear mask on image {key}: {err}"),
        }
    }
    if !target_images.is_empty() {
        log::info!(
            "cleared masks on new cameras: {}/{}",
            report.cleared,
            target_images.len()
        );
    }

    if source_images.is_empty() || target_images.is_empty() {
        log::warn!("cannot transfer masks (missing src cameras or new cameras)");
        return report;
    }

    let pairs = pair_images(&source_images, &target_images);
    for &(src_key, tgt_key) in &pairs {
        // absent source mask: nothing to copy, target stays cleared
        let Some(mask) = chunk.image(src_key).and_then(|i| i.mask().cloned()) else {
            continue;
        };
        match chunk.set_image_mask(tgt_key, Some(mask)) {
            Ok(()) => report.copied += 1,
            Err(err) => log::warn!("failed to copy mask onto image {tgt_key}: {err}"),
        }
    }

    if report.is_partial() {
        log::warn!(
            "camera count mismatch (src={} new={}); transferred masks for first {} pairs",
            report.source_count,
            report.target_count,
            pairs.len()
        );
    }
    log::info!(
        "masks copied to new cameras: {}/{}",
        report.copied,
        pairs.len()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanalign_project::image::{ImageAsset, Mask};

    fn resolver(chunk: &ProjectChunk) -> LinkResolver {
        LinkResolver::detect(chunk)
    }

    #[test]
    fn test_present_mask_is_deep_copied_and_absent_stays_cleared() {
        let mut chunk = ProjectChunk::new("chunk");
        chunk
            .add_image(
                ImageAsset::new(1, "m1")
                    .with_scan_key(100)
                    .with_mask(Mask::new(vec![1, 2, 3])),
            )
            .unwrap();
        chunk
            .add_image(ImageAsset::new(2, "m2").with_scan_key(100))
            .unwrap();
        chunk
            .add_image(
                ImageAsset::new(3, "t1")
                    .with_scan_key(200)
                    .with_mask(Mask::new(vec![9])),
            )
            .unwrap();
        chunk
            .add_image(
                ImageAsset::new(4, "t2")
                    .with_scan_key(200)
                    .with_mask(Mask::new(vec![9])),
            )
            .unwrap();

        let resolver = resolver(&chunk);
        let report = transfer_masks(&mut chunk, &resolver, 100, 200);

        assert_eq!(report.source_count, 2);
        assert_eq!(report.target_count, 2);
        assert_eq!(report.cleared, 2);
        assert_eq!(report.copied, 1);
        assert!(!report.is_partial());

        assert_eq!(
            chunk.image(3).unwrap().mask(),
            Some(&Mask::new(vec![1, 2, 3]))
        );
        // absent on source: cleared, not copied
        assert!(chunk.image(4).unwrap().mask().is_none());

        // the copy does not alias the source: clearing the source leaves it
        chunk.clear_image_mask(1).unwrap();
        assert_eq!(
            chunk.image(3).unwrap().mask(),
            Some(&Mask::new(vec![1, 2, 3]))
        );
    }

    #[test]
    fn test_empty_source_side_still_clears_targets() {
        let mut chunk = ProjectChunk::new("chunk");
        chunk
            .add_image(
                ImageAsset::new(1, "t1")
                    .with_scan_key(200)
                    .with_mask(Mask::new(vec![7])),
            )
            .unwrap();

        let resolver = resolver(&chunk);
        let report = transfer_masks(&mut chunk, &resolver, 100, 200);

        assert_eq!(report.source_count, 0);
        assert_eq!(report.cleared, 1);
        assert_eq!(report.copied, 0);
        assert!(chunk.image(1).unwrap().mask().is_none());
    }

    #[test]
    fn test_count_mismatch_is_partial() {
        let mut chunk = ProjectChunk::new("chunk");
        for (key, label) in [(1, "a"), (2, "b"), (3, "c")] {
            chunk
                .add_image(
                    ImageAsset::new(key, label)
                        .with_scan_key(100)
                        .with_mask(Mask::new(vec![key as u8])),
                )
                .unwrap();
        }
        chunk
            .add_image(ImageAsset::new(10, "x").with_scan_key(200))
            .unwrap();
        chunk
            .add_image(ImageAsset::new(11, "y").with_scan_key(200))
            .unwrap();

        let resolver = resolver(&chunk);
        let report = transfer_masks(&mut chunk, &resolver, 100, 200);

        assert!(report.is_partial());
        assert_eq!(report.copied, 2);
        assert_eq!(chunk.image(10).unwrap().mask(), Some(&Mask::new(vec![1])));
        assert_eq!(chunk.image(11).unwrap().mask(), Some(&Mask::new(vec![2])));
    }
}
