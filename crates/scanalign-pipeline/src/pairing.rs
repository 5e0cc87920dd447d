use scanalign_project::chunk::ProjectChunk;
use scanalign_project::link::LinkResolver;

/// Keys of the image assets attached to the scan with `scan_key`, sorted by
/// `(label ascending, key ascending)`.
///
/// Sorting is on the raw stored label, not a normalized form; the composite
/// order is the canonical, reproducible pairing order and depends only on the
/// images' current labels and keys, never on registration order.
pub fn attached_images(chunk: &ProjectChunk, resolver: &LinkResolver, scan_key: i64) -> Vec<i64> {
    let mut images: Vec<(&str, i64)> = chunk
        .images()
        .iter()
        .filter(|image| resolver.belongs_to(image, scan_key))
        .map(|image| (image.label(), image.key()))
        .collect();
    images.sort_by(|a, b| a.0.cmp(b.0).then(a.1.cmp(&b.1)));
    images.into_iter().map(|(_, key)| key).collect()
}

/// Pair two canonically sorted image sequences position by position,
/// truncated to the shorter side.
///
/// The pairing is structural, not semantic: sorted order is not guaranteed to
/// correspond to the same physical camera on both sides, and a count mismatch
/// is the caller's warning, not an error here.
pub fn pair_images(source: &[i64], target: &[i64]) -> Vec<(i64, i64)> {
    source
        .iter()
        .copied()
        .zip(target.iter().copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanalign_project::image::ImageAsset;

    fn chunk_with_images(specs: &[(i64, &str, i64)]) -> ProjectChunk {
        let mut chunk = ProjectChunk::new("chunk");
        for &(key, label, scan) in specs {
            chunk
                .add_image(ImageAsset::new(key, label).with_scan_key(scan))
                .unwrap();
        }
        chunk
    }

    #[test]
    fn test_attached_images_sorted_by_label_then_key() {
        let chunk = chunk_with_images(&[
            (5, "cam_b", 1),
            (3, "cam_a", 1),
            (9, "cam_a", 1),
            (7, "cam_c", 2),
        ]);
        let resolver = LinkResolver::detect(&chunk);
        assert_eq!(attached_images(&chunk, &resolver, 1), vec![3, 9, 5]);
    }

    #[test]
    fn test_pairing_invariant_under_registration_order() {
        let forward = chunk_with_images(&[(1, "a", 1), (2, "b", 1), (3, "c", 1)]);
        let reversed = chunk_with_images(&[(3, "c", 1), (2, "b", 1), (1, "a", 1)]);
        let resolver = LinkResolver::detect(&forward);
        assert_eq!(
            attached_images(&forward, &resolver, 1),
            attached_images(&reversed, &resolver, 1)
        );
    }

    #[test]
    fn test_pairing_truncates_to_shorter_side() {
        let source = vec![10, 11, 12, 13, 14];
        let target = vec![20, 21, 22];
        let pairs = pair_images(&source, &target);
        assert_eq!(pairs, vec![(10, 20), (11, 21), (12, 22)]);
    }

    #[test]
    fn test_truncation_covers_lowest_sorted_entries() {
        let chunk = chunk_with_images(&[
            // five source images, deliberately registered out of order
            (15, "s_e", 1),
            (11, "s_a", 1),
            (14, "s_d", 1),
            (12, "s_b", 1),
            (13, "s_c", 1),
            // three target images
            (23, "t_c", 2),
            (21, "t_a", 2),
            (22, "t_b", 2),
        ]);
        let resolver = LinkResolver::detect(&chunk);
        let source = attached_images(&chunk, &resolver, 1);
        let target = attached_images(&chunk, &resolver, 2);
        let pairs = pair_images(&source, &target);
        assert_eq!(pairs, vec![(11, 21), (12, 22), (13, 23)]);
    }

    #[test]
    fn test_empty_sides() {
        assert!(pair_images(&[], &[1, 2]).is_empty());
        assert!(pair_images(&[1, 2], &[]).is_empty());
    }
}
