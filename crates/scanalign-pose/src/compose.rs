use glam::DMat4;

use scanalign_project::chunk::ProjectChunk;
use scanalign_project::scan::ScanEntity;

/// Compose the effective world transform from an optional group transform and
/// a local transform.
///
/// A point `p` in entity-local space maps to world space via
/// `group * local * p`, so the group transform is applied after the local one.
/// Returns `None` when there is no local transform; callers treat absence as
/// "skip this entity". The result is a copy, never a reference into the
/// entity, so later mutation of the entity does not alter a captured value.
pub fn effective_transform(local: Option<&DMat4>, group: Option<&DMat4>) -> Option<DMat4> {
    let local = local?;
    match group {
        Some(group) => Some(*group * *local),
        None => Some(*local),
    }
}

/// Effective world transform of a scan entity within its chunk, resolving the
/// owning group's transform if the entity belongs to a group.
///
/// Always recomputed from current state; never cached across mutations.
pub fn scan_effective_transform(chunk: &ProjectChunk, scan: &ScanEntity) -> Option<DMat4> {
    let group_transform = scan
        .group()
        .and_then(|key| chunk.group(key))
        .and_then(|group| group.transform().copied());
    effective_transform(scan.transform(), group_transform.as_ref())
}
