use std::collections::BTreeSet;

use crate::error::ProjectError;
use crate::image::{ImageAsset, Mask};
use crate::scan::{ScanEntity, ScanGroup};

/// The working project context: owns groups, scan entities, and image assets.
///
/// All pipeline mutations go through this type; there is no ambient global
/// document state. Key-addressed mutators return a [`ProjectError`] when the
/// key is unknown so callers can report the failure and continue.
#[derive(Debug, Clone, Default)]
pub struct ProjectChunk {
    label: String,
    groups: Vec<ScanGroup>,
    scans: Vec<ScanEntity>,
    images: Vec<ImageAsset>,
    next_key: i64,
}

impl ProjectChunk {
    /// Create an empty chunk.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            groups: Vec::new(),
            scans: Vec::new(),
            images: Vec::new(),
            next_key: 1,
        }
    }

    /// Chunk display label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// All groups, in registration order.
    pub fn groups(&self) -> &[ScanGroup] {
        &self.groups
    }

    /// All scan entities, in registration order.
    pub fn scans(&self) -> &[ScanEntity] {
        &self.scans
    }

    /// All image assets, in registration order.
    pub fn images(&self) -> &[ImageAsset] {
        &self.images
    }

    /// Allocate a fresh host-style key, strictly greater than any key handed
    /// out or registered so far. Used by importer implementations.
    pub fn allocate_key(&mut self) -> i64 {
        let key = self.next_key;
        self.next_key += 1;
        key
    }

    fn track_key(&mut self, key: i64) {
        if key >= self.next_key {
            self.next_key = key + 1;
        }
    }

    /// Register a group. Fails when its key is already taken by another group.
    pub fn add_group(&mut self, group: ScanGroup) -> Result<(), ProjectError> {
        if self.groups.iter().any(|g| g.key() == group.key()) {
            return Err(ProjectError::DuplicateKey(group.key()));
        }
        self.track_key(group.key());
        self.groups.push(group);
        Ok(())
    }

    /// Register a scan entity. Fails when its key is already taken.
    pub fn add_scan(&mut self, scan: ScanEntity) -> Result<(), ProjectError> {
        if self.scans.iter().any(|s| s.key() == scan.key()) {
            return Err(ProjectError::DuplicateKey(scan.key()));
        }
        self.track_key(scan.key());
        self.scans.push(scan);
        Ok(())
    }

    /// Register an image asset. Fails when its key is already taken.
    pub fn add_image(&mut self, image: ImageAsset) -> Result<(), ProjectError> {
        if self.images.iter().any(|i| i.key() == image.key()) {
            return Err(ProjectError::DuplicateKey(image.key()));
        }
        self.track_key(image.key());
        self.images.push(image);
        Ok(())
    }

    /// Look up a group by key.
    pub fn group(&self, key: i64) -> Option<&ScanGroup> {
        self.groups.iter().find(|g| g.key() == key)
    }

    /// Look up a scan entity by key.
    pub fn scan(&self, key: i64) -> Option<&ScanEntity> {
        self.scans.iter().find(|s| s.key() == key)
    }

    /// Look up a scan entity mutably by key.
    pub fn scan_mut(&mut self, key: i64) -> Option<&mut ScanEntity> {
        self.scans.iter_mut().find(|s| s.key() == key)
    }

    /// Remove a scan entity from the chunk, returning it. Hosts drop assets
    /// when importing with replacement, so a key resolved earlier in a run
    /// may stop resolving after an import call.
    pub fn remove_scan(&mut self, key: i64) -> Result<ScanEntity, ProjectError> {
        let index = self
            .scans
            .iter()
            .position(|s| s.key() == key)
            .ok_or(ProjectError::UnknownScan(key))?;
        Ok(self.scans.remove(index))
    }

    /// Look up an image asset by key.
    pub fn image(&self, key: i64) -> Option<&ImageAsset> {
        self.images.iter().find(|i| i.key() == key)
    }

    /// Snapshot of all scan keys, ascending. Used to detect entities added by
    /// an import call by diffing before/after.
    pub fn scan_keys(&self) -> BTreeSet<i64> {
        self.scans.iter().map(|s| s.key()).collect()
    }

    /// Relabel a scan entity.
    pub fn set_scan_label(&mut self, key: i64, label: &str) -> Result<(), ProjectError> {
        let scan = self.scan_mut(key).ok_or(ProjectError::UnknownScan(key))?;
        scan.set_label(label);
        Ok(())
    }

    /// Move a scan entity into a group (or out of any group with `None`).
    /// The group must exist in this chunk.
    pub fn assign_scan_group(
        &mut self,
        key: i64,
        group_key: Option<i64>,
    ) -> Result<(), ProjectError> {
        if let Some(gk) = group_key {
            if self.group(gk).is_none() {
                return Err(ProjectError::UnknownGroup(gk));
            }
        }
        let scan = self.scan_mut(key).ok_or(ProjectError::UnknownScan(key))?;
        scan.set_group(group_key);
        Ok(())
    }

    /// Toggle a scan entity's enabled flag.
    pub fn set_scan_enabled(&mut self, key: i64, enabled: bool) -> Result<(), ProjectError> {
        let scan = self.scan_mut(key).ok_or(ProjectError::UnknownScan(key))?;
        scan.set_enabled(enabled);
        Ok(())
    }

    /// Remove the mask from an image asset. Succeeds whether or not a mask was
    /// present; the image itself must exist.
    pub fn clear_image_mask(&mut self, key: i64) -> Result<(), ProjectError> {
        let image = self
            .images
            .iter_mut()
            .find(|i| i.key() == key)
            .ok_or(ProjectError::UnknownImage(key))?;
        image.set_mask(None);
        Ok(())
    }

    /// Replace an image asset's mask with a deep copy of `mask`.
    pub fn set_image_mask(&mut self, key: i64, mask: Option<Mask>) -> Result<(), ProjectError> {
        let image = self
            .images
            .iter_mut()
            .find(|i| i.key() == key)
            .ok_or(ProjectError::UnknownImage(key))?;
        image.set_mask(mask);
        Ok(())
    }
}
