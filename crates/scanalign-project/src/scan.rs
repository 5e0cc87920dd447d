use glam::DMat4;

/// A 3D point-cloud scan asset within a project chunk.
///
/// The key is assigned by the host when the entity is created and never changes.
/// The label, local transform, group membership, and enabled flag are mutable.
#[derive(Debug, Clone)]
pub struct ScanEntity {
    key: i64,
    label: String,
    transform: Option<DMat4>,
    group: Option<i64>,
    enabled: bool,
    laser_scan: bool,
}

impl ScanEntity {
    /// Create a new scan entity with a host-assigned key.
    pub fn new(key: i64, label: impl Into<String>, laser_scan: bool) -> Self {
        Self {
            key,
            label: label.into(),
            transform: None,
            group: None,
            enabled: true,
            laser_scan,
        }
    }

    /// Attach a local transform (builder style).
    pub fn with_transform(mut self, transform: DMat4) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Attach the entity to a group by key (builder style).
    pub fn with_group(mut self, group_key: i64) -> Self {
        self.group = Some(group_key);
        self
    }

    /// Host-assigned identifier.
    #[inline]
    pub fn key(&self) -> i64 {
        self.key
    }

    /// Display label, used for name-based matching.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Replace the display label.
    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    /// Local transform of the entity, if any.
    pub fn transform(&self) -> Option<&DMat4> {
        self.transform.as_ref()
    }

    /// Replace the local transform.
    pub fn set_transform(&mut self, transform: DMat4) {
        self.transform = Some(transform);
    }

    /// Key of the owning group, if any.
    pub fn group(&self) -> Option<i64> {
        self.group
    }

    /// Move the entity into a group (or out of any group with `None`).
    pub fn set_group(&mut self, group_key: Option<i64>) {
        self.group = group_key;
    }

    /// Whether the entity participates in downstream processing.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Toggle the enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether this entity is a terrestrial laser scan. Fixed at creation.
    #[inline]
    pub fn is_laser_scan(&self) -> bool {
        self.laser_scan
    }
}

/// Optional container imposing an additional coordinate transform on its scans.
#[derive(Debug, Clone)]
pub struct ScanGroup {
    key: i64,
    label: String,
    transform: Option<DMat4>,
}

impl ScanGroup {
    /// Create a new group with a host-assigned key.
    pub fn new(key: i64, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            transform: None,
        }
    }

    /// Attach a group transform (builder style).
    pub fn with_transform(mut self, transform: DMat4) -> Self {
        self.transform = Some(transform);
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

    /// Group transform, if any.
    pub fn transform(&self) -> Option<&DMat4> {
        self.transform.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_entity_accessors() {
        let mut scan = ScanEntity::new(7, "station_01", true)
            .with_transform(DMat4::IDENTITY)
            .with_group(3);

        assert_eq!(scan.key(), 7);
        assert_eq!(scan.label(), "station_01");
        assert!(scan.is_laser_scan());
        assert!(scan.enabled());
        assert_eq!(scan.group(), Some(3));
        assert!(scan.transform().is_some());

        scan.set_label("station_01_new");
        scan.set_group(None);
        scan.set_enabled(false);
        assert_eq!(scan.label(), "station_01_new");
        assert_eq!(scan.group(), None);
        assert!(!scan.enabled());
    }

    #[test]
    fn test_group_without_transform() {
        let group = ScanGroup::new(1, "block_a");
        assert_eq!(group.key(), 1);
        assert_eq!(group.label(), "block_a");
        assert!(group.transform().is_none());
    }
}
