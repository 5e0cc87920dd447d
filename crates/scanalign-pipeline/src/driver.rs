use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use glam::DMat4;
use serde::{Deserialize, Serialize};

use scanalign_pose::fmt::{format_mat4, format_opt_mat4};
use scanalign_pose::{apply_delta, compute_delta, scan_effective_transform};
use scanalign_project::chunk::ProjectChunk;
use scanalign_project::import::{ScanFormat, ScanImporter};
use scanalign_project::label::{make_unique_label, norm_name};
use scanalign_project::link::LinkResolver;

use crate::error::PipelineError;
use crate::transfer::{transfer_masks, TransferReport};

/// Options for a pipeline run.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Whether the host importer may replace existing assets. The pipeline
    /// relies on imports adding entities, so this defaults to `false`.
    pub replace_existing: bool,
}

/// Why a discovered file was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No reference scan label matched the file's base name.
    NoMatch,
    /// The matched reference scan has no local transform.
    ReferenceHasNoTransform,
    /// The matched reference scan was removed from the chunk (e.g. by an
    /// import that replaced assets) before it could be snapshotted.
    ReferenceMissing,
    /// The host importer reported an error for this file.
    ImportFailed(String),
    /// The import call produced no new scan entities.
    NoNewEntities,
}

/// Terminal state of a discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileStatus {
    /// Every imported entity was processed (individual entities may still
    /// have been skipped; see the per-entity reports).
    Done,
    /// The file was skipped before any entity was aligned.
    Skipped(SkipReason),
}

/// Outcome for one entity created by an import call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityReport {
    /// Key of the newly imported entity.
    pub key: i64,
    /// Label assigned after de-duplication.
    pub label: String,
    /// Whether pose alignment succeeded. `false` when the imported effective
    /// transform was absent or singular; such entities are left unaligned.
    pub aligned: bool,
    /// Mask transfer counts; present only when alignment succeeded.
    pub transfer: Option<TransferReport>,
}

/// Outcome for one discovered file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
    /// File name (without directory).
    pub file: String,
    /// Key of the matched reference scan, if any.
    pub reference_key: Option<i64>,
    /// Terminal state of the file.
    pub status: FileStatus,
    /// Per-entity outcomes, in ascending key order.
    pub entities: Vec<EntityReport>,
}

/// Outcome of a whole pipeline run, one report per discovered file in sorted
/// file-name order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineRun {
    /// Per-file reports.
    pub files: Vec<FileReport>,
}

/// Enumerate scan files with `extension` (case-insensitive, without the dot)
/// directly inside `dir`, sorted by file name so repeated runs over an
/// unchanged directory process files in the same order.
pub fn discover_scan_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, PipelineError> {
    let read_dir = std::fs::read_dir(dir).map_err(|source| PipelineError::DirectoryUnreadable {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|source| PipelineError::DirectoryUnreadable {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case(extension))
            .unwrap_or(false);
        if matches {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Reference snapshot captured before the import call mutates the chunk.
struct Reference {
    key: i64,
    label: String,
    group: Option<i64>,
    enabled: bool,
    effective: DMat4,
}

/// Import pipeline driver.
///
/// Discovers scan files, matches them by normalized name against existing
/// reference laser scans, imports them through the host primitive, aligns
/// each new entity's pose to its reference, and transfers per-camera masks.
/// The chunk is mutated in place; the driver owns the sequencing, single
/// threaded and synchronous.
#[derive(Debug)]
pub struct ImportPipeline<I> {
    importer: I,
    config: PipelineConfig,
}

impl<I: ScanImporter> ImportPipeline<I> {
    /// Create a driver with default options.
    pub fn new(importer: I) -> Self {
        Self {
            importer,
            config: PipelineConfig::default(),
        }
    }

    /// Create a driver with explicit options.
    pub fn with_config(importer: I, config: PipelineConfig) -> Self {
        Self { importer, config }
    }

    /// Run the pipeline over every matching scan file in `dir`.
    ///
    /// Fatal pre-flight conditions (unresolvable format, unreadable or empty
    /// directory, no reference laser scans) abort with an error before any
    /// file is touched. Per-file and per-entity problems are logged, recorded
    /// in the returned reports, and skipped.
    pub fn run(&mut self, chunk: &mut ProjectChunk, dir: &Path) -> Result<PipelineRun, PipelineError> {
        let format = self.importer.resolve_format()?;

        let files = discover_scan_files(dir, format.extension())?;
        if files.is_empty() {
            return Err(PipelineError::NoInputFiles {
                path: dir.display().to_string(),
                extension: format.extension().to_string(),
            });
        }

        let references = reference_index(chunk);
        if references.is_empty() {
            return Err(PipelineError::NoReferenceScans(chunk.label().to_string()));
        }

        let resolver = LinkResolver::detect(chunk);

        // labels already claimed anywhere in the working set, normalized;
        // updated immediately as new labels are assigned
        let mut known_labels: HashSet<String> = chunk
            .scans()
            .iter()
            .map(|s| norm_name(s.label()))
            .filter(|l| !l.is_empty())
            .collect();

        log::info!("chunk: '{}'", chunk.label());
        log::info!("folder: {}", dir.display());
        log::info!("scan files found: {}", files.len());
        log::info!("reference laser scans: {}", references.len());

        let mut run = PipelineRun {
            files: Vec::with_capacity(files.len()),
        };
        for path in &files {
            run.files.push(self.process_file(
                chunk,
                &resolver,
                &references,
                &mut known_labels,
                path,
                format,
            ));
        }
        Ok(run)
    }

    fn process_file(
        &mut self,
        chunk: &mut ProjectChunk,
        resolver: &LinkResolver,
        references: &HashMap<String, i64>,
        known_labels: &mut HashSet<String>,
        path: &Path,
        format: ScanFormat,
    ) -> FileReport {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let base = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let mut report = FileReport {
            file: file_name.clone(),
            reference_key: None,
            status: FileStatus::Done,
            entities: Vec::new(),
        };

        let Some(&reference_key) = references.get(&norm_name(&base)) else {
            log::debug!("'{file_name}': no matching reference scan");
            report.status = FileStatus::Skipped(SkipReason::NoMatch);
            return report;
        };
        report.reference_key = Some(reference_key);

        // snapshot the reference before the import mutates the chunk
        let reference = {
            let Some(scan) = chunk.scan(reference_key) else {
                log::warn!(
                    "skip '{file_name}': reference scan {reference_key} is no longer in the chunk"
                );
                report.status = FileStatus::Skipped(SkipReason::ReferenceMissing);
                return report;
            };
            let Some(effective) = scan_effective_transform(chunk, scan) else {
                log::warn!("skip '{file_name}': '{}' has no transform", scan.label());
                report.status = FileStatus::Skipped(SkipReason::ReferenceHasNoTransform);
                return report;
            };
            log::info!(
                "match: '{file_name}' <-> '{}' (reference key={reference_key})",
                scan.label()
            );
            log::info!(
                "reference local transform:\n{}",
                format_opt_mat4(scan.transform())
            );
            log::info!("reference effective transform:\n{}", format_mat4(&effective));
            Reference {
                key: reference_key,
                label: scan.label().to_string(),
                group: scan.group(),
                enabled: scan.enabled(),
                effective,
            }
        };

        let before_keys = chunk.scan_keys();
        if let Err(err) = self
            .importer
            .import_scan(chunk, path, format, true, self.config.replace_existing)
        {
            log::warn!("skip '{file_name}': import failed: {err}");
            report.status = FileStatus::Skipped(SkipReason::ImportFailed(err.to_string()));
            return report;
        }

        // ascending key order keeps multi-asset labeling deterministic
        let new_keys: Vec<i64> = chunk
            .scan_keys()
            .difference(&before_keys)
            .copied()
            .collect();
        if new_keys.is_empty() {
            log::warn!("skip '{file_name}': no new scan entities detected after import");
            report.status = FileStatus::Skipped(SkipReason::NoNewEntities);
            return report;
        }

        for (index, &new_key) in new_keys.iter().enumerate() {
            report.entities.push(self.process_entity(
                chunk,
                resolver,
                known_labels,
                &base,
                index,
                new_key,
                &reference,
            ));
        }
        report
    }

    fn process_entity(
        &mut self,
        chunk: &mut ProjectChunk,
        resolver: &LinkResolver,
        known_labels: &mut HashSet<String>,
        base: &str,
        index: usize,
        new_key: i64,
        reference: &Reference,
    ) -> EntityReport {
        let desired = if index == 0 {
            format!("{base}_new")
        } else {
            format!("{base}_new_{:02}", index + 1)
        };
        let label = make_unique_label(&desired, known_labels);
        if let Err(err) = chunk.set_scan_label(new_key, &label) {
            log::warn!("could not relabel imported entity {new_key}: {err}");
        }
        known_labels.insert(norm_name(&label));

        if reference.group.is_some() {
            if let Err(err) = chunk.assign_scan_group(new_key, reference.group) {
                log::warn!("could not assign group to '{label}': {err}");
            }
        }

        let mut entity = EntityReport {
            key: new_key,
            label: label.clone(),
            aligned: false,
            transfer: None,
        };

        let (raw_local, raw_effective) = match chunk.scan(new_key) {
            Some(scan) => (
                scan.transform().copied(),
                scan_effective_transform(chunk, scan),
            ),
            None => {
                log::warn!("imported entity {new_key} disappeared from the chunk");
                return entity;
            }
        };

        log::info!(
            "imported local transform (label='{label}', key={new_key}):\n{}",
            format_opt_mat4(raw_local.as_ref())
        );
        log::info!(
            "imported effective transform:\n{}",
            format_opt_mat4(raw_effective.as_ref())
        );

        let Some(raw_effective) = raw_effective else {
            log::warn!("skip '{label}': imported effective transform could not be computed");
            return entity;
        };

        let delta = match compute_delta(&reference.effective, &raw_effective) {
            Ok(delta) => delta,
            Err(err) => {
                log::warn!("skip '{label}': {err}");
                return entity;
            }
        };
        log::info!("delta = reference_eff * inv(imported_eff):\n{}", format_mat4(&delta));

        // raw_local is present whenever the raw effective transform was
        if let Some(local) = raw_local {
            let aligned_local = apply_delta(&delta, &local);
            if let Some(scan) = chunk.scan_mut(new_key) {
                scan.set_transform(aligned_local);
            }
        }

        if let Some(scan) = chunk.scan(new_key) {
            log::info!(
                "final local transform:\n{}",
                format_opt_mat4(scan.transform())
            );
            log::info!(
                "final effective transform:\n{}",
                format_opt_mat4(scan_effective_transform(chunk, scan).as_ref())
            );
        }

        if let Err(err) = chunk.set_scan_enabled(new_key, reference.enabled) {
            log::warn!("could not copy enabled flag to '{label}': {err}");
        }

        entity.aligned = true;
        entity.transfer = Some(transfer_masks(chunk, resolver, reference.key, new_key));
        log::debug!(
            "aligned '{label}' against '{}' (reference key={})",
            reference.label,
            reference.key
        );
        entity
    }
}

/// Build the normalized-label index over reference laser scans. Duplicate
/// normalized labels warn and keep the first-registered scan; empty labels
/// are ignored.
fn reference_index(chunk: &ProjectChunk) -> HashMap<String, i64> {
    let mut references = HashMap::new();
    for scan in chunk.scans().iter().filter(|s| s.is_laser_scan()) {
        let key = norm_name(scan.label());
        if key.is_empty() {
            continue;
        }
        if references.contains_key(&key) {
            log::warn!(
                "duplicate scan label '{}'; the first one will be used",
                scan.label()
            );
            continue;
        }
        references.insert(key, scan.key());
    }
    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanalign_project::scan::ScanEntity;

    #[test]
    fn test_reference_index_first_wins_and_normalizes() {
        let mut chunk = ProjectChunk::new("chunk");
        chunk
            .add_scan(ScanEntity::new(1, "  Station_01 ", true))
            .unwrap();
        chunk
            .add_scan(ScanEntity::new(2, "station_01", true))
            .unwrap();
        chunk.add_scan(ScanEntity::new(3, "mesh", false)).unwrap();

        let references = reference_index(&chunk);
        assert_eq!(references.len(), 1);
        assert_eq!(references.get("station_01"), Some(&1));
    }

    #[test]
    fn test_discover_scan_files_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.e57", "a.E57", "notes.txt", "c.e57"] {
            std::fs::write(dir.path().join(name), b"x").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.e57")).unwrap();

        let files = discover_scan_files(dir.path(), "e57").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.E57", "b.e57", "c.e57"]);
    }

    #[test]
    fn test_discover_scan_files_missing_dir_is_fatal() {
        let err = discover_scan_files(Path::new("/nonexistent/scans"), "e57").unwrap_err();
        assert!(matches!(err, PipelineError::DirectoryUnreadable { .. }));
    }
}
