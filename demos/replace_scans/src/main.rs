use std::path::{Path, PathBuf};

use argh::FromArgs;
use glam::{DMat4, DQuat, DVec3};

use scanalign::pipeline::{FileStatus, ImportPipeline};
use scanalign::project::chunk::ProjectChunk;
use scanalign::project::error::ProjectError;
use scanalign::project::image::{ImageAsset, Mask};
use scanalign::project::import::{ScanFormat, ScanImporter};
use scanalign::project::scan::{ScanEntity, ScanGroup};

#[derive(FromArgs, Debug)]
/// Re-import .e57 scans from a directory, aligning each to the reference
/// station of the same name in a synthetic demo project and transferring
/// camera masks.
struct Args {
    /// path to the directory containing the .e57 files
    #[argh(option, short = 'i')]
    scans_dir: PathBuf,

    /// number of cameras attached to each simulated import
    #[argh(option, short = 'c', default = "3")]
    cameras: usize,
}

/// Stand-in for the host application's import primitive: every import adds
/// one laser-scan entity with a perturbed pose plus a few linked cameras.
struct DemoImporter {
    cameras: usize,
}

impl ScanImporter for DemoImporter {
    fn resolve_format(&self) -> Result<ScanFormat, ProjectError> {
        Ok(ScanFormat::E57)
    }

    fn import_scan(
        &mut self,
        chunk: &mut ProjectChunk,
        path: &Path,
        _format: ScanFormat,
        laser_scan: bool,
        _replace_existing: bool,
    ) -> Result<(), ProjectError> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        let key = chunk.allocate_key();
        // vendor tools rarely deliver the pose the project expects
        let perturbed = DMat4::from_rotation_translation(
            DQuat::from_rotation_z(0.35),
            DVec3::new(12.0, -4.0, 0.8),
        );
        chunk.add_scan(
            ScanEntity::new(key, &stem, laser_scan).with_transform(perturbed),
        )?;
        for i in 0..self.cameras {
            let image_key = chunk.allocate_key();
            chunk.add_image(
                ImageAsset::new(image_key, format!("cam_{i:03}")).with_scan_key(key),
            )?;
        }
        Ok(())
    }
}

fn demo_chunk(cameras: usize) -> ProjectChunk {
    let mut chunk = ProjectChunk::new("survey_demo");
    chunk
        .add_group(ScanGroup::new(1, "tls_block"))
        .expect("fresh chunk");

    let stations = [
        ("Station_01", DVec3::new(0.0, 0.0, 1.6)),
        ("Station_02", DVec3::new(25.0, 10.0, 1.6)),
    ];
    for (i, (label, position)) in stations.iter().enumerate() {
        let key = (10 + i * 100) as i64;
        chunk
            .add_scan(
                ScanEntity::new(key, *label, true)
                    .with_transform(DMat4::from_rotation_translation(
                        DQuat::from_rotation_z(0.1 * i as f64),
                        *position,
                    ))
                    .with_group(1),
            )
            .expect("unique station key");
        for c in 0..cameras {
            let image_key = key + 1 + c as i64;
            let mut image = ImageAsset::new(image_key, format!("cam_{c:03}")).with_scan_key(key);
            // mask every other camera so the transfer shows both outcomes
            if c % 2 == 0 {
                image = image.with_mask(Mask::new(vec![c as u8; 16]));
            }
            chunk.add_image(image).expect("unique camera key");
        }
    }
    chunk
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = argh::from_env();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!(
        "Warning: the input point clouds must come from the same software as the\n\
         point clouds already in the project; otherwise differing axis conventions\n\
         (e.g. yaw) can cause incorrect orientations.\n"
    );

    let mut chunk = demo_chunk(args.cameras);
    let mut pipeline = ImportPipeline::new(DemoImporter {
        cameras: args.cameras,
    });
    let run = pipeline.run(&mut chunk, &args.scans_dir)?;

    println!();
    for file in &run.files {
        match &file.status {
            FileStatus::Done => {
                for entity in &file.entities {
                    let transfer = entity
                        .transfer
                        .map(|t| format!("masks copied {}/{}", t.copied, t.target_count))
                        .unwrap_or_else(|| "no transfer".to_string());
                    println!(
                        "{}: -> '{}' (key {}), aligned={}, {}",
                        file.file, entity.label, entity.key, entity.aligned, transfer
                    );
                }
            }
            FileStatus::Skipped(reason) => println!("{}: skipped ({reason:?})", file.file),
        }
    }
    Ok(())
}
