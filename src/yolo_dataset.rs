use log::{debug, info};
use std::fs::copy;
use std::path::{Path, PathBuf};

use crate::config::ConvertArgs;
use crate::conversion::{convert_to_yolo_format, Precision};
use crate::error::{ConvertError, Result};
use crate::io::{
    create_dataset_yaml, manifest_path, parse_voc_annotation, read_image_dimensions,
    read_manifest, setup_output_directories, write_label_file,
};
use crate::types::{ClassList, OutputDirs, ProcessingStats, SplitSpec};
use crate::utils::{create_progress_bar, display_label};

/// Source and destination roots of a conversion run
#[derive(Debug, Clone)]
pub struct DatasetPaths {
    pub base_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl DatasetPaths {
    pub fn new(base_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn annotations_dir(&self) -> PathBuf {
        self.base_dir.join("Annotations")
    }
}

/// What happened to a single image ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOutcome {
    Converted { written: usize, dropped: usize },
    MissingImage,
}

/// Convert one image ID: copy the image, then write its label file.
///
/// A missing image is skipped. Once the image exists, its annotation must parse.
pub fn process_image(
    image_id: &str,
    image_dir: &Path,
    annotations_dir: &Path,
    output_dirs: &OutputDirs,
    class_list: &ClassList,
    precision: Precision,
) -> Result<ImageOutcome> {
    let image_path = image_dir.join(format!("{}.jpg", image_id));
    let annotation_path = annotations_dir.join(format!("{}.xml", image_id));

    if !image_path.exists() {
        debug!("No image for {}: {:?}", image_id, image_path);
        return Ok(ImageOutcome::MissingImage);
    }

    let image_output_path = output_dirs.images_dir.join(format!("{}.jpg", image_id));
    copy(&image_path, &image_output_path).map_err(ConvertError::io(&image_path))?;

    let annotation = parse_voc_annotation(&annotation_path)?;
    let (width, height) = read_image_dimensions(&image_path)?;

    let converted = convert_to_yolo_format(&annotation, width, height, class_list, precision);

    let label_output_path = output_dirs.labels_dir.join(format!("{}.txt", image_id));
    write_label_file(&label_output_path, &converted.text)?;

    Ok(ImageOutcome::Converted {
        written: converted.written,
        dropped: converted.dropped,
    })
}

/// Convert every image ID listed in a split's manifest
pub fn process_split(
    paths: &DatasetPaths,
    split: &SplitSpec,
    class_list: &ClassList,
    precision: Precision,
) -> Result<ProcessingStats> {
    let image_dir = paths.base_dir.join(&split.image_subfolder);
    let annotations_dir = paths.annotations_dir();
    let output_dirs = setup_output_directories(&paths.output_dir, &split.output_split_name)?;

    let image_ids = read_manifest(&manifest_path(&paths.base_dir, &split.split_name))?;
    info!(
        "Split {}: {} image IDs -> {}",
        split.split_name,
        image_ids.len(),
        split.output_split_name
    );

    let mut stats = ProcessingStats::new();
    let pb = create_progress_bar(image_ids.len() as u64, &display_label(&split.split_name));

    for image_id in &image_ids {
        stats.total_ids += 1;
        let outcome = process_image(
            image_id,
            &image_dir,
            &annotations_dir,
            &output_dirs,
            class_list,
            precision,
        )
        .inspect_err(|_| pb.abandon())?;

        match outcome {
            ImageOutcome::Converted { written, dropped } => {
                stats.converted += 1;
                stats.objects_written += written;
                stats.objects_dropped += dropped;
            }
            ImageOutcome::MissingImage => stats.skipped_missing_image += 1,
        }
        pb.inc(1);
    }

    pb.finish_with_message(format!("{} processing complete", display_label(&split.split_name)));
    Ok(stats)
}

/// Main dataset processing pipeline: every split in order, then dataset.yaml
pub fn process_dataset(
    paths: &DatasetPaths,
    splits: &[SplitSpec],
    class_list: &ClassList,
    precision: Precision,
) -> Result<ProcessingStats> {
    let mut total = ProcessingStats::new();

    for split in splits {
        let stats = process_split(paths, split, class_list, precision)?;
        stats.print_summary(&display_label(&split.output_split_name));
        total.merge(&stats);
    }

    info!("Creating dataset.yaml file...");
    let yaml_path = create_dataset_yaml(&paths.output_dir, splits, class_list)?;
    debug!("Wrote {:?}", yaml_path);

    Ok(total)
}

/// Run the converter with command-line settings over the default SSDD splits
pub fn run(args: &ConvertArgs) -> Result<ProcessingStats> {
    let paths = DatasetPaths::new(&args.base_dir, &args.output_dir);
    let stats = process_dataset(
        &paths,
        &SplitSpec::defaults(),
        &args.class_list(),
        args.precision(),
    )?;
    info!("Conversion process completed successfully.");
    Ok(stats)
}
