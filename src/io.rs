use image::{DynamicImage, ImageReader};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};
use crate::types::{ClassList, OutputDirs, SplitSpec, VocAnnotation};
use crate::utils::create_output_directory;

/// Path of the manifest listing the image IDs of a split
pub fn manifest_path(base_dir: &Path, split_name: &str) -> PathBuf {
    base_dir
        .join("ImageSets")
        .join("Main")
        .join(format!("{}.txt", split_name))
}

/// Read the whitespace separated image IDs of a manifest
pub fn read_manifest(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|source| ConvertError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content.split_whitespace().map(str::to_string).collect())
}

/// Parse a Pascal VOC annotation file
pub fn parse_voc_annotation(path: &Path) -> Result<VocAnnotation> {
    let content = fs::read_to_string(path).map_err(ConvertError::io(path))?;
    parse_voc_str(&content).map_err(|source| ConvertError::Annotation {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_voc_str(content: &str) -> std::result::Result<VocAnnotation, quick_xml::DeError> {
    quick_xml::de::from_str(content)
}

/// Open an image with its format detected from the file contents, not the extension
pub fn open_image_reader(path: &Path) -> Result<ImageReader<BufReader<File>>> {
    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(ConvertError::io(path))
}

/// Pixel width and height of an image, read from its header
pub fn read_image_dimensions(path: &Path) -> Result<(u32, u32)> {
    open_image_reader(path)?
        .into_dimensions()
        .map_err(|source| ConvertError::Image {
            path: path.to_path_buf(),
            source,
        })
}

pub fn decode_image(path: &Path) -> Result<DynamicImage> {
    open_image_reader(path)?
        .decode()
        .map_err(|source| ConvertError::Image {
            path: path.to_path_buf(),
            source,
        })
}

/// Set up `images/<split>` and `labels/<split>` under the output root
pub fn setup_output_directories(output_dir: &Path, split_name: &str) -> Result<OutputDirs> {
    let images_dir = create_output_directory(&output_dir.join("images").join(split_name))?;
    let labels_dir = create_output_directory(&output_dir.join("labels").join(split_name))?;

    Ok(OutputDirs {
        images_dir,
        labels_dir,
    })
}

/// Write a label file, creating it even when `content` is empty
pub fn write_label_file(path: &Path, content: &str) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path).map_err(ConvertError::io(path))?);
    writer
        .write_all(content.as_bytes())
        .and_then(|_| writer.flush())
        .map_err(ConvertError::io(path))
}

/// Create the dataset.yaml file for YOLO training
pub fn create_dataset_yaml(
    output_dir: &Path,
    splits: &[SplitSpec],
    class_list: &ClassList,
) -> Result<PathBuf> {
    let dataset_yaml_path = output_dir.join("dataset.yaml");
    let absolute_path = fs::canonicalize(output_dir).map_err(ConvertError::io(output_dir))?;

    let mut yaml_content = format!("path: {}\n", absolute_path.to_string_lossy());
    for split in ["train", "val", "test"] {
        if splits.iter().any(|s| s.output_split_name == split) {
            yaml_content.push_str(&format!("{}: images/{}\n", split, split));
        } else {
            yaml_content.push_str(&format!("{}:\n", split));
        }
    }
    yaml_content.push_str("\nnames:\n");
    for (id, label) in class_list.names().iter().enumerate() {
        yaml_content.push_str(&format!("    {}: {}\n", id, label));
    }

    write_label_file(&dataset_yaml_path, &yaml_content)?;
    Ok(dataset_yaml_path)
}
