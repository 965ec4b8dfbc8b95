use serde::Deserialize;
use std::path::PathBuf;

/// The SSDD layout pairs each manifest split with its image folder and a YOLO split name
pub const DEFAULT_SPLITS: &[(&str, &str, &str)] = &[
    ("train", "JPEGImages_train", "train"),
    ("test", "JPEGImages_test", "val"),
];

// One source split and where its output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSpec {
    /// Manifest name under ImageSets/Main
    pub split_name: String,
    /// Folder under the dataset root holding this split's images
    pub image_subfolder: String,
    /// Split name in the YOLO output tree
    pub output_split_name: String,
}

impl SplitSpec {
    pub fn new(split_name: &str, image_subfolder: &str, output_split_name: &str) -> Self {
        Self {
            split_name: split_name.to_string(),
            image_subfolder: image_subfolder.to_string(),
            output_split_name: output_split_name.to_string(),
        }
    }

    pub fn defaults() -> Vec<SplitSpec> {
        DEFAULT_SPLITS
            .iter()
            .map(|&(split, folder, out)| SplitSpec::new(split, folder, out))
            .collect()
    }
}

/// Ordered list of recognized class names; the position of a name is its class id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassList {
    names: Vec<String>,
}

impl ClassList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Class id for an object name, compared after lower-casing the name
    pub fn class_id(&self, name: &str) -> Option<usize> {
        let name = name.to_lowercase();
        self.names.iter().position(|known| *known == name)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ClassList {
    fn default() -> Self {
        Self::new(["ship"])
    }
}

// Absolute pixel box as stored in a VOC annotation
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VocObject {
    pub name: String,
    pub bndbox: BoundingBox,
}

/// The parts of a Pascal VOC annotation file the converter reads
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct VocAnnotation {
    #[serde(rename = "object", default)]
    pub objects: Vec<VocObject>,
}

/// A box in YOLO form: center and size as fractions of the image size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoloBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// One line of a YOLO label file
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct YoloLabel {
    pub class_id: f64,
    pub bbox: YoloBox,
}

// Struct to hold the paths to the output directories of one split
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
}

// Struct to hold processing statistics
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProcessingStats {
    pub total_ids: usize,
    pub converted: usize,
    pub skipped_missing_image: usize,
    pub objects_written: usize,
    pub objects_dropped: usize,
}

impl ProcessingStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn merge(&mut self, other: &ProcessingStats) {
        self.total_ids += other.total_ids;
        self.converted += other.converted;
        self.skipped_missing_image += other.skipped_missing_image;
        self.objects_written += other.objects_written;
        self.objects_dropped += other.objects_dropped;
    }

    pub fn print_summary(&self, label: &str) {
        log::info!("=== {} Summary ===", label);
        log::info!("Image IDs listed: {}", self.total_ids);
        log::info!("Images converted: {}", self.converted);
        log::info!("Objects written: {}", self.objects_written);
        log::info!("Objects with unknown class: {}", self.objects_dropped);

        if self.skipped_missing_image > 0 {
            log::warn!(
                "Skipped {} image IDs with no image file",
                self.skipped_missing_image
            );
        }
    }
}
