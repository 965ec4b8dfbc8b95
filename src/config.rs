use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use crate::conversion::Precision;
use crate::types::ClassList;

/// Command-line arguments for converting the SSDD dataset to YOLO format.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct ConvertArgs {
    /// Root of the raw SSDD dataset (holds ImageSets/, Annotations/ and the image folders)
    #[arg(long = "base_dir", default_value = "data/raw/BBox_SSDD")]
    pub base_dir: PathBuf,

    /// Root of the YOLO dataset to write
    #[arg(long = "output_dir", default_value = "data/yolo")]
    pub output_dir: PathBuf,

    /// Write coordinates with a fixed number of decimals instead of the shortest exact form
    #[arg(long = "precision", value_parser = validate_precision)]
    pub precision: Option<usize>,

    /// Ordered list of class names; the position of a name is its class id
    #[arg(value_delimiter = ',', default_value = "ship")]
    pub class_list: Vec<String>,
}

impl ConvertArgs {
    pub fn class_list(&self) -> ClassList {
        ClassList::new(self.class_list.iter().map(|name| name.to_lowercase()))
    }

    pub fn precision(&self) -> Precision {
        match self.precision {
            Some(digits) => Precision::Fixed(digits),
            None => Precision::Shortest,
        }
    }
}

/// Command-line arguments for drawing YOLO labels onto sample images.
#[derive(Parser, Debug, Clone)]
#[command(version, long_about = None)]
pub struct VisualizeArgs {
    /// Directory of converted images
    #[arg(long = "image_dir", default_value = "data/yolo/images/train")]
    pub image_dir: PathBuf,

    /// Directory of YOLO label files matching the images
    #[arg(long = "label_dir", default_value = "data/yolo/labels/train")]
    pub label_dir: PathBuf,

    /// Directory for the rendered previews
    #[arg(long = "output_dir", default_value = "results/label_check")]
    pub output_dir: PathBuf,

    /// Number of images to check, taken in file name order
    #[arg(long = "count", default_value_t = 5, value_parser = validate_count)]
    pub count: usize,

    /// TrueType/OpenType font for figure titles, in place of an installed system font
    #[arg(long = "font")]
    pub font: Option<PathBuf>,
}

// f64 carries at most 17 significant decimal digits
pub fn validate_precision(s: &str) -> Result<usize, String> {
    match usize::from_str(s) {
        Ok(val) if val <= 17 => Ok(val),
        _ => Err("PRECISION must be between 0 and 17".to_string()),
    }
}

pub fn validate_count(s: &str) -> Result<usize, String> {
    match usize::from_str(s) {
        Ok(val) if val > 0 => Ok(val),
        _ => Err("COUNT must be a positive integer".to_string()),
    }
}
