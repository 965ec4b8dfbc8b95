//! SSDD to YOLO format converter
//!
//! This library converts the Pascal VOC annotations of the SSDD ship detection
//! dataset to YOLO label files, and draws converted labels back onto images
//! for a visual check.

pub mod config;
pub mod conversion;
pub mod error;
pub mod io;
pub mod types;
pub mod utils;
pub mod visualize;
pub mod yolo_dataset;

// Re-export commonly used types and functions
pub use config::{ConvertArgs, VisualizeArgs};
pub use conversion::{convert_to_yolo_format, denormalize_bbox, normalize_bbox, Precision};
pub use error::{ConvertError, Result};
pub use types::{BoundingBox, ClassList, ProcessingStats, SplitSpec, VocAnnotation, YoloBox};
pub use visualize::visualize_labels;
pub use yolo_dataset::{process_dataset, process_split, DatasetPaths};
