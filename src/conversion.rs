use crate::types::{BoundingBox, ClassList, VocAnnotation, YoloBox};

/// How label coordinates are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Precision {
    /// Shortest decimal that reads back as the same f64 (`0.3`, `1.0`)
    #[default]
    Shortest,
    /// Fixed number of decimals (`0.300000`)
    Fixed(usize),
}

/// YOLO label text for one image, plus how many objects went in and how many were dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertedLabels {
    pub text: String,
    pub written: usize,
    pub dropped: usize,
}

/// Normalize an absolute corner box to YOLO center/size fractions of the image
pub fn normalize_bbox(image_width: u32, image_height: u32, bbox: &BoundingBox) -> YoloBox {
    let w = image_width as f64;
    let h = image_height as f64;

    YoloBox {
        x_center: (bbox.xmin + bbox.xmax) / 2.0 / w,
        y_center: (bbox.ymin + bbox.ymax) / 2.0 / h,
        width: (bbox.xmax - bbox.xmin) / w,
        height: (bbox.ymax - bbox.ymin) / h,
    }
}

/// Inverse of [`normalize_bbox`]: absolute corner coordinates, not rounded
pub fn denormalize_bbox(image_width: u32, image_height: u32, yolo: &YoloBox) -> BoundingBox {
    let w = image_width as f64;
    let h = image_height as f64;

    BoundingBox {
        xmin: (yolo.x_center - yolo.width / 2.0) * w,
        ymin: (yolo.y_center - yolo.height / 2.0) * h,
        xmax: (yolo.x_center + yolo.width / 2.0) * w,
        ymax: (yolo.y_center + yolo.height / 2.0) * h,
    }
}

pub fn format_coordinate(value: f64, precision: Precision) -> String {
    match precision {
        // Debug keeps the trailing ".0" that Display drops
        Precision::Shortest => format!("{:?}", value),
        Precision::Fixed(digits) => format!("{:.*}", digits, value),
    }
}

/// Format one label line without the trailing newline
pub fn format_label_line(class_id: usize, yolo: &YoloBox, precision: Precision) -> String {
    format!(
        "{} {} {} {} {}",
        class_id,
        format_coordinate(yolo.x_center, precision),
        format_coordinate(yolo.y_center, precision),
        format_coordinate(yolo.width, precision),
        format_coordinate(yolo.height, precision)
    )
}

/// Convert an annotation to YOLO label text, keeping objects of known classes in encounter order
pub fn convert_to_yolo_format(
    annotation: &VocAnnotation,
    image_width: u32,
    image_height: u32,
    class_list: &ClassList,
    precision: Precision,
) -> ConvertedLabels {
    let mut converted = ConvertedLabels {
        text: String::with_capacity(annotation.objects.len() * 48),
        ..Default::default()
    };

    for object in &annotation.objects {
        let class_id = match class_list.class_id(&object.name) {
            Some(class_id) => class_id,
            None => {
                converted.dropped += 1;
                continue;
            }
        };

        let yolo = normalize_bbox(image_width, image_height, &object.bndbox);
        converted
            .text
            .push_str(&format_label_line(class_id, &yolo, precision));
        converted.text.push('\n');
        converted.written += 1;
    }

    converted
}
