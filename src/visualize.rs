//! Label sanity check
//!
//! Draws the boxes of YOLO label files back onto their images and saves the
//! result as a small titled figure, so a converted dataset can be eyeballed.

use ab_glyph::{FontVec, PxScale};
use glob::glob;
use image::{ImageFormat, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::VisualizeArgs;
use crate::conversion::denormalize_bbox;
use crate::error::{ConvertError, Result};
use crate::io::decode_image;
use crate::types::{YoloBox, YoloLabel};
use crate::utils::create_output_directory;

pub const FIGURE_MARGIN: u32 = 10;
pub const TITLE_SCALE: f32 = 18.0;

// Searched in order when no font is given on the command line
const FONT_DIRS: &[&str] = &[
    "/usr/share/fonts",
    "/usr/local/share/fonts",
    "/System/Library/Fonts",
    "/Library/Fonts",
    "C:/Windows/Fonts",
];

// Picked first when several fonts are installed
const PREFERRED_FONTS: &[&str] = &[
    "DejaVuSans.ttf",
    "LiberationSans-Regular.ttf",
    "Arial.ttf",
    "arial.ttf",
    "NotoSans-Regular.ttf",
    "FreeSans.ttf",
];

/// Box outline color and thickness
#[derive(Debug, Clone, Copy)]
pub struct DrawStyle {
    pub color: Rgb<u8>,
    pub thickness: u32,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            color: Rgb([0, 255, 0]),
            thickness: 2,
        }
    }
}

/// Result of rendering one preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizedImage {
    pub output_path: PathBuf,
    pub boxes_drawn: usize,
    pub had_labels: bool,
}

/// The first `count` image files of a directory, in file name order
pub fn select_images(image_dir: &Path, count: usize) -> Result<Vec<PathBuf>> {
    fs::metadata(image_dir).map_err(ConvertError::io(image_dir))?;

    let pattern = format!(
        "{}/*",
        glob::Pattern::escape(&image_dir.to_string_lossy())
    );

    let mut images: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter(|path| is_readable_image(path))
        .collect();

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    images.truncate(count);
    Ok(images)
}

/// Whether the file extension names a format the `image` crate can decode
pub fn is_readable_image(path: &Path) -> bool {
    path.extension()
        .and_then(ImageFormat::from_extension)
        .is_some_and(|format| format.reading_enabled())
}

/// Parse one `class x_center y_center width height` line
pub fn parse_label_line(line: &str) -> std::result::Result<YoloLabel, String> {
    let fields = line
        .split_whitespace()
        .map(|field| {
            field
                .parse::<f64>()
                .map_err(|e| format!("{:?} is not a number: {}", field, e))
        })
        .collect::<std::result::Result<Vec<f64>, String>>()?;

    match fields.as_slice() {
        &[class_id, x_center, y_center, width, height] => Ok(YoloLabel {
            class_id,
            bbox: YoloBox {
                x_center,
                y_center,
                width,
                height,
            },
        }),
        _ => Err(format!("expected 5 fields, found {}", fields.len())),
    }
}

/// Read every label of a label file; blank lines are ignored
pub fn read_label_file(path: &Path) -> Result<Vec<YoloLabel>> {
    let content = fs::read_to_string(path).map_err(ConvertError::io(path))?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_label_line(line).map_err(|reason| ConvertError::Label {
                path: path.to_path_buf(),
                line: index + 1,
                reason,
            })
        })
        .collect()
}

/// Corner pixels `(x1, y1, x2, y2)` of a label, truncated toward zero
pub fn pixel_rect(yolo: &YoloBox, image_width: u32, image_height: u32) -> (i32, i32, i32, i32) {
    let bbox = denormalize_bbox(image_width, image_height, yolo);
    (
        bbox.xmin as i32,
        bbox.ymin as i32,
        bbox.xmax as i32,
        bbox.ymax as i32,
    )
}

/// Draw a rectangle outline through both corners, thickened outwards
pub fn draw_box(image: &mut RgbImage, corners: (i32, i32, i32, i32), style: &DrawStyle) {
    // Anything past the stroke width outside the image is never visible
    let pad = style.thickness as i32 + 1;
    let (width, height) = image.dimensions();
    let clamp_x = |x: i32| x.clamp(-pad, width as i32 + pad);
    let clamp_y = |y: i32| y.clamp(-pad, height as i32 + pad);

    let (x1, y1, x2, y2) = (clamp_x(corners.0), clamp_y(corners.1), clamp_x(corners.2), clamp_y(corners.3));
    let (left, right) = (x1.min(x2), x1.max(x2));
    let (top, bottom) = (y1.min(y2), y1.max(y2));
    let base_rectangle = Rect::at(left, top).of_size(
        (right - left) as u32 + 1,
        (bottom - top) as u32 + 1,
    );

    for i in 0..style.thickness {
        let offset_rect = Rect::at(base_rectangle.left() - i as i32, base_rectangle.top() - i as i32)
            .of_size(base_rectangle.width() + 2 * i, base_rectangle.height() + 2 * i);
        draw_hollow_rect_mut(image, offset_rect, style.color);
    }
}

/// Draw every label onto the image
pub fn draw_labels(image: &mut RgbImage, labels: &[YoloLabel], style: &DrawStyle) {
    let (width, height) = image.dimensions();
    for label in labels {
        draw_box(image, pixel_rect(&label.bbox, width, height), style);
    }
}

/// Place the image on a white canvas with a margin, with the title above it when a font is given
pub fn render_figure(image: &RgbImage, title: &str, font: Option<&FontVec>) -> RgbImage {
    let (width, height) = image.dimensions();
    let title_size = font.map(|font| text_size(PxScale::from(TITLE_SCALE), font, title));
    let title_band = title_size.map_or(0, |(_, h)| h + FIGURE_MARGIN);

    let canvas_width = width + 2 * FIGURE_MARGIN;
    let canvas_height = height + 2 * FIGURE_MARGIN + title_band;
    let mut figure = RgbImage::from_pixel(canvas_width, canvas_height, Rgb([255, 255, 255]));

    if let (Some(font), Some((title_width, _))) = (font, title_size) {
        let x = canvas_width.saturating_sub(title_width) / 2;
        draw_text_mut(
            &mut figure,
            Rgb([0, 0, 0]),
            x as i32,
            FIGURE_MARGIN as i32,
            PxScale::from(TITLE_SCALE),
            font,
            title,
        );
    }

    image::imageops::overlay(
        &mut figure,
        image,
        FIGURE_MARGIN as i64,
        (FIGURE_MARGIN + title_band) as i64,
    );
    figure
}

pub fn load_font(path: &Path) -> Result<FontVec> {
    let data = fs::read(path).map_err(ConvertError::io(path))?;
    FontVec::try_from_vec(data).map_err(|_| ConvertError::Font {
        path: path.to_path_buf(),
    })
}

fn font_search_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = FONT_DIRS.iter().map(PathBuf::from).collect();
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join(".fonts"));
    }
    dirs
}

/// Locate an installed TrueType/OpenType font for figure titles
pub fn find_system_font() -> Option<PathBuf> {
    let mut candidates: Vec<PathBuf> = font_search_dirs()
        .iter()
        .filter(|dir| dir.is_dir())
        .flat_map(|dir| {
            let root = glob::Pattern::escape(&dir.to_string_lossy());
            ["ttf", "otf"]
                .into_iter()
                .filter_map(move |ext| glob(&format!("{}/**/*.{}", root, ext)).ok())
                .flatten()
                .filter_map(|entry| entry.ok())
        })
        .collect();

    let rank = |path: &PathBuf| {
        path.file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| PREFERRED_FONTS.iter().position(|preferred| *preferred == name))
            .unwrap_or(PREFERRED_FONTS.len())
    };
    candidates.sort_by(|a, b| rank(a).cmp(&rank(b)).then_with(|| a.cmp(b)));
    candidates.into_iter().next()
}

/// The font given on the command line, else an installed one, else none
pub fn resolve_font(font: Option<&Path>) -> Result<Option<FontVec>> {
    if let Some(path) = font {
        return load_font(path).map(Some);
    }

    match find_system_font() {
        Some(path) => match load_font(&path) {
            Ok(font) => {
                debug!("Using font {:?} for titles", path);
                Ok(Some(font))
            }
            Err(e) => {
                warn!("{}", e);
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

/// Render the preview of one image and save it under its own file name
pub fn visualize_image(
    image_path: &Path,
    label_dir: &Path,
    output_dir: &Path,
    font: Option<&FontVec>,
    style: &DrawStyle,
) -> Result<VisualizedImage> {
    let file_name = image_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = image_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut image = decode_image(image_path)?.to_rgb8();

    let label_path = label_dir.join(format!("{}.txt", stem));
    let had_labels = label_path.exists();
    let boxes_drawn = if had_labels {
        let labels = read_label_file(&label_path)?;
        draw_labels(&mut image, &labels, style);
        labels.len()
    } else {
        debug!("No label file for {}", file_name);
        0
    };

    let figure = render_figure(&image, &file_name, font);
    let output_path = output_dir.join(&file_name);
    figure
        .save(&output_path)
        .map_err(|source| ConvertError::Image {
            path: output_path.clone(),
            source,
        })?;

    Ok(VisualizedImage {
        output_path,
        boxes_drawn,
        had_labels,
    })
}

/// Render previews for the first images of a converted split
pub fn visualize_labels(args: &VisualizeArgs) -> Result<Vec<VisualizedImage>> {
    let output_dir = create_output_directory(&args.output_dir)?;
    let font = resolve_font(args.font.as_deref())?;
    if font.is_none() {
        warn!("No usable font found; figures are saved without titles. Pass --font to set one.");
    }

    let style = DrawStyle::default();
    let images = select_images(&args.image_dir, args.count)?;

    let mut results = Vec::with_capacity(images.len());
    for image_path in &images {
        let result = visualize_image(
            image_path,
            &args.label_dir,
            &output_dir,
            font.as_ref(),
            &style,
        )?;
        debug!(
            "{:?}: {} boxes -> {:?}",
            image_path, result.boxes_drawn, result.output_path
        );
        results.push(result);
    }

    info!(
        "Saved label visualization images to: {}",
        output_dir.display()
    );
    Ok(results)
}
