use image::{ImageFormat, Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

use ssdd2yolo::visualize::{
    draw_box, find_system_font, load_font, render_figure, resolve_font, select_images,
    visualize_image, DrawStyle, FIGURE_MARGIN,
};
use ssdd2yolo::{visualize_labels, ConvertError, VisualizeArgs};

const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    RgbImage::new(width, height).save(&path).unwrap();
    path
}

fn args_for(root: &Path, count: usize) -> VisualizeArgs {
    VisualizeArgs {
        image_dir: root.join("images"),
        label_dir: root.join("labels"),
        output_dir: root.join("check"),
        count,
        font: None,
    }
}

#[test]
fn test_select_images_sorted_and_limited() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();
    for name in ["c.jpg", "a.jpg", "d.jpg"] {
        RgbImage::new(4, 4).save(dir.join(name)).unwrap();
    }
    write_png(dir, "b.png", 4, 4);
    fs::write(dir.join("notes.txt"), "not an image").unwrap();

    let images = select_images(dir, 3).unwrap();
    let names: Vec<_> = images
        .iter()
        .map(|path| path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, vec!["a.jpg", "b.png", "c.jpg"]);
}

#[test]
fn test_select_images_skips_formats_that_cannot_be_decoded() {
    let temp_dir = tempfile::tempdir().unwrap();
    let dir = temp_dir.path();
    for name in ["a.dng", "b.mpo", "c.pfm"] {
        fs::write(dir.join(name), b"raw sensor data").unwrap();
    }
    write_png(dir, "d.png", 4, 4);

    let images = select_images(dir, 5).unwrap();

    assert_eq!(images, vec![dir.join("d.png")]);
}

#[test]
fn test_select_images_missing_dir_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();

    let err = select_images(&temp_dir.path().join("absent"), 5).unwrap_err();
    assert!(matches!(err, ConvertError::Io { .. }));
}

#[test]
fn test_draw_box_outline() {
    let mut image = RgbImage::new(20, 20);
    let style = DrawStyle {
        color: GREEN,
        thickness: 1,
    };

    draw_box(&mut image, (2, 2, 10, 10), &style);

    assert_eq!(*image.get_pixel(2, 2), GREEN);
    assert_eq!(*image.get_pixel(10, 10), GREEN);
    assert_eq!(*image.get_pixel(10, 5), GREEN);
    assert_eq!(*image.get_pixel(5, 5), BLACK);
    assert_eq!(*image.get_pixel(11, 11), BLACK);
}

#[test]
fn test_draw_box_thickness_grows_outwards() {
    let mut image = RgbImage::new(20, 20);

    draw_box(&mut image, (2, 2, 10, 10), &DrawStyle::default());

    assert_eq!(*image.get_pixel(1, 1), GREEN);
    assert_eq!(*image.get_pixel(11, 11), GREEN);
    assert_eq!(*image.get_pixel(3, 3), BLACK);
}

#[test]
fn test_draw_box_outside_image_does_not_panic() {
    let mut image = RgbImage::new(10, 10);

    draw_box(&mut image, (-5000, -5000, i32::MAX, 5), &DrawStyle::default());
    draw_box(&mut image, (8, 8, 3, 3), &DrawStyle::default());

    assert_eq!(*image.get_pixel(3, 3), GREEN);
}

#[test]
fn test_visualize_image_draws_boxes() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    let image_path = write_png(&root.join("images"), "000001.png", 100, 100);
    fs::create_dir_all(root.join("labels")).unwrap();
    fs::create_dir_all(root.join("check")).unwrap();
    fs::write(root.join("labels/000001.txt"), "0 0.5 0.5 0.5 0.5\n").unwrap();

    let result = visualize_image(
        &image_path,
        &root.join("labels"),
        &root.join("check"),
        None,
        &DrawStyle::default(),
    )
    .unwrap();

    assert!(result.had_labels);
    assert_eq!(result.boxes_drawn, 1);
    assert_eq!(result.output_path, root.join("check/000001.png"));

    // Untitled figures place the image behind a 10px white margin
    let figure = image::open(&result.output_path).unwrap().to_rgb8();
    assert_eq!(figure.dimensions(), (120, 120));
    assert_eq!(*figure.get_pixel(0, 0), WHITE);
    assert_eq!(*figure.get_pixel(35, 35), GREEN);
    assert_eq!(*figure.get_pixel(85, 85), GREEN);
    assert_eq!(*figure.get_pixel(60, 60), BLACK);
}

#[test]
fn test_visualize_labels_renders_selected_images() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    write_png(&root.join("images"), "000001.png", 100, 100);
    fs::create_dir_all(root.join("labels")).unwrap();
    fs::write(root.join("labels/000001.txt"), "0 0.5 0.5 0.5 0.5\n").unwrap();

    let results = visualize_labels(&args_for(root, 5)).unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].boxes_drawn, 1);
    assert!(root.join("check/000001.png").exists());
}

#[test]
fn test_visualize_decodes_by_content_not_extension() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    fs::create_dir_all(root.join("images")).unwrap();
    fs::create_dir_all(root.join("check")).unwrap();
    let image_path = root.join("images/disguised.jpg");
    RgbImage::new(7, 5)
        .save_with_format(&image_path, ImageFormat::Png)
        .unwrap();

    let result = visualize_image(
        &image_path,
        &root.join("labels"),
        &root.join("check"),
        None,
        &DrawStyle::default(),
    )
    .unwrap();

    let figure = image::open(&result.output_path).unwrap().to_rgb8();
    assert_eq!(figure.dimensions(), (7 + 2 * FIGURE_MARGIN, 5 + 2 * FIGURE_MARGIN));
}

#[test]
fn test_figure_title_is_drawn_with_font() {
    let Some(font_path) = find_system_font() else {
        eprintln!("no system font installed; title rendering not checked");
        return;
    };
    let font = load_font(&font_path).unwrap();
    let image = RgbImage::from_pixel(200, 40, WHITE);

    let figure = render_figure(&image, "000001.jpg", Some(&font));

    let title_band = figure.height() - image.height() - 2 * FIGURE_MARGIN;
    assert!(title_band > 0);
    let image_top = FIGURE_MARGIN + title_band;
    let dark_title_pixels = figure
        .enumerate_pixels()
        .filter(|(_, y, pixel)| *y < image_top && pixel.0[0] < 128)
        .count();
    assert!(dark_title_pixels > 0);
}

#[test]
fn test_explicit_font_overrides_discovery() {
    let temp_dir = tempfile::tempdir().unwrap();
    let not_a_font = temp_dir.path().join("broken.ttf");
    fs::write(&not_a_font, b"definitely not a font").unwrap();

    let err = resolve_font(Some(not_a_font.as_path())).unwrap_err();
    assert!(matches!(err, ConvertError::Font { .. }));

    let err = resolve_font(Some(temp_dir.path().join("missing.ttf").as_path())).unwrap_err();
    assert!(matches!(err, ConvertError::Io { .. }));
}

#[test]
fn test_visualize_without_label_file_saves_raw_image() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    let image_path = write_png(&root.join("images"), "lonely.png", 30, 20);
    fs::create_dir_all(root.join("check")).unwrap();

    let result = visualize_image(
        &image_path,
        &root.join("labels"),
        &root.join("check"),
        None,
        &DrawStyle::default(),
    )
    .unwrap();

    assert!(!result.had_labels);
    assert_eq!(result.boxes_drawn, 0);

    let figure = image::open(&result.output_path).unwrap().to_rgb8();
    assert_eq!(figure.dimensions(), (50, 40));
    assert!(figure
        .enumerate_pixels()
        .all(|(_, _, pixel)| *pixel == WHITE || *pixel == BLACK));
}

#[test]
fn test_visualize_only_takes_count_images() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    for i in 0..7 {
        write_png(&root.join("images"), &format!("{:06}.png", i), 8, 8);
    }

    let results = visualize_labels(&args_for(root, 5)).unwrap();

    assert_eq!(results.len(), 5);
    assert!(root.join("check/000004.png").exists());
    assert!(!root.join("check/000005.png").exists());
}

#[test]
fn test_malformed_label_line_is_fatal() {
    let temp_dir = tempfile::tempdir().unwrap();
    let root = temp_dir.path();
    write_png(&root.join("images"), "bad.png", 10, 10);
    fs::create_dir_all(root.join("labels")).unwrap();
    fs::write(root.join("labels/bad.txt"), "0 0.5 0.5 0.5 0.5\n0 0.5 0.5\n").unwrap();

    let err = visualize_labels(&args_for(root, 5)).unwrap_err();

    match err {
        ConvertError::Label { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {}", other),
    }
}
