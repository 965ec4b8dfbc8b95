use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConvertError, Result};

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Create an output directory if it is missing; existing contents are kept
pub fn create_output_directory(path: &Path) -> Result<PathBuf> {
    if !path.exists() {
        log::debug!("Creating directory {:?}", path);
    }
    fs::create_dir_all(path).map_err(ConvertError::io(path))?;
    Ok(path.to_path_buf())
}

/// Title-case a split name for progress bars and summaries
pub fn display_label(split_name: &str) -> String {
    let mut chars = split_name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
