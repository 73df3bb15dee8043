#![allow(dead_code)]

use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

/// Writes a real image; the format follows the file extension.
pub fn write_test_image(path: &Path, width: u32, height: u32) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    })
    .save(path)
    .unwrap();
    path.to_path_buf()
}

pub fn write_corrupt_image(path: &Path) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"not really an image").unwrap();
    path.to_path_buf()
}

/// `gallery/` with two photos and a stray text file, `gallery/nested/` that
/// must be ignored, and one loose photo in the root.
pub fn create_site_layout(root: &Path) {
    write_test_image(&root.join("gallery/wide.jpg"), 1600, 1200);
    write_test_image(&root.join("gallery/small.png"), 400, 300);
    fs::write(root.join("gallery/notes.txt"), b"captions").unwrap();
    write_test_image(&root.join("gallery/nested/hidden.jpg"), 50, 50);
    write_test_image(&root.join("me.jpeg"), 900, 900);
}
