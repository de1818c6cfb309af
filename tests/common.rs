#![allow(dead_code)]

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// 1x1 GIF89a.
pub const TINY_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0xFF, 0xFF,
    0xFF, 0x00, 0x00, 0x00, 0x21, 0xF9, 0x04, 0x01, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x01, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
];

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}

pub fn write_jpeg(path: &Path, width: u32, height: u32) -> PathBuf {
    RgbImage::from_pixel(width, height, Rgb([180, 180, 180]))
        .save_with_format(path, ImageFormat::Jpeg)
        .unwrap();
    path.to_path_buf()
}

pub fn write_png(path: &Path, width: u32, height: u32, color: Rgba<u8>) -> PathBuf {
    RgbaImage::from_pixel(width, height, color)
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
    path.to_path_buf()
}

pub fn write_gif(path: &Path) -> PathBuf {
    fs::write(path, TINY_GIF).unwrap();
    path.to_path_buf()
}

/// A half-transparent red square, the usual watermark in these tests.
pub fn write_watermark(dir: &Path) -> PathBuf {
    write_png(&dir.join("watermark.png"), 32, 32, Rgba([255, 0, 0, 160]))
}

/// `stamped_*` files directly inside `dir`.
pub fn stamped_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with("stamped_"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}
