use crate::HandwritingError;
use chrono::{DateTime, Local};
use image::codecs::png::PngEncoder;
use image::imageops::{self, FilterType};
use image::{ColorType, ImageEncoder, RgbaImage};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

pub const OUTPUT_DIR: &str = "Output";
pub const OUTPUT_PREFIX: &str = "handwriting_";
/// Longest side of a preview thumbnail
pub const PREVIEW_SIZE: u32 = 800;

/// `handwriting_YYYYMMDD_HHMMSS`, sortable by creation time
pub fn output_stem(at: &DateTime<Local>) -> String {
    format!("{OUTPUT_PREFIX}{}", at.format("%Y%m%d_%H%M%S"))
}

/// Save a rendered page as `<dir>/handwriting_<timestamp>.png`, creating `dir` if needed.
/// Never overwrites: if the name is taken (two renders in the same second), a numeric
/// suffix is added. Returns the path written.
pub fn write_page(image: &RgbaImage, dir: &Path) -> Result<PathBuf, HandwritingError> {
    let stem = output_stem(&Local::now());
    write_png(image, dir, &stem)
}

/// Save a thumbnail of `image` next to the page it was made from
pub fn write_preview(image: &RgbaImage, page_path: &Path) -> Result<PathBuf, HandwritingError> {
    let dir = page_path.parent().unwrap_or_else(|| Path::new("."));
    let stem = page_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| output_stem(&Local::now()));
    write_png(&preview(image, PREVIEW_SIZE), dir, &format!("{stem}_preview"))
}

/// Scale `image` to fit inside a `max_size` square, keeping its aspect ratio
pub fn preview(image: &RgbaImage, max_size: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let ratio = f64::min(
        max_size as f64 / width as f64,
        max_size as f64 / height as f64,
    );
    let width = ((width as f64 * ratio).round() as u32).max(1);
    let height = ((height as f64 * ratio).round() as u32).max(1);
    imageops::resize(image, width, height, FilterType::Lanczos3)
}

fn write_png(image: &RgbaImage, dir: &Path, stem: &str) -> Result<PathBuf, HandwritingError> {
    std::fs::create_dir_all(dir).map_err(|source| HandwritingError::Output {
        path: dir.to_path_buf(),
        source: Box::new(source),
    })?;

    let (path, file) = create_fresh(dir, stem)?;
    if let Err(source) = encode_png(image, file) {
        // only ever our own, freshly created file
        let _ = std::fs::remove_file(&path);
        return Err(HandwritingError::Output { path, source });
    }

    tracing::info!(path = %path.display(), "wrote image");
    Ok(path)
}

fn create_fresh(dir: &Path, stem: &str) -> Result<(PathBuf, File), HandwritingError> {
    for attempt in 0u32.. {
        let name = match attempt {
            0 => format!("{stem}.png"),
            n => format!("{stem}_{n}.png"),
        };
        let path = dir.join(name);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
            Err(err) => {
                return Err(HandwritingError::Output {
                    path,
                    source: Box::new(err),
                })
            }
        }
    }
    unreachable!("ran out of file name suffixes")
}

fn encode_png(
    image: &RgbaImage,
    file: File,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut writer = BufWriter::new(file);
    PngEncoder::new(&mut writer).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    writer.flush()?;
    Ok(())
}
