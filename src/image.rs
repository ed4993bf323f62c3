use crate::{Colour, HandwritingError};
use image::{imageops, DynamicImage, RgbaImage};
use std::path::Path;

/// A decoded page texture. Its dimensions become the dimensions of the rendered page.
pub struct Background {
    pub image: DynamicImage,
}

impl Background {
    pub fn new_from_disk<P: AsRef<Path>>(path: P) -> Result<Background, HandwritingError> {
        let path = path.as_ref();
        let is_tga = if let Some(ext) = path.extension() {
            ext.to_ascii_lowercase() == std::ffi::OsString::from("tga")
        } else {
            false
        };

        let data = std::fs::read(path)?;

        let format = if is_tga {
            image::ImageFormat::Tga
        } else {
            image::guess_format(&data)?
        };
        let image = image::load_from_memory_with_format(&data, format)?;

        Ok(Background { image })
    }

    pub fn new(image: DynamicImage) -> Background {
        Background { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Flatten the texture into an RGBA raster. Textures with their own alpha channel are
    /// blended over a solid `backing` colour; opaque textures are used as they are.
    pub fn composite(&self, backing: Colour) -> RgbaImage {
        if self.image.color().has_alpha() {
            let mut base =
                RgbaImage::from_pixel(self.width(), self.height(), backing.to_rgba(u8::MAX));
            imageops::overlay(&mut base, &self.image.to_rgba8(), 0, 0);
            base
        } else {
            self.image.to_rgba8()
        }
    }
}
