use crate::image::Background;
use crate::layout::{Margins, TextArea};
use crate::{Colour, Notice};
use image::RgbaImage;
use std::path::Path;

/// Size of the page when there is no usable background texture
pub const DEFAULT_PAGE_SIZE: (u32, u32) = (1000, 1000);

/// The canvas text gets written on: a solid colour, optionally covered by a texture
pub struct Page {
    pub width: u32,
    pub height: u32,
    pub background_colour: Colour,
    pub background: Option<Background>,
}

impl Page {
    /// A flat page of the given colour
    pub fn new(width: u32, height: u32, background_colour: Colour) -> Page {
        Page {
            width,
            height,
            background_colour,
            background: None,
        }
    }

    /// A page sized to its texture
    pub fn with_background(background: Background, background_colour: Colour) -> Page {
        Page {
            width: background.width(),
            height: background.height(),
            background_colour,
            background: Some(background),
        }
    }

    /// Build the page for a render. A missing or undecodable texture degrades to a flat
    /// [DEFAULT_PAGE_SIZE] page, recording a notice instead of failing.
    pub fn load(
        background: Option<&Path>,
        background_colour: Colour,
        notices: &mut Vec<Notice>,
    ) -> Page {
        let flat = || Page::new(DEFAULT_PAGE_SIZE.0, DEFAULT_PAGE_SIZE.1, background_colour);

        let Some(path) = background else {
            return flat();
        };

        match Background::new_from_disk(path) {
            Ok(texture) => Page::with_background(texture, background_colour),
            Err(err) => {
                let reason = err.to_string();
                tracing::warn!(
                    path = %path.display(),
                    %reason,
                    "background unavailable, using a flat page"
                );
                notices.push(Notice::BackgroundFallback {
                    path: path.to_path_buf(),
                    reason,
                });
                flat()
            }
        }
    }

    /// Area text can be laid out in. The available extent subtracts both margins from the
    /// page, and [layout_text](crate::layout::layout_text) subtracts the right margin again
    /// when deciding to wrap, so lines end `2 * right + left` pixels before the page edge.
    pub fn text_area(&self, margins: &Margins, line_height: f32) -> TextArea {
        TextArea {
            available_width: self.width as f32 - margins.left as f32 - margins.right as f32,
            available_height: self.height as f32 - margins.top as f32 - margins.bottom as f32,
            line_height,
        }
    }

    /// The raster text is painted over
    pub fn initial_raster(&self) -> RgbaImage {
        match &self.background {
            Some(texture) => texture.composite(self.background_colour),
            None => RgbaImage::from_pixel(
                self.width,
                self.height,
                self.background_colour.to_rgba(u8::MAX),
            ),
        }
    }
}
