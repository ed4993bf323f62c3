use crate::HandwritingError;
use owned_ttf_parser::{AsFaceRef, GlyphId, OutlineBuilder, OwnedFace};
use std::path::Path;
use tiny_skia::{Path as SkPath, PathBuilder};

/// A parsed outline font. Fonts can be TTF, OTF, or the first face of a TTC collection.
///
/// All sizes are in pixels: a glyph at size `s` is drawn with one em spanning `s` pixels.
pub struct Font {
    pub face: OwnedFace,
}

impl Font {
    /// Load a font from raw bytes, parsing the font and returning an error if the font
    /// could not be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, HandwritingError> {
        let face = OwnedFace::from_vec(bytes, 0)?;

        Ok(Font { face })
    }

    /// Read and parse a font file
    pub fn load_from_disk<P: AsRef<Path>>(path: P) -> Result<Font, HandwritingError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::load(bytes)
    }

    fn scaling(&self, size: f32) -> f32 {
        size / self.face.as_face_ref().units_per_em() as f32
    }

    /// Calculate the ascent (distance from the baseline to the top of the font) for the given font size
    pub fn ascent(&self, size: f32) -> f32 {
        self.scaling(size) * self.face.as_face_ref().ascender() as f32
    }

    /// Calculate the descent (distance from the baseline to the bottom of the font) for the given font size.
    /// Note: this is usually negative
    pub fn descent(&self, size: f32) -> f32 {
        self.scaling(size) * self.face.as_face_ref().descender() as f32
    }

    /// Height of the inked area of `text`, from the highest glyph top to the lowest glyph
    /// bottom. Characters the font doesn't map are ignored; returns [None] if nothing in
    /// `text` has an outline.
    pub fn ink_height(&self, text: &str, size: f32) -> Option<f32> {
        let face = self.face.as_face_ref();
        let (top, bottom) = text
            .chars()
            .filter_map(|ch| face.glyph_index(ch))
            .filter_map(|gid| face.glyph_bounding_box(gid))
            .fold(None, |acc: Option<(i16, i16)>, bbox| match acc {
                Some((top, bottom)) => Some((top.max(bbox.y_max), bottom.min(bbox.y_min))),
                None => Some((bbox.y_max, bbox.y_min)),
            })?;
        Some(self.scaling(size) * (top as f32 - bottom as f32))
    }

    /// Glyph used to draw `ch`, falling back to the replacement character and then `?`
    /// when the font doesn't cover it
    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        let face = self.face.as_face_ref();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
    }

    /// Horizontal advance of `ch` at the given size
    pub fn advance(&self, ch: char, size: f32) -> f32 {
        self.glyph_id(ch)
            .and_then(|gid| self.face.as_face_ref().glyph_hor_advance(gid))
            .map(|adv| self.scaling(size) * adv as f32)
            .unwrap_or_default()
    }

    /// Build the outline of `ch` as a path in pixel space, with the pen at `baseline`
    pub(crate) fn outline(&self, ch: char, size: f32, baseline: (f32, f32)) -> Option<SkPath> {
        let gid = self.glyph_id(ch)?;
        let mut sink = OutlineSink {
            builder: PathBuilder::new(),
            scaling: self.scaling(size),
            origin: baseline,
        };
        self.face.as_face_ref().outline_glyph(gid, &mut sink)?;
        sink.builder.finish()
    }
}

/// Collects font-unit outline commands into a pixel-space path. Font units grow upwards,
/// raster rows grow downwards.
struct OutlineSink {
    builder: PathBuilder,
    scaling: f32,
    origin: (f32, f32),
}

impl OutlineSink {
    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.origin.0 + x * self.scaling,
            self.origin.1 - y * self.scaling,
        )
    }
}

impl OutlineBuilder for OutlineSink {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.move_to(x, y);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.builder.line_to(x, y);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.builder.quad_to(x1, y1, x, y);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.builder.cubic_to(x1, y1, x2, y2, x, y);
    }

    fn close(&mut self) {
        self.builder.close();
    }
}
