use crate::layout::Measure;
use crate::{Font, Notice};
use std::path::{Path, PathBuf};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};
use unicode_width::UnicodeWidthChar;

/// Reference string whose inked height sets the line height, matching how CJK
/// handwriting fonts are usually sized
const LINE_HEIGHT_REFERENCE: &str = "测试";

/// Fonts tried, in order, when the requested handwriting font can't be used
pub const SYSTEM_FALLBACK_FONTS: &[&str] = &[
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\simsun.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Light.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/wqy/wqy-microhei.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
];

/// The face glyphs are measured and drawn with. When no outline font can be loaded, the
/// placeholder face keeps rendering alive by drawing an empty box per character, one em
/// wide for wide (CJK) characters and half an em for everything else.
pub enum Typeface {
    Outline(Font),
    Placeholder,
}

impl Typeface {
    /// Load the handwriting font at `requested`, degrading to the first loadable entry of
    /// [SYSTEM_FALLBACK_FONTS] and finally to [Typeface::Placeholder]. Every degradation is
    /// logged and recorded in `notices`; this never fails.
    pub fn resolve(requested: Option<&Path>, notices: &mut Vec<Notice>) -> Typeface {
        let reason = match requested {
            Some(path) => match Font::load_from_disk(path) {
                Ok(font) => {
                    tracing::debug!(path = %path.display(), "loaded handwriting font");
                    return Typeface::Outline(font);
                }
                Err(err) => err.to_string(),
            },
            None => "no handwriting font configured".to_string(),
        };

        let (typeface, using) = Self::system_fallback(SYSTEM_FALLBACK_FONTS);
        tracing::warn!(
            requested = ?requested.map(Path::display),
            %reason,
            %using,
            "handwriting font unavailable, falling back"
        );
        notices.push(Notice::FontFallback {
            requested: requested.map(Path::to_path_buf),
            using,
            reason,
        });
        typeface
    }

    fn system_fallback(candidates: &[&str]) -> (Typeface, String) {
        candidates
            .iter()
            .map(PathBuf::from)
            .filter(|path| path.is_file())
            .find_map(|path| {
                Font::load_from_disk(&path)
                    .ok()
                    .map(|font| (Typeface::Outline(font), path.display().to_string()))
            })
            .unwrap_or_else(|| (Typeface::Placeholder, "placeholder boxes".to_string()))
    }

    /// Distance from the top of a line box to the baseline
    pub fn ascent(&self, size: f32) -> f32 {
        match self {
            Typeface::Outline(font) => font.ascent(size),
            Typeface::Placeholder => size * 0.8,
        }
    }

    /// Height of one line of text before vertical spacing is added
    pub fn line_height(&self, size: f32) -> f32 {
        match self {
            Typeface::Outline(font) => font
                .ink_height(LINE_HEIGHT_REFERENCE, size)
                .unwrap_or_else(|| font.ascent(size) - font.descent(size)),
            Typeface::Placeholder => size,
        }
    }

    /// Paint `ch` with its top-left line box corner at `at`
    pub(crate) fn draw(
        &self,
        pixmap: &mut Pixmap,
        ch: char,
        at: (f32, f32),
        size: f32,
        paint: &Paint,
    ) {
        let baseline = (at.0, at.1 + self.ascent(size));
        match self {
            Typeface::Outline(font) => {
                if let Some(path) = font.outline(ch, size, baseline) {
                    pixmap.fill_path(&path, paint, FillRule::Winding, Transform::identity(), None);
                }
            }
            Typeface::Placeholder => {
                let width = self.advance(ch, size);
                let inset = size * 0.1;
                let Some(rect) = Rect::from_xywh(
                    at.0 + inset,
                    at.1 + inset,
                    width - inset * 2.0,
                    size - inset * 2.0,
                ) else {
                    return;
                };
                let path = PathBuilder::from_rect(rect);
                let stroke = Stroke {
                    width: (size / 12.0).max(1.0),
                    ..Stroke::default()
                };
                pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
            }
        }
    }
}

impl Measure for Font {
    fn advance(&self, ch: char, size: f32) -> f32 {
        Font::advance(self, ch, size)
    }
}

impl Measure for Typeface {
    fn advance(&self, ch: char, size: f32) -> f32 {
        match self {
            Typeface::Outline(font) => font.advance(ch, size),
            Typeface::Placeholder => match ch.width() {
                Some(2) => size,
                Some(0) | None => 0.0,
                Some(_) => size * 0.5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_measures_wide_and_narrow() {
        let face = Typeface::Placeholder;
        assert_eq!(face.advance('字', 36.0), 36.0);
        assert_eq!(face.advance('a', 36.0), 18.0);
        assert_eq!(face.line_height(36.0), 36.0);
    }

    #[test]
    fn unloadable_font_degrades_with_a_notice() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.ttf");
        std::fs::write(&broken, b"not a font").unwrap();

        let mut notices = Vec::new();
        let _face = Typeface::resolve(Some(&broken), &mut notices);

        assert_eq!(notices.len(), 1);
        match &notices[0] {
            Notice::FontFallback { requested, .. } => {
                assert_eq!(requested.as_deref(), Some(broken.as_path()))
            }
            other => panic!("unexpected notice {other:?}"),
        }
    }

    #[test]
    fn fallback_without_candidates_is_placeholder() {
        let (face, using) = Typeface::system_fallback(&["/definitely/not/here.ttf"]);
        assert!(matches!(face, Typeface::Placeholder));
        assert_eq!(using, "placeholder boxes");
    }
}
