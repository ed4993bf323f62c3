use crate::layout::{layout_text, Jitter, LayoutConfig, Placement};
use crate::{colours, Colour, HandwritingError, Page, Typeface};
use image::RgbaImage;
use std::fmt;
use std::path::PathBuf;
use tiny_skia::{ColorU8, Paint, Pixmap};

/// Something went wrong but the page was rendered anyway
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The handwriting font could not be used; `using` names what was used instead
    FontFallback {
        requested: Option<PathBuf>,
        using: String,
        reason: String,
    },
    /// The background texture could not be used; the page is flat and default-sized
    BackgroundFallback { path: PathBuf, reason: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::FontFallback {
                requested: Some(path),
                using,
                reason,
            } => write!(f, "font {} unavailable ({reason}), using {using}", path.display()),
            Notice::FontFallback {
                requested: None,
                using,
                reason,
            } => write!(f, "{reason}, using {using}"),
            Notice::BackgroundFallback { path, reason } => write!(
                f,
                "background {} unavailable ({reason}), using a plain page",
                path.display()
            ),
        }
    }
}

/// What a render needs besides the text. `config` is owned so the render works on a
/// snapshot of the settings.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub config: LayoutConfig,
    pub font: Option<PathBuf>,
    pub background: Option<PathBuf>,
    pub background_colour: Colour,
}

impl Default for RenderRequest {
    fn default() -> Self {
        RenderRequest {
            config: LayoutConfig::default(),
            font: None,
            background: None,
            background_colour: colours::PAPER,
        }
    }
}

/// A finished page
pub struct Rendered {
    pub image: RgbaImage,
    /// Number of characters drawn; text that overflowed the page isn't counted
    pub placed: usize,
    pub notices: Vec<Notice>,
}

/// Lay out and paint `text` in one go. Whitespace-only text is rejected before any
/// resources are loaded. Missing fonts and backgrounds never fail the render; they are
/// reported in [Rendered::notices].
pub fn render_text<J: Jitter + ?Sized>(
    text: &str,
    request: &RenderRequest,
    jitter: &mut J,
) -> Result<Rendered, HandwritingError> {
    if text.trim().is_empty() {
        return Err(HandwritingError::EmptyInput);
    }

    let RenderRequest {
        config,
        font,
        background,
        background_colour,
    } = request.clone();

    let mut notices = Vec::new();
    let page = Page::load(background.as_deref(), background_colour, &mut notices);
    let typeface = Typeface::resolve(font.as_deref(), &mut notices);

    let size = config.font_size as f32;
    let area = page.text_area(&config.margins, typeface.line_height(size));
    let placements = layout_text(text, &config, area, &typeface, jitter);
    tracing::info!(
        width = page.width,
        height = page.height,
        placed = placements.len(),
        colour = %config.text_colour,
        "laid out page"
    );

    let image = render(&page, &placements, &typeface, size, config.text_colour, config.alpha())?;

    Ok(Rendered {
        image,
        placed: placements.len(),
        notices,
    })
}

/// Paint `placements` onto the page in order. Later glyphs are painted over earlier
/// ones where jitter makes them overlap.
pub fn render(
    page: &Page,
    placements: &[Placement],
    typeface: &Typeface,
    size: f32,
    colour: Colour,
    alpha: u8,
) -> Result<RgbaImage, HandwritingError> {
    let mut pixmap = to_pixmap(&page.initial_raster())?;

    if alpha > 0 {
        let mut paint = Paint::default();
        paint.set_color_rgba8(colour.r, colour.g, colour.b, alpha);
        paint.anti_alias = true;

        for placement in placements {
            typeface.draw(&mut pixmap, placement.ch, placement.coords, size, &paint);
        }
    }

    from_pixmap(&pixmap)
}

fn to_pixmap(raster: &RgbaImage) -> Result<Pixmap, HandwritingError> {
    let (width, height) = raster.dimensions();
    let mut pixmap = Pixmap::new(width, height).ok_or(HandwritingError::Canvas { width, height })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(raster.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Ok(pixmap)
}

fn from_pixmap(pixmap: &Pixmap) -> Result<RgbaImage, HandwritingError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    let bytes: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let c = pixel.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    RgbaImage::from_raw(width, height, bytes).ok_or(HandwritingError::Canvas { width, height })
}
