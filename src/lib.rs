//! Render text as handwriting-styled raster pages.
//!
//! ```no_run
//! use handwrite::layout::RandomJitter;
//! use handwrite::{render_text, write_page, Settings};
//! use std::path::Path;
//!
//! let settings = Settings::load("settings.json");
//! let request = settings.render_request(Path::new("fonts"));
//! let rendered = render_text("床前明月光，疑是地上霜。", &request, &mut RandomJitter::from_os_rng())?;
//! for notice in &rendered.notices {
//!     eprintln!("{notice}");
//! }
//! let path = write_page(&rendered.image, Path::new("Output"))?;
//! println!("saved {}", path.display());
//! # Ok::<(), handwrite::HandwritingError>(())
//! ```

mod colour;
pub use colour::*;

mod font;
pub use font::*;

mod image;
pub use self::image::*;

/// Turning text into positioned characters
pub mod layout;

mod output;
pub use output::*;

mod page;
pub use page::*;

mod render;
pub use render::*;

mod settings;
pub use settings::*;

mod typeface;
pub use typeface::*;

mod error;
pub use error::*;
