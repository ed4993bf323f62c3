//! Text layout for handwritten pages.
//!
//! Layout turns text into a list of [`Placement`](crate::layout::Placement)s: one per
//! visible character, each with the cursor position it was laid out at and the jittered
//! position it should be drawn at. Nothing here touches pixels; rendering is a separate
//! pass over the placements.
//!
//! Character widths come from a [`Measure`](crate::layout::Measure) implementation
//! (usually a [`Typeface`](crate::Typeface)), and the draw offsets come from a
//! [`Jitter`](crate::layout::Jitter) source so tests can lay text out reproducibly.
//!
//! # Example
//!
//! ```
//! use handwrite::layout::{layout_text, LayoutConfig, Margins, RandomJitter, TextArea};
//!
//! let config = LayoutConfig {
//!     margins: Margins::all(20),
//!     chaos_level: 3,
//!     ..LayoutConfig::default()
//! };
//! let area = TextArea { available_width: 500.0, available_height: 300.0, line_height: 36.0 };
//! let square = |_: char, size: f32| size;
//!
//! let mut jitter = RandomJitter::seeded(9);
//! let placed = layout_text("你好，世界", &config, area, &square, &mut jitter);
//! assert_eq!(placed.len(), 5);
//! assert_eq!(placed[0].base, (20.0, 20.0));
//! ```

mod config;
pub mod jitter;
mod margins;
mod text;

pub use config::*;
pub use jitter::{Jitter, NoJitter, RandomJitter};
pub use margins::*;
pub use text::*;
