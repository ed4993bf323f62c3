use super::Margins;
use crate::{colours, opacity_to_alpha, Colour};
use serde::{Deserialize, Serialize};

/// Extra space added after every character (`horizontal`) and between lines (`vertical`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spacing {
    pub horizontal: i32,
    pub vertical: i32,
}

/// Highest chaos level; jitter never exceeds `2 * MAX_CHAOS_LEVEL` pixels
pub const MAX_CHAOS_LEVEL: u8 = 10;

/// Everything layout and rendering need to know about how text should look. A render
/// works on its own copy, so changing settings while a page is rendering can't leave
/// the page half old and half new.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub margins: Margins,
    pub spacing: Spacing,
    /// 1 (neat) to 10 (messy). 0 disables jitter.
    pub chaos_level: u8,
    /// Font size in pixels
    pub font_size: u32,
    pub text_colour: Colour,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            margins: Margins::all(50),
            spacing: Spacing {
                horizontal: 0,
                vertical: 10,
            },
            chaos_level: 5,
            font_size: 36,
            text_colour: colours::BLACK,
            opacity: 1.0,
        }
    }
}

impl LayoutConfig {
    /// The 8-bit alpha glyphs are painted with
    pub fn alpha(&self) -> u8 {
        opacity_to_alpha(self.opacity)
    }

    /// How far the cursor moves down when a line ends
    pub fn line_advance(&self, line_height: f32) -> f32 {
        line_height + self.spacing.vertical as f32
    }
}
