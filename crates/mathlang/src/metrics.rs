//! The font metrics interface consumed by rendering backends.
//!
//! The interpreter itself never measures anything; it hands the finished
//! atom tree and this capability to a layout backend.

use crate::engine::Style;

/// Font metrics for a character in a math family.
///
/// All results are in em units of the current font size.
pub trait FontMetrics {
    fn width(&self, c: char, family: u8, style: Style) -> f64;

    /// The width of the inked part of the glyph, which can be smaller than
    /// the advance width.
    fn visible_width(&self, c: char, family: u8, style: Style) -> f64;

    fn height(&self, c: char, family: u8, style: Style) -> f64;

    fn depth(&self, c: char, family: u8, style: Style) -> f64;

    /// Distance from the bottom of the line box to the baseline.
    fn baseline_height(&self, c: char, family: u8, style: Style) -> f64;

    /// The italic correction applied after the glyph when followed by
    /// upright material.
    fn italic_correction(&self, c: char, family: u8, style: Style) -> f64;
}
