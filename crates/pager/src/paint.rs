//! Drawing primitives the layouts are written against.
//!
//! A backend (cairo in the overlay, a recorder in tests) implements [`Painter`]; layouts
//! never touch a toolkit directly.

use crate::geometry::{Point, Rect, Size};
use crate::item::Icon;
use palette::Srgba;
use thiserror::Error;

pub type Rgba = Srgba<f64>;

pub const WHITE: Rgba = Srgba::new(1.0, 1.0, 1.0, 1.0);
pub const GRAY: Rgba = Srgba::new(0.5, 0.5, 0.5, 1.0);
pub const HIGHLIGHT: Rgba = Srgba::new(1.0, 0.92, 0.016, 1.0);
pub const BACKDROP: Rgba = Srgba::new(0.1, 0.1, 0.1, 0.75);
pub const CELL_HIGHLIGHT: Rgba = Srgba::new(1.0, 1.0, 1.0, 0.15);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Tiny,
    Small,
    Medium,
}

impl FontSize {
    pub fn points(self) -> f64 {
        match self {
            Self::Tiny => 10.0,
            Self::Small => 13.0,
            Self::Medium => 18.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Rgba,
    pub size: FontSize,
}

impl TextStyle {
    pub fn new(color: Rgba, size: FontSize) -> Self {
        Self { color, size }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(WHITE, FontSize::Small)
    }
}

#[derive(Error, Debug)]
pub enum PaintError {
    #[error("Paint backend error: {0}")]
    Backend(String),
}

impl PaintError {
    pub fn backend(e: impl std::fmt::Display) -> Self {
        Self::Backend(e.to_string())
    }
}

pub trait Painter {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> Result<(), PaintError>;

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) -> Result<(), PaintError>;

    /// Draws `icon` fitted into `rect`, multiplied by `tint`.
    fn draw_icon(&mut self, rect: Rect, icon: &Icon, tint: Rgba) -> Result<(), PaintError>;

    /// Draws `text` with its top-left corner at `origin`.
    fn draw_text(&mut self, origin: Point, text: &str, style: TextStyle) -> Result<(), PaintError>;

    fn text_size(&self, text: &str, style: TextStyle) -> Size;

    /// Registers a hover tooltip for `region`; backends may show it after a delay.
    fn tooltip(&mut self, region: Rect, text: &str);
}

/// Draws `text` horizontally centered on `center_x`.
pub fn draw_text_centered(
    painter: &mut dyn Painter,
    center_x: f64,
    top: f64,
    text: &str,
    style: TextStyle,
) -> Result<(), PaintError> {
    let size = painter.text_size(text, style);
    painter.draw_text(Point::new(center_x - size.width / 2.0, top), text, style)
}
