use crate::gui::theme::ThemeColors;
use cairo::Context;
use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use gdk4::prelude::*;
use pager::geometry::{Point, Rect, Size};
use pager::item::{BuiltinIcon, Icon, IconName};
use pager::paint::{PaintError, Painter, Rgba, TextStyle, WHITE};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::f64::consts::PI;
use std::path::{Path, PathBuf};

pub const ICON_SIZE: i32 = 128;
const FONT_FACE: &str = "Sans";
const GLYPH_INSET: f64 = 0.25;

pub fn find_icon_path(icon_name: &IconName) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_str());
    if path.is_absolute() && path.exists() {
        return Some(path.to_path_buf());
    }

    lookup(icon_name.as_str())
        .with_size(ICON_SIZE as u16)
        .with_scale(1)
        .find()
}

/// Decoded icons by name. Misses are cached too so a missing icon is looked up once.
#[derive(Default)]
pub struct IconCache {
    entries: Mutex<HashMap<IconName, Option<Pixbuf>>>,
}

impl IconCache {
    pub fn get(&self, name: &IconName) -> Option<Pixbuf> {
        self.entries
            .lock()
            .entry(name.clone())
            .or_insert_with(|| {
                let pixbuf = find_icon_path(name).and_then(|path| {
                    Pixbuf::from_file_at_scale(&path, ICON_SIZE, ICON_SIZE, true).ok()
                });
                if pixbuf.is_none() {
                    log::debug!("No icon found for '{}'", name);
                }
                pixbuf
            })
            .clone()
    }
}

/// [`Painter`] over a cairo context already translated to the menu window's origin.
pub struct CairoPainter<'a> {
    cr: &'a Context,
    icons: &'a IconCache,
    colors: &'a ThemeColors,
    tooltips: Vec<(Rect, String)>,
}

impl<'a> CairoPainter<'a> {
    pub fn new(cr: &'a Context, icons: &'a IconCache, colors: &'a ThemeColors) -> Self {
        Self {
            cr,
            icons,
            colors,
            tooltips: Vec::new(),
        }
    }

    /// Tooltip regions registered during the last draw, in window-local coordinates.
    pub fn into_tooltips(self) -> Vec<(Rect, String)> {
        self.tooltips
    }

    fn set_color(&self, color: Rgba) {
        let (r, g, b, a) = self.colors.resolve(color).into_components();
        self.cr.set_source_rgba(r, g, b, a);
    }

    fn set_font(&self, style: TextStyle) {
        self.cr
            .select_font_face(FONT_FACE, cairo::FontSlant::Normal, cairo::FontWeight::Normal);
        self.cr.set_font_size(style.size.points());
    }

    fn draw_pixbuf(&self, rect: Rect, pixbuf: &Pixbuf, tint: Rgba) -> Result<(), cairo::Error> {
        let scale = (rect.width / pixbuf.width() as f64).min(rect.height / pixbuf.height() as f64);
        let (w, h) = (pixbuf.width() as f64 * scale, pixbuf.height() as f64 * scale);
        let center = rect.center();

        self.cr.save()?;
        self.cr.translate(center.x - w / 2.0, center.y - h / 2.0);
        self.cr.scale(scale, scale);
        if tint == WHITE {
            self.cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
            self.cr.paint()?;
        } else {
            // recolor through the icon's alpha
            self.cr.push_group();
            self.cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
            self.cr.paint()?;
            let mask = self.cr.pop_group()?;
            self.set_color(tint);
            self.cr.mask(&mask)?;
        }
        self.cr.restore()
    }

    fn draw_glyph(&self, rect: Rect, glyph: BuiltinIcon, tint: Rgba) -> Result<(), cairo::Error> {
        let inset = rect.width.min(rect.height) * GLYPH_INSET;
        let (left, right) = (rect.x + inset, rect.max_x() - inset);
        let (top, bottom) = (rect.y + inset, rect.max_y() - inset);
        let center = rect.center();

        self.set_color(tint);
        self.cr.set_line_width((rect.width / 10.0).max(1.5));
        match glyph {
            BuiltinIcon::Close => {
                self.cr.move_to(left, top);
                self.cr.line_to(right, bottom);
                self.cr.move_to(right, top);
                self.cr.line_to(left, bottom);
                self.cr.stroke()
            }
            BuiltinIcon::ArrowLeft => {
                self.cr.move_to(right, top);
                self.cr.line_to(left, center.y);
                self.cr.line_to(right, bottom);
                self.cr.close_path();
                self.cr.fill()
            }
            BuiltinIcon::ArrowRight => {
                self.cr.move_to(left, top);
                self.cr.line_to(right, center.y);
                self.cr.line_to(left, bottom);
                self.cr.close_path();
                self.cr.fill()
            }
            BuiltinIcon::Fallback => {
                self.cr.arc(center.x, center.y, (right - left) / 2.0, 0.0, 2.0 * PI);
                self.cr.stroke()
            }
        }
    }
}

impl Painter for CairoPainter<'_> {
    fn fill_rect(&mut self, rect: Rect, color: Rgba) -> Result<(), PaintError> {
        self.set_color(color);
        self.cr.rectangle(rect.x, rect.y, rect.width, rect.height);
        self.cr.fill().map_err(PaintError::backend)
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba) -> Result<(), PaintError> {
        self.set_color(color);
        self.cr.arc(center.x, center.y, radius, 0.0, 2.0 * PI);
        self.cr.fill().map_err(PaintError::backend)
    }

    fn draw_icon(&mut self, rect: Rect, icon: &Icon, tint: Rgba) -> Result<(), PaintError> {
        let drawn = match icon {
            Icon::Named(name) => match self.icons.get(name) {
                Some(pixbuf) => self.draw_pixbuf(rect, &pixbuf, tint),
                None => self.draw_glyph(rect, BuiltinIcon::Fallback, tint),
            },
            Icon::Builtin(glyph) => self.draw_glyph(rect, *glyph, tint),
        };
        drawn.map_err(PaintError::backend)
    }

    fn draw_text(&mut self, origin: Point, text: &str, style: TextStyle) -> Result<(), PaintError> {
        self.set_font(style);
        let ascent = self
            .cr
            .font_extents()
            .map_err(PaintError::backend)?
            .ascent();
        self.set_color(style.color);
        self.cr.move_to(origin.x, origin.y + ascent);
        self.cr.show_text(text).map_err(PaintError::backend)
    }

    fn text_size(&self, text: &str, style: TextStyle) -> Size {
        self.set_font(style);
        match (self.cr.text_extents(text), self.cr.font_extents()) {
            (Ok(text), Ok(font)) => Size::new(text.x_advance(), font.height()),
            _ => Size::default(),
        }
    }

    fn tooltip(&mut self, region: Rect, text: &str) {
        if !text.is_empty() {
            self.tooltips.push((region, text.to_string()));
        }
    }
}
