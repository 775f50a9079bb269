use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use pager::paint::{self, Rgba};
use palette::Srgba;

/// Menu colors, taken from the GTK theme where it defines them.
pub struct ThemeColors {
    pub backdrop: Rgba,
    pub highlight: Rgba,
    pub cell_highlight: Rgba,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            backdrop: Self::lookup_color(
                context,
                "theme_bg_color",
                paint::BACKDROP,
                Some(paint::BACKDROP.alpha),
            ),
            highlight: Self::lookup_color(context, "theme_selected_bg_color", paint::HIGHLIGHT, None),
            cell_highlight: Self::lookup_color(
                context,
                "theme_fg_color",
                paint::CELL_HIGHLIGHT,
                Some(paint::CELL_HIGHLIGHT.alpha),
            ),
        }
    }

    /// Swaps the engine's stock colors for the themed ones; anything else passes through.
    pub fn resolve(&self, color: Rgba) -> Rgba {
        match color {
            c if c == paint::BACKDROP => self.backdrop,
            c if c == paint::HIGHLIGHT => self.highlight,
            c if c == paint::CELL_HIGHLIGHT => self.cell_highlight,
            c => c,
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Rgba,
        alpha_override: Option<f64>,
    ) -> Rgba {
        context
            .lookup_color(name)
            .map(|c| {
                let (r, g, b, a) = (
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    c.alpha() as f64,
                );
                Srgba::new(r, g, b, alpha_override.unwrap_or(a))
            })
            .unwrap_or(fallback)
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.pager-window, .pager-drawing-area {
    background: none;
    background-color: transparent;
}

.pager-notice {
    padding: 6px 14px;
    border-radius: 6px;
    color: white;
    background-color: rgba(20, 20, 20, 0.8);
}

.pager-notice.rejected {
    color: #ff8a80;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
