use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, Layer, LayerShell};
use pager::geometry::{Point, Size};

const FALLBACK_SCREEN: Size = Size {
    width: 1920.0,
    height: 1080.0,
};

pub fn get_cursor_position(window: &gtk::ApplicationWindow) -> Option<Point> {
    gdk::Display::default()
        .and_then(|d| d.default_seat())
        .and_then(|s| s.pointer())
        .zip(window.surface())
        .and_then(|(p, s)| s.device_position(&p))
        .map(|(x, y, _)| Point::new(x, y))
}

pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("pager"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::OnDemand);
}

/// Size of the monitor the overlay covers, or of the first monitor before it is mapped.
pub fn monitor_size(window: &gtk::ApplicationWindow) -> Size {
    let Some(display) = gdk::Display::default() else {
        return FALLBACK_SCREEN;
    };
    window
        .surface()
        .and_then(|s| display.monitor_at_surface(&s))
        .or_else(|| {
            display
                .monitors()
                .item(0)
                .and_then(|item| item.downcast::<gdk::Monitor>().ok())
        })
        .map(|m| {
            let g = m.geometry();
            Size::new(g.width() as f64, g.height() as f64)
        })
        .unwrap_or(FALLBACK_SCREEN)
}
