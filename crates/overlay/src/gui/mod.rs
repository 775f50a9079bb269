pub mod app;
pub mod painter;
pub mod theme;
pub mod window;
