//! GTK4 host for the gadget surface

mod context_menu;
mod window;

pub use context_menu::show_context_menu;
pub use window::{build_gadget_window, load_css, TICK_INTERVAL};
