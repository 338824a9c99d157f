//! sens-gadget - A borderless desktop panel that mirrors hardware sensors
//!
//! The window-agnostic [`GadgetSurface`](surface::GadgetSurface) ties the
//! sensor registry, layout metrics and compositor together; `ui` hosts it in
//! a GTK4 window.

pub mod config;
pub mod hit_test;
pub mod surface;
pub mod ui;

pub use hit_test::{hit_test, HitRegion};
pub use surface::{ConfigChange, GadgetSurface};
