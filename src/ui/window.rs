//! Borderless host window for a [`GadgetSurface`].

use gtk4::gdk::Display;
use gtk4::prelude::*;
use gtk4::{glib, Application, ApplicationWindow, CssProvider, DrawingArea, GestureClick};
use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::context_menu::show_context_menu;
use crate::hit_test::HitRegion;
use crate::surface::{ConfigChange, GadgetSurface};

/// How often sensor values are sampled and the panel repainted
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Make the window background transparent so only the composite shows
pub fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_data(
        "
        window.gadget-window {
            background: transparent;
            background-color: transparent;
            box-shadow: none;
        }

        drawingarea {
            border-radius: 0;
        }
        ",
    );

    match Display::default() {
        Some(display) => gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk4::STYLE_PROVIDER_PRIORITY_APPLICATION,
        ),
        None => warn!("No display; gadget window keeps the theme background"),
    }
}

/// Build and present the gadget window. `on_tick` runs before every pump.
pub fn build_gadget_window<F>(
    app: &Application,
    surface: Rc<RefCell<GadgetSurface>>,
    mut on_tick: F,
) -> ApplicationWindow
where
    F: FnMut() + 'static,
{
    let (size, config) = {
        let s = surface.borrow();
        (s.size(), s.config().clone())
    };

    let window = ApplicationWindow::builder()
        .application(app)
        .title("Sensors")
        .decorated(false)
        .resizable(true)
        .default_width(size.width)
        .default_height(size.height)
        .build();
    window.add_css_class("gadget-window");
    window.set_opacity(config.opacity as f64 / 255.0);
    info!(
        "Gadget window {}x{}, saved location ({}, {})",
        size.width, size.height, config.location.x, config.location.y
    );

    let area = DrawingArea::new();
    area.set_content_width(size.width);
    area.set_content_height(size.height);

    let surface_for_draw = surface.clone();
    area.set_draw_func(move |_, cr, _, _| {
        let stats = surface_for_draw.borrow_mut().paint(cr);
        if stats.skipped_lines > 0 {
            debug!("Frame skipped {} lines", stats.skipped_lines);
        }
    });
    window.set_child(Some(&area));

    // Window-level state follows configuration changes
    let window_weak = window.downgrade();
    let area_weak = area.downgrade();
    surface
        .borrow_mut()
        .connect_config_changed(move |change, config| {
            let (Some(window), Some(area)) = (window_weak.upgrade(), area_weak.upgrade()) else {
                return;
            };
            match change {
                ConfigChange::Opacity => window.set_opacity(config.opacity as f64 / 255.0),
                ConfigChange::Size(size) => {
                    area.set_content_width(size.width);
                    area.set_content_height(size.height);
                    window.set_default_size(size.width, size.height);
                }
                ConfigChange::AlwaysOnTop => {
                    // GTK4 has no stacking API; the compositor decides
                    info!("Always on top set to {}", config.always_on_top);
                }
                _ => {}
            }
            area.queue_draw();
        });

    // Width follows the window, height follows the content
    let surface_for_resize = surface.clone();
    area.connect_resize(move |_, width, _| {
        let current = surface_for_resize.borrow().size().width;
        if width != current {
            surface_for_resize.borrow_mut().resize(width);
        }
    });

    // Primary button: resize on the side insets, move elsewhere
    let press = GestureClick::new();
    press.set_button(gtk4::gdk::BUTTON_PRIMARY);
    let surface_for_press = surface.clone();
    let window_for_press = window.clone();
    press.connect_pressed(move |gesture, _, x, y| {
        let (region, locked) = {
            let s = surface_for_press.borrow();
            (s.hit_test(x), s.config().lock_position_and_size)
        };
        if locked {
            return;
        }

        let Some(native) = window_for_press.surface() else {
            return;
        };
        let Some(toplevel) = native.downcast_ref::<gtk4::gdk::Toplevel>() else {
            return;
        };
        let Some(device) = gesture.device() else {
            return;
        };
        let button = gesture.current_button() as i32;
        let timestamp = gesture.current_event().map(|e| e.time()).unwrap_or(0);

        match region {
            HitRegion::ResizeLeft => {
                toplevel.begin_resize(gtk4::gdk::SurfaceEdge::West, Some(&device), button, x, y, timestamp)
            }
            HitRegion::ResizeRight => {
                toplevel.begin_resize(gtk4::gdk::SurfaceEdge::East, Some(&device), button, x, y, timestamp)
            }
            HitRegion::Client => toplevel.begin_move(&device, button, x, y, timestamp),
        }
        gesture.set_state(gtk4::EventSequenceState::Claimed);
    });
    area.add_controller(press);

    // Secondary button: context menu
    let menu_click = GestureClick::new();
    menu_click.set_button(gtk4::gdk::BUTTON_SECONDARY);
    let surface_for_menu = surface.clone();
    let window_for_menu = window.clone();
    menu_click.connect_pressed(move |_, _, x, y| {
        show_context_menu(&window_for_menu, &surface_for_menu, x, y);
    });
    area.add_controller(menu_click);

    let surface_for_tick = surface.clone();
    let area_for_tick = area.downgrade();
    glib::timeout_add_local(TICK_INTERVAL, move || {
        let Some(area) = area_for_tick.upgrade() else {
            return glib::ControlFlow::Break;
        };
        on_tick();
        surface_for_tick.borrow_mut().pump();
        area.queue_draw();
        glib::ControlFlow::Continue
    });

    let surface_for_close = surface;
    window.connect_close_request(move |_| {
        info!("Gadget window closing");
        surface_for_close.borrow_mut().dispose();
        glib::Propagation::Proceed
    });

    window.present();
    window
}
