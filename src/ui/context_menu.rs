//! Context Menu
//!
//! Right-click popover with the gadget's knobs:
//! - Sensor visibility
//! - Font size and opacity presets
//! - Cover color, hardware names, lock, always on top
//! - Temperature unit and language

use gtk4::prelude::*;
use gtk4::{
    ApplicationWindow, Box as GtkBox, Button, CheckButton, Expander, Label, Orientation, Popover,
    ScrolledWindow, Separator,
};
use log::info;
use sens_gadget_core::{Hardware, Sensor};
use sens_gadget_types::{Language, TemperatureUnit, FONT_SIZE_PRESETS, OPACITY_PRESETS};
use std::cell::RefCell;
use std::rc::Rc;

use crate::surface::GadgetSurface;

type OpacitySetter = fn(&mut GadgetSurface, u8);

/// Create and show the context menu popover at the given coordinates
pub fn show_context_menu(
    window: &ApplicationWindow,
    surface: &Rc<RefCell<GadgetSurface>>,
    x: f64,
    y: f64,
) {
    let popover = Popover::new();
    popover.set_parent(window);
    popover.set_has_arrow(false);
    popover.set_autohide(true);

    let menu_box = GtkBox::new(Orientation::Vertical, 2);
    menu_box.set_margin_top(6);
    menu_box.set_margin_bottom(6);
    menu_box.set_margin_start(6);
    menu_box.set_margin_end(6);

    menu_box.append(&sensor_list(surface, window));
    menu_box.append(&Separator::new(Orientation::Horizontal));

    let config = surface.borrow().config().clone();

    // Font size presets
    let font_row = preset_row("Font size");
    for size in FONT_SIZE_PRESETS {
        let btn = preset_button(&format!("{}", size), (size - config.font_size).abs() < f32::EPSILON);
        let surface = surface.clone();
        let window = window.clone();
        btn.connect_clicked(move |_| {
            surface.borrow_mut().set_font_size(size);
            window.queue_draw();
        });
        font_row.append(&btn);
    }
    menu_box.append(&font_row);

    let opacity_rows: [(&str, u8, OpacitySetter); 5] = [
        ("Window", config.opacity, GadgetSurface::set_opacity),
        ("Background", config.background_image_opacity, GadgetSurface::set_background_image_opacity),
        ("Cover", config.cover_opacity, GadgetSurface::set_cover_opacity),
        ("Headers", config.hardware_background_opacity, GadgetSurface::set_hardware_background_opacity),
        ("Bars", config.progress_opacity, GadgetSurface::set_progress_opacity),
    ];
    for (label, current, setter) in opacity_rows {
        let row = preset_row(label);
        for preset in OPACITY_PRESETS {
            let percent = (preset as u32 * 100 + 127) / 255;
            let btn = preset_button(&format!("{}%", percent), preset == current);
            let surface = surface.clone();
            let window = window.clone();
            btn.connect_clicked(move |_| {
                setter(&mut surface.borrow_mut(), preset);
                window.queue_draw();
            });
            row.append(&btn);
        }
        menu_box.append(&row);
    }

    menu_box.append(&Separator::new(Orientation::Horizontal));

    let cover_btn = Button::with_label(&format!("Cover color: {}", config.cover_color.toggled()));
    cover_btn.add_css_class("flat");
    cover_btn.set_halign(gtk4::Align::Fill);
    {
        let surface = surface.clone();
        let window = window.clone();
        let popover = popover.clone();
        let next = config.cover_color.toggled();
        cover_btn.connect_clicked(move |_| {
            popover.popdown();
            surface.borrow_mut().set_cover_color(next);
            window.queue_draw();
        });
    }
    menu_box.append(&cover_btn);

    let toggles: [(&str, bool, fn(&mut GadgetSurface, bool)); 6] = [
        ("Hardware names", config.show_hardware_names, GadgetSurface::set_show_hardware_names),
        ("Lock position and size", config.lock_position_and_size, GadgetSurface::set_lock_position_and_size),
        ("Always on top", config.always_on_top, GadgetSurface::set_always_on_top),
        ("Colorful temperatures", config.colorful_temperature, GadgetSurface::set_colorful_temperature),
        (
            "Fahrenheit",
            config.temperature_unit == TemperatureUnit::Fahrenheit,
            |s, on| s.set_temperature_unit(if on { TemperatureUnit::Fahrenheit } else { TemperatureUnit::Celsius }),
        ),
        (
            "中文",
            config.language == Language::Chinese,
            |s, on| s.set_language(if on { Language::Chinese } else { Language::English }),
        ),
    ];
    for (label, active, setter) in toggles {
        let check = CheckButton::with_label(label);
        check.set_active(active);
        let surface = surface.clone();
        let window = window.clone();
        check.connect_toggled(move |check| {
            setter(&mut surface.borrow_mut(), check.is_active());
            window.queue_draw();
        });
        menu_box.append(&check);
    }

    menu_box.append(&Separator::new(Orientation::Horizontal));

    let reload_btn = Button::with_label("Reload images");
    reload_btn.add_css_class("flat");
    {
        let surface = surface.clone();
        let window = window.clone();
        let popover = popover.clone();
        reload_btn.connect_clicked(move |_| {
            popover.popdown();
            surface.borrow_mut().reload_assets();
            window.queue_draw();
        });
    }
    menu_box.append(&reload_btn);

    let quit_btn = Button::with_label("Quit");
    quit_btn.add_css_class("flat");
    {
        let window = window.clone();
        let popover = popover.clone();
        quit_btn.connect_clicked(move |_| {
            popover.popdown();
            info!("Quit requested from context menu");
            window.close();
        });
    }
    menu_box.append(&quit_btn);

    popover.set_child(Some(&menu_box));
    popover.set_pointing_to(Some(&gtk4::gdk::Rectangle::new(x as i32, y as i32, 1, 1)));
    popover.connect_closed(|popover| popover.unparent());
    popover.popup();
}

/// Expandable list of every available sensor with a visibility check box
fn sensor_list(surface: &Rc<RefCell<GadgetSurface>>, window: &ApplicationWindow) -> Expander {
    let list = GtkBox::new(Orientation::Vertical, 0);
    let (sensors, shown) = {
        let s = surface.borrow();
        let sensors = s.available_sensors();
        let shown: Vec<bool> = sensors.iter().map(|x| s.registry().contains(x.as_ref())).collect();
        (sensors, shown)
    };

    for (sensor, active) in sensors.into_iter().zip(shown) {
        let hardware = sensor
            .hardware()
            .map(|h| h.name().to_string())
            .unwrap_or_default();
        let check = CheckButton::with_label(&format!(
            "{} / {} ({})",
            hardware,
            sensor.name(),
            sensor.sensor_type()
        ));
        check.set_active(active);
        let surface = surface.clone();
        let window = window.clone();
        check.connect_toggled(move |check| {
            surface
                .borrow_mut()
                .set_sensor_visible(&sensor, check.is_active());
            window.queue_draw();
        });
        list.append(&check);
    }

    let scroller = ScrolledWindow::builder()
        .hscrollbar_policy(gtk4::PolicyType::Never)
        .max_content_height(320)
        .propagate_natural_height(true)
        .child(&list)
        .build();

    let expander = Expander::new(Some("Sensors"));
    expander.set_child(Some(&scroller));
    expander
}

fn preset_row(label: &str) -> GtkBox {
    let row = GtkBox::new(Orientation::Horizontal, 2);
    let title = Label::new(Some(label));
    title.set_width_chars(10);
    title.set_xalign(0.0);
    row.append(&title);
    row
}

fn preset_button(label: &str, current: bool) -> Button {
    let btn = Button::with_label(label);
    btn.add_css_class("flat");
    if current {
        btn.add_css_class("suggested-action");
    }
    btn
}
