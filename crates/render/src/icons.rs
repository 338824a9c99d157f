//! Small vector icons shown next to group headers.

use cairo::Context;
use sens_gadget_types::{Color, HardwareType};

use crate::assets::rounded_rect;

fn icon_color(hardware_type: HardwareType) -> Color {
    match hardware_type {
        HardwareType::Cpu => Color::from_rgb8(86, 156, 214),
        HardwareType::GpuNvidia => Color::from_rgb8(118, 185, 0),
        HardwareType::GpuAti => Color::from_rgb8(237, 28, 36),
        HardwareType::Ram => Color::from_rgb8(78, 201, 176),
        HardwareType::Hdd => Color::from_rgb8(197, 134, 192),
        HardwareType::Nic => Color::from_rgb8(220, 220, 170),
        HardwareType::Mainboard | HardwareType::SuperIo => Color::from_rgb8(206, 145, 120),
        HardwareType::TBalancer | HardwareType::Heatmaster => Color::from_rgb8(156, 220, 254),
    }
}

/// Draw the icon for `hardware_type` in a `size` x `size` box at (`x`, `y`)
pub fn draw_hardware_icon(
    cr: &Context,
    hardware_type: HardwareType,
    x: f64,
    y: f64,
    size: f64,
) -> Result<(), cairo::Error> {
    if size <= 0.0 {
        return Ok(());
    }
    let color = icon_color(hardware_type);
    cr.save()?;
    cr.translate(x, y);
    cr.set_line_width((size / 11.0).max(1.0));

    match hardware_type {
        HardwareType::Cpu
        | HardwareType::GpuNvidia
        | HardwareType::GpuAti
        | HardwareType::SuperIo
        | HardwareType::TBalancer
        | HardwareType::Heatmaster => {
            // Chip with pins on every side
            let inset = size * 0.2;
            let body = size - 2.0 * inset;
            color.apply_to_cairo(cr);
            cr.rectangle(inset, inset, body, body);
            cr.fill()?;
            for i in 0..3 {
                let p = inset + body * (i as f64 + 0.5) / 3.0;
                cr.move_to(p, 0.0);
                cr.line_to(p, inset);
                cr.move_to(p, size - inset);
                cr.line_to(p, size);
                cr.move_to(0.0, p);
                cr.line_to(inset, p);
                cr.move_to(size - inset, p);
                cr.line_to(size, p);
            }
            cr.stroke()?;
        }
        HardwareType::Ram => {
            // Memory stick with notches
            color.apply_to_cairo(cr);
            cr.rectangle(0.0, size * 0.3, size, size * 0.4);
            cr.fill()?;
            cr.set_source_rgba(0.0, 0.0, 0.0, 0.6);
            for i in 0..3 {
                let px = size * (0.2 + 0.25 * i as f64);
                cr.rectangle(px, size * 0.38, size * 0.12, size * 0.24);
            }
            cr.fill()?;
        }
        HardwareType::Hdd => {
            let c = size / 2.0;
            color.apply_to_cairo(cr);
            cr.arc(c, c, c * 0.95, 0.0, std::f64::consts::TAU);
            cr.fill()?;
            cr.set_source_rgba(0.0, 0.0, 0.0, 0.6);
            cr.arc(c, c, c * 0.25, 0.0, std::f64::consts::TAU);
            cr.fill()?;
        }
        HardwareType::Nic => {
            // Up and down arrows
            color.apply_to_cairo(cr);
            let (left, right) = (size * 0.3, size * 0.7);
            cr.move_to(left, size);
            cr.line_to(left, size * 0.15);
            cr.move_to(left - size * 0.2, size * 0.35);
            cr.line_to(left, size * 0.1);
            cr.line_to(left + size * 0.2, size * 0.35);
            cr.move_to(right, 0.0);
            cr.line_to(right, size * 0.85);
            cr.move_to(right - size * 0.2, size * 0.65);
            cr.line_to(right, size * 0.9);
            cr.line_to(right + size * 0.2, size * 0.65);
            cr.stroke()?;
        }
        HardwareType::Mainboard => {
            color.apply_to_cairo(cr);
            rounded_rect(cr, 0.5, 0.5, size - 1.0, size - 1.0, size * 0.15);
            cr.stroke()?;
            cr.rectangle(size * 0.25, size * 0.25, size * 0.3, size * 0.3);
            cr.fill()?;
        }
    }

    cr.restore()
}
