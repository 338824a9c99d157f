use clap::Parser;
use gtk4::prelude::*;
use gtk4::{glib, Application};
use log::{info, warn};
use sens_gadget::surface::GadgetSurface;
use sens_gadget::ui;
use sens_gadget_core::{visibility_key, JsonSettings, MemorySettings, SettingsExt, SettingsStore};
use sens_gadget_render::GadgetAssets;
use sens_gadget_sources::SimulatedComputer;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

const APP_ID: &str = "org.sens_gadget.SensGadget";

/// sens-gadget - A borderless desktop panel mirroring hardware sensors
#[derive(Parser, Debug, Clone)]
#[command(name = "sens-gadget")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Directory holding the gadget_*.png images
    #[arg(long = "assets", value_name = "DIR")]
    assets: Option<PathBuf>,

    /// Settings file (defaults to the user config directory)
    #[arg(long = "settings", value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Start with this panel width in pixels
    #[arg(long = "width", value_name = "PX")]
    width: Option<i32>,

    /// Mark every sensor visible before the hardware is attached
    #[arg(long = "show-all")]
    show_all: bool,
}

fn open_settings(path: Option<PathBuf>) -> Arc<dyn SettingsStore> {
    let path = match path {
        Some(path) => path,
        None => match JsonSettings::default_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("No settings location ({}); settings will not be saved", e);
                return Arc::new(MemorySettings::new());
            }
        },
    };
    match JsonSettings::open(path.clone()) {
        Ok(settings) => {
            info!("Settings file: {}", settings.path().display());
            Arc::new(settings)
        }
        Err(e) => {
            warn!("Failed to load settings '{}': {}", path.display(), e);
            Arc::new(MemorySettings::new())
        }
    }
}

fn main() -> glib::ExitCode {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    warn!("Starting sens-gadget v{}", env!("CARGO_PKG_VERSION"));

    let settings = open_settings(cli.settings.clone());
    let simulated = SimulatedComputer::default();
    if cli.show_all {
        for sensor in simulated.sensors() {
            settings.set_value(&visibility_key(sensor.as_ref()), true);
        }
        info!("Marked {} sensors visible", simulated.sensors().len());
    }

    // activate may fire more than once; only the first builds a window
    let pending = Rc::new(RefCell::new(Some((settings, simulated))));

    let app = Application::builder().application_id(APP_ID).build();
    app.connect_activate(move |app| {
        let Some((settings, simulated)) = pending.borrow_mut().take() else {
            return;
        };
        build_ui(app, &cli, settings, simulated);
    });

    // Pass empty args since clap already parsed them
    app.run_with_args(&["sens-gadget"])
}

fn build_ui(app: &Application, cli: &Cli, settings: Arc<dyn SettingsStore>, simulated: SimulatedComputer) {
    info!("Building UI");
    ui::load_css();

    let assets = GadgetAssets::load(cli.assets.clone().unwrap_or_else(|| PathBuf::from(".")));
    // GTK already hands the draw func a scaled context
    let mut surface = GadgetSurface::new(settings, assets, 1.0);
    surface.attach(simulated.computer());
    if let Some(width) = cli.width {
        surface.resize(width);
    }
    let surface = Rc::new(RefCell::new(surface));

    let mut simulated = simulated;
    let dt = ui::TICK_INTERVAL.as_secs_f32();
    ui::build_gadget_window(app, surface, move || simulated.tick(dt));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_id_is_valid() {
        assert!(gtk4::gio::Application::id_is_valid(APP_ID));
        assert!(APP_ID.contains("sens_gadget"));
    }
}
