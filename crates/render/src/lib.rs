//! sens-gadget-render: Cairo compositing pipeline for the gadget panel.

pub mod assets;
pub mod background;
pub mod compositor;
pub mod icons;
pub mod nine_slice;
pub mod painter;
pub mod pango_text;

pub use assets::{AssetError, AssetKind, GadgetAssets};
pub use background::BackgroundCache;
pub use compositor::{Compositor, FrameStats};
pub use nine_slice::{draw_nine_slice, fit_center, nine_slice_regions};
