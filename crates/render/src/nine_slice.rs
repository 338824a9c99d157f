//! Nine-slice scaling of bordered artwork.
//!
//! Corners are copied 1:1, top/bottom edges stretch horizontally, left/right
//! edges stretch vertically and the center stretches both ways.

use cairo::{Context, Extend, ImageSurface};
use sens_gadget_core::BorderInsets;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl SliceRect {
    fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Source and destination rectangle of one slice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slice {
    pub src: SliceRect,
    pub dst: SliceRect,
}

/// The nine (source, destination) pairs, row by row from the top-left corner
pub fn nine_slice_regions(
    src_width: f64,
    src_height: f64,
    dst_width: f64,
    dst_height: f64,
    insets: BorderInsets,
) -> [Slice; 9] {
    let (t, b) = (insets.top as f64, insets.bottom as f64);
    let (l, r) = (insets.left as f64, insets.right as f64);

    let src_cols = [(0.0, l), (l, src_width - l - r), (src_width - r, r)];
    let src_rows = [(0.0, t), (t, src_height - t - b), (src_height - b, b)];
    let dst_cols = [(0.0, l), (l, dst_width - l - r), (dst_width - r, r)];
    let dst_rows = [(0.0, t), (t, dst_height - t - b), (dst_height - b, b)];

    std::array::from_fn(|i| {
        let (row, col) = (i / 3, i % 3);
        Slice {
            src: SliceRect::new(src_cols[col].0, src_rows[row].0, src_cols[col].1, src_rows[row].1),
            dst: SliceRect::new(dst_cols[col].0, dst_rows[row].0, dst_cols[col].1, dst_rows[row].1),
        }
    })
}

/// Draw `image` nine-sliced over a `width` x `height` box at the origin
pub fn draw_nine_slice(
    cr: &Context,
    image: &ImageSurface,
    width: f64,
    height: f64,
    insets: BorderInsets,
    alpha: f64,
) -> Result<(), cairo::Error> {
    let regions = nine_slice_regions(
        image.width() as f64,
        image.height() as f64,
        width,
        height,
        insets,
    );

    for slice in regions.iter().filter(|s| !s.src.is_empty() && !s.dst.is_empty()) {
        cr.save()?;
        cr.translate(slice.dst.x, slice.dst.y);
        cr.scale(slice.dst.width / slice.src.width, slice.dst.height / slice.src.height);
        cr.rectangle(0.0, 0.0, slice.src.width, slice.src.height);
        cr.clip();
        cr.set_source_surface(image, -slice.src.x, -slice.src.y)?;
        // Keep stretched edges from sampling transparent pixels outside the image
        cr.source().set_extend(Extend::Pad);
        cr.paint_with_alpha(alpha)?;
        cr.restore()?;
    }

    Ok(())
}

/// Destination of an image fitted into a box, keeping its aspect ratio and
/// centering it along the axis with slack
pub fn fit_center(
    image_width: f64,
    image_height: f64,
    box_x: f64,
    box_y: f64,
    box_width: f64,
    box_height: f64,
) -> SliceRect {
    let x_ratio = box_width / image_width;
    let y_ratio = box_height / image_height;
    if x_ratio < y_ratio {
        let height = image_height * x_ratio;
        SliceRect::new(box_x, box_y + 0.5 * (box_height - height), box_width, height)
    } else {
        let width = image_width * y_ratio;
        SliceRect::new(box_x + 0.5 * (box_width - width), box_y, width, box_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(surface: &mut ImageSurface, x: usize, y: usize) -> (u8, u8, u8, u8) {
        surface.flush();
        let stride = surface.stride() as usize;
        let data = surface.data().unwrap();
        let i = y * stride + x * 4;
        // ARGB32 is stored native-endian; on little-endian that's B, G, R, A
        (data[i + 2], data[i + 1], data[i], data[i + 3])
    }

    #[test]
    fn test_regions_cover_destination() {
        let regions = nine_slice_regions(32.0, 32.0, 200.0, 88.0, BorderInsets::GADGET);
        let area: f64 = regions.iter().map(|s| s.dst.width * s.dst.height).sum();
        assert_eq!(area, 200.0 * 88.0);
        // Corners keep their size
        assert_eq!(regions[0].dst, SliceRect::new(0.0, 0.0, 6.0, 6.0));
        assert_eq!(regions[8].dst, SliceRect::new(193.0, 81.0, 7.0, 7.0));
        assert_eq!(regions[8].src, SliceRect::new(25.0, 25.0, 7.0, 7.0));
        // Center stretches both ways
        assert_eq!(regions[4].src, SliceRect::new(6.0, 6.0, 19.0, 19.0));
        assert_eq!(regions[4].dst, SliceRect::new(6.0, 6.0, 187.0, 75.0));
    }

    #[test]
    fn test_fit_center_uses_smaller_ratio() {
        let wide = fit_center(100.0, 50.0, 6.0, 6.0, 50.0, 50.0);
        assert_eq!(wide, SliceRect::new(6.0, 18.5, 50.0, 25.0));
        let tall = fit_center(50.0, 100.0, 6.0, 6.0, 50.0, 50.0);
        assert_eq!(tall, SliceRect::new(18.5, 6.0, 25.0, 50.0));
    }

    #[test]
    #[cfg(target_endian = "little")]
    fn test_corners_are_copied_pixel_exact() {
        let source = ImageSurface::create(cairo::Format::ARgb32, 16, 16).unwrap();
        {
            let cr = Context::new(&source).unwrap();
            cr.set_source_rgb(0.0, 0.0, 1.0);
            cr.paint().unwrap();
            cr.set_source_rgb(1.0, 0.0, 0.0);
            cr.rectangle(0.0, 0.0, 6.0, 6.0);
            cr.fill().unwrap();
        }

        let mut target = ImageSurface::create(cairo::Format::ARgb32, 64, 40).unwrap();
        {
            let cr = Context::new(&target).unwrap();
            draw_nine_slice(&cr, &source, 64.0, 40.0, BorderInsets::GADGET, 1.0).unwrap();
        }

        assert_eq!(pixel(&mut target, 0, 0), (255, 0, 0, 255));
        assert_eq!(pixel(&mut target, 5, 5), (255, 0, 0, 255));
        assert_eq!(pixel(&mut target, 32, 20), (0, 0, 255, 255));
        assert_eq!(pixel(&mut target, 63, 39), (0, 0, 255, 255));
    }
}
