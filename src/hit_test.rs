//! Pointer hit testing for the borderless panel.

use sens_gadget_core::BorderInsets;

/// What a pointer press at a given position should do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitRegion {
    /// Inside the panel; a drag moves the window
    Client,
    ResizeLeft,
    ResizeRight,
}

/// Classify a pointer x position on a panel `width` pixels wide.
///
/// Only the left and right border insets resize, and only while the panel is
/// not locked. The height is always derived, so there is no vertical resize.
pub fn hit_test(x: f64, width: i32, insets: BorderInsets, locked: bool) -> HitRegion {
    if locked {
        return HitRegion::Client;
    }
    if x < insets.left as f64 {
        HitRegion::ResizeLeft
    } else if x > (width - 1 - insets.right) as f64 {
        HitRegion::ResizeRight
    } else {
        HitRegion::Client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_resize() {
        let insets = BorderInsets::GADGET;
        assert_eq!(hit_test(0.0, 130, insets, false), HitRegion::ResizeLeft);
        assert_eq!(hit_test(5.9, 130, insets, false), HitRegion::ResizeLeft);
        assert_eq!(hit_test(6.0, 130, insets, false), HitRegion::Client);
        assert_eq!(hit_test(122.0, 130, insets, false), HitRegion::Client);
        assert_eq!(hit_test(122.5, 130, insets, false), HitRegion::ResizeRight);
        assert_eq!(hit_test(129.0, 130, insets, false), HitRegion::ResizeRight);
    }

    #[test]
    fn test_locked_never_resizes() {
        let insets = BorderInsets::GADGET;
        for x in [0.0, 65.0, 129.0] {
            assert_eq!(hit_test(x, 130, insets, true), HitRegion::Client);
        }
    }
}
