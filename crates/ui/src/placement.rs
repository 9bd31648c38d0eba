//! Viewport-aware popup placement
//!
//! Pure geometry: given the pointer position and the popup and viewport
//! dimensions, compute where the popup goes. The popup prefers sitting
//! below-right of the pointer; each axis independently flips to the other
//! side of the pointer when the default placement would overflow that
//! viewport edge, and clamps to the margin when even the flipped position
//! does not fit.

/// Offset of the popup's default position from the pointer, per axis
pub const POINTER_OFFSET: f32 = 16.0;

/// Default gap kept between the popup and the viewport edges
pub const DEFAULT_EDGE_MARGIN: f32 = 8.0;

/// Compute the popup's top-left corner
///
/// Horizontal and vertical decisions are independent: a popup can flip on
/// one axis and keep the default placement on the other.
pub fn place(
    pointer_x: f32,
    pointer_y: f32,
    popup_width: f32,
    popup_height: f32,
    viewport_width: f32,
    viewport_height: f32,
    margin: f32,
) -> (f32, f32) {
    let mut left = pointer_x + POINTER_OFFSET;
    if left + popup_width + margin > viewport_width {
        left = (pointer_x - POINTER_OFFSET - popup_width).max(margin);
    }

    let mut top = pointer_y + POINTER_OFFSET;
    if top + popup_height + margin > viewport_height {
        top = (pointer_y - POINTER_OFFSET - popup_height).max(margin);
    }

    (left, top)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VW: f32 = 1200.0;
    const VH: f32 = 800.0;
    const PW: f32 = 260.0;
    const PH: f32 = 340.0;
    const M: f32 = DEFAULT_EDGE_MARGIN;

    fn fits(left: f32, top: f32) -> bool {
        left >= 0.0 && top >= 0.0 && left + PW <= VW && top + PH <= VH
    }

    #[test]
    fn test_default_placement_offsets_from_pointer() {
        let (left, top) = place(100.0, 100.0, PW, PH, VW, VH, M);
        assert_eq!((left, top), (116.0, 116.0));
    }

    #[test]
    fn test_flips_left_near_right_edge() {
        let pointer_x = VW - 40.0;
        let (left, top) = place(pointer_x, 100.0, PW, PH, VW, VH, M);
        assert_eq!(left, pointer_x - POINTER_OFFSET - PW);
        assert_eq!(top, 116.0);
        assert!(fits(left, top));
    }

    #[test]
    fn test_flips_up_near_bottom_edge() {
        let pointer_y = VH - 40.0;
        let (left, top) = place(100.0, pointer_y, PW, PH, VW, VH, M);
        assert_eq!(left, 116.0);
        assert_eq!(top, pointer_y - POINTER_OFFSET - PH);
        assert!(fits(left, top));
    }

    #[test]
    fn test_corner_flips_both_axes() {
        let (left, top) = place(VW - 10.0, VH - 10.0, PW, PH, VW, VH, M);
        assert!(fits(left, top));
        assert!(left < VW - 10.0);
        assert!(top < VH - 10.0);
    }

    #[test]
    fn test_flip_clamps_to_margin() {
        // Pointer near the right edge of a viewport narrower than
        // offset + popup width: the flipped position would go negative.
        let (left, _top) = place(250.0, 100.0, PW, PH, 300.0, VH, M);
        assert_eq!(left, M);
    }

    #[test]
    fn test_vertical_clamp_to_margin() {
        let (_left, top) = place(100.0, 300.0, PW, PH, VW, 320.0, M);
        assert_eq!(top, M);
    }

    #[test]
    fn test_in_viewport_whenever_possible() {
        // Sweep pointer positions; wherever a non-overflowing placement
        // exists the result must be fully inside the viewport.
        let mut y = 0.0;
        while y <= VH {
            let mut x = 0.0;
            while x <= VW {
                let (left, top) = place(x, y, PW, PH, VW, VH, M);
                assert!(
                    fits(left, top),
                    "placement ({left}, {top}) overflows for pointer ({x}, {y})"
                );
                x += 50.0;
            }
            y += 50.0;
        }
    }

    #[test]
    fn test_zero_margin() {
        let (left, top) = place(VW, VH, PW, PH, VW, VH, 0.0);
        assert!(left + PW <= VW);
        assert!(top + PH <= VH);
        assert!(left >= 0.0 && top >= 0.0);
    }
}
