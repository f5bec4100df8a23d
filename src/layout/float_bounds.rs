//! Placement policy for floated windows.

use crate::constants::{
    DIVIDER_THICKNESS, FLOAT_PADDING, TABLET_FLOAT_HEIGHT_RATIO, TABLET_FLOAT_WIDTH_RATIO,
    TUCK_HANDLE_HEIGHT, TUCK_HANDLE_WIDTH, TUCKED_VISIBLE_WIDTH,
};
use crate::geometry::{Orientation, Point, Rect, Size};

/// Work-area corner a tablet float is magnetized to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum MagnetismCorner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

impl MagnetismCorner {
    pub fn from_flags(left: bool, up: bool) -> Self {
        match (left, up) {
            (true, true) => MagnetismCorner::TopLeft,
            (false, true) => MagnetismCorner::TopRight,
            (true, false) => MagnetismCorner::BottomLeft,
            (false, false) => MagnetismCorner::BottomRight,
        }
    }

    pub fn is_left(self) -> bool {
        matches!(self, MagnetismCorner::TopLeft | MagnetismCorner::BottomLeft)
    }

    pub fn is_top(self) -> bool {
        matches!(self, MagnetismCorner::TopLeft | MagnetismCorner::TopRight)
    }
}

/// Work-area size as seen in landscape, so portrait floats keep the same
/// physical proportions.
pub fn landscape_size(work_area: &Rect, orientation: Orientation) -> Size {
    match orientation {
        Orientation::Landscape => work_area.size(),
        Orientation::Portrait => Size::new(work_area.height, work_area.width),
    }
}

pub fn can_float_in_clamshell(min_size: Size, work_area: &Rect) -> bool {
    let padded = work_area.inset(FLOAT_PADDING);
    min_size.width <= padded.width && min_size.height <= padded.height
}

/// Bounds for a clamshell float: `current` shrunk into the padded work area
/// and anchored at its bottom-right corner. `None` when the window cannot
/// float.
pub fn preferred_float_bounds_clamshell(
    current: Rect,
    min_size: Size,
    work_area: &Rect,
) -> Option<Rect> {
    if !can_float_in_clamshell(min_size, work_area) {
        return None;
    }
    let padded = work_area.inset(FLOAT_PADDING);
    let width = current.width.clamp(min_size.width, padded.width);
    let height = current.height.clamp(min_size.height, padded.height);
    Some(Rect::new(
        padded.right() - width,
        padded.bottom() - height,
        width,
        height,
    ))
}

fn tablet_float_size(min_size: Size, work_area: &Rect, orientation: Orientation) -> Size {
    let landscape = landscape_size(work_area, orientation);
    let width = ((landscape.width as f32 * TABLET_FLOAT_WIDTH_RATIO) as i32).max(min_size.width);
    let height = (landscape.height as f32 * TABLET_FLOAT_HEIGHT_RATIO) as i32;
    Size::new(width, height)
}

pub fn can_float_in_tablet(min_size: Size, work_area: &Rect, orientation: Orientation) -> bool {
    let landscape = landscape_size(work_area, orientation);
    let preferred = tablet_float_size(min_size, work_area, orientation);
    let max_width = (landscape.width - DIVIDER_THICKNESS) / 2 - 2 * FLOAT_PADDING;
    min_size.height <= preferred.height && min_size.width <= max_width
}

pub fn preferred_float_bounds_tablet(
    min_size: Size,
    work_area: &Rect,
    orientation: Orientation,
    corner: MagnetismCorner,
    is_tucked: bool,
) -> Rect {
    let size = tablet_float_size(min_size, work_area, orientation);
    let padded = work_area.inset(FLOAT_PADDING);

    let y = if corner.is_top() {
        padded.y
    } else {
        padded.bottom() - size.height
    };
    let x = match (is_tucked, corner.is_left()) {
        (false, true) => padded.x,
        (false, false) => padded.right() - size.width,
        (true, true) => work_area.x - size.width + TUCKED_VISIBLE_WIDTH,
        (true, false) => work_area.right() - TUCKED_VISIBLE_WIDTH,
    };
    Rect::from_origin_size(Point::new(x, y), size)
}

/// Quadrant of `point` relative to the work-area center.
pub fn magnetism_corner_for_point(point: Point, work_area: &Rect) -> MagnetismCorner {
    let center = work_area.center();
    MagnetismCorner::from_flags(point.x < center.x, point.y < center.y)
}

/// Handle flush against the on-screen edge of a tucked window, vertically
/// centered on it.
pub fn tuck_handle_bounds(window_bounds: &Rect, left: bool) -> Rect {
    let x = if left {
        window_bounds.right()
    } else {
        window_bounds.x - TUCK_HANDLE_WIDTH
    };
    let y = window_bounds.y + (window_bounds.height - TUCK_HANDLE_HEIGHT) / 2;
    Rect::new(x, y, TUCK_HANDLE_WIDTH, TUCK_HANDLE_HEIGHT)
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORK_AREA: Rect = Rect::new(0, 0, 1600, 952);

    #[test]
    fn clamshell_anchors_bottom_right_inside_padding() {
        let bounds = preferred_float_bounds_clamshell(
            Rect::new(100, 100, 400, 300),
            Size::default(),
            &WORK_AREA,
        )
        .unwrap();
        assert_eq!(bounds.bottom_right(), Point::new(1592, 944));
        assert_eq!(bounds.size(), Size::new(400, 300));
    }

    #[test]
    fn clamshell_shrinks_oversized_windows() {
        let bounds =
            preferred_float_bounds_clamshell(WORK_AREA, Size::default(), &WORK_AREA).unwrap();
        assert_eq!(bounds, WORK_AREA.inset(FLOAT_PADDING));
    }

    #[test]
    fn clamshell_rejects_large_minimum_size() {
        assert!(!can_float_in_clamshell(Size::new(1590, 10), &WORK_AREA));
        assert_eq!(
            preferred_float_bounds_clamshell(WORK_AREA, Size::new(10, 940), &WORK_AREA),
            None
        );
    }

    #[test]
    fn tablet_size_uses_landscape_proportions() {
        let landscape = preferred_float_bounds_tablet(
            Size::default(),
            &WORK_AREA,
            Orientation::Landscape,
            MagnetismCorner::BottomRight,
            false,
        );
        assert_eq!(landscape.size(), Size::new(533, 761));

        let portrait_area = Rect::new(0, 0, 952, 1600);
        let portrait = preferred_float_bounds_tablet(
            Size::default(),
            &portrait_area,
            Orientation::Portrait,
            MagnetismCorner::TopLeft,
            false,
        );
        assert_eq!(portrait.size(), landscape.size());
        assert_eq!(portrait.origin(), Point::new(8, 8));
    }

    #[test]
    fn tablet_width_grows_to_minimum() {
        let bounds = preferred_float_bounds_tablet(
            Size::new(600, 100),
            &WORK_AREA,
            Orientation::Landscape,
            MagnetismCorner::TopLeft,
            false,
        );
        assert_eq!(bounds.width, 600);
    }

    #[test]
    fn tucked_windows_leave_a_sliver_on_screen() {
        for corner in [MagnetismCorner::TopLeft, MagnetismCorner::BottomLeft] {
            let bounds = preferred_float_bounds_tablet(
                Size::default(),
                &WORK_AREA,
                Orientation::Landscape,
                corner,
                true,
            );
            assert_eq!(bounds.right(), TUCKED_VISIBLE_WIDTH);
        }
        for corner in [MagnetismCorner::TopRight, MagnetismCorner::BottomRight] {
            let bounds = preferred_float_bounds_tablet(
                Size::default(),
                &WORK_AREA,
                Orientation::Landscape,
                corner,
                true,
            );
            assert_eq!(bounds.x, WORK_AREA.right() - TUCKED_VISIBLE_WIDTH);
        }
    }

    #[test]
    fn tablet_eligibility() {
        // (1600 - 8) / 2 - 16 = 780
        assert!(can_float_in_tablet(Size::new(780, 100), &WORK_AREA, Orientation::Landscape));
        assert!(!can_float_in_tablet(Size::new(781, 100), &WORK_AREA, Orientation::Landscape));
        assert!(!can_float_in_tablet(Size::new(100, 800), &WORK_AREA, Orientation::Landscape));
    }

    #[test]
    fn quadrant_mapping() {
        let (w, h) = (WORK_AREA.width as f32, WORK_AREA.height as f32);
        let at = |fx: f32, fy: f32| Point::new((w * fx) as i32, (h * fy) as i32);
        let corner = |fx: f32, fy: f32| magnetism_corner_for_point(at(fx, fy), &WORK_AREA);
        assert_eq!(corner(0.1, 0.1), MagnetismCorner::TopLeft);
        assert_eq!(corner(0.9, 0.1), MagnetismCorner::TopRight);
        assert_eq!(corner(0.1, 0.9), MagnetismCorner::BottomLeft);
        assert_eq!(corner(0.9, 0.9), MagnetismCorner::BottomRight);
    }

    #[test]
    fn handle_sits_on_visible_edge() {
        let left = tuck_handle_bounds(&Rect::new(-433, 8, 533, 761), true);
        assert_eq!(left, Rect::new(100, 8 + (761 - 92) / 2, 20, 92));
        let right = tuck_handle_bounds(&Rect::new(1500, 8, 533, 761), false);
        assert_eq!(right.right(), 1500);
    }
}
