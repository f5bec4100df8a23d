//! Split-view geometry. Positions are offsets along the primary axis (x in
//! landscape, y in portrait) from the work-area origin.

use crate::constants::{DIVIDER_ENLARGED_THICKNESS, DIVIDER_THICKNESS};
use crate::geometry::{Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapPosition {
    /// Left in landscape, top in portrait.
    Primary,
    Secondary,
}

impl SnapPosition {
    pub fn opposite(self) -> Self {
        match self {
            SnapPosition::Primary => SnapPosition::Secondary,
            SnapPosition::Secondary => SnapPosition::Primary,
        }
    }
}

pub const FIXED_RATIOS: [f32; 5] = [0.0, 1.0 / 3.0, 0.5, 2.0 / 3.0, 1.0];

pub fn primary_length(work_area: &Rect, is_landscape: bool) -> i32 {
    if is_landscape {
        work_area.width
    } else {
        work_area.height
    }
}

pub fn primary_extent(size: Size, is_landscape: bool) -> i32 {
    if is_landscape { size.width } else { size.height }
}

pub fn divider_bounds(
    work_area: &Rect,
    is_landscape: bool,
    position: i32,
    is_dragging: bool,
) -> Rect {
    let (offset, thickness) = if is_dragging {
        (
            position - (DIVIDER_ENLARGED_THICKNESS - DIVIDER_THICKNESS) / 2,
            DIVIDER_ENLARGED_THICKNESS,
        )
    } else {
        (position, DIVIDER_THICKNESS)
    };
    if is_landscape {
        Rect::new(work_area.x + offset, work_area.y, thickness, work_area.height)
    } else {
        Rect::new(work_area.x, work_area.y + offset, work_area.width, thickness)
    }
}

pub fn snapped_window_bounds(
    work_area: &Rect,
    is_landscape: bool,
    position: i32,
    snap: SnapPosition,
) -> Rect {
    let length = primary_length(work_area, is_landscape);
    let position = position.clamp(0, length);
    let (start, extent) = match snap {
        SnapPosition::Primary => (0, position),
        SnapPosition::Secondary => {
            let start = (position + DIVIDER_THICKNESS).min(length);
            (start, length - start)
        }
    };
    if is_landscape {
        Rect::new(work_area.x + start, work_area.y, extent, work_area.height)
    } else {
        Rect::new(work_area.x, work_area.y + start, work_area.width, extent)
    }
}

/// Divider position that centers the divider on `ratio` of the primary axis.
pub fn divider_position_for_ratio(work_area: &Rect, is_landscape: bool, ratio: f32) -> i32 {
    let length = primary_length(work_area, is_landscape);
    let position = (length as f32 * ratio) as i32 - DIVIDER_THICKNESS / 2;
    position.clamp(0, (length - DIVIDER_THICKNESS).max(0))
}

/// Ratio the divider should settle on after a drag ends at `position`.
///
/// `min_primary`/`min_secondary` are the minimum primary-axis extents of the
/// two snapped windows; thirds are only offered when both fit.
pub fn closest_fixed_ratio(
    work_area: &Rect,
    is_landscape: bool,
    position: i32,
    min_primary: i32,
    min_secondary: i32,
    allow_thirds: bool,
) -> f32 {
    let fits = |ratio: f32| {
        let p = divider_position_for_ratio(work_area, is_landscape, ratio);
        let primary = snapped_window_bounds(work_area, is_landscape, p, SnapPosition::Primary);
        let secondary = snapped_window_bounds(work_area, is_landscape, p, SnapPosition::Secondary);
        primary_extent(primary.size(), is_landscape) >= min_primary
            && primary_extent(secondary.size(), is_landscape) >= min_secondary
    };
    FIXED_RATIOS
        .iter()
        .copied()
        .filter(|ratio| {
            let is_third = *ratio != 0.0 && *ratio != 0.5 && *ratio != 1.0;
            !is_third || (allow_thirds && fits(*ratio))
        })
        .min_by_key(|ratio| {
            (divider_position_for_ratio(work_area, is_landscape, *ratio) - position).abs()
        })
        .unwrap_or(0.5)
}
