//! Pure placement helpers shared by the float and split-view controllers.

pub mod divider;
pub mod float_bounds;

pub use divider::{
    FIXED_RATIOS, SnapPosition, closest_fixed_ratio, divider_bounds, divider_position_for_ratio,
    primary_extent, primary_length, snapped_window_bounds,
};
pub use float_bounds::{
    MagnetismCorner, can_float_in_clamshell, can_float_in_tablet, landscape_size,
    magnetism_corner_for_point, preferred_float_bounds_clamshell, preferred_float_bounds_tablet,
    tuck_handle_bounds,
};
