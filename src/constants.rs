//! Shared crate-wide constants.

use std::time::Duration;

/// Padding between a floated window and the edges of the work area, in both
/// clamshell and tablet placement.
pub const FLOAT_PADDING: i32 = 8;

/// Width of a tucked floated window that remains on screen.
pub const TUCKED_VISIBLE_WIDTH: i32 = 100;

/// Fraction of the landscape work-area width used for a tablet float.
pub const TABLET_FLOAT_WIDTH_RATIO: f32 = 1.0 / 3.0;

/// Fraction of the landscape work-area height used for a tablet float.
pub const TABLET_FLOAT_HEIGHT_RATIO: f32 = 0.8;

/// Short side of the split-view divider while idle.
pub const DIVIDER_THICKNESS: i32 = 8;

/// Short side of the split-view divider while it is being dragged. The
/// enlarged strip is centered on the idle one.
pub const DIVIDER_ENLARGED_THICKNESS: i32 = 16;

/// Size of the affordance shown next to a tucked window.
pub const TUCK_HANDLE_WIDTH: i32 = 20;
pub const TUCK_HANDLE_HEIGHT: i32 = 92;

/// How far past its resting position a window slides before settling when
/// tucked.
pub const TUCK_BOUNCE_DISTANCE: i32 = 20;

pub const TUCK_SLIDE_DURATION: Duration = Duration::from_millis(400);
pub const TUCK_SETTLE_DURATION: Duration = Duration::from_millis(533);
pub const UNTUCK_DURATION: Duration = Duration::from_millis(400);

/// Drags that move less than this (euclidean, in pixels) are reverted on
/// release instead of re-magnetizing the window.
pub const MIN_DRAG_DISTANCE: i32 = 5;

/// Fling speed (pixels per second) above which a release tucks the window.
pub const FLING_VELOCITY_THRESHOLD: f32 = 800.0;

/// Distance from a primary-axis screen edge inside which a float drag
/// proposes a split-view snap.
pub const SNAP_EDGE_INSET: i32 = 16;

/// Lowest point (as a fraction of the work-area height) the bottom snapped
/// window may be pushed up to by the on-screen keyboard.
pub const KEYBOARD_MIN_TOP_RATIO: f32 = 1.0 / 3.0;

pub const DIVIDER_SNAP_DURATION: Duration = Duration::from_millis(300);

/// Scale of the desk drag proxy relative to its mini view.
pub const DESK_DRAG_PROXY_SCALE: f64 = 1.2;
pub const DESK_DRAG_PROXY_GROW_DURATION: Duration = Duration::from_millis(200);
pub const DESK_DRAG_PROXY_SNAP_BACK_DURATION: Duration = Duration::from_millis(300);

/// Mini view geometry inside the desks bar.
pub const DESK_MINI_VIEW_WIDTH: i32 = 160;
pub const DESK_MINI_VIEW_HEIGHT: i32 = 100;
pub const DESK_MINI_VIEW_SPACING: i32 = 12;
pub const DESKS_BAR_HEIGHT: i32 = 128;
