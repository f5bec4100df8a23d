//! Per-drag controller for a floated window.
//!
//! Idle -> Dragging -> Completed | Reverted. The window follows the pointer
//! freely while dragging; the release decides between reverting, snapping
//! into split view and re-magnetizing to a corner.

use crate::geometry::{Point, Rect};
use crate::layout::{MagnetismCorner, SnapPosition};
use crate::window::{LayoutContext, WindowId};

use super::FloatController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Dragging,
    Completed,
    Reverted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragGesture {
    /// Pointer or touch fling, in pixels per second.
    Fling { velocity_x: f32, velocity_y: f32 },
    /// Discrete swipe with no velocity.
    Swipe { left: bool, up: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The window stopped being floated during the drag.
    Ignored,
    Reverted,
    /// The window should leave float state and snap into split view.
    Snap(SnapPosition),
    Magnetized(MagnetismCorner),
    /// Clamshell drags leave the window where it was dropped.
    Moved,
    Tucked(MagnetismCorner),
}

#[derive(Debug)]
pub struct FloatDragController {
    target: WindowId,
    initial_location: Point,
    last_location: Point,
    initial_bounds: Rect,
    start_edge: Option<SnapPosition>,
    pending_snap_position: Option<SnapPosition>,
    phase: DragPhase,
}

impl FloatDragController {
    /// Starts dragging `window`. Returns `None` if it is not floated.
    pub fn start(
        ctx: &mut LayoutContext<'_>,
        float: &mut FloatController,
        window: WindowId,
        location: Point,
    ) -> Option<Self> {
        if !float.is_floated(window) {
            return None;
        }
        float.maybe_untuck_window(ctx, window, false);
        let initial_bounds = ctx.host.bounds_in_screen(window);
        let start_edge = Self::edge_region(ctx, window, location);
        tracing::debug!(window_id = %window, ?location, ?start_edge, "float drag started");
        Some(Self {
            target: window,
            initial_location: location,
            last_location: location,
            initial_bounds,
            start_edge,
            pending_snap_position: None,
            phase: DragPhase::Dragging,
        })
    }

    pub fn target(&self) -> WindowId {
        self.target
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn initial_bounds(&self) -> Rect {
        self.initial_bounds
    }

    pub fn pending_snap_position(&self) -> Option<SnapPosition> {
        self.pending_snap_position
    }

    fn primary_coordinate(is_landscape: bool, point: Point) -> i32 {
        if is_landscape { point.x } else { point.y }
    }

    /// Snap side whose edge region contains `location`.
    fn edge_region(
        ctx: &LayoutContext<'_>,
        window: WindowId,
        location: Point,
    ) -> Option<SnapPosition> {
        let work_area = ctx.host.work_area_for_window(window);
        let is_landscape = ctx.host.display_orientation(window).is_landscape();
        let inset = ctx.config.snap_edge_inset;
        let (start, end) = if is_landscape {
            (work_area.x, work_area.right())
        } else {
            (work_area.y, work_area.bottom())
        };
        let p = Self::primary_coordinate(is_landscape, location);
        if p < start + inset {
            Some(SnapPosition::Primary)
        } else if p >= end - inset {
            Some(SnapPosition::Secondary)
        } else {
            None
        }
    }

    fn compute_snap_position(
        &self,
        ctx: &LayoutContext<'_>,
        location: Point,
    ) -> Option<SnapPosition> {
        if !ctx.host.can_resize(self.target) {
            return None;
        }
        let edge = Self::edge_region(ctx, self.target, location)?;
        // A drag that begins inside an edge region only proposes that edge
        // while the pointer has not moved back away from it.
        if self.start_edge == Some(edge) {
            let is_landscape = ctx.host.display_orientation(self.target).is_landscape();
            let now = Self::primary_coordinate(is_landscape, location);
            let initial = Self::primary_coordinate(is_landscape, self.initial_location);
            let moved_away = match edge {
                SnapPosition::Primary => now > initial,
                SnapPosition::Secondary => now < initial,
            };
            if moved_away {
                return None;
            }
        }
        Some(edge)
    }

    pub fn drag(&mut self, ctx: &mut LayoutContext<'_>, location: Point) {
        if self.phase != DragPhase::Dragging {
            return;
        }
        let delta = location.delta_from(self.initial_location);
        ctx.host
            .set_bounds(self.target, self.initial_bounds.offset(delta));
        self.last_location = location;
        let pending = self.compute_snap_position(ctx, location);
        if pending != self.pending_snap_position {
            tracing::trace!(window_id = %self.target, ?pending, "snap preview changed");
        }
        self.pending_snap_position = pending;
    }

    pub fn complete(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        float: &mut FloatController,
    ) -> DragOutcome {
        if self.phase != DragPhase::Dragging {
            return DragOutcome::Ignored;
        }
        if !float.is_floated(self.target) {
            self.phase = DragPhase::Completed;
            return DragOutcome::Ignored;
        }
        let displacement = self.last_location.delta_from(self.initial_location);
        let min = ctx.config.min_drag_distance as i64;
        if displacement.length_squared() < min * min {
            self.revert(ctx);
            return DragOutcome::Reverted;
        }
        self.phase = DragPhase::Completed;
        if let Some(snap) = self.pending_snap_position {
            tracing::debug!(window_id = %self.target, ?snap, "float drag ends in snap");
            return DragOutcome::Snap(snap);
        }
        if !ctx.host.is_in_tablet_mode() {
            return DragOutcome::Moved;
        }
        match float.on_drag_completed_for_tablet(ctx, self.target, self.last_location) {
            Some(corner) => DragOutcome::Magnetized(corner),
            None => DragOutcome::Ignored,
        }
    }

    /// Puts the window back where the drag started. Never animates.
    pub fn revert(&mut self, ctx: &mut LayoutContext<'_>) {
        if self.phase != DragPhase::Dragging {
            return;
        }
        ctx.host.set_bounds(self.target, self.initial_bounds);
        self.pending_snap_position = None;
        self.phase = DragPhase::Reverted;
        tracing::debug!(window_id = %self.target, "float drag reverted");
    }

    pub fn fling_or_swipe(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        float: &mut FloatController,
        gesture: DragGesture,
    ) -> DragOutcome {
        if self.phase != DragPhase::Dragging {
            return DragOutcome::Ignored;
        }
        let (left, up) = match gesture {
            DragGesture::Fling {
                velocity_x,
                velocity_y,
            } => {
                let threshold = ctx.config.fling_velocity_threshold;
                let speed_squared = velocity_x * velocity_x + velocity_y * velocity_y;
                if speed_squared < threshold * threshold {
                    return self.complete(ctx, float);
                }
                (velocity_x < 0.0, velocity_y < 0.0)
            }
            DragGesture::Swipe { left, up } => (left, up),
        };
        if !float.is_floated(self.target) || !ctx.host.is_in_tablet_mode() {
            return self.complete(ctx, float);
        }
        self.phase = DragPhase::Completed;
        float.on_fling_or_swipe_for_tablet(ctx, self.target, left, up);
        DragOutcome::Tucked(MagnetismCorner::from_flags(left, up))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animator;
    use crate::config::{DisplaySpec, LayoutConfig};
    use crate::window::headless::{HeadlessHost, WindowOptions};
    use crate::window::{LayoutEvent, WindowHost};

    struct Fixture {
        host: HeadlessHost,
        animator: Animator,
        config: LayoutConfig,
        events: Vec<LayoutEvent>,
        float: FloatController,
    }

    impl Fixture {
        fn tablet() -> (Self, WindowId) {
            let mut host = HeadlessHost::new(DisplaySpec::default());
            host.set_tablet_mode(true);
            let window = host.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)));
            let mut fixture = Self {
                host,
                animator: Animator::new(0.0),
                config: LayoutConfig::default(),
                events: Vec::new(),
                float: FloatController::new(),
            };
            fixture.run(|ctx, float| float.float_window(ctx, window));
            (fixture, window)
        }

        fn ctx(&mut self) -> LayoutContext<'_> {
            LayoutContext::new(
                &mut self.host,
                &mut self.animator,
                &self.config,
                &mut self.events,
            )
        }

        fn run<T>(
            &mut self,
            f: impl FnOnce(&mut LayoutContext<'_>, &mut FloatController) -> T,
        ) -> T {
            let mut float = std::mem::take(&mut self.float);
            let out = {
                let mut ctx = self.ctx();
                f(&mut ctx, &mut float)
            };
            self.float = float;
            out
        }
    }

    #[test]
    fn small_drags_revert_exactly() {
        let (mut fx, window) = Fixture::tablet();
        let before = fx.host.bounds_in_screen(window);
        let outcome = fx.run(|ctx, float| {
            let mut drag = FloatDragController::start(ctx, float, window, Point::new(1300, 500))
                .unwrap();
            drag.drag(ctx, Point::new(1303, 503));
            drag.complete(ctx, float)
        });
        assert_eq!(outcome, DragOutcome::Reverted);
        assert_eq!(fx.host.bounds_in_screen(window), before);
    }

    #[test]
    fn window_follows_pointer_without_clamping() {
        let (mut fx, window) = Fixture::tablet();
        let before = fx.host.bounds_in_screen(window);
        fx.run(|ctx, float| {
            let mut drag =
                FloatDragController::start(ctx, float, window, Point::new(1300, 500)).unwrap();
            drag.drag(ctx, Point::new(1300, 1200));
        });
        let after = fx.host.bounds_in_screen(window);
        assert_eq!(after.y, before.y + 700);
        assert!(after.bottom() > fx.host.work_area().bottom());
    }

    #[test]
    fn release_magnetizes_to_quadrant() {
        let (mut fx, window) = Fixture::tablet();
        let outcome = fx.run(|ctx, float| {
            let mut drag =
                FloatDragController::start(ctx, float, window, Point::new(1300, 500)).unwrap();
            drag.drag(ctx, Point::new(1490, 10));
            drag.complete(ctx, float)
        });
        assert_eq!(outcome, DragOutcome::Magnetized(MagnetismCorner::TopRight));
        assert_eq!(
            fx.host.bounds_in_screen(window).top_right(),
            Point::new(1592, 8)
        );
    }

    #[test]
    fn edge_region_proposes_snap() {
        let (mut fx, window) = Fixture::tablet();
        let outcome = fx.run(|ctx, float| {
            let mut drag =
                FloatDragController::start(ctx, float, window, Point::new(800, 500)).unwrap();
            drag.drag(ctx, Point::new(5, 500));
            assert_eq!(drag.pending_snap_position(), Some(SnapPosition::Primary));
            drag.drag(ctx, Point::new(400, 500));
            assert_eq!(drag.pending_snap_position(), None);
            drag.drag(ctx, Point::new(1595, 500));
            drag.complete(ctx, float)
        });
        assert_eq!(outcome, DragOutcome::Snap(SnapPosition::Secondary));
    }

    #[test]
    fn drag_started_at_edge_snaps_only_while_holding_the_edge() {
        let (mut fx, window) = Fixture::tablet();
        fx.run(|ctx, float| {
            let mut drag =
                FloatDragController::start(ctx, float, window, Point::new(1590, 500)).unwrap();
            drag.drag(ctx, Point::new(1590, 300));
            assert_eq!(drag.pending_snap_position(), Some(SnapPosition::Secondary));
            drag.drag(ctx, Point::new(1586, 300));
            assert_eq!(drag.pending_snap_position(), None);
            drag.drag(ctx, Point::new(1595, 300));
            assert_eq!(drag.pending_snap_position(), Some(SnapPosition::Secondary));
        });
    }

    #[test]
    fn slow_fling_is_an_ordinary_release() {
        let (mut fx, window) = Fixture::tablet();
        let outcome = fx.run(|ctx, float| {
            let mut drag =
                FloatDragController::start(ctx, float, window, Point::new(1300, 500)).unwrap();
            drag.drag(ctx, Point::new(300, 100));
            drag.fling_or_swipe(
                ctx,
                float,
                DragGesture::Fling {
                    velocity_x: -500.0,
                    velocity_y: -500.0,
                },
            )
        });
        assert_eq!(outcome, DragOutcome::Magnetized(MagnetismCorner::TopLeft));
        assert!(!fx.float.is_tucked(window));
    }

    #[test]
    fn fast_fling_tucks() {
        let (mut fx, window) = Fixture::tablet();
        let outcome = fx.run(|ctx, float| {
            let mut drag =
                FloatDragController::start(ctx, float, window, Point::new(1300, 500)).unwrap();
            drag.drag(ctx, Point::new(1200, 400));
            drag.fling_or_swipe(
                ctx,
                float,
                DragGesture::Fling {
                    velocity_x: -900.0,
                    velocity_y: -100.0,
                },
            )
        });
        assert_eq!(outcome, DragOutcome::Tucked(MagnetismCorner::TopLeft));
        assert!(fx.float.is_tucked(window));
        assert_eq!(fx.host.bounds_in_screen(window).right(), 100);
        fx.run(|ctx, float| float.shutdown(ctx));
    }

    #[test]
    fn starting_a_drag_untucks_immediately() {
        let (mut fx, window) = Fixture::tablet();
        fx.run(|ctx, float| float.on_fling_or_swipe_for_tablet(ctx, window, true, true));
        assert!(fx.float.is_tucked(window));
        fx.run(|ctx, float| {
            FloatDragController::start(ctx, float, window, Point::new(50, 200)).unwrap();
        });
        assert!(!fx.float.is_tucked(window));
        assert_eq!(fx.host.bounds_in_screen(window).origin(), Point::new(8, 8));
        assert!(fx.host.accepts_events(window));
    }
}
