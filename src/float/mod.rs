//! Registry of floated windows.
//!
//! At most one window is floated at any time; floating a second window
//! unfloats the first before anything else happens. Tablet mode adds the
//! magnetism corners and the tucked state.

pub mod drag;
pub mod tucker;

use std::collections::BTreeMap;

use crate::animation::AnimationKey;
use crate::geometry::{Point, Rect, Transform};
use crate::layout::{
    MagnetismCorner, can_float_in_clamshell, can_float_in_tablet, magnetism_corner_for_point,
    preferred_float_bounds_clamshell, preferred_float_bounds_tablet, tuck_handle_bounds,
};
use crate::window::{Container, DisplayChanges, LayoutContext, LayoutEvent, WindowHost, WindowId};

pub use drag::{DragGesture, DragOutcome, DragPhase, FloatDragController};
pub use tucker::WindowTucker;

#[derive(Debug)]
pub struct FloatMetadata {
    pub window: WindowId,
    pub magnetism_corner: MagnetismCorner,
    pub is_tucked: bool,
    pub was_position_auto_managed: bool,
    /// Corner to return to on untuck; the tucked corner follows the tuck side.
    untucked_corner: Option<MagnetismCorner>,
    /// Present while tucked and while the untuck animation plays.
    tucker: Option<WindowTucker>,
}

impl FloatMetadata {
    pub fn tuck_handle(&self) -> Option<WindowId> {
        self.tucker.as_ref().map(WindowTucker::handle)
    }
}

#[derive(Debug, Default)]
pub struct FloatController {
    floated: BTreeMap<WindowId, FloatMetadata>,
    observing_display: bool,
}

impl FloatController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_floated(&self, window: WindowId) -> bool {
        self.floated.contains_key(&window)
    }

    pub fn floated_window(&self) -> Option<WindowId> {
        self.floated.keys().next().copied()
    }

    pub fn metadata(&self, window: WindowId) -> Option<&FloatMetadata> {
        self.floated.get(&window)
    }

    pub fn is_tucked(&self, window: WindowId) -> bool {
        self.floated.get(&window).is_some_and(|m| m.is_tucked)
    }

    pub fn is_observing_display(&self) -> bool {
        self.observing_display
    }

    /// Floated window whose tuck handle is `handle`.
    pub fn window_for_handle(&self, handle: WindowId) -> Option<WindowId> {
        self.floated
            .values()
            .find(|m| m.tuck_handle() == Some(handle))
            .map(|m| m.window)
    }

    pub fn can_float(&self, host: &dyn WindowHost, window: WindowId) -> bool {
        if !host.exists(window) {
            return false;
        }
        let work_area = host.work_area_for_window(window);
        let min_size = host.minimum_size(window);
        if host.is_in_tablet_mode() {
            can_float_in_tablet(min_size, &work_area, host.display_orientation(window))
        } else {
            can_float_in_clamshell(min_size, &work_area)
        }
    }

    fn preferred_bounds(host: &dyn WindowHost, meta: &FloatMetadata) -> Option<Rect> {
        let window = meta.window;
        let work_area = host.work_area_for_window(window);
        let min_size = host.minimum_size(window);
        if host.is_in_tablet_mode() {
            Some(preferred_float_bounds_tablet(
                min_size,
                &work_area,
                host.display_orientation(window),
                meta.magnetism_corner,
                meta.is_tucked,
            ))
        } else {
            let source = host
                .restore_bounds(window)
                .unwrap_or_else(|| host.bounds_in_screen(window));
            preferred_float_bounds_clamshell(source, min_size, &work_area)
        }
    }

    fn apply_preferred_bounds(ctx: &mut LayoutContext<'_>, meta: &FloatMetadata) {
        if let Some(bounds) = Self::preferred_bounds(ctx.host, meta) {
            ctx.host.set_bounds(meta.window, bounds);
        }
    }

    pub fn float_window(&mut self, ctx: &mut LayoutContext<'_>, window: WindowId) {
        if self.is_floated(window) || !ctx.host.exists(window) {
            return;
        }
        let others: Vec<WindowId> = self.floated.keys().copied().collect();
        for other in others {
            self.unfloat_window(ctx, other);
        }
        debug_assert!(self.floated.is_empty());

        let was_position_auto_managed = ctx.host.is_position_auto_managed(window);
        ctx.host.set_position_auto_managed(window, false);
        let meta = FloatMetadata {
            window,
            magnetism_corner: MagnetismCorner::default(),
            is_tucked: false,
            was_position_auto_managed,
            untucked_corner: None,
            tucker: None,
        };
        ctx.host.reparent(window, Container::Float);
        Self::apply_preferred_bounds(ctx, &meta);
        self.floated.insert(window, meta);
        self.observing_display = true;

        tracing::debug!(window_id = %window, "window floated");
        ctx.notify(LayoutEvent::FloatStateChanged {
            window,
            floated: true,
        });
    }

    pub fn unfloat_window(&mut self, ctx: &mut LayoutContext<'_>, window: WindowId) {
        let Some(mut meta) = self.floated.remove(&window) else {
            return;
        };
        if let Some(tucker) = meta.tucker.take() {
            ctx.animator.stop(AnimationKey::Transform(window));
            ctx.host.set_transform(window, Transform::IDENTITY);
            tucker.release(ctx);
        }
        ctx.host
            .set_position_auto_managed(window, meta.was_position_auto_managed);
        let desk = ctx.host.active_desk_container();
        ctx.host.reparent(window, desk);
        if self.floated.is_empty() {
            self.observing_display = false;
        }

        tracing::debug!(window_id = %window, "window unfloated");
        ctx.notify(LayoutEvent::FloatStateChanged {
            window,
            floated: false,
        });
    }

    /// Windows that no longer fit a tablet float are unfloated and returned;
    /// the rest get their tablet bounds.
    fn revalidate_for_tablet(&mut self, ctx: &mut LayoutContext<'_>) -> Vec<WindowId> {
        let ineligible: Vec<WindowId> = self
            .floated
            .keys()
            .copied()
            .filter(|window| !self.can_float(&*ctx.host, *window))
            .collect();
        for window in &ineligible {
            tracing::debug!(window_id = %window, "window can no longer float");
            self.unfloat_window(ctx, *window);
        }
        for meta in self.floated.values() {
            Self::apply_preferred_bounds(ctx, meta);
            if let Some(tucker) = &meta.tucker {
                let bounds = ctx.host.bounds_in_screen(meta.window);
                ctx.host.set_bounds(
                    tucker.handle(),
                    tuck_handle_bounds(&bounds, tucker.is_left()),
                );
            }
        }
        ineligible
    }

    /// Returns the windows that were unfloated.
    pub fn on_tablet_mode_changed(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        enabled: bool,
    ) -> Vec<WindowId> {
        if !self.observing_display {
            return Vec::new();
        }
        if enabled {
            return self.revalidate_for_tablet(ctx);
        }
        let windows: Vec<WindowId> = self.floated.keys().copied().collect();
        for window in windows {
            self.maybe_untuck_window(ctx, window, false);
            if let Some(meta) = self.floated.get(&window) {
                Self::apply_preferred_bounds(ctx, meta);
            }
        }
        Vec::new()
    }

    /// Returns the windows that were unfloated.
    pub fn on_display_metrics_changed(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        changes: DisplayChanges,
    ) -> Vec<WindowId> {
        if !self.observing_display || !ctx.host.is_in_tablet_mode() || !changes.work_area {
            return Vec::new();
        }
        self.revalidate_for_tablet(ctx)
    }

    pub fn on_drag_completed_for_tablet(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        window: WindowId,
        location: Point,
    ) -> Option<MagnetismCorner> {
        let work_area = ctx.host.work_area_for_window(window);
        let meta = self.floated.get_mut(&window)?;
        let corner = magnetism_corner_for_point(location, &work_area);
        meta.magnetism_corner = corner;
        Self::apply_preferred_bounds(ctx, meta);

        tracing::debug!(window_id = %window, ?corner, "float drag completed");
        ctx.notify(LayoutEvent::FloatDragCompleted { window, corner });
        Some(corner)
    }

    pub fn on_fling_or_swipe_for_tablet(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        window: WindowId,
        left: bool,
        up: bool,
    ) {
        let Some(meta) = self.floated.get_mut(&window) else {
            return;
        };
        meta.magnetism_corner = MagnetismCorner::from_flags(left, up);
        self.maybe_tuck_window(ctx, window, left);
    }

    pub fn maybe_tuck_window(&mut self, ctx: &mut LayoutContext<'_>, window: WindowId, left: bool) {
        if !ctx.host.is_in_tablet_mode() {
            return;
        }
        let Some(meta) = self.floated.get_mut(&window) else {
            return;
        };
        if meta.is_tucked {
            return;
        }
        // An untuck may still be animating. The window stays parked, so it
        // must not be reactivated here.
        if let Some(previous) = meta.tucker.take() {
            ctx.animator.stop(AnimationKey::Transform(window));
            previous.discard(ctx);
        }
        meta.is_tucked = true;
        // The handle side and the off-screen side must agree.
        meta.untucked_corner = Some(meta.magnetism_corner);
        meta.magnetism_corner = MagnetismCorner::from_flags(left, meta.magnetism_corner.is_top());
        let tucked = Self::preferred_bounds(ctx.host, meta);
        let tucker = WindowTucker::new(ctx.host, window, left);
        if let Some(tucked) = tucked {
            tucker.animate_tuck(ctx, tucked);
        }
        meta.tucker = Some(tucker);
        ctx.notify(LayoutEvent::TuckStateChanged {
            window,
            tucked: true,
        });
    }

    pub fn maybe_untuck_window(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        window: WindowId,
        animate: bool,
    ) {
        let Some(meta) = self.floated.get_mut(&window) else {
            return;
        };
        if !meta.is_tucked {
            return;
        }
        meta.is_tucked = false;
        if let Some(corner) = meta.untucked_corner.take() {
            meta.magnetism_corner = corner;
        }
        let untucked = Self::preferred_bounds(ctx.host, meta)
            .unwrap_or_else(|| ctx.host.bounds_in_screen(window));

        if animate {
            if let Some(tucker) = &meta.tucker {
                tucker.animate_untuck(ctx, untucked);
            }
        } else {
            ctx.animator.stop(AnimationKey::Transform(window));
            ctx.host.set_transform(window, Transform::IDENTITY);
            ctx.host.set_bounds(window, untucked);
            if let Some(tucker) = meta.tucker.take() {
                tucker.release(ctx);
            }
        }
        tracing::debug!(window_id = %window, animate, "window untucked");
        ctx.notify(LayoutEvent::TuckStateChanged {
            window,
            tucked: false,
        });
    }

    pub fn on_untuck_animation_completed(&mut self, ctx: &mut LayoutContext<'_>, window: WindowId) {
        let Some(meta) = self.floated.get_mut(&window) else {
            return;
        };
        if meta.is_tucked {
            return;
        }
        if let Some(tucker) = meta.tucker.take() {
            tucker.release(ctx);
        }
    }

    pub fn on_tuck_handle_pressed(&mut self, ctx: &mut LayoutContext<'_>, handle: WindowId) {
        if let Some(window) = self.window_for_handle(handle) {
            self.maybe_untuck_window(ctx, window, true);
        }
    }

    /// A tucked window that becomes active by any path untucks itself.
    pub fn on_window_activated(&mut self, ctx: &mut LayoutContext<'_>, gained: WindowId) {
        if self.is_tucked(gained) {
            self.maybe_untuck_window(ctx, gained, true);
        }
    }

    pub fn on_window_destroying(&mut self, ctx: &mut LayoutContext<'_>, window: WindowId) {
        let Some(mut meta) = self.floated.remove(&window) else {
            return;
        };
        ctx.animator.stop(AnimationKey::Transform(window));
        if let Some(tucker) = meta.tucker.take() {
            tucker.discard(ctx);
        }
        if self.floated.is_empty() {
            self.observing_display = false;
        }
        ctx.notify(LayoutEvent::FloatStateChanged {
            window,
            floated: false,
        });
    }

    /// Releases every tucker; called when the owner is torn down.
    pub fn shutdown(&mut self, ctx: &mut LayoutContext<'_>) {
        for meta in self.floated.values_mut() {
            if let Some(tucker) = meta.tucker.take() {
                tucker.release(ctx);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animator;
    use crate::config::{DisplaySpec, LayoutConfig};
    use crate::geometry::Size;
    use crate::window::headless::{HeadlessHost, WindowOptions};
    use crate::window::{HelperKind, HostEvent};

    struct Fixture {
        host: HeadlessHost,
        animator: Animator,
        config: LayoutConfig,
        events: Vec<LayoutEvent>,
        float: FloatController,
    }

    impl Fixture {
        fn new(tablet: bool) -> Self {
            let mut host = HeadlessHost::new(DisplaySpec::default());
            host.set_tablet_mode(tablet);
            Self {
                host,
                animator: Animator::new(0.0),
                config: LayoutConfig::default(),
                events: Vec::new(),
                float: FloatController::new(),
            }
        }

        fn add(&mut self, options: WindowOptions) -> WindowId {
            self.host.add_window(options)
        }

        fn run<T>(
            &mut self,
            f: impl FnOnce(&mut LayoutContext<'_>, &mut FloatController) -> T,
        ) -> T {
            let mut float = std::mem::take(&mut self.float);
            let out = {
                let mut ctx = LayoutContext::new(
                    &mut self.host,
                    &mut self.animator,
                    &self.config,
                    &mut self.events,
                );
                f(&mut ctx, &mut float)
            };
            self.float = float;
            out
        }
    }

    fn window_options() -> WindowOptions {
        WindowOptions::new(Rect::new(100, 100, 400, 300))
    }

    #[test]
    fn floating_a_second_window_unfloats_the_first() {
        let mut fx = Fixture::new(false);
        let a = fx.add(window_options());
        let b = fx.add(window_options());
        fx.run(|ctx, float| float.float_window(ctx, a));
        fx.run(|ctx, float| float.float_window(ctx, b));

        assert!(!fx.float.is_floated(a));
        assert!(fx.float.is_floated(b));
        assert_eq!(fx.host.container(a), Some(fx.host.active_desk_container()));
        assert_eq!(fx.host.container(b), Some(Container::Float));
        assert_eq!(
            fx.events,
            vec![
                LayoutEvent::FloatStateChanged { window: a, floated: true },
                LayoutEvent::FloatStateChanged { window: a, floated: false },
                LayoutEvent::FloatStateChanged { window: b, floated: true },
            ]
        );
    }

    #[test]
    fn clamshell_float_anchors_bottom_right() {
        let mut fx = Fixture::new(false);
        let window = fx.add(window_options());
        fx.run(|ctx, float| float.float_window(ctx, window));
        assert_eq!(fx.host.bounds_in_screen(window), Rect::new(1192, 644, 400, 300));
    }

    #[test]
    fn second_unfloat_is_a_no_op() {
        let mut fx = Fixture::new(false);
        let window = fx.add(window_options().auto_managed(true));
        fx.run(|ctx, float| float.float_window(ctx, window));
        assert!(!fx.host.is_position_auto_managed(window));

        fx.run(|ctx, float| float.unfloat_window(ctx, window));
        let events = fx.events.len();
        let bounds = fx.host.bounds_in_screen(window);
        fx.run(|ctx, float| float.unfloat_window(ctx, window));

        assert_eq!(fx.events.len(), events);
        assert_eq!(fx.host.bounds_in_screen(window), bounds);
        assert!(fx.host.is_position_auto_managed(window));
        assert!(!fx.float.is_observing_display());
    }

    #[test]
    fn tablet_entry_unfloats_ineligible_windows() {
        let mut fx = Fixture::new(false);
        let window = fx.add(window_options().min_size(Size::new(900, 200)));
        fx.run(|ctx, float| float.float_window(ctx, window));
        assert!(fx.float.is_floated(window));

        fx.host.set_tablet_mode(true);
        let unfloated = fx.run(|ctx, float| float.on_tablet_mode_changed(ctx, true));
        assert_eq!(unfloated, vec![window]);
        assert!(!fx.float.is_floated(window));
    }

    #[test]
    fn tablet_entry_applies_corner_bounds() {
        let mut fx = Fixture::new(false);
        let window = fx.add(window_options());
        fx.run(|ctx, float| float.float_window(ctx, window));
        fx.host.set_tablet_mode(true);
        let unfloated = fx.run(|ctx, float| float.on_tablet_mode_changed(ctx, true));

        assert!(unfloated.is_empty());
        let bounds = fx.host.bounds_in_screen(window);
        assert_eq!(bounds.bottom_right(), Point::new(1592, 944));
        assert_eq!(bounds.size(), Size::new(533, 761));
    }

    #[test]
    fn tablet_exit_untucks_without_animation() {
        let mut fx = Fixture::new(true);
        let other = fx.add(window_options());
        let window = fx.add(window_options());
        fx.run(|ctx, float| {
            float.float_window(ctx, window);
            float.maybe_tuck_window(ctx, window, true);
        });
        assert!(fx.float.is_tucked(window));
        assert_eq!(fx.host.active_window(), Some(other));

        fx.host.set_tablet_mode(false);
        fx.run(|ctx, float| float.on_tablet_mode_changed(ctx, false));

        assert!(fx.float.is_floated(window));
        assert!(!fx.float.is_tucked(window));
        assert!(!fx.animator.has_running());
        assert!(fx.host.accepts_events(window));
        assert_eq!(fx.host.active_window(), Some(window));
        assert_eq!(fx.host.bounds_in_screen(window).bottom_right(), Point::new(1592, 944));
    }

    #[test]
    fn tuck_then_untuck_restores_bounds() {
        let mut fx = Fixture::new(true);
        let window = fx.add(window_options());
        fx.run(|ctx, float| {
            float.float_window(ctx, window);
            float.on_drag_completed_for_tablet(ctx, window, Point::new(100, 100));
        });
        let before = fx.host.bounds_in_screen(window);

        fx.run(|ctx, float| float.maybe_tuck_window(ctx, window, true));
        assert_eq!(fx.host.bounds_in_screen(window).right(), 100);
        let handle = fx
            .float
            .metadata(window)
            .and_then(FloatMetadata::tuck_handle)
            .unwrap();
        assert_eq!(fx.float.window_for_handle(handle), Some(window));

        fx.run(|ctx, float| float.on_tuck_handle_pressed(ctx, handle));
        assert_eq!(fx.host.bounds_in_screen(window), before);
        // The handle outlives the untuck animation.
        assert!(fx.host.exists(handle));

        fx.animator.tick(std::time::Duration::ZERO);
        fx.run(|ctx, float| float.on_untuck_animation_completed(ctx, window));
        assert!(!fx.host.exists(handle));
        assert!(fx.host.accepts_events(window));
    }

    #[test]
    fn tucking_to_the_other_side_borrows_the_corner_until_untucked() {
        let mut fx = Fixture::new(true);
        let window = fx.add(window_options());
        fx.run(|ctx, float| {
            float.float_window(ctx, window);
            float.maybe_tuck_window(ctx, window, true);
        });
        let meta = fx.float.metadata(window).unwrap();
        assert_eq!(meta.magnetism_corner, MagnetismCorner::BottomLeft);
        assert_eq!(fx.host.bounds_in_screen(window).right(), 100);

        fx.run(|ctx, float| float.maybe_untuck_window(ctx, window, false));
        let meta = fx.float.metadata(window).unwrap();
        assert_eq!(meta.magnetism_corner, MagnetismCorner::BottomRight);
        assert_eq!(fx.host.bounds_in_screen(window), Rect::new(1059, 183, 533, 761));
    }

    #[test]
    fn retucking_during_the_untuck_animation_stays_tucked() {
        let mut fx = Fixture::new(true);
        let other = fx.add(window_options());
        let window = fx.add(window_options());
        while fx.host.pop_event().is_some() {}
        fx.run(|ctx, float| {
            float.float_window(ctx, window);
            float.maybe_tuck_window(ctx, window, true);
            float.maybe_untuck_window(ctx, window, true);
            float.maybe_tuck_window(ctx, window, true);
        });
        while let Some(event) = fx.host.pop_event() {
            if let HostEvent::ActivationChanged {
                gained: Some(gained),
                ..
            } = event
            {
                fx.run(|ctx, float| float.on_window_activated(ctx, gained));
            }
        }

        assert!(fx.float.is_tucked(window));
        assert_eq!(fx.host.active_window(), Some(other));
        assert!(!fx.host.accepts_events(window));
        assert_eq!(fx.host.helpers(HelperKind::TuckHandle).len(), 1);
        fx.run(|ctx, float| float.shutdown(ctx));
    }

    #[test]
    fn destroying_a_floated_window_drops_its_metadata() {
        let mut fx = Fixture::new(true);
        let window = fx.add(window_options());
        fx.run(|ctx, float| {
            float.float_window(ctx, window);
            float.maybe_tuck_window(ctx, window, false);
        });
        let handle = fx.float.metadata(window).and_then(FloatMetadata::tuck_handle).unwrap();

        fx.run(|ctx, float| float.on_window_destroying(ctx, window));
        assert!(!fx.float.is_floated(window));
        assert!(!fx.host.exists(handle));
        assert!(!fx.float.is_observing_display());
    }
}
