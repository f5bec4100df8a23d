//! Offscreen "tucked" presentation of a floated window.
//!
//! While a `WindowTucker` is alive the window is parked mostly offscreen
//! with a small handle next to its visible sliver, does not accept events
//! and is not active. Whoever owns the tucker must call `release` on every
//! exit path: release is what gives the window its input and activation
//! back.

use crate::animation::{AnimatedValue, AnimationKey, Completion, Easing, Phase};
use crate::constants::{
    TUCK_BOUNCE_DISTANCE, TUCK_SETTLE_DURATION, TUCK_SLIDE_DURATION, UNTUCK_DURATION,
};
use crate::geometry::{Rect, Transform};
use crate::layout::tuck_handle_bounds;
use crate::window::{Container, HelperKind, LayoutContext, WindowHost, WindowId};

#[derive(Debug)]
pub struct WindowTucker {
    window: WindowId,
    left: bool,
    handle: WindowId,
    released: bool,
}

fn offset_between(from: &Rect, to: &Rect) -> Transform {
    Transform::translation((from.x - to.x) as f64, (from.y - to.y) as f64)
}

impl WindowTucker {
    pub fn new(host: &mut dyn WindowHost, window: WindowId, left: bool) -> Self {
        let handle = host.create_helper_window(HelperKind::TuckHandle, Container::Overlay);
        host.set_bounds(
            handle,
            tuck_handle_bounds(&host.bounds_in_screen(window), left),
        );

        let next = host
            .mru_windows()
            .into_iter()
            .find(|candidate| *candidate != window && host.is_visible(*candidate));
        host.activate(next);
        host.set_accepts_events(window, false);

        tracing::debug!(window_id = %window, handle_id = %handle, left, "window tucked");
        Self {
            window,
            left,
            handle,
            released: false,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn handle(&self) -> WindowId {
        self.handle
    }

    pub fn is_left(&self) -> bool {
        self.left
    }

    /// Moves the window to `tucked` and plays the slide-and-settle
    /// animation from wherever it is right now.
    pub fn animate_tuck(&self, ctx: &mut LayoutContext<'_>, tucked: Rect) {
        let initial = ctx.host.bounds_in_screen(self.window);
        ctx.host.set_bounds(self.window, tucked);
        ctx.host
            .set_bounds(self.handle, tuck_handle_bounds(&tucked, self.left));

        let start = offset_between(&initial, &tucked);
        let bounce = Transform::translation(
            if self.left {
                -TUCK_BOUNCE_DISTANCE as f64
            } else {
                TUCK_BOUNCE_DISTANCE as f64
            },
            0.0,
        );
        let phases = vec![
            Phase::new(
                AnimatedValue::Transform(bounce),
                TUCK_SLIDE_DURATION,
                Easing::Accel20Decel100,
            ),
            Phase::new(
                AnimatedValue::Transform(Transform::IDENTITY),
                TUCK_SETTLE_DURATION,
                Easing::FastOutSlowIn,
            ),
        ];
        for target in [self.window, self.handle] {
            ctx.host.set_transform(target, start);
            ctx.animator.start(
                AnimationKey::Transform(target),
                AnimatedValue::Transform(start),
                phases.clone(),
                Completion::None,
            );
        }
    }

    /// Moves the window back to `untucked` and slides it in. The animator
    /// reports `Completion::Untucked` when done; the owner releases the
    /// tucker then.
    pub fn animate_untuck(&self, ctx: &mut LayoutContext<'_>, untucked: Rect) {
        let tucked = ctx.host.bounds_in_screen(self.window);
        ctx.host.set_bounds(self.window, untucked);
        ctx.host
            .set_bounds(self.handle, tuck_handle_bounds(&untucked, self.left));

        let start = offset_between(&tucked, &untucked);
        for (target, on_complete) in [
            (self.window, Completion::Untucked(self.window)),
            (self.handle, Completion::None),
        ] {
            ctx.host.set_transform(target, start);
            ctx.animator.start(
                AnimationKey::Transform(target),
                AnimatedValue::Transform(start),
                vec![Phase::new(
                    AnimatedValue::Transform(Transform::IDENTITY),
                    UNTUCK_DURATION,
                    Easing::FastOutSlowIn,
                )],
                on_complete,
            );
        }
    }

    /// Restores event targeting and activation and removes the handle.
    pub fn release(mut self, ctx: &mut LayoutContext<'_>) {
        ctx.animator.stop(AnimationKey::Transform(self.handle));
        ctx.host.set_accepts_events(self.window, true);
        ctx.host.activate(Some(self.window));
        ctx.host.destroy_window(self.handle);
        self.released = true;
        tracing::debug!(window_id = %self.window, "tucker released");
    }

    /// Tears the tucker down without touching the window. Used when the
    /// window is destroyed or tucked again; only the handle goes away.
    pub fn discard(mut self, ctx: &mut LayoutContext<'_>) {
        ctx.animator.stop(AnimationKey::Transform(self.handle));
        ctx.host.destroy_window(self.handle);
        self.released = true;
    }
}

impl Drop for WindowTucker {
    fn drop(&mut self) {
        if !self.released {
            tracing::warn!(window_id = %self.window, "tucker dropped without release");
        }
    }
}
