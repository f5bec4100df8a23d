//! Detached, scaled stand-in for a desk mini view while it is dragged.

use crate::animation::{AnimatedValue, AnimationKey, Completion, Easing, Phase};
use crate::constants::{
    DESK_DRAG_PROXY_GROW_DURATION, DESK_DRAG_PROXY_SCALE, DESK_DRAG_PROXY_SNAP_BACK_DURATION,
};
use crate::geometry::{Point, Rect, Transform};
use crate::window::{Container, HelperKind, LayoutContext, WindowId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyState {
    Dragging,
    SnappingBack,
}

#[derive(Debug)]
pub struct DeskDragProxy {
    window: WindowId,
    /// Pointer position relative to the unscaled source origin.
    grab_offset: (f64, f64),
    size: (i32, i32),
    state: ProxyState,
}

impl DeskDragProxy {
    pub fn start_drag(ctx: &mut LayoutContext<'_>, source: Rect, location: Point) -> Self {
        let window = ctx
            .host
            .create_helper_window(HelperKind::DeskDragProxy, Container::Overlay);
        ctx.host.set_bounds(window, source);
        ctx.animator.start(
            AnimationKey::Transform(window),
            AnimatedValue::Transform(Transform::IDENTITY),
            vec![Phase::new(
                AnimatedValue::Transform(Transform::scale_about_center(
                    &source,
                    DESK_DRAG_PROXY_SCALE,
                )),
                DESK_DRAG_PROXY_GROW_DURATION,
                Easing::EaseOutCubic,
            )],
            Completion::None,
        );
        tracing::debug!(proxy_id = %window, %source, "desk drag proxy created");
        Self {
            window,
            grab_offset: (
                (location.x - source.x) as f64,
                (location.y - source.y) as f64,
            ),
            size: (source.width, source.height),
            state: ProxyState::Dragging,
        }
    }

    pub fn window(&self) -> WindowId {
        self.window
    }

    pub fn state(&self) -> ProxyState {
        self.state
    }

    /// Keeps the grabbed point of the scaled proxy under the pointer.
    pub fn drag_to(&mut self, ctx: &mut LayoutContext<'_>, location: Point) {
        if self.state != ProxyState::Dragging {
            return;
        }
        let (width, height) = self.size;
        let grow_x = width as f64 * (DESK_DRAG_PROXY_SCALE - 1.0) / 2.0;
        let grow_y = height as f64 * (DESK_DRAG_PROXY_SCALE - 1.0) / 2.0;
        let x = location.x as f64 - self.grab_offset.0 * DESK_DRAG_PROXY_SCALE + grow_x;
        let y = location.y as f64 - self.grab_offset.1 * DESK_DRAG_PROXY_SCALE + grow_y;
        ctx.host.set_bounds(
            self.window,
            Rect::new(x.round() as i32, y.round() as i32, width, height),
        );
    }

    /// Visual bounds of the proxy with its transform applied.
    pub fn visual_bounds(&self, ctx: &LayoutContext<'_>) -> Rect {
        let bounds = ctx.host.bounds_in_screen(self.window);
        ctx.host.transform(self.window).apply(&bounds)
    }

    /// Moves the proxy onto `target` and animates its transform back to
    /// identity. Returns `false` if a snap back is already running.
    pub fn snap_back_to_drag_view(&mut self, ctx: &mut LayoutContext<'_>, target: Rect) -> bool {
        let key = AnimationKey::Transform(self.window);
        if ctx
            .animator
            .is_animating_to(key, AnimatedValue::Transform(Transform::IDENTITY))
        {
            return false;
        }
        let current = self.visual_bounds(ctx);
        ctx.host.set_bounds(self.window, target);
        let from = Transform::between(&target, &current);
        ctx.host.set_transform(self.window, from);
        ctx.animator.start(
            key,
            AnimatedValue::Transform(from),
            vec![Phase::new(
                AnimatedValue::Transform(Transform::IDENTITY),
                DESK_DRAG_PROXY_SNAP_BACK_DURATION,
                Easing::FastOutSlowIn,
            )],
            Completion::DeskSnappedBack,
        );
        self.state = ProxyState::SnappingBack;
        tracing::debug!(
            proxy_id = %self.window,
            %current,
            %target,
            "desk drag proxy snapping back"
        );
        true
    }

    pub fn destroy(self, ctx: &mut LayoutContext<'_>) {
        ctx.animator.stop(AnimationKey::Transform(self.window));
        ctx.host.destroy_window(self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Animator;
    use crate::config::{DisplaySpec, LayoutConfig};
    use crate::window::headless::HeadlessHost;
    use crate::window::{LayoutEvent, WindowHost};

    struct Fixture {
        host: HeadlessHost,
        animator: Animator,
        config: LayoutConfig,
        events: Vec<LayoutEvent>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                host: HeadlessHost::new(DisplaySpec::default()),
                animator: Animator::new(1.0),
                config: LayoutConfig::default(),
                events: Vec::new(),
            }
        }

        fn ctx(&mut self) -> LayoutContext<'_> {
            LayoutContext::new(
                &mut self.host,
                &mut self.animator,
                &self.config,
                &mut self.events,
            )
        }

        fn settle(&mut self) {
            let output = self.animator.tick(DESK_DRAG_PROXY_SNAP_BACK_DURATION);
            for (key, value) in output.frames {
                if let (AnimationKey::Transform(window), AnimatedValue::Transform(t)) = (key, value)
                {
                    self.host.set_transform(window, t);
                }
            }
        }
    }

    const SOURCE: Rect = Rect::new(634, 14, 160, 100);

    #[test]
    fn proxy_grows_around_the_mini_view() {
        let mut fx = Fixture::new();
        let proxy = DeskDragProxy::start_drag(&mut fx.ctx(), SOURCE, Point::new(714, 64));
        assert_eq!(fx.host.bounds_in_screen(proxy.window()), SOURCE);
        assert_eq!(fx.host.helper_kind(proxy.window()), Some(HelperKind::DeskDragProxy));

        fx.settle();
        let visual = proxy.visual_bounds(&fx.ctx());
        assert_eq!(visual.center(), SOURCE.center());
        assert_eq!((visual.width, visual.height), (192, 120));
        proxy.destroy(&mut fx.ctx());
    }

    #[test]
    fn drag_keeps_the_grabbed_point_under_the_pointer() {
        let mut fx = Fixture::new();
        let mut proxy = DeskDragProxy::start_drag(&mut fx.ctx(), SOURCE, Point::new(654, 24));
        fx.settle();

        proxy.drag_to(&mut fx.ctx(), Point::new(854, 124));
        let visual = proxy.visual_bounds(&fx.ctx());
        // Grabbed 20,10 into the source; scaled that is 24,12 into the proxy.
        assert_eq!(Point::new(visual.x + 24, visual.y + 12), Point::new(854, 124));
        proxy.destroy(&mut fx.ctx());
    }

    #[test]
    fn snap_back_starts_from_the_current_visual_bounds() {
        let mut fx = Fixture::new();
        let mut proxy = DeskDragProxy::start_drag(&mut fx.ctx(), SOURCE, Point::new(714, 64));
        fx.settle();
        proxy.drag_to(&mut fx.ctx(), Point::new(900, 300));
        let before = proxy.visual_bounds(&fx.ctx());

        assert!(proxy.snap_back_to_drag_view(&mut fx.ctx(), SOURCE));
        assert_eq!(proxy.state(), ProxyState::SnappingBack);
        assert_eq!(fx.host.bounds_in_screen(proxy.window()), SOURCE);
        assert_eq!(proxy.visual_bounds(&fx.ctx()), before);
        assert!(!proxy.snap_back_to_drag_view(&mut fx.ctx(), SOURCE));

        proxy.drag_to(&mut fx.ctx(), Point::new(0, 0));
        assert_eq!(fx.host.bounds_in_screen(proxy.window()), SOURCE);

        fx.settle();
        assert_eq!(proxy.visual_bounds(&fx.ctx()), SOURCE);
        let window = proxy.window();
        proxy.destroy(&mut fx.ctx());
        assert!(!fx.host.exists(window));
    }
}
