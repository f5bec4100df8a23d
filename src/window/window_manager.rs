//! Owns the controllers and routes host notifications between them.
//!
//! Controllers never call each other. Everything they need from the rest of
//! the engine arrives through a [`LayoutContext`], and everything they cause
//! in the host comes back here as queued [`HostEvent`]s.

use std::collections::BTreeMap;
use std::mem;
use std::time::Duration;

use crate::animation::{AnimatedValue, AnimationKey, Animator, Completion};
use crate::config::LayoutConfig;
use crate::desks::DesksBar;
use crate::float::{DragGesture, DragOutcome, FloatController, FloatDragController};
use crate::geometry::{Point, Rect};
use crate::layout::{MagnetismCorner, SnapPosition};
use crate::observer::{ObserverList, Subscription};
use crate::split_view::{EndedSplitView, SplitViewController};

use super::headless::{HeadlessHost, WindowOptions};
use super::state::{Eligibility, Transition, WindowState, WindowStateType, WmEvent};
use super::{Container, DeskId, DisplayChanges, HostEvent, WindowHost, WindowId};

/// Number of desks the bar starts with.
const DEFAULT_DESK_COUNT: usize = 2;

/// Engine-level notifications for UI layers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutEvent {
    FloatStateChanged { window: WindowId, floated: bool },
    FloatDragCompleted { window: WindowId, corner: MagnetismCorner },
    TuckStateChanged { window: WindowId, tucked: bool },
    DividerShown,
    DividerHidden,
    ResizeStarted,
    ResizeEnded,
    DeskReordered { desk: DeskId, from: usize, to: usize },
}

/// What a controller may touch while handling one operation.
pub struct LayoutContext<'a> {
    pub host: &'a mut dyn WindowHost,
    pub animator: &'a mut Animator,
    pub config: &'a LayoutConfig,
    events: &'a mut Vec<LayoutEvent>,
}

impl<'a> LayoutContext<'a> {
    pub fn new(
        host: &'a mut dyn WindowHost,
        animator: &'a mut Animator,
        config: &'a LayoutConfig,
        events: &'a mut Vec<LayoutEvent>,
    ) -> Self {
        Self {
            host,
            animator,
            config,
            events,
        }
    }

    /// Queues `event` for observers. Delivered after the operation returns.
    pub fn notify(&mut self, event: LayoutEvent) {
        self.events.push(event);
    }
}

/// Builds a context from disjoint field borrows so a controller field can
/// be borrowed mutably next to it.
macro_rules! layout_ctx {
    ($wm:expr) => {
        LayoutContext::new(
            &mut $wm.host,
            &mut $wm.animator,
            &$wm.config,
            &mut $wm.pending,
        )
    };
}

pub struct WindowManager<H: WindowHost> {
    host: H,
    config: LayoutConfig,
    animator: Animator,
    observers: ObserverList<LayoutEvent>,
    pending: Vec<LayoutEvent>,
    float: FloatController,
    float_drag: Option<FloatDragController>,
    split: SplitViewController,
    desks: DesksBar,
    states: BTreeMap<WindowId, WindowState>,
}

impl<H: WindowHost> WindowManager<H> {
    pub fn new(host: H, config: LayoutConfig) -> Self {
        let desks = DesksBar::new(host.primary_work_area(), DEFAULT_DESK_COUNT);
        Self {
            animator: Animator::new(config.animation_scale),
            host,
            config,
            observers: ObserverList::new(),
            pending: Vec::new(),
            float: FloatController::new(),
            float_drag: None,
            split: SplitViewController::new(),
            desks,
            states: BTreeMap::new(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Direct host access. Call [`Self::dispatch_host_events`] afterwards so
    /// the engine sees what changed.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn float_controller(&self) -> &FloatController {
        &self.float
    }

    pub fn split_view(&self) -> &SplitViewController {
        &self.split
    }

    pub fn desks(&self) -> &DesksBar {
        &self.desks
    }

    pub fn float_drag(&self) -> Option<&FloatDragController> {
        self.float_drag.as_ref()
    }

    pub fn subscribe<F>(&mut self, observer: F) -> Subscription
    where
        F: FnMut(&LayoutEvent) + 'static,
    {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, token: Subscription) -> bool {
        self.observers.unsubscribe(token)
    }

    pub fn window_state(&self, window: WindowId) -> WindowStateType {
        self.states
            .get(&window)
            .map(WindowState::state_type)
            .unwrap_or_default()
    }

    pub fn is_animating(&self) -> bool {
        self.animator.has_running()
    }

    pub fn divider_bounds(&self) -> Option<Rect> {
        self.split.divider().view().map(|view| view.bounds)
    }

    // ----- window state -----

    pub fn toggle_float(&mut self, window: WindowId) -> bool {
        self.send_event(window, WmEvent::ToggleFloat)
    }

    pub fn float_window(&mut self, window: WindowId) -> bool {
        self.send_event(window, WmEvent::Float)
    }

    /// No-op unless `window` is floated.
    pub fn unfloat_window(&mut self, window: WindowId) -> bool {
        if !self.float.is_floated(window) {
            return false;
        }
        self.send_event(window, WmEvent::Restore)
    }

    pub fn snap_window(&mut self, window: WindowId, position: SnapPosition) -> bool {
        self.send_event(window, WmEvent::Snap(position))
    }

    pub fn maximize_window(&mut self, window: WindowId) -> bool {
        self.send_event(window, WmEvent::Maximize)
    }

    pub fn minimize_window(&mut self, window: WindowId) -> bool {
        self.send_event(window, WmEvent::Minimize)
    }

    pub fn restore_window(&mut self, window: WindowId) -> bool {
        self.send_event(window, WmEvent::Restore)
    }

    /// Returns every window that was snapped; they all go back to normal.
    pub fn end_split_view(&mut self) -> Vec<WindowId> {
        let windows = self.guarded(|wm| {
            let mut ctx = layout_ctx!(wm);
            wm.split.end_split_view(&mut ctx)
        });
        for window in &windows {
            self.force_state(*window, WindowStateType::Normal);
        }
        self.flush_notifications();
        windows
    }

    pub fn activate(&mut self, window: Option<WindowId>) {
        self.host.activate(window);
        self.dispatch_host_events();
    }

    pub fn close_window(&mut self, window: WindowId) {
        self.host.destroy_window(window);
        self.dispatch_host_events();
    }

    pub fn tuck_window(&mut self, window: WindowId, left: bool) {
        let mut ctx = layout_ctx!(self);
        self.float.maybe_tuck_window(&mut ctx, window, left);
        self.dispatch_host_events();
    }

    pub fn untuck_window(&mut self, window: WindowId) {
        let mut ctx = layout_ctx!(self);
        self.float.maybe_untuck_window(&mut ctx, window, true);
        self.dispatch_host_events();
    }

    /// Returns `false` if `handle` is not a tuck handle.
    pub fn press_tuck_handle(&mut self, handle: WindowId) -> bool {
        if self.float.window_for_handle(handle).is_none() {
            return false;
        }
        let mut ctx = layout_ctx!(self);
        self.float.on_tuck_handle_pressed(&mut ctx, handle);
        self.dispatch_host_events();
        true
    }

    fn eligibility(&self, window: WindowId) -> Eligibility {
        Eligibility {
            can_float: self.float.can_float(&self.host, window),
            can_snap: self.host.can_resize(window),
        }
    }

    fn send_event(&mut self, window: WindowId, event: WmEvent) -> bool {
        if !self.host.exists(window) {
            return false;
        }
        let eligibility = self.eligibility(window);
        let state = self.states.entry(window).or_default();
        let Some(transition) = state.on_event(event, eligibility) else {
            tracing::trace!(
                window_id = %window,
                ?event,
                state = ?state.state_type(),
                "state event ignored"
            );
            return false;
        };
        self.apply_transition(window, transition);
        true
    }

    /// Moves `window` to `next` outside the event path and applies it.
    fn force_state(&mut self, window: WindowId, next: WindowStateType) {
        if !self.host.exists(window) {
            self.states.remove(&window);
            return;
        }
        let transition = self.states.entry(window).or_default().set(next);
        if transition.from != transition.to {
            self.apply_transition(window, transition);
        }
    }

    fn apply_transition(&mut self, window: WindowId, transition: Transition) {
        let Transition { from, to } = transition;
        tracing::debug!(window_id = %window, ?from, ?to, "window state changed");

        // Only one window floats; the previous one goes back to normal first.
        if to == WindowStateType::Floated {
            if let Some(other) = self.float.floated_window().filter(|w| *w != window) {
                self.force_state(other, WindowStateType::Normal);
            }
        }

        let displaced = self.guarded(|wm| {
            let mut ctx = layout_ctx!(wm);
            if from == WindowStateType::Floated {
                wm.float.unfloat_window(&mut ctx, window);
            }
            if from.is_snapped() {
                wm.split.remove_window(&mut ctx, window);
            }
            if from == WindowStateType::Minimized {
                ctx.host.set_visible(window, true);
            }
            if from == WindowStateType::Normal {
                let bounds = ctx.host.bounds_in_screen(window);
                ctx.host.set_restore_bounds(window, Some(bounds));
            }

            let work_area = ctx.host.work_area_for_window(window);
            match to {
                WindowStateType::Normal => {
                    if let Some(restore) = ctx.host.restore_bounds(window) {
                        ctx.host.set_bounds(window, restore.adjust_to_fit(&work_area));
                        ctx.host.set_restore_bounds(window, None);
                    }
                    None
                }
                WindowStateType::Maximized => {
                    ctx.host.set_bounds(window, work_area);
                    None
                }
                WindowStateType::Minimized => {
                    ctx.host.set_visible(window, false);
                    if ctx.host.active_window() == Some(window) {
                        let next = ctx
                            .host
                            .mru_windows()
                            .into_iter()
                            .find(|w| *w != window && ctx.host.is_visible(*w));
                        ctx.host.activate(next);
                    }
                    None
                }
                WindowStateType::PrimarySnapped | WindowStateType::SecondarySnapped => {
                    let position = to.snap_position()?;
                    wm.split.snap_window(&mut ctx, window, position)
                }
                WindowStateType::Floated => {
                    wm.float.float_window(&mut ctx, window);
                    None
                }
            }
        });

        if let Some(displaced) = displaced {
            self.force_state(displaced, WindowStateType::Normal);
        }
        self.refresh_stacking_order();
        self.flush_notifications();
    }

    // ----- float drag -----

    /// Returns `false` if a drag is already running or `window` is not
    /// floated.
    pub fn start_float_drag(&mut self, window: WindowId, location: Point) -> bool {
        if self.float_drag.is_some() {
            return false;
        }
        let mut ctx = layout_ctx!(self);
        let Some(drag) = FloatDragController::start(&mut ctx, &mut self.float, window, location)
        else {
            return false;
        };
        self.float_drag = Some(drag);
        self.split.set_dragged_window(Some(window));
        self.refresh_stacking_order();
        self.dispatch_host_events();
        true
    }

    pub fn drag_float(&mut self, location: Point) {
        if let Some(drag) = self.float_drag.as_mut() {
            let mut ctx = layout_ctx!(self);
            drag.drag(&mut ctx, location);
        }
        self.dispatch_host_events();
    }

    pub fn complete_float_drag(&mut self) -> Option<DragOutcome> {
        let mut drag = self.float_drag.take()?;
        let mut ctx = layout_ctx!(self);
        let outcome = drag.complete(&mut ctx, &mut self.float);
        self.finish_float_drag(drag.target(), outcome);
        Some(outcome)
    }

    pub fn fling_or_swipe(&mut self, gesture: DragGesture) -> Option<DragOutcome> {
        let mut drag = self.float_drag.take()?;
        let mut ctx = layout_ctx!(self);
        let outcome = drag.fling_or_swipe(&mut ctx, &mut self.float, gesture);
        self.finish_float_drag(drag.target(), outcome);
        Some(outcome)
    }

    pub fn revert_float_drag(&mut self) -> bool {
        let Some(mut drag) = self.float_drag.take() else {
            return false;
        };
        let mut ctx = layout_ctx!(self);
        drag.revert(&mut ctx);
        self.finish_float_drag(drag.target(), DragOutcome::Reverted);
        true
    }

    fn finish_float_drag(&mut self, window: WindowId, outcome: DragOutcome) {
        self.split.set_dragged_window(None);
        tracing::debug!(window_id = %window, ?outcome, "float drag finished");
        if let DragOutcome::Snap(position) = outcome {
            self.send_event(window, WmEvent::Snap(position));
        }
        self.refresh_stacking_order();
        self.dispatch_host_events();
    }

    // ----- split view divider -----

    pub fn start_resize_with_divider(&mut self, location: Point) -> bool {
        let started = self.guarded(|wm| {
            let mut ctx = layout_ctx!(wm);
            wm.split.start_resize_with_divider(&mut ctx, location)
        });
        self.flush_notifications();
        started
    }

    pub fn resize_with_divider(&mut self, location: Point) {
        self.guarded(|wm| {
            let mut ctx = layout_ctx!(wm);
            wm.split.resize_with_divider(&mut ctx, location);
        });
        self.flush_notifications();
    }

    pub fn end_resize_with_divider(&mut self, location: Point) {
        let ended = self.guarded(|wm| {
            let mut ctx = layout_ctx!(wm);
            wm.split.end_resize_with_divider(&mut ctx, location)
        });
        if let Some(ended) = ended {
            self.on_split_view_ended(ended);
        }
        self.flush_notifications();
    }

    /// A window dragged across the split view; the divider stacks below it.
    pub fn set_dragged_window(&mut self, window: Option<WindowId>) {
        self.split.set_dragged_window(window);
        self.refresh_stacking_order();
    }

    fn on_split_view_ended(&mut self, ended: EndedSplitView) {
        tracing::debug!(
            survivor = %ended.survivor,
            released = %ended.released,
            "divider pushed to an edge"
        );
        self.force_state(ended.survivor, WindowStateType::Maximized);
        self.force_state(ended.released, WindowStateType::Normal);
    }

    fn refresh_stacking_order(&mut self) {
        if let Some(_guard) = self.split.refresh_stacking_order(&mut self.host) {
            self.dispatch_host_events();
        }
    }

    // ----- desks -----

    pub fn start_desk_drag(&mut self, desk: DeskId, location: Point) -> bool {
        let mut ctx = layout_ctx!(self);
        let started = self.desks.start_drag_desk(&mut ctx, desk, location);
        self.dispatch_host_events();
        started
    }

    pub fn continue_desk_drag(&mut self, location: Point) {
        let mut ctx = layout_ctx!(self);
        self.desks.continue_drag_desk(&mut ctx, location);
        self.dispatch_host_events();
    }

    pub fn end_desk_drag(&mut self) -> bool {
        let mut ctx = layout_ctx!(self);
        let ended = self.desks.end_drag_desk(&mut ctx);
        self.dispatch_host_events();
        ended
    }

    // ----- runtime -----

    /// Advances every running animation by `elapsed` and applies the frames.
    pub fn tick(&mut self, elapsed: Duration) {
        let output = self.animator.tick(elapsed);
        for (key, value) in output.frames {
            match (key, value) {
                (AnimationKey::Transform(window), AnimatedValue::Transform(transform)) => {
                    self.host.set_transform(window, transform);
                }
                (AnimationKey::DividerPosition, AnimatedValue::Scalar(position)) => {
                    self.guarded(|wm| {
                        let mut ctx = layout_ctx!(wm);
                        wm.split.on_divider_animation_frame(&mut ctx, position);
                    });
                }
                (key, value) => {
                    tracing::warn!(?key, ?value, "animation frame has mismatched value kind");
                }
            }
        }
        for completion in output.completed {
            match completion {
                Completion::None => {}
                Completion::Untucked(window) => {
                    let mut ctx = layout_ctx!(self);
                    self.float.on_untuck_animation_completed(&mut ctx, window);
                }
                Completion::DeskSnappedBack => {
                    let mut ctx = layout_ctx!(self);
                    self.desks.finalize_drag_desk(&mut ctx);
                }
                Completion::DividerSnapped => {
                    let ended = self.guarded(|wm| {
                        let mut ctx = layout_ctx!(wm);
                        wm.split.on_divider_snapped(&mut ctx)
                    });
                    if let Some(ended) = ended {
                        self.on_split_view_ended(ended);
                    }
                }
            }
        }
        self.dispatch_host_events();
    }

    /// Topmost event-accepting window under `point`, helpers included.
    pub fn window_at(&self, point: Point) -> Option<WindowId> {
        let containers = [
            Container::Overlay,
            Container::Float,
            self.host.active_desk_container(),
        ];
        containers.into_iter().find_map(|container| {
            self.host
                .children(container)
                .into_iter()
                .rev()
                .find(|window| {
                    self.host.is_visible(*window)
                        && self.host.accepts_events(*window)
                        && self
                            .host
                            .transform(*window)
                            .apply(&self.host.bounds_in_screen(*window))
                            .contains(point)
                })
        })
    }

    /// Drains the host queue, routing each event to the controllers.
    pub fn dispatch_host_events(&mut self) {
        while let Some(event) = self.host.pop_event() {
            self.route(event);
        }
        self.flush_notifications();
    }

    fn flush_notifications(&mut self) {
        while !self.pending.is_empty() {
            for event in mem::take(&mut self.pending) {
                tracing::trace!(?event, "layout event");
                self.observers.notify(&event);
            }
        }
    }

    /// Runs `f` with the resize-processing flag held. Events already queued
    /// are routed first; the ones `f` causes are routed while the flag is
    /// still held, so the split view ignores its own bounds changes.
    fn guarded<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.dispatch_host_events();
        let flag = self.split.processing_resize_event();
        let guard = flag.set();
        let out = f(self);
        while let Some(event) = self.host.pop_event() {
            self.route(event);
        }
        drop(guard);
        out
    }

    fn route(&mut self, event: HostEvent) {
        tracing::trace!(?event, "host event");
        match event {
            HostEvent::BoundsChanged { window, new, .. } => {
                // The controller holds the flag itself while it relayouts.
                let mut ctx = layout_ctx!(self);
                self.split.on_window_bounds_changed(&mut ctx, window, new);
            }
            HostEvent::Destroying(window) => self.on_window_destroying(window),
            HostEvent::ActivationChanged { gained, .. } => {
                if let Some(gained) = gained {
                    let mut ctx = layout_ctx!(self);
                    self.float.on_window_activated(&mut ctx, gained);
                }
                self.guarded(|wm| {
                    let mut ctx = layout_ctx!(wm);
                    wm.split.on_window_activated(&mut ctx, gained);
                });
                self.refresh_stacking_order();
            }
            HostEvent::VisibilityChanged { window, .. } | HostEvent::StackingChanged(window) => {
                if self.split.affects_stacking(&self.host, window) {
                    self.refresh_stacking_order();
                }
            }
            HostEvent::TabletModeChanged(enabled) => {
                let mut ctx = layout_ctx!(self);
                let unfloated = self.float.on_tablet_mode_changed(&mut ctx, enabled);
                for window in unfloated {
                    self.force_state(window, WindowStateType::Normal);
                }
            }
            HostEvent::DisplayMetricsChanged(changes) => self.on_display_metrics_changed(changes),
            HostEvent::KeyboardOccludedBoundsChanged(keyboard) => {
                self.guarded(|wm| {
                    let mut ctx = layout_ctx!(wm);
                    wm.split.on_keyboard_occluded_bounds_changed(&mut ctx, keyboard);
                });
            }
        }
    }

    fn on_window_destroying(&mut self, window: WindowId) {
        if self.float_drag.as_ref().map(FloatDragController::target) == Some(window) {
            tracing::debug!(window_id = %window, "float drag target destroyed");
            self.float_drag = None;
            self.split.set_dragged_window(None);
        }
        let mut ctx = layout_ctx!(self);
        self.float.on_window_destroying(&mut ctx, window);
        self.guarded(|wm| {
            let mut ctx = layout_ctx!(wm);
            wm.split.on_window_destroying(&mut ctx, window);
        });
        self.states.remove(&window);
        self.refresh_stacking_order();
    }

    fn on_display_metrics_changed(&mut self, changes: DisplayChanges) {
        let mut ctx = layout_ctx!(self);
        let unfloated = self.float.on_display_metrics_changed(&mut ctx, changes);
        for window in unfloated {
            self.force_state(window, WindowStateType::Normal);
        }
        self.guarded(|wm| {
            let mut ctx = layout_ctx!(wm);
            wm.split.on_display_metrics_changed(&mut ctx, changes);
            let maximized: Vec<WindowId> = wm
                .states
                .iter()
                .filter(|(_, state)| state.state_type() == WindowStateType::Maximized)
                .map(|(window, _)| *window)
                .collect();
            for window in maximized {
                let work_area = ctx.host.work_area_for_window(window);
                ctx.host.set_bounds(window, work_area);
            }
        });
        self.desks.set_work_area(self.host.primary_work_area());
    }
}

impl WindowManager<HeadlessHost> {
    /// Adds a client window to the virtual display and routes its events.
    pub fn add_window(&mut self, options: WindowOptions) -> WindowId {
        let window = self.host.add_window(options);
        self.dispatch_host_events();
        window
    }
}

impl<H: WindowHost> Drop for WindowManager<H> {
    fn drop(&mut self) {
        let mut ctx = layout_ctx!(self);
        self.float.shutdown(&mut ctx);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::config::DisplaySpec;
    use crate::geometry::Size;

    fn manager() -> WindowManager<HeadlessHost> {
        let config = LayoutConfig {
            animation_scale: 0.0,
            ..LayoutConfig::default()
        };
        WindowManager::new(HeadlessHost::new(DisplaySpec::default()), config)
    }

    fn record(wm: &mut WindowManager<HeadlessHost>) -> Rc<RefCell<Vec<LayoutEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        wm.subscribe(move |event| sink.borrow_mut().push(*event));
        events
    }

    #[test]
    fn floating_a_second_window_unfloats_the_first() {
        let mut wm = manager();
        let first = wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)));
        let second = wm.add_window(WindowOptions::new(Rect::new(200, 200, 400, 300)));

        assert!(wm.float_window(first));
        assert!(wm.float_window(second));

        assert_eq!(wm.float_controller().floated_window(), Some(second));
        assert_eq!(wm.window_state(first), WindowStateType::Normal);
        assert_eq!(wm.window_state(second), WindowStateType::Floated);
        assert_eq!(
            wm.host().container(first),
            Some(wm.host().active_desk_container())
        );
        assert_eq!(wm.host().container(second), Some(Container::Float));
    }

    #[test]
    fn toggle_float_restores_normal_bounds() {
        let mut wm = manager();
        let window = wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)));

        assert!(wm.toggle_float(window));
        assert!(wm.toggle_float(window));

        assert_eq!(wm.window_state(window), WindowStateType::Normal);
        assert_eq!(wm.host().bounds_in_screen(window), Rect::new(100, 100, 400, 300));
        assert_eq!(wm.host().restore_bounds(window), None);
    }

    #[test]
    fn unfloat_of_normal_window_is_a_no_op() {
        let mut wm = manager();
        let window = wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)));
        let events = record(&mut wm);

        assert!(!wm.unfloat_window(window));
        assert!(events.borrow().is_empty());
    }

    #[test]
    fn minimized_window_ignores_toggle_float() {
        let mut wm = manager();
        let window = wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)));

        assert!(wm.minimize_window(window));
        assert!(!wm.toggle_float(window));
        assert!(!wm.host().is_visible(window));

        assert!(wm.restore_window(window));
        assert!(wm.host().is_visible(window));
        assert_eq!(wm.window_state(window), WindowStateType::Normal);
    }

    #[test]
    fn float_state_events_reach_observers_in_order() {
        let mut wm = manager();
        let window = wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)));
        let events = record(&mut wm);

        wm.toggle_float(window);
        wm.toggle_float(window);

        assert_eq!(
            *events.borrow(),
            vec![
                LayoutEvent::FloatStateChanged {
                    window,
                    floated: true
                },
                LayoutEvent::FloatStateChanged {
                    window,
                    floated: false
                },
            ]
        );
    }

    #[test]
    fn unsubscribed_observer_hears_nothing() {
        let mut wm = manager();
        let window = wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)));
        let events = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&events);
        let token = wm.subscribe(move |_| *sink.borrow_mut() += 1);

        assert!(wm.unsubscribe(token));
        wm.toggle_float(window);
        assert_eq!(*events.borrow(), 0);
    }

    #[test]
    fn snapping_onto_occupied_side_displaces_to_normal() {
        let mut wm = manager();
        let a = wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)));
        let b = wm.add_window(WindowOptions::new(Rect::new(300, 100, 400, 300)));

        wm.snap_window(a, SnapPosition::Primary);
        wm.snap_window(b, SnapPosition::Primary);

        assert_eq!(wm.split_view().primary_window(), Some(b));
        assert_eq!(wm.window_state(a), WindowStateType::Normal);
        assert_eq!(wm.host().bounds_in_screen(a), Rect::new(100, 100, 400, 300));
    }

    #[test]
    fn maximized_window_follows_work_area() {
        let mut wm = manager();
        let window = wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)));

        wm.maximize_window(window);
        assert_eq!(wm.host().bounds_in_screen(window), wm.host().work_area());

        wm.host_mut().set_shelf_height(100);
        wm.dispatch_host_events();
        assert_eq!(wm.host().bounds_in_screen(window), Rect::new(0, 0, 1600, 900));
    }

    #[test]
    fn window_at_prefers_float_container() {
        let mut wm = manager();
        let below = wm.add_window(WindowOptions::new(Rect::new(0, 0, 1600, 952)));
        let floated = wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)));
        wm.float_window(floated);
        wm.activate(Some(below));

        let bounds = wm.host().bounds_in_screen(floated);
        assert_eq!(wm.window_at(bounds.center()), Some(floated));
        assert_eq!(wm.window_at(Point::new(1590, 10)), Some(below));
    }

    #[test]
    fn closing_float_drag_target_cancels_drag() {
        let mut wm = manager();
        let window = wm.add_window(
            WindowOptions::new(Rect::new(100, 100, 400, 300)).min_size(Size::new(100, 100)),
        );
        wm.float_window(window);
        let start = wm.host().bounds_in_screen(window).center();
        assert!(wm.start_float_drag(window, start));

        wm.close_window(window);

        assert!(wm.float_drag().is_none());
        assert_eq!(wm.complete_float_drag(), None);
        assert_eq!(wm.float_controller().floated_window(), None);
    }
}
