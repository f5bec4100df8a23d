//! The draggable strip between two snapped windows.

use std::cell::Cell;
use std::rc::Rc;

use crate::constants::{DIVIDER_THICKNESS, KEYBOARD_MIN_TOP_RATIO};
use crate::geometry::{Point, Rect};
use crate::layout::divider_bounds;
use crate::window::{
    DragDetails, HelperKind, LayoutContext, LayoutEvent, WindowComponent, WindowHost, WindowId,
};

/// Re-entrancy flag shared between an owner and the guards it hands out.
#[derive(Debug, Clone, Default)]
pub struct ScopedFlag(Rc<Cell<bool>>);

impl ScopedFlag {
    pub fn is_set(&self) -> bool {
        self.0.get()
    }

    /// Sets the flag until the returned guard drops. `None` when it is
    /// already set; the outer guard keeps ownership.
    pub fn set(&self) -> Option<FlagGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(FlagGuard(Rc::clone(&self.0)))
    }
}

#[derive(Debug)]
pub struct FlagGuard(Rc<Cell<bool>>);

impl Drop for FlagGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// The divider widget. Owned directly; there is only one kind of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DividerView {
    pub widget: WindowId,
    pub bounds: Rect,
}

#[derive(Debug, Default)]
pub struct SplitViewDivider {
    view: Option<DividerView>,
    position: i32,
    observed: Vec<WindowId>,
    is_resizing: bool,
    dragged_window: Option<WindowId>,
    previous_location: Point,
    /// Top of the bottom window while the keyboard pushes it up.
    keyboard_top: Option<i32>,
    processing_resize_event: ScopedFlag,
    pause_update: ScopedFlag,
}

impl SplitViewDivider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_divider_widget(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<DividerView> {
        self.view
    }

    pub fn position(&self) -> i32 {
        self.position
    }

    pub fn set_position(&mut self, position: i32) {
        self.position = position.max(0);
    }

    pub fn observed_windows(&self) -> &[WindowId] {
        &self.observed
    }

    pub fn is_observing(&self, window: WindowId) -> bool {
        self.observed.contains(&window)
    }

    pub fn is_resizing(&self) -> bool {
        self.is_resizing
    }

    pub fn dragged_window(&self) -> Option<WindowId> {
        self.dragged_window
    }

    pub fn is_keyboard_locked(&self) -> bool {
        self.keyboard_top.is_some()
    }

    pub fn processing_resize_event(&self) -> ScopedFlag {
        self.processing_resize_event.clone()
    }

    fn anchor(&self) -> Option<WindowId> {
        self.observed.first().copied()
    }

    fn topmost_visible(&self, host: &dyn WindowHost) -> Option<WindowId> {
        self.observed
            .iter()
            .copied()
            .filter(|w| host.is_visible(*w))
            .max_by_key(|w| host.z_order(*w))
    }

    /// Bounds the widget should have right now.
    pub fn divider_bounds(&self, host: &dyn WindowHost) -> Option<Rect> {
        let anchor = self.anchor()?;
        let work_area = host.work_area_for_window(anchor);
        let is_landscape = host.display_orientation(anchor).is_landscape();
        if let Some(top) = self.keyboard_top {
            return Some(Rect::new(
                work_area.x,
                top - DIVIDER_THICKNESS,
                work_area.width,
                DIVIDER_THICKNESS,
            ));
        }
        Some(divider_bounds(
            &work_area,
            is_landscape,
            self.position,
            self.is_resizing,
        ))
    }

    pub fn update_divider_bounds(&mut self, host: &mut dyn WindowHost) {
        let Some(bounds) = self.divider_bounds(host) else {
            return;
        };
        if let Some(view) = self.view.as_mut() {
            view.bounds = bounds;
            host.set_bounds(view.widget, bounds);
        }
    }

    pub fn show_for(&mut self, ctx: &mut LayoutContext<'_>, windows: &[WindowId], position: i32) {
        self.close(ctx);
        if windows.is_empty() {
            return;
        }
        self.observed = windows.to_vec();
        self.position = position.max(0);

        let Some(topmost) = self
            .topmost_visible(ctx.host)
            .or_else(|| self.anchor())
        else {
            return;
        };
        let container = ctx
            .host
            .container(topmost)
            .unwrap_or_else(|| ctx.host.active_desk_container());
        let widget = ctx
            .host
            .create_helper_window(HelperKind::Divider, container);
        self.view = Some(DividerView {
            widget,
            bounds: Rect::default(),
        });
        self.update_divider_bounds(ctx.host);

        tracing::debug!(position = self.position, observed = ?self.observed, "divider shown");
        ctx.notify(LayoutEvent::DividerShown);
    }

    /// Destroys the widget and stops observing.
    pub fn close(&mut self, ctx: &mut LayoutContext<'_>) {
        if self.is_resizing {
            self.end_drag_details(ctx.host);
            self.is_resizing = false;
        }
        self.keyboard_top = None;
        self.observed.clear();
        self.dragged_window = None;
        if let Some(view) = self.view.take() {
            if let Some(parent) = ctx.host.transient_parent(view.widget) {
                ctx.host.remove_transient_child(parent, view.widget);
            }
            ctx.host.destroy_window(view.widget);
            tracing::debug!("divider hidden");
            ctx.notify(LayoutEvent::DividerHidden);
        }
    }

    pub fn stop_observing(&mut self, window: WindowId) {
        self.observed.retain(|w| *w != window);
        if self.dragged_window == Some(window) {
            self.dragged_window = None;
        }
    }

    pub fn set_dragged_window(&mut self, window: Option<WindowId>) {
        self.dragged_window = window;
    }

    /// Restacks the widget and returns the pause guard so the caller can
    /// process the resulting stacking events while it is held. `None` when a
    /// refresh is already in progress.
    pub fn refresh_stacking_order(&mut self, host: &mut dyn WindowHost) -> Option<FlagGuard> {
        let guard = self.pause_update.set()?;
        self.restack(host);
        Some(guard)
    }

    fn restack(&mut self, host: &mut dyn WindowHost) {
        let Some(view) = self.view else {
            return;
        };
        let Some(topmost) = self.topmost_visible(host) else {
            host.set_visible(view.widget, false);
            return;
        };
        host.set_visible(view.widget, true);

        let current_parent = host.transient_parent(view.widget);
        if let Some(dragged) = self
            .dragged_window
            .filter(|w| !self.observed.contains(w) && host.exists(*w))
        {
            if let Some(parent) = current_parent {
                host.remove_transient_child(parent, view.widget);
            }
            host.stack_below(view.widget, dragged);
            return;
        }

        if current_parent != Some(topmost) {
            if let Some(parent) = current_parent {
                host.remove_transient_child(parent, view.widget);
            }
            host.add_transient_child(topmost, view.widget);
        }
        host.stack_above(view.widget, topmost);
    }

    /// Begins a divider drag. Returns `false` when the drag is refused.
    pub fn start_resize(&mut self, ctx: &mut LayoutContext<'_>, location: Point) -> bool {
        if self.is_resizing || self.view.is_none() || self.is_keyboard_locked() {
            return false;
        }
        self.is_resizing = true;
        self.previous_location = location;
        self.update_divider_bounds(ctx.host);

        let is_landscape = self
            .anchor()
            .map(|w| ctx.host.display_orientation(w).is_landscape())
            .unwrap_or(true);
        for (index, window) in self.observed.iter().enumerate() {
            let component = match (index == 0, is_landscape) {
                (true, true) => WindowComponent::Right,
                (true, false) => WindowComponent::Bottom,
                (false, true) => WindowComponent::Left,
                (false, false) => WindowComponent::Top,
            };
            ctx.host
                .begin_drag_details(*window, DragDetails { location, component });
        }
        tracing::debug!(?location, position = self.position, "divider resize started");
        ctx.notify(LayoutEvent::ResizeStarted);
        true
    }

    /// Applies the primary-axis movement of `location` to the position.
    pub fn update_position(&mut self, host: &dyn WindowHost, location: Point) {
        let Some(anchor) = self.anchor() else {
            return;
        };
        let work_area = host.work_area_for_window(anchor);
        let is_landscape = host.display_orientation(anchor).is_landscape();
        let location = Rect::new(
            work_area.x,
            work_area.y,
            (work_area.width - 1).max(0),
            (work_area.height - 1).max(0),
        )
        .clamp_point(location);
        let delta = if is_landscape {
            location.x - self.previous_location.x
        } else {
            location.y - self.previous_location.y
        };
        self.previous_location = location;
        self.position = (self.position + delta).max(0);
    }

    fn end_drag_details(&self, host: &mut dyn WindowHost) {
        for window in &self.observed {
            host.end_drag_details(*window);
        }
    }

    /// Ends the resize: drag details, thin bounds, notification. The
    /// controller restores transforms.
    pub fn finish_resize(&mut self, ctx: &mut LayoutContext<'_>) {
        if !self.is_resizing {
            return;
        }
        self.end_drag_details(ctx.host);
        self.is_resizing = false;
        self.update_divider_bounds(ctx.host);
        tracing::debug!(position = self.position, "divider resize ended");
        ctx.notify(LayoutEvent::ResizeEnded);
    }

    /// Locks the divider above the bottom window while the keyboard pushes
    /// it up. Returns the new top of the bottom window.
    pub fn lock_for_keyboard(
        &mut self,
        host: &mut dyn WindowHost,
        bottom_height: i32,
        keyboard: Rect,
    ) -> Option<i32> {
        let anchor = self.anchor()?;
        let work_area = host.work_area_for_window(anchor);
        let min_top = work_area.y + (work_area.height as f32 * KEYBOARD_MIN_TOP_RATIO) as i32;
        let top = (keyboard.y - bottom_height).max(min_top);
        self.keyboard_top = Some(top);
        self.update_divider_bounds(host);
        Some(top)
    }

    pub fn unlock_for_keyboard(&mut self, host: &mut dyn WindowHost) -> bool {
        if self.keyboard_top.take().is_none() {
            return false;
        }
        self.update_divider_bounds(host);
        true
    }
}
