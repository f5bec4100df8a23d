//! Two-window split layout driven by a draggable divider.

pub mod divider;

use crate::animation::{AnimatedValue, AnimationKey, Animator, Completion, Easing, Phase};
use crate::constants::{DIVIDER_SNAP_DURATION, DIVIDER_THICKNESS};
use crate::geometry::{Point, Rect, Transform};
use crate::layout::{
    SnapPosition, closest_fixed_ratio, divider_position_for_ratio, primary_extent,
    primary_length, snapped_window_bounds,
};
use crate::window::{DisplayChanges, LayoutContext, WindowHost, WindowId};

pub use divider::{DividerView, FlagGuard, ScopedFlag, SplitViewDivider};

/// Result of a divider drag that ended at either edge of the work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndedSplitView {
    /// The window that kept the screen; it should be maximized.
    pub survivor: WindowId,
    /// The window squeezed out of the layout.
    pub released: WindowId,
}

#[derive(Debug, Default)]
pub struct SplitViewController {
    primary: Option<WindowId>,
    secondary: Option<WindowId>,
    divider: SplitViewDivider,
    pending_ratio: Option<f32>,
    /// Work area and orientation of the last layout pass.
    layout_area: Option<(Rect, bool)>,
}

impl SplitViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn divider(&self) -> &SplitViewDivider {
        &self.divider
    }

    pub fn primary_window(&self) -> Option<WindowId> {
        self.primary
    }

    pub fn secondary_window(&self) -> Option<WindowId> {
        self.secondary
    }

    /// Both sides are occupied and the divider is up.
    pub fn is_active(&self) -> bool {
        self.primary.is_some() && self.secondary.is_some()
    }

    pub fn in_split_view(&self) -> bool {
        self.primary.is_some() || self.secondary.is_some()
    }

    pub fn snap_position_of(&self, window: WindowId) -> Option<SnapPosition> {
        if self.primary == Some(window) {
            Some(SnapPosition::Primary)
        } else if self.secondary == Some(window) {
            Some(SnapPosition::Secondary)
        } else {
            None
        }
    }

    pub fn divider_position(&self) -> i32 {
        self.divider.position()
    }

    pub fn is_divider_animating(&self, animator: &Animator) -> bool {
        animator.is_animating(AnimationKey::DividerPosition)
    }

    /// Snapped windows in primary, secondary order.
    pub fn layout_windows_list(&self) -> Vec<WindowId> {
        self.primary.into_iter().chain(self.secondary).collect()
    }

    fn slot_mut(&mut self, position: SnapPosition) -> &mut Option<WindowId> {
        match position {
            SnapPosition::Primary => &mut self.primary,
            SnapPosition::Secondary => &mut self.secondary,
        }
    }

    fn geometry(host: &dyn WindowHost, window: WindowId) -> (Rect, bool) {
        (
            host.work_area_for_window(window),
            host.display_orientation(window).is_landscape(),
        )
    }

    /// Puts `window` on `position`. Returns the window it displaced, if any.
    pub fn snap_window(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        window: WindowId,
        position: SnapPosition,
    ) -> Option<WindowId> {
        if !ctx.host.exists(window) || !ctx.host.can_resize(window) {
            return None;
        }
        if !self.in_split_view() {
            let (work_area, is_landscape) = Self::geometry(ctx.host, window);
            self.divider
                .set_position(divider_position_for_ratio(&work_area, is_landscape, 0.5));
        }
        let other = self.slot_mut(position.opposite());
        if *other == Some(window) {
            *other = None;
        }
        let displaced = self
            .slot_mut(position)
            .replace(window)
            .filter(|previous| *previous != window);
        if let Some(previous) = displaced {
            self.divider.stop_observing(previous);
            ctx.host.set_transform(previous, Transform::IDENTITY);
        }
        let desk = ctx.host.active_desk_container();
        if ctx.host.container(window) != Some(desk) {
            ctx.host.reparent(window, desk);
        }

        tracing::debug!(window_id = %window, ?position, ?displaced, "window snapped");
        self.update_divider(ctx);
        self.layout_windows(ctx);
        displaced
    }

    /// Shows the divider when both sides are filled and hides it otherwise.
    fn update_divider(&mut self, ctx: &mut LayoutContext<'_>) {
        let windows = self.layout_windows_list();
        if windows.len() == 2 {
            if self.divider.observed_windows() != windows.as_slice() {
                let position = self.divider.position();
                self.divider.show_for(ctx, &windows, position);
            }
        } else if self.divider.has_divider_widget() {
            ctx.animator.stop(AnimationKey::DividerPosition);
            self.pending_ratio = None;
            self.divider.close(ctx);
        }
    }

    /// Takes `window` out of the layout. The other window stays snapped.
    pub fn remove_window(&mut self, ctx: &mut LayoutContext<'_>, window: WindowId) -> bool {
        let Some(position) = self.snap_position_of(window) else {
            return false;
        };
        *self.slot_mut(position) = None;
        ctx.host.set_transform(window, Transform::IDENTITY);
        for other in self.layout_windows_list() {
            ctx.host.set_transform(other, Transform::IDENTITY);
        }
        self.update_divider(ctx);
        if !self.in_split_view() {
            self.layout_area = None;
        }
        tracing::debug!(window_id = %window, "window left split view");
        true
    }

    /// Returns the windows that were snapped.
    pub fn end_split_view(&mut self, ctx: &mut LayoutContext<'_>) -> Vec<WindowId> {
        let windows = self.layout_windows_list();
        ctx.animator.stop(AnimationKey::DividerPosition);
        self.pending_ratio = None;
        self.divider.close(ctx);
        for window in &windows {
            ctx.host.set_transform(*window, Transform::IDENTITY);
        }
        self.primary = None;
        self.secondary = None;
        self.layout_area = None;
        if !windows.is_empty() {
            tracing::debug!(?windows, "split view ended");
        }
        windows
    }

    pub fn layout_windows(&mut self, ctx: &mut LayoutContext<'_>) {
        self.layout_windows_except(ctx, None);
    }

    fn layout_windows_except(&mut self, ctx: &mut LayoutContext<'_>, skip: Option<WindowId>) {
        let Some(anchor) = self.primary.or(self.secondary) else {
            return;
        };
        let (work_area, is_landscape) = Self::geometry(ctx.host, anchor);
        let position = self.divider.position();
        let resizing = self.divider.is_resizing();

        for (slot, snap) in [
            (self.primary, SnapPosition::Primary),
            (self.secondary, SnapPosition::Secondary),
        ] {
            let Some(window) = slot else {
                continue;
            };
            if Some(window) == skip
                || (snap == SnapPosition::Secondary && self.divider.is_keyboard_locked())
            {
                continue;
            }
            let slot_bounds = snapped_window_bounds(&work_area, is_landscape, position, snap);
            let min = primary_extent(ctx.host.minimum_size(window), is_landscape);
            let extent = primary_extent(slot_bounds.size(), is_landscape);
            if extent >= min {
                ctx.host.set_bounds(window, slot_bounds);
                if resizing {
                    ctx.host.set_transform(window, Transform::IDENTITY);
                }
                continue;
            }

            // The window cannot shrink to its slot: keep its minimum extent
            // and, while resizing, slide it so the edge facing the divider
            // stays on the divider.
            let (bounds, shift) =
                overflow_bounds(&work_area, is_landscape, &slot_bounds, min, snap);
            ctx.host.set_bounds(window, bounds);
            let transform = if resizing {
                if is_landscape {
                    Transform::translation(shift as f64, 0.0)
                } else {
                    Transform::translation(0.0, shift as f64)
                }
            } else {
                Transform::IDENTITY
            };
            ctx.host.set_transform(window, transform);
        }

        if !resizing {
            for window in self.layout_windows_list() {
                self.clamp_transient_children(ctx.host, window);
            }
        }
        self.divider.update_divider_bounds(ctx.host);
        self.layout_area = Some((work_area, is_landscape));
    }

    fn clamp_transient_children(&self, host: &mut dyn WindowHost, parent: WindowId) {
        let widget = self.divider.view().map(|view| view.widget);
        let parent_bounds = host.bounds_in_screen(parent);
        for child in host.transient_children(parent) {
            if Some(child) == widget {
                continue;
            }
            let bounds = host.bounds_in_screen(child);
            let clamped = bounds.adjust_to_fit(&parent_bounds);
            if clamped != bounds {
                tracing::trace!(window_id = %child, %clamped, "transient child clamped");
                host.set_bounds(child, clamped);
            }
        }
    }

    pub fn start_resize_with_divider(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        location: Point,
    ) -> bool {
        if !self.is_active() || self.is_divider_animating(ctx.animator) {
            return false;
        }
        self.divider.start_resize(ctx, location)
    }

    pub fn resize_with_divider(&mut self, ctx: &mut LayoutContext<'_>, location: Point) {
        if !self.divider.is_resizing() {
            return;
        }
        let flag = self.divider.processing_resize_event();
        let _guard = flag.set();
        self.divider.update_position(ctx.host, location);
        self.layout_windows(ctx);
    }

    /// Finishes a divider drag. The divider settles on the closest fixed
    /// ratio, animated unless it is already there. Returns the ended split
    /// when the divider settled on an edge without animating.
    pub fn end_resize_with_divider(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        location: Point,
    ) -> Option<EndedSplitView> {
        if !self.divider.is_resizing() {
            return None;
        }
        self.resize_with_divider(ctx, location);

        let (primary, secondary) = (self.primary?, self.secondary?);
        let (work_area, is_landscape) = Self::geometry(ctx.host, primary);
        let position = self.divider.position();
        let ratio = closest_fixed_ratio(
            &work_area,
            is_landscape,
            position,
            primary_extent(ctx.host.minimum_size(primary), is_landscape),
            primary_extent(ctx.host.minimum_size(secondary), is_landscape),
            ctx.config.third_ratios,
        );
        let target = divider_position_for_ratio(&work_area, is_landscape, ratio);
        self.pending_ratio = Some(ratio);
        tracing::debug!(position, target, ratio, "divider released");

        if target == position {
            return self.on_divider_snapped(ctx);
        }
        ctx.animator.start(
            AnimationKey::DividerPosition,
            AnimatedValue::Scalar(position as f64),
            vec![Phase::new(
                AnimatedValue::Scalar(target as f64),
                DIVIDER_SNAP_DURATION,
                Easing::FastOutSlowIn,
            )],
            Completion::DividerSnapped,
        );
        None
    }

    pub fn on_divider_animation_frame(&mut self, ctx: &mut LayoutContext<'_>, position: f64) {
        if !self.is_active() {
            return;
        }
        self.divider.set_position(position.round() as i32);
        self.layout_windows(ctx);
    }

    /// Cleanup after a divider drag, once the divider is at rest.
    pub fn on_divider_snapped(&mut self, ctx: &mut LayoutContext<'_>) -> Option<EndedSplitView> {
        let ratio = self.pending_ratio.take();
        for window in self.layout_windows_list() {
            ctx.host.set_transform(window, Transform::IDENTITY);
        }
        self.divider.finish_resize(ctx);

        let (primary, secondary) = (self.primary?, self.secondary?);
        let ended = match ratio {
            Some(r) if r <= 0.0 => Some(EndedSplitView {
                survivor: secondary,
                released: primary,
            }),
            Some(r) if r >= 1.0 => Some(EndedSplitView {
                survivor: primary,
                released: secondary,
            }),
            _ => None,
        };
        match ended {
            Some(ended) => {
                self.end_split_view(ctx);
                Some(ended)
            }
            None => {
                self.layout_windows(ctx);
                None
            }
        }
    }

    /// Bounds change that did not come from this controller.
    pub fn on_window_bounds_changed(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        window: WindowId,
        new: Rect,
    ) {
        if self.divider.processing_resize_event().is_set() {
            return;
        }
        if let Some(snap) = self.snap_position_of(window) {
            if self.divider.is_resizing() || self.is_divider_animating(ctx.animator) {
                return;
            }
            self.clamp_transient_children(ctx.host, window);
            if !self.is_active() || self.divider.is_keyboard_locked() {
                return;
            }
            let (work_area, is_landscape) = Self::geometry(ctx.host, window);
            let position = match (snap, is_landscape) {
                (SnapPosition::Primary, true) => new.right() - work_area.x,
                (SnapPosition::Primary, false) => new.bottom() - work_area.y,
                (SnapPosition::Secondary, true) => new.x - work_area.x - DIVIDER_THICKNESS,
                (SnapPosition::Secondary, false) => new.y - work_area.y - DIVIDER_THICKNESS,
            };
            let position = position.clamp(0, primary_length(&work_area, is_landscape));
            if position == self.divider.position() {
                return;
            }
            tracing::debug!(window_id = %window, position, "divider follows window edge");
            let flag = self.divider.processing_resize_event();
            let _guard = flag.set();
            self.divider.set_position(position);
            self.layout_windows_except(ctx, Some(window));
            return;
        }

        let Some(parent) = ctx.host.transient_parent(window) else {
            return;
        };
        if self.snap_position_of(parent).is_some() && !self.divider.is_resizing() {
            let parent_bounds = ctx.host.bounds_in_screen(parent);
            if Some(window) != self.divider.view().map(|view| view.widget) {
                let clamped = new.adjust_to_fit(&parent_bounds);
                if clamped != new {
                    ctx.host.set_bounds(window, clamped);
                }
            }
        }
    }

    pub fn on_window_destroying(&mut self, ctx: &mut LayoutContext<'_>, window: WindowId) {
        if self.divider.dragged_window() == Some(window) {
            self.divider.set_dragged_window(None);
        }
        self.remove_window(ctx, window);
    }

    pub fn on_display_metrics_changed(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        changes: DisplayChanges,
    ) {
        if !self.in_split_view() || !(changes.work_area || changes.rotation) {
            return;
        }
        let Some(anchor) = self.primary.or(self.secondary) else {
            return;
        };
        if self.divider.is_resizing() {
            ctx.animator.stop(AnimationKey::DividerPosition);
            self.pending_ratio = None;
            for window in self.layout_windows_list() {
                ctx.host.set_transform(window, Transform::IDENTITY);
            }
            self.divider.finish_resize(ctx);
        }
        self.divider.unlock_for_keyboard(ctx.host);

        let (work_area, is_landscape) = Self::geometry(ctx.host, anchor);
        if let Some((old_area, old_landscape)) = self.layout_area {
            let old_length = primary_length(&old_area, old_landscape).max(1);
            let ratio =
                (self.divider.position() + DIVIDER_THICKNESS / 2) as f32 / old_length as f32;
            self.divider
                .set_position(divider_position_for_ratio(&work_area, is_landscape, ratio));
        }
        tracing::debug!(?changes, position = self.divider.position(), "split view relayout");
        self.layout_windows(ctx);
    }

    /// Portrait only: pushes the active bottom window above the keyboard and
    /// locks the divider on top of it. The logical position is kept so the
    /// layout can be restored once the keyboard goes away.
    pub fn on_keyboard_occluded_bounds_changed(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        keyboard: Option<Rect>,
    ) {
        let Some(bottom) = self.secondary.filter(|_| self.is_active()) else {
            return;
        };
        let is_landscape = ctx.host.display_orientation(bottom).is_landscape();
        match keyboard {
            Some(keyboard)
                if !is_landscape
                    && !self.divider.is_resizing()
                    && ctx.host.active_window() == Some(bottom) =>
            {
                let snapped = {
                    let (work_area, _) = Self::geometry(ctx.host, bottom);
                    snapped_window_bounds(
                        &work_area,
                        false,
                        self.divider.position(),
                        SnapPosition::Secondary,
                    )
                };
                if !snapped.intersects(&keyboard) {
                    self.restore_from_keyboard(ctx);
                    return;
                }
                if let Some(top) = self
                    .divider
                    .lock_for_keyboard(ctx.host, snapped.height, keyboard)
                {
                    tracing::debug!(
                        window_id = %bottom,
                        top,
                        "bottom window pushed above keyboard"
                    );
                    ctx.host.set_bounds(bottom, Rect { y: top, ..snapped });
                }
            }
            _ => self.restore_from_keyboard(ctx),
        }
    }

    fn restore_from_keyboard(&mut self, ctx: &mut LayoutContext<'_>) {
        if self.divider.unlock_for_keyboard(ctx.host) {
            self.layout_windows(ctx);
        }
    }

    /// The bottom window losing activation gives its space back.
    pub fn on_window_activated(&mut self, ctx: &mut LayoutContext<'_>, gained: Option<WindowId>) {
        if self.divider.is_keyboard_locked() && gained != self.secondary {
            self.restore_from_keyboard(ctx);
        }
    }

    pub fn set_dragged_window(&mut self, window: Option<WindowId>) {
        self.divider.set_dragged_window(window);
    }

    pub fn processing_resize_event(&self) -> ScopedFlag {
        self.divider.processing_resize_event()
    }

    pub fn refresh_stacking_order(&mut self, host: &mut dyn WindowHost) -> Option<FlagGuard> {
        self.divider.refresh_stacking_order(host)
    }

    /// Whether a change to `window` can affect where the divider stacks.
    pub fn affects_stacking(&self, host: &dyn WindowHost, window: WindowId) -> bool {
        self.divider.has_divider_widget()
            && (self.divider.is_observing(window)
                || self.divider.dragged_window() == Some(window)
                || host
                    .transient_parent(window)
                    .is_some_and(|parent| self.divider.is_observing(parent)))
    }
}

/// Bounds for a window whose minimum extent does not fit its slot, anchored
/// at the work-area edge away from the divider, plus the primary-axis shift
/// that puts its divider-facing edge back on the slot edge.
fn overflow_bounds(
    work_area: &Rect,
    is_landscape: bool,
    slot: &Rect,
    min: i32,
    snap: SnapPosition,
) -> (Rect, i32) {
    match (snap, is_landscape) {
        (SnapPosition::Primary, true) => {
            let bounds = Rect { width: min, ..*slot };
            (bounds, slot.right() - bounds.right())
        }
        (SnapPosition::Primary, false) => {
            let bounds = Rect { height: min, ..*slot };
            (bounds, slot.bottom() - bounds.bottom())
        }
        (SnapPosition::Secondary, true) => {
            let bounds = Rect {
                x: work_area.right() - min,
                width: min,
                ..*slot
            };
            (bounds, slot.x - bounds.x)
        }
        (SnapPosition::Secondary, false) => {
            let bounds = Rect {
                y: work_area.bottom() - min,
                height: min,
                ..*slot
            };
            (bounds, slot.y - bounds.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflowing_primary_slides_left_of_divider() {
        let work_area = Rect::new(0, 0, 1600, 952);
        let slot = Rect::new(0, 0, 300, 952);
        let (bounds, shift) = overflow_bounds(&work_area, true, &slot, 500, SnapPosition::Primary);
        assert_eq!(bounds, Rect::new(0, 0, 500, 952));
        assert_eq!(shift, -200);
        assert_eq!(bounds.right() + shift, slot.right());
    }

    #[test]
    fn overflowing_secondary_slides_right_of_divider() {
        let work_area = Rect::new(0, 0, 1600, 952);
        let slot = Rect::new(1308, 0, 292, 952);
        let (bounds, shift) =
            overflow_bounds(&work_area, true, &slot, 500, SnapPosition::Secondary);
        assert_eq!(bounds, Rect::new(1100, 0, 500, 952));
        assert_eq!(bounds.x + shift, slot.x);
    }
}
