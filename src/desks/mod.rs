//! Ordered desks with drag-to-reorder mini views.

pub mod drag_proxy;

use crate::constants::{
    DESK_MINI_VIEW_HEIGHT, DESK_MINI_VIEW_SPACING, DESK_MINI_VIEW_WIDTH, DESKS_BAR_HEIGHT,
};
use crate::geometry::{Point, Rect};
use crate::window::{DeskId, LayoutContext, LayoutEvent};

pub use drag_proxy::{DeskDragProxy, ProxyState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Desk {
    pub id: DeskId,
    pub name: String,
}

#[derive(Debug)]
struct DeskDrag {
    desk: DeskId,
    proxy: DeskDragProxy,
}

#[derive(Debug)]
pub struct DesksBar {
    desks: Vec<Desk>,
    bounds: Rect,
    drag: Option<DeskDrag>,
    next_id: u32,
}

impl DesksBar {
    /// Bar across the top of `work_area` with `count` desks.
    pub fn new(work_area: Rect, count: usize) -> Self {
        let mut bar = Self {
            desks: Vec::new(),
            bounds: Rect::default(),
            drag: None,
            next_id: 0,
        };
        bar.set_work_area(work_area);
        for _ in 0..count.max(1) {
            bar.add_desk();
        }
        bar
    }

    pub fn set_work_area(&mut self, work_area: Rect) {
        self.bounds = Rect::new(
            work_area.x,
            work_area.y,
            work_area.width,
            DESKS_BAR_HEIGHT.min(work_area.height),
        );
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn desks(&self) -> &[Desk] {
        &self.desks
    }

    pub fn add_desk(&mut self) -> DeskId {
        let id = DeskId(self.next_id);
        self.next_id += 1;
        self.desks.push(Desk {
            id,
            name: format!("Desk {}", id.0 + 1),
        });
        id
    }

    pub fn index_of(&self, desk: DeskId) -> Option<usize> {
        self.desks.iter().position(|d| d.id == desk)
    }

    /// Mini views are centered in the bar.
    pub fn mini_view_bounds(&self, index: usize) -> Rect {
        let count = self.desks.len() as i32;
        let total = count * DESK_MINI_VIEW_WIDTH + (count - 1).max(0) * DESK_MINI_VIEW_SPACING;
        let start = self.bounds.x + (self.bounds.width - total) / 2;
        Rect::new(
            start + index as i32 * (DESK_MINI_VIEW_WIDTH + DESK_MINI_VIEW_SPACING),
            self.bounds.y + (self.bounds.height - DESK_MINI_VIEW_HEIGHT) / 2,
            DESK_MINI_VIEW_WIDTH,
            DESK_MINI_VIEW_HEIGHT,
        )
    }

    pub fn desk_at(&self, point: Point) -> Option<DeskId> {
        (0..self.desks.len())
            .find(|index| self.mini_view_bounds(*index).contains(point))
            .map(|index| self.desks[index].id)
    }

    pub fn is_dragging_desk(&self) -> bool {
        self.drag.is_some()
    }

    pub fn dragged_desk(&self) -> Option<DeskId> {
        self.drag.as_ref().map(|drag| drag.desk)
    }

    pub fn drag_proxy(&self) -> Option<&DeskDragProxy> {
        self.drag.as_ref().map(|drag| &drag.proxy)
    }

    pub fn start_drag_desk(
        &mut self,
        ctx: &mut LayoutContext<'_>,
        desk: DeskId,
        location: Point,
    ) -> bool {
        if self.drag.is_some() || self.desks.len() < 2 {
            return false;
        }
        let Some(index) = self.index_of(desk) else {
            return false;
        };
        let proxy = DeskDragProxy::start_drag(ctx, self.mini_view_bounds(index), location);
        self.drag = Some(DeskDrag { desk, proxy });
        tracing::debug!(desk = desk.0, index, "desk drag started");
        true
    }

    /// Moves the proxy and reorders live when its center crosses another
    /// mini view.
    pub fn continue_drag_desk(&mut self, ctx: &mut LayoutContext<'_>, location: Point) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        if drag.proxy.state() != ProxyState::Dragging {
            return;
        }
        drag.proxy.drag_to(ctx, location);
        let desk = drag.desk;
        let center = ctx.host.bounds_in_screen(drag.proxy.window()).center();

        let Some(from) = self.index_of(desk) else {
            return;
        };
        let target = (0..self.desks.len()).find(|index| {
            let view = self.mini_view_bounds(*index);
            center.x >= view.x && center.x < view.right()
        });
        if let Some(to) = target.filter(|to| *to != from) {
            let moved = self.desks.remove(from);
            self.desks.insert(to, moved);
            tracing::debug!(desk = desk.0, from, to, "desk reordered");
            ctx.notify(LayoutEvent::DeskReordered { desk, from, to });
        }
    }

    /// Sends the proxy back over the dragged desk's (possibly new) slot.
    pub fn end_drag_desk(&mut self, ctx: &mut LayoutContext<'_>) -> bool {
        let Some(desk) = self.dragged_desk() else {
            return false;
        };
        let Some(index) = self.index_of(desk) else {
            return false;
        };
        let target = self.mini_view_bounds(index);
        match self.drag.as_mut() {
            Some(drag) => drag.proxy.snap_back_to_drag_view(ctx, target),
            None => false,
        }
    }

    /// Runs once the snap back finished.
    pub fn finalize_drag_desk(&mut self, ctx: &mut LayoutContext<'_>) {
        if let Some(drag) = self.drag.take() {
            tracing::debug!(desk = drag.desk.0, "desk drag finished");
            drag.proxy.destroy(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mini_views_are_centered_and_spaced() {
        let bar = DesksBar::new(Rect::new(0, 0, 1600, 952), 3);
        // 3 * 160 + 2 * 12 = 504, start = (1600 - 504) / 2
        assert_eq!(bar.mini_view_bounds(0), Rect::new(548, 14, 160, 100));
        assert_eq!(bar.mini_view_bounds(1).x, 548 + 172);
        assert_eq!(bar.desk_at(Point::new(560, 50)), Some(DeskId(0)));
        assert_eq!(bar.desk_at(Point::new(712, 50)), None);
    }

    #[test]
    fn desks_get_sequential_names() {
        let bar = DesksBar::new(Rect::new(0, 0, 1600, 952), 2);
        let names: Vec<&str> = bar.desks().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Desk 1", "Desk 2"]);
    }
}
