//! In-memory `WindowHost` used by the tests and by the terminal playground.
//!
//! It keeps a small window tree (containers with bottom-to-top stacking,
//! transient parents, activation history) and queues a `HostEvent` for every
//! observable change so the window manager can route them.

use std::collections::{BTreeMap, VecDeque};

use crate::config::DisplaySpec;
use crate::geometry::{Orientation, Rect, Size, Transform};

use super::{
    Container, DeskId, DisplayChanges, DragDetails, HelperKind, HostEvent, WindowHost, WindowId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowOptions {
    pub bounds: Rect,
    pub min_size: Size,
    pub resizable: bool,
    pub auto_managed: bool,
}

impl WindowOptions {
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            min_size: Size::new(0, 0),
            resizable: true,
            auto_managed: true,
        }
    }

    pub fn min_size(mut self, size: Size) -> Self {
        self.min_size = size;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn auto_managed(mut self, managed: bool) -> Self {
        self.auto_managed = managed;
        self
    }
}

#[derive(Debug, Clone)]
struct HostWindow {
    bounds: Rect,
    restore_bounds: Option<Rect>,
    min_size: Size,
    resizable: bool,
    shown: bool,
    container: Container,
    transform: Transform,
    transient_parent: Option<WindowId>,
    transient_children: Vec<WindowId>,
    accepts_events: bool,
    auto_managed: bool,
    drag_details: Option<DragDetails>,
    helper: Option<HelperKind>,
}

#[derive(Debug)]
pub struct HeadlessHost {
    display: DisplaySpec,
    orientation: Orientation,
    tablet_mode: bool,
    keyboard: Option<Rect>,
    windows: BTreeMap<WindowId, HostWindow>,
    stacks: BTreeMap<Container, Vec<WindowId>>,
    active_desk: DeskId,
    active: Option<WindowId>,
    mru: Vec<WindowId>,
    next_id: u64,
    events: VecDeque<HostEvent>,
}

impl HeadlessHost {
    pub fn new(display: DisplaySpec) -> Self {
        Self {
            orientation: Orientation::of(&display.bounds()),
            display,
            tablet_mode: false,
            keyboard: None,
            windows: BTreeMap::new(),
            stacks: BTreeMap::new(),
            active_desk: DeskId(0),
            active: None,
            mru: Vec::new(),
            next_id: 1,
            events: VecDeque::new(),
        }
    }

    /// Display bounds after rotation.
    pub fn display_bounds(&self) -> Rect {
        let size = self.display.size;
        let (long, short) = (size.width.max(size.height), size.width.min(size.height));
        match self.orientation {
            Orientation::Landscape => Rect::new(0, 0, long, short),
            Orientation::Portrait => Rect::new(0, 0, short, long),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn work_area(&self) -> Rect {
        let display = self.display_bounds();
        Rect::new(
            display.x,
            display.y,
            display.width,
            display.height - self.display.shelf_height,
        )
    }

    pub fn shelf_height(&self) -> i32 {
        self.display.shelf_height
    }

    /// Adds an app window on the active desk and activates it.
    pub fn add_window(&mut self, options: WindowOptions) -> WindowId {
        let container = self.active_desk_container();
        let id = self.insert_window(options, container, None);
        self.activate(Some(id));
        id
    }

    pub fn set_minimum_size(&mut self, window: WindowId, size: Size) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.min_size = size;
        }
    }

    pub fn set_tablet_mode(&mut self, enabled: bool) {
        if self.tablet_mode == enabled {
            return;
        }
        self.tablet_mode = enabled;
        self.events.push_back(HostEvent::TabletModeChanged(enabled));
    }

    pub fn rotate(&mut self, orientation: Orientation) {
        if self.orientation == orientation {
            return;
        }
        self.orientation = orientation;
        self.events
            .push_back(HostEvent::DisplayMetricsChanged(DisplayChanges {
                work_area: true,
                rotation: true,
            }));
    }

    pub fn set_shelf_height(&mut self, height: i32) {
        if self.display.shelf_height == height {
            return;
        }
        self.display.shelf_height = height.max(0);
        self.events
            .push_back(HostEvent::DisplayMetricsChanged(DisplayChanges {
                work_area: true,
                rotation: false,
            }));
    }

    /// Shows an on-screen keyboard of `height` pixels at the bottom of the
    /// display, or hides it with `None`.
    pub fn set_keyboard(&mut self, height: Option<i32>) {
        let display = self.display_bounds();
        let keyboard = height.map(|h| {
            let h = h.clamp(0, display.height);
            Rect::new(display.x, display.bottom() - h, display.width, h)
        });
        if self.keyboard == keyboard {
            return;
        }
        self.keyboard = keyboard;
        self.events
            .push_back(HostEvent::KeyboardOccludedBoundsChanged(keyboard));
    }

    pub fn keyboard_bounds(&self) -> Option<Rect> {
        self.keyboard
    }

    pub fn active_desk(&self) -> DeskId {
        self.active_desk
    }

    pub fn switch_desk(&mut self, desk: DeskId) {
        if self.active_desk == desk {
            return;
        }
        let before: Vec<(WindowId, bool)> = self
            .windows
            .keys()
            .map(|id| (*id, self.is_visible(*id)))
            .collect();
        self.active_desk = desk;
        for (id, was_visible) in before {
            let visible = self.is_visible(id);
            if visible != was_visible {
                self.events
                    .push_back(HostEvent::VisibilityChanged { window: id, visible });
            }
        }
    }

    pub fn window_ids(&self) -> Vec<WindowId> {
        self.windows.keys().copied().collect()
    }

    pub fn helper_kind(&self, window: WindowId) -> Option<HelperKind> {
        self.windows.get(&window).and_then(|w| w.helper)
    }

    pub fn helpers(&self, kind: HelperKind) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|(_, w)| w.helper == Some(kind))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Bounds with the layer transform applied.
    pub fn visual_bounds(&self, window: WindowId) -> Rect {
        self.windows
            .get(&window)
            .map(|w| w.transform.apply(&w.bounds))
            .unwrap_or_default()
    }

    pub fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    fn insert_window(
        &mut self,
        options: WindowOptions,
        container: Container,
        helper: Option<HelperKind>,
    ) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.windows.insert(
            id,
            HostWindow {
                bounds: options.bounds,
                restore_bounds: None,
                min_size: options.min_size,
                resizable: options.resizable,
                shown: true,
                container,
                transform: Transform::IDENTITY,
                transient_parent: None,
                transient_children: Vec::new(),
                accepts_events: true,
                auto_managed: options.auto_managed,
                drag_details: None,
                helper,
            },
        );
        self.stacks.entry(container).or_default().push(id);
        id
    }

    fn container_visible(&self, container: Container) -> bool {
        match container {
            Container::Desk(desk) => desk == self.active_desk,
            Container::Float | Container::Overlay => true,
        }
    }

    fn stack_position(&self, window: WindowId) -> Option<(Container, usize)> {
        let container = self.windows.get(&window)?.container;
        let index = self
            .stacks
            .get(&container)?
            .iter()
            .position(|id| *id == window)?;
        Some((container, index))
    }

    /// Moves `window` to `index` of its container's stack, then keeps its
    /// transient children directly above it.
    fn restack(&mut self, window: WindowId, container: Container, index: usize) {
        let Some(stack) = self.stacks.get_mut(&container) else {
            return;
        };
        let before = stack.clone();
        stack.retain(|id| *id != window);
        let index = index.min(stack.len());
        stack.insert(index, window);

        let children: Vec<WindowId> = self
            .windows
            .get(&window)
            .map(|w| w.transient_children.clone())
            .unwrap_or_default();
        if let Some(stack) = self.stacks.get_mut(&container) {
            let followers: Vec<WindowId> = stack
                .iter()
                .copied()
                .filter(|id| children.contains(id))
                .collect();
            if !followers.is_empty() {
                stack.retain(|id| !followers.contains(id));
                let at = stack
                    .iter()
                    .position(|id| *id == window)
                    .map(|p| p + 1)
                    .unwrap_or(stack.len());
                for (offset, child) in followers.into_iter().enumerate() {
                    stack.insert(at + offset, child);
                }
            }
            if *stack != before {
                self.events.push_back(HostEvent::StackingChanged(window));
            }
        }
    }

    fn move_to_container(&mut self, window: WindowId, container: Container) -> bool {
        let Some((shown, old)) = self.windows.get(&window).map(|w| (w.shown, w.container)) else {
            return false;
        };
        if old == container {
            return false;
        }
        let was_visible = shown && self.container_visible(old);
        if let Some(w) = self.windows.get_mut(&window) {
            w.container = container;
        }
        if let Some(stack) = self.stacks.get_mut(&old) {
            stack.retain(|id| *id != window);
        }
        self.stacks.entry(container).or_default().push(window);
        let visible = self.is_visible(window);
        if visible != was_visible {
            self.events
                .push_back(HostEvent::VisibilityChanged { window, visible });
        }
        true
    }
}

impl WindowHost for HeadlessHost {
    fn exists(&self, window: WindowId) -> bool {
        self.windows.contains_key(&window)
    }

    fn bounds_in_screen(&self, window: WindowId) -> Rect {
        self.windows
            .get(&window)
            .map(|w| w.bounds)
            .unwrap_or_default()
    }

    fn set_bounds(&mut self, window: WindowId, bounds: Rect) {
        let Some(w) = self.windows.get_mut(&window) else {
            return;
        };
        if w.bounds == bounds {
            return;
        }
        let old = w.bounds;
        w.bounds = bounds;
        self.events.push_back(HostEvent::BoundsChanged {
            window,
            old,
            new: bounds,
        });
    }

    fn restore_bounds(&self, window: WindowId) -> Option<Rect> {
        self.windows.get(&window).and_then(|w| w.restore_bounds)
    }

    fn set_restore_bounds(&mut self, window: WindowId, bounds: Option<Rect>) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.restore_bounds = bounds;
        }
    }

    fn minimum_size(&self, window: WindowId) -> Size {
        self.windows
            .get(&window)
            .map(|w| w.min_size)
            .unwrap_or_default()
    }

    fn can_resize(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.resizable)
    }

    fn is_visible(&self, window: WindowId) -> bool {
        self.windows
            .get(&window)
            .is_some_and(|w| w.shown && self.container_visible(w.container))
    }

    fn work_area_for_window(&self, _window: WindowId) -> Rect {
        self.work_area()
    }

    fn primary_work_area(&self) -> Rect {
        self.work_area()
    }

    fn display_orientation(&self, _window: WindowId) -> Orientation {
        self.orientation
    }

    fn is_in_tablet_mode(&self) -> bool {
        self.tablet_mode
    }

    fn container(&self, window: WindowId) -> Option<Container> {
        self.windows.get(&window).map(|w| w.container)
    }

    fn active_desk_container(&self) -> Container {
        Container::Desk(self.active_desk)
    }

    fn reparent(&mut self, window: WindowId, container: Container) {
        if self.move_to_container(window, container) {
            self.events.push_back(HostEvent::StackingChanged(window));
        }
    }

    fn children(&self, container: Container) -> Vec<WindowId> {
        self.stacks.get(&container).cloned().unwrap_or_default()
    }

    fn stack_above(&mut self, window: WindowId, sibling: WindowId) {
        if window == sibling {
            return;
        }
        let Some(container) = self.windows.get(&sibling).map(|w| w.container) else {
            return;
        };
        let moved = self.move_to_container(window, container);
        let Some(stack) = self.stacks.get(&container) else {
            return;
        };
        let Some(sibling_index) = stack
            .iter()
            .filter(|id| **id != window)
            .position(|id| *id == sibling)
        else {
            return;
        };
        self.restack(window, container, sibling_index + 1);
        if moved {
            self.events.push_back(HostEvent::StackingChanged(window));
        }
    }

    fn stack_below(&mut self, window: WindowId, sibling: WindowId) {
        if window == sibling {
            return;
        }
        let Some(container) = self.windows.get(&sibling).map(|w| w.container) else {
            return;
        };
        let moved = self.move_to_container(window, container);
        let Some(stack) = self.stacks.get(&container) else {
            return;
        };
        let Some(sibling_index) = stack
            .iter()
            .filter(|id| **id != window)
            .position(|id| *id == sibling)
        else {
            return;
        };
        self.restack(window, container, sibling_index);
        if moved {
            self.events.push_back(HostEvent::StackingChanged(window));
        }
    }

    fn z_order(&self, window: WindowId) -> Option<(Container, usize)> {
        self.stack_position(window)
    }

    fn add_transient_child(&mut self, parent: WindowId, child: WindowId) {
        if parent == child || !self.exists(parent) || !self.exists(child) {
            return;
        }
        if let Some(old) = self.transient_parent(child) {
            self.remove_transient_child(old, child);
        }
        if let Some(p) = self.windows.get_mut(&parent)
            && !p.transient_children.contains(&child)
        {
            p.transient_children.push(child);
        }
        if let Some(c) = self.windows.get_mut(&child) {
            c.transient_parent = Some(parent);
        }
    }

    fn remove_transient_child(&mut self, parent: WindowId, child: WindowId) {
        if let Some(p) = self.windows.get_mut(&parent) {
            p.transient_children.retain(|id| *id != child);
        }
        if let Some(c) = self.windows.get_mut(&child)
            && c.transient_parent == Some(parent)
        {
            c.transient_parent = None;
        }
    }

    fn transient_parent(&self, window: WindowId) -> Option<WindowId> {
        self.windows.get(&window).and_then(|w| w.transient_parent)
    }

    fn transient_children(&self, window: WindowId) -> Vec<WindowId> {
        self.windows
            .get(&window)
            .map(|w| w.transient_children.clone())
            .unwrap_or_default()
    }

    fn active_window(&self) -> Option<WindowId> {
        self.active
    }

    fn activate(&mut self, window: Option<WindowId>) {
        if let Some(id) = window
            && !self.exists(id)
        {
            return;
        }
        if self.active == window {
            return;
        }
        let lost = self.active;
        self.active = window;
        if let Some(id) = window {
            self.mru.retain(|w| *w != id);
            self.mru.insert(0, id);
            if let Some((container, _)) = self.stack_position(id) {
                let top = self.stacks.get(&container).map(|s| s.len()).unwrap_or(0);
                self.restack(id, container, top);
            }
        }
        self.events.push_back(HostEvent::ActivationChanged {
            gained: window,
            lost,
        });
    }

    fn mru_windows(&self) -> Vec<WindowId> {
        self.mru.clone()
    }

    fn set_accepts_events(&mut self, window: WindowId, accepts: bool) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.accepts_events = accepts;
        }
    }

    fn accepts_events(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.accepts_events)
    }

    fn transform(&self, window: WindowId) -> Transform {
        self.windows
            .get(&window)
            .map(|w| w.transform)
            .unwrap_or_default()
    }

    fn set_transform(&mut self, window: WindowId, transform: Transform) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.transform = transform;
        }
    }

    fn is_position_auto_managed(&self, window: WindowId) -> bool {
        self.windows.get(&window).is_some_and(|w| w.auto_managed)
    }

    fn set_position_auto_managed(&mut self, window: WindowId, managed: bool) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.auto_managed = managed;
        }
    }

    fn begin_drag_details(&mut self, window: WindowId, details: DragDetails) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.drag_details = Some(details);
        }
    }

    fn end_drag_details(&mut self, window: WindowId) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.drag_details = None;
        }
    }

    fn drag_details(&self, window: WindowId) -> Option<DragDetails> {
        self.windows.get(&window).and_then(|w| w.drag_details)
    }

    fn create_helper_window(&mut self, kind: HelperKind, container: Container) -> WindowId {
        let id = self.insert_window(WindowOptions::new(Rect::default()), container, Some(kind));
        tracing::trace!(window_id = %id, ?kind, ?container, "created helper window");
        id
    }

    fn set_visible(&mut self, window: WindowId, visible: bool) {
        let Some(w) = self.windows.get_mut(&window) else {
            return;
        };
        if w.shown == visible {
            return;
        }
        let was_visible = self.is_visible(window);
        if let Some(w) = self.windows.get_mut(&window) {
            w.shown = visible;
        }
        let now_visible = self.is_visible(window);
        if now_visible != was_visible {
            self.events.push_back(HostEvent::VisibilityChanged {
                window,
                visible: now_visible,
            });
        }
    }

    fn destroy_window(&mut self, window: WindowId) {
        let Some(w) = self.windows.remove(&window) else {
            return;
        };
        self.events.push_back(HostEvent::Destroying(window));
        if let Some(stack) = self.stacks.get_mut(&w.container) {
            stack.retain(|id| *id != window);
        }
        if let Some(parent) = w.transient_parent
            && let Some(p) = self.windows.get_mut(&parent)
        {
            p.transient_children.retain(|id| *id != window);
        }
        for child in w.transient_children {
            if let Some(c) = self.windows.get_mut(&child) {
                c.transient_parent = None;
            }
        }
        self.mru.retain(|id| *id != window);
        if self.active == Some(window) {
            let next = self.mru.first().copied();
            self.active = None;
            if let Some(next) = next {
                self.activate(Some(next));
            } else {
                self.events.push_back(HostEvent::ActivationChanged {
                    gained: None,
                    lost: Some(window),
                });
            }
        }
    }

    fn pop_event(&mut self) -> Option<HostEvent> {
        self.events.pop_front()
    }
}
