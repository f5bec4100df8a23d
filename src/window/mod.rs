pub mod headless;
pub mod state;

mod window_manager;

use std::fmt;

use crate::geometry::{Orientation, Point, Rect, Size, Transform};

pub use window_manager::{LayoutContext, LayoutEvent, WindowManager};

/// Opaque handle of a host window. The engine never owns windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(pub u64);

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeskId(pub u32);

/// Stacking containers, listed bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Container {
    Desk(DeskId),
    /// Above every desk, below system overlays.
    Float,
    Overlay,
}

/// Window edge a drag-details session resizes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowComponent {
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragDetails {
    pub location: Point,
    pub component: WindowComponent,
}

/// What kind of helper window the engine asks the host to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelperKind {
    Divider,
    TuckHandle,
    DeskDragProxy,
}

/// Notifications the host queues for the engine. Delivered on the main
/// thread by `WindowManager::dispatch_host_events`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    BoundsChanged {
        window: WindowId,
        old: Rect,
        new: Rect,
    },
    Destroying(WindowId),
    ActivationChanged {
        gained: Option<WindowId>,
        lost: Option<WindowId>,
    },
    VisibilityChanged {
        window: WindowId,
        visible: bool,
    },
    StackingChanged(WindowId),
    TabletModeChanged(bool),
    DisplayMetricsChanged(DisplayChanges),
    KeyboardOccludedBoundsChanged(Option<Rect>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayChanges {
    pub work_area: bool,
    pub rotation: bool,
}

/// Everything the layout engine needs from the windowing system.
///
/// Methods taking an unknown id are expected to be harmless no-ops; queries
/// on unknown ids return neutral values.
pub trait WindowHost {
    fn exists(&self, window: WindowId) -> bool;
    fn bounds_in_screen(&self, window: WindowId) -> Rect;
    fn set_bounds(&mut self, window: WindowId, bounds: Rect);
    fn restore_bounds(&self, window: WindowId) -> Option<Rect>;
    fn set_restore_bounds(&mut self, window: WindowId, bounds: Option<Rect>);
    fn minimum_size(&self, window: WindowId) -> Size;
    fn can_resize(&self, window: WindowId) -> bool;
    fn is_visible(&self, window: WindowId) -> bool;

    fn work_area_for_window(&self, window: WindowId) -> Rect;
    /// Work area of the display windows open on by default.
    fn primary_work_area(&self) -> Rect;
    fn display_orientation(&self, window: WindowId) -> Orientation;
    fn is_in_tablet_mode(&self) -> bool;

    fn container(&self, window: WindowId) -> Option<Container>;
    fn active_desk_container(&self) -> Container;
    fn reparent(&mut self, window: WindowId, container: Container);
    /// Windows of `container`, bottom to top.
    fn children(&self, container: Container) -> Vec<WindowId>;
    fn stack_above(&mut self, window: WindowId, sibling: WindowId);
    fn stack_below(&mut self, window: WindowId, sibling: WindowId);
    /// Total stacking order key; larger is higher on screen.
    fn z_order(&self, window: WindowId) -> Option<(Container, usize)>;

    fn add_transient_child(&mut self, parent: WindowId, child: WindowId);
    fn remove_transient_child(&mut self, parent: WindowId, child: WindowId);
    fn transient_parent(&self, window: WindowId) -> Option<WindowId>;
    fn transient_children(&self, window: WindowId) -> Vec<WindowId>;

    fn active_window(&self) -> Option<WindowId>;
    /// `None` activates the home surface.
    fn activate(&mut self, window: Option<WindowId>);
    /// Most recently used first.
    fn mru_windows(&self) -> Vec<WindowId>;

    /// Installs or removes the null event targeter.
    fn set_accepts_events(&mut self, window: WindowId, accepts: bool);
    fn accepts_events(&self, window: WindowId) -> bool;

    fn transform(&self, window: WindowId) -> Transform;
    fn set_transform(&mut self, window: WindowId, transform: Transform);

    fn is_position_auto_managed(&self, window: WindowId) -> bool;
    fn set_position_auto_managed(&mut self, window: WindowId, managed: bool);

    fn begin_drag_details(&mut self, window: WindowId, details: DragDetails);
    fn end_drag_details(&mut self, window: WindowId);
    fn drag_details(&self, window: WindowId) -> Option<DragDetails>;

    fn create_helper_window(&mut self, kind: HelperKind, container: Container) -> WindowId;
    fn set_visible(&mut self, window: WindowId, visible: bool);
    fn destroy_window(&mut self, window: WindowId);

    fn pop_event(&mut self) -> Option<HostEvent>;
}
