//! Interactive terminal playground around a [`WindowManager`] on a headless
//! virtual display.
//!
//! Keys map onto [`Action`]s; the mouse drives the same gestures a pointer
//! would on a real display: dragging a floated window, the split view divider
//! and desk mini views in overview.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect as CellRect;

use crate::actions::Action;
use crate::config::{DisplaySpec, LayoutConfig};
use crate::debug_log::{DebugLogHandle, take_panic_pending};
use crate::drivers::{InputDriver, OutputDriver};
use crate::error::AppError;
use crate::event_loop::{ControlFlow, EventLoop, LoopEvent};
use crate::float::DragGesture;
use crate::geometry::{Orientation, Point, Rect};
use crate::keybindings::KeyBindings;
use crate::layout::SnapPosition;
use crate::ui::{self, Viewport};
use crate::window::headless::{HeadlessHost, WindowOptions};
use crate::window::state::WindowStateType;
use crate::window::{HelperKind, WindowHost, WindowId, WindowManager};

const NEW_WINDOW_SIZE: (i32, i32) = (640, 420);
const CASCADE_STEP: i32 = 40;
const CASCADE_SLOTS: i32 = 8;

/// Pointer samples older than this do not count towards a fling.
const FLING_SAMPLE_WINDOW: Duration = Duration::from_millis(100);

/// Keyboard height as a fraction of the display height.
const KEYBOARD_HEIGHT_RATIO: f64 = 0.4;

/// The pointer gesture in progress, if any.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Float {
        last: Point,
        at: Instant,
        /// Pixels per second along each axis, from the latest motion.
        velocity: (f32, f32),
    },
    Divider,
    Desk,
}

pub struct Playground {
    wm: WindowManager<HeadlessHost>,
    keybindings: KeyBindings,
    log: Option<DebugLogHandle>,
    viewport: Viewport,
    gesture: Option<Gesture>,
    show_help: bool,
    show_log: bool,
    overview: bool,
    status: String,
    cascade: i32,
}

impl Playground {
    /// Opens the virtual display with two cascaded windows.
    pub fn new(
        display: DisplaySpec,
        config: LayoutConfig,
        tablet_mode: bool,
        portrait: bool,
        log: Option<DebugLogHandle>,
    ) -> Self {
        let mut host = HeadlessHost::new(display);
        host.set_tablet_mode(tablet_mode);
        if portrait {
            host.rotate(Orientation::Portrait);
        }
        let mut wm = WindowManager::new(host, config);
        wm.dispatch_host_events();
        wm.subscribe(|event| tracing::info!(?event, "layout event"));

        let show_log = log.is_some();
        let mut playground = Self {
            wm,
            keybindings: KeyBindings::default(),
            log,
            viewport: Viewport::default(),
            gesture: None,
            show_help: false,
            show_log,
            overview: false,
            status: String::new(),
            cascade: 0,
        };
        playground.open_window();
        playground.open_window();
        playground.status = "ready".to_string();
        playground
    }

    pub fn wm(&self) -> &WindowManager<HeadlessHost> {
        &self.wm
    }

    pub fn keybindings(&self) -> &KeyBindings {
        &self.keybindings
    }

    pub fn log(&self) -> Option<&DebugLogHandle> {
        self.log.as_ref()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn show_log(&self) -> bool {
        self.show_log && self.log.is_some()
    }

    pub fn in_overview(&self) -> bool {
        self.overview
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Recomputes the display viewport for a terminal of `area` cells.
    pub fn layout(&mut self, area: CellRect) {
        let (display_area, _, _) = ui::split_screen(area, self.show_log());
        self.viewport = ui::display_viewport(display_area, self.wm.host().display_bounds());
    }

    pub fn tick(&mut self, elapsed: Duration) {
        if take_panic_pending() {
            self.show_log = true;
            self.status = "a panic was logged".to_string();
        }
        self.wm.tick(elapsed);
    }

    pub fn handle_event(&mut self, event: &Event, now: Instant) -> ControlFlow {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse, now);
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        }
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        if key.kind != KeyEventKind::Press {
            return ControlFlow::Continue;
        }
        if self.show_help && key.code == KeyCode::Esc {
            self.show_help = false;
            return ControlFlow::Continue;
        }
        match self.keybindings.action_for_key(key) {
            Some(action) => self.perform(action),
            None => ControlFlow::Continue,
        }
    }

    pub fn perform(&mut self, action: Action) -> ControlFlow {
        tracing::debug!(%action, "action");
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::ToggleLog => self.show_log = !self.show_log,
            Action::ToggleOverview => {
                self.overview = !self.overview;
                self.status = if self.overview { "overview" } else { "desk" }.to_string();
            }
            Action::NewWindow => {
                let window = self.open_window();
                self.status = format!("opened {window}");
            }
            Action::CloseWindow => {
                if let Some(window) = self.active_window() {
                    self.wm.close_window(window);
                    self.status = format!("closed {window}");
                }
            }
            Action::CycleWindow => self.cycle_window(),
            Action::ToggleFloat => self.with_active("float", |wm, w| wm.toggle_float(w)),
            Action::SnapPrimary => {
                self.with_active("snap", |wm, w| wm.snap_window(w, SnapPosition::Primary))
            }
            Action::SnapSecondary => {
                self.with_active("snap", |wm, w| wm.snap_window(w, SnapPosition::Secondary))
            }
            Action::EndSplitView => {
                let released = self.wm.end_split_view();
                self.status = format!("split view ended, {} released", released.len());
            }
            Action::Maximize => self.with_active("maximize", |wm, w| wm.maximize_window(w)),
            Action::Minimize => self.with_active("minimize", |wm, w| wm.minimize_window(w)),
            Action::Restore => self.with_active("restore", |wm, w| wm.restore_window(w)),
            Action::TuckLeft | Action::TuckRight => {
                if let Some(window) = self.wm.float_controller().floated_window() {
                    self.wm.tuck_window(window, action == Action::TuckLeft);
                    self.status = format!("tucking {window}");
                } else {
                    self.status = "no floated window".to_string();
                }
            }
            Action::Untuck => {
                if let Some(window) = self.wm.float_controller().floated_window() {
                    self.wm.untuck_window(window);
                    self.status = format!("untucking {window}");
                }
            }
            Action::ToggleTabletMode => {
                let enabled = !self.wm.host().is_in_tablet_mode();
                self.wm.host_mut().set_tablet_mode(enabled);
                self.wm.dispatch_host_events();
                self.status = if enabled { "tablet mode" } else { "clamshell mode" }.to_string();
            }
            Action::Rotate => {
                let next = if self.wm.host().orientation().is_landscape() {
                    Orientation::Portrait
                } else {
                    Orientation::Landscape
                };
                self.wm.host_mut().rotate(next);
                self.wm.dispatch_host_events();
                self.status = format!("rotated to {next:?}");
            }
            Action::ToggleKeyboard => {
                let height = match self.wm.host().keyboard_bounds() {
                    Some(_) => None,
                    None => {
                        let display = self.wm.host().display_bounds();
                        Some((display.height as f64 * KEYBOARD_HEIGHT_RATIO) as i32)
                    }
                };
                self.wm.host_mut().set_keyboard(height);
                self.wm.dispatch_host_events();
            }
            Action::NextDesk => {
                let desks = self.wm.desks().desks();
                let active = self.wm.host().active_desk();
                let index = desks.iter().position(|d| d.id == active).unwrap_or(0);
                if let Some(next) = desks.get((index + 1) % desks.len().max(1)) {
                    let (id, name) = (next.id, next.name.clone());
                    self.wm.host_mut().switch_desk(id);
                    self.wm.dispatch_host_events();
                    self.status = name;
                }
            }
        }
        ControlFlow::Continue
    }

    fn active_window(&self) -> Option<WindowId> {
        self.wm.host().active_window()
    }

    fn with_active<F>(&mut self, verb: &str, f: F)
    where
        F: FnOnce(&mut WindowManager<HeadlessHost>, WindowId) -> bool,
    {
        let Some(window) = self.active_window() else {
            self.status = "no active window".to_string();
            return;
        };
        self.status = if f(&mut self.wm, window) {
            format!("{window} {:?}", self.wm.window_state(window))
        } else {
            format!("cannot {verb} {window}")
        };
    }

    fn open_window(&mut self) -> WindowId {
        let work_area = self.wm.host().work_area();
        let slot = self.cascade % CASCADE_SLOTS;
        self.cascade += 1;
        let (width, height) = NEW_WINDOW_SIZE;
        let bounds = Rect::new(
            work_area.x + CASCADE_STEP * (slot + 1),
            work_area.y + CASCADE_STEP * (slot + 1),
            width.min(work_area.width),
            height.min(work_area.height),
        )
        .adjust_to_fit(&work_area);
        self.wm.add_window(WindowOptions::new(bounds))
    }

    /// Activates the least recently used visible app window.
    fn cycle_window(&mut self) {
        let host = self.wm.host();
        let next = host
            .mru_windows()
            .into_iter()
            .rev()
            .find(|w| host.helper_kind(*w).is_none() && host.is_visible(*w));
        if let Some(window) = next {
            self.wm.activate(Some(window));
            self.status = format!("activated {window}");
        }
    }

    pub fn handle_mouse(&mut self, mouse: &MouseEvent, now: Instant) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(point) = self.viewport.to_display(mouse.column, mouse.row) {
                    self.pointer_down(point, now);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let point = self.viewport.to_display_clamped(mouse.column, mouse.row);
                self.pointer_drag(point, now);
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let point = self.viewport.to_display_clamped(mouse.column, mouse.row);
                self.pointer_up(point, now);
            }
            _ => {}
        }
    }

    fn pointer_down(&mut self, point: Point, now: Instant) {
        if self.gesture.is_some() {
            return;
        }
        if self.overview
            && let Some(desk) = self.wm.desks().desk_at(point)
        {
            if self.wm.start_desk_drag(desk, point) {
                self.gesture = Some(Gesture::Desk);
            }
            return;
        }
        let Some(window) = self.wm.window_at(point) else {
            return;
        };
        match self.wm.host().helper_kind(window) {
            Some(HelperKind::Divider) => {
                if self.wm.start_resize_with_divider(point) {
                    self.gesture = Some(Gesture::Divider);
                }
            }
            Some(HelperKind::TuckHandle) => {
                if self.wm.press_tuck_handle(window) {
                    self.status = "untucked".to_string();
                }
            }
            Some(HelperKind::DeskDragProxy) => {}
            None => {
                self.wm.activate(Some(window));
                if self.wm.window_state(window) == WindowStateType::Floated
                    && self.wm.start_float_drag(window, point)
                {
                    self.gesture = Some(Gesture::Float {
                        last: point,
                        at: now,
                        velocity: (0.0, 0.0),
                    });
                }
            }
        }
    }

    fn pointer_drag(&mut self, point: Point, now: Instant) {
        match self.gesture.as_mut() {
            Some(Gesture::Float { last, at, velocity }) => {
                let elapsed = now.duration_since(*at).as_secs_f32();
                if elapsed > 0.0 {
                    let delta = point.delta_from(*last);
                    *velocity = (delta.x as f32 / elapsed, delta.y as f32 / elapsed);
                }
                *last = point;
                *at = now;
                self.wm.drag_float(point);
            }
            Some(Gesture::Divider) => self.wm.resize_with_divider(point),
            Some(Gesture::Desk) => self.wm.continue_desk_drag(point),
            None => {}
        }
    }

    fn pointer_up(&mut self, point: Point, now: Instant) {
        match self.gesture.take() {
            Some(Gesture::Float { at, velocity, .. }) => {
                let (velocity_x, velocity_y) = if now.duration_since(at) > FLING_SAMPLE_WINDOW {
                    (0.0, 0.0)
                } else {
                    velocity
                };
                let outcome = self.wm.fling_or_swipe(DragGesture::Fling {
                    velocity_x,
                    velocity_y,
                });
                if let Some(outcome) = outcome {
                    self.status = format!("drag: {outcome:?}");
                }
            }
            Some(Gesture::Divider) => self.wm.end_resize_with_divider(point),
            Some(Gesture::Desk) => {
                self.wm.end_desk_drag();
            }
            None => {}
        }
    }
}

/// Runs the playground until the user quits. The output driver is entered
/// on start and restored before returning, also on error.
pub fn run_playground<I, O>(
    input: I,
    output: &mut O,
    playground: &mut Playground,
    poll_interval: Duration,
) -> Result<(), AppError>
where
    I: InputDriver,
    O: OutputDriver,
{
    output.enter()?;
    let mut event_loop = EventLoop::new(input, poll_interval);
    let result = drive(&mut event_loop, output, playground);
    let released = event_loop.driver().set_mouse_capture(false);
    output.exit()?;
    result?;
    released?;
    Ok(())
}

fn drive<I, O>(
    event_loop: &mut EventLoop<I>,
    output: &mut O,
    playground: &mut Playground,
) -> io::Result<()>
where
    I: InputDriver,
    O: OutputDriver,
{
    event_loop.driver().set_mouse_capture(true)?;
    event_loop.run(|_, event| match event {
        LoopEvent::Tick(elapsed) => {
            playground.tick(elapsed);
            output.draw(|frame| {
                playground.layout(frame.area());
                ui::render(frame, playground);
            })?;
            Ok(ControlFlow::Continue)
        }
        LoopEvent::Input(event) => Ok(playground.handle_event(&event, Instant::now())),
    })
}
