use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use term_splitview::config::{DisplaySpec, LayoutConfig};
use term_splitview::float::{DragGesture, DragOutcome};
use term_splitview::geometry::{Point, Rect, Vector2d};
use term_splitview::layout::{MagnetismCorner, divider_bounds, magnetism_corner_for_point};
use term_splitview::window::headless::{HeadlessHost, WindowOptions};
use term_splitview::window::state::WindowStateType;
use term_splitview::window::{HelperKind, LayoutEvent, WindowHost, WindowId, WindowManager};

fn manager(tablet: bool) -> WindowManager<HeadlessHost> {
    let config = LayoutConfig {
        animation_scale: 0.0,
        ..LayoutConfig::default()
    };
    let mut host = HeadlessHost::new(DisplaySpec::default());
    host.set_tablet_mode(tablet);
    let mut wm = WindowManager::new(host, config);
    wm.dispatch_host_events();
    wm
}

fn record(wm: &mut WindowManager<HeadlessHost>) -> Rc<RefCell<Vec<LayoutEvent>>> {
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    wm.subscribe(move |event| sink.borrow_mut().push(*event));
    events
}

fn add(wm: &mut WindowManager<HeadlessHost>) -> WindowId {
    wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)))
}

/// Drags `window` by its center to `to` and releases it.
fn drag_to(wm: &mut WindowManager<HeadlessHost>, window: WindowId, to: Point) -> DragOutcome {
    let from = wm.host().bounds_in_screen(window).center();
    assert!(wm.start_float_drag(window, from));
    wm.drag_float(to);
    wm.complete_float_drag().expect("drag was running")
}

#[test]
fn float_magnetize_and_fling_on_a_1600x1000_display() {
    let mut wm = manager(true);
    let window = add(&mut wm);
    let events = record(&mut wm);

    assert!(wm.float_window(window));
    let bounds = wm.host().bounds_in_screen(window);
    assert_eq!(bounds.bottom_right(), Point::new(1600 - 8, 1000 - 8 - 48));

    let outcome = drag_to(&mut wm, window, Point::new(1490, 10));
    assert_eq!(outcome, DragOutcome::Magnetized(MagnetismCorner::TopRight));
    assert_eq!(
        wm.host().bounds_in_screen(window).top_right(),
        Point::new(1600 - 8, 8)
    );

    let from = wm.host().bounds_in_screen(window).center();
    assert!(wm.start_float_drag(window, from));
    wm.drag_float(from.offset(Vector2d::new(-120, -40)));
    let outcome = wm.fling_or_swipe(DragGesture::Fling {
        velocity_x: -1500.0,
        velocity_y: -900.0,
    });
    assert_eq!(outcome, Some(DragOutcome::Tucked(MagnetismCorner::TopLeft)));
    wm.tick(Duration::ZERO);

    assert!(wm.float_controller().is_tucked(window));
    let tucked = wm.host().bounds_in_screen(window);
    assert_eq!(tucked.right(), 100);
    assert_eq!(wm.host().visual_bounds(window), tucked);
    assert!(!wm.host().accepts_events(window));
    let handles = wm.host().helpers(HelperKind::TuckHandle);
    assert_eq!(handles.len(), 1);
    assert_eq!(wm.host().bounds_in_screen(handles[0]).x, 100);

    assert_eq!(
        *events.borrow(),
        vec![
            LayoutEvent::FloatStateChanged {
                window,
                floated: true
            },
            LayoutEvent::FloatDragCompleted {
                window,
                corner: MagnetismCorner::TopRight
            },
            LayoutEvent::TuckStateChanged {
                window,
                tucked: true
            },
        ]
    );
}

#[test]
fn floating_another_window_unfloats_the_first() {
    let mut wm = manager(false);
    let a = add(&mut wm);
    let b = add(&mut wm);
    assert!(wm.float_window(a));
    assert!(wm.float_window(b));

    assert_eq!(wm.window_state(a), WindowStateType::Normal);
    assert_eq!(wm.window_state(b), WindowStateType::Floated);
    assert!(!wm.float_controller().is_floated(a));
    assert_eq!(wm.float_controller().floated_window(), Some(b));
}

#[test]
fn unfloat_twice_equals_once() {
    let mut wm = manager(false);
    let window = add(&mut wm);
    assert!(wm.float_window(window));
    let events = record(&mut wm);

    assert!(wm.unfloat_window(window));
    let bounds = wm.host().bounds_in_screen(window);
    let seen = events.borrow().len();

    assert!(!wm.unfloat_window(window));
    assert_eq!(events.borrow().len(), seen);
    assert_eq!(wm.host().bounds_in_screen(window), bounds);
    assert_eq!(wm.window_state(window), WindowStateType::Normal);
}

#[test]
fn auto_managed_flag_survives_tablet_round_trip() {
    for managed in [true, false] {
        let mut wm = manager(false);
        let window =
            wm.add_window(WindowOptions::new(Rect::new(100, 100, 400, 300)).auto_managed(managed));
        assert!(wm.float_window(window));
        assert!(!wm.host().is_position_auto_managed(window));

        wm.host_mut().set_tablet_mode(true);
        wm.dispatch_host_events();
        assert!(wm.float_controller().is_floated(window));
        wm.host_mut().set_tablet_mode(false);
        wm.dispatch_host_events();
        assert!(wm.float_controller().is_floated(window));

        assert!(wm.unfloat_window(window));
        assert_eq!(wm.host().is_position_auto_managed(window), managed);
    }
}

#[test]
fn drags_below_five_pixels_revert_exactly() {
    let mut wm = manager(true);
    let window = add(&mut wm);
    wm.float_window(window);
    let before = wm.host().bounds_in_screen(window);

    let center = before.center();
    let outcome = drag_to(&mut wm, window, center.offset(Vector2d::new(3, 3)));
    assert_eq!(outcome, DragOutcome::Reverted);
    assert_eq!(wm.host().bounds_in_screen(window), before);

    let outcome = drag_to(&mut wm, window, Point::new(300, 200));
    assert_eq!(outcome, DragOutcome::Magnetized(MagnetismCorner::TopLeft));
    assert_eq!(wm.host().bounds_in_screen(window).origin(), Point::new(8, 8));
}

#[test]
fn revert_restores_start_bounds_without_animating() {
    let mut wm = manager(true);
    let window = add(&mut wm);
    wm.float_window(window);
    let before = wm.host().bounds_in_screen(window);

    assert!(wm.start_float_drag(window, before.center()));
    wm.drag_float(Point::new(200, 200));
    assert!(wm.revert_float_drag());
    assert_eq!(wm.host().bounds_in_screen(window), before);
    assert!(!wm.is_animating());
    assert!(wm.float_drag().is_none());
}

#[test]
fn magnetism_quadrants() {
    let (w, h) = (1600.0, 952.0);
    let work_area = Rect::new(0, 0, w as i32, h as i32);
    let at = |fx: f64, fy: f64| {
        magnetism_corner_for_point(Point::new((w * fx) as i32, (h * fy) as i32), &work_area)
    };
    assert_eq!(at(0.1, 0.1), MagnetismCorner::TopLeft);
    assert_eq!(at(0.9, 0.1), MagnetismCorner::TopRight);
    assert_eq!(at(0.1, 0.9), MagnetismCorner::BottomLeft);
    assert_eq!(at(0.9, 0.9), MagnetismCorner::BottomRight);
}

#[test]
fn divider_bounds_are_pure_and_thicker_while_dragging() {
    let work_area = Rect::new(0, 0, 1600, 952);
    for is_landscape in [true, false] {
        for position in [0, 300, 796, 1592] {
            let idle = divider_bounds(&work_area, is_landscape, position, false);
            assert_eq!(idle, divider_bounds(&work_area, is_landscape, position, false));
            let dragging = divider_bounds(&work_area, is_landscape, position, true);
            let thickness = |r: Rect| if is_landscape { r.width } else { r.height };
            assert!(thickness(dragging) >= thickness(idle));
        }
    }
}

#[test]
fn tuck_then_untuck_restores_bounds() {
    let mut wm = manager(true);
    let other = add(&mut wm);
    let window = add(&mut wm);
    wm.float_window(window);
    drag_to(&mut wm, window, Point::new(200, 200));
    let before = wm.host().bounds_in_screen(window);

    wm.tuck_window(window, true);
    wm.tick(Duration::ZERO);
    assert!(wm.float_controller().is_tucked(window));
    assert_eq!(wm.host().active_window(), Some(other));

    wm.untuck_window(window);
    wm.tick(Duration::ZERO);
    assert!(!wm.float_controller().is_tucked(window));
    assert_eq!(wm.host().bounds_in_screen(window), before);
    assert_eq!(wm.host().visual_bounds(window), before);
    assert!(wm.host().accepts_events(window));
    assert_eq!(wm.host().active_window(), Some(window));
    assert!(wm.host().helpers(HelperKind::TuckHandle).is_empty());
}

#[test]
fn tucking_left_from_the_default_corner_comes_back_to_it() {
    let mut wm = manager(true);
    add(&mut wm);
    let window = add(&mut wm);
    wm.float_window(window);
    let before = wm.host().bounds_in_screen(window);
    assert_eq!(before, Rect::new(1059, 183, 533, 761));

    wm.tuck_window(window, true);
    wm.tick(Duration::ZERO);
    let tucked = wm.host().bounds_in_screen(window);
    assert!(tucked.right() <= 100);
    assert_eq!(wm.host().helpers(HelperKind::TuckHandle).len(), 1);

    wm.untuck_window(window);
    wm.tick(Duration::ZERO);
    let meta = wm.float_controller().metadata(window).expect("still floated");
    assert_eq!(meta.magnetism_corner, MagnetismCorner::BottomRight);
    assert_eq!(wm.host().bounds_in_screen(window), before);
}

#[test]
fn tucking_again_while_untucking_keeps_the_window_tucked() {
    let mut wm = manager(true);
    let other = add(&mut wm);
    let window = add(&mut wm);
    wm.float_window(window);
    wm.tuck_window(window, true);
    wm.tick(Duration::ZERO);

    wm.untuck_window(window);
    wm.tuck_window(window, true);
    assert!(wm.float_controller().is_tucked(window));

    wm.tick(Duration::ZERO);
    assert!(wm.float_controller().is_tucked(window));
    assert_eq!(wm.host().active_window(), Some(other));
    assert!(!wm.host().accepts_events(window));
    assert!(wm.host().bounds_in_screen(window).right() <= 100);
    assert_eq!(wm.host().helpers(HelperKind::TuckHandle).len(), 1);
}

#[test]
fn activating_a_tucked_window_untucks_it() {
    let mut wm = manager(true);
    add(&mut wm);
    let window = add(&mut wm);
    wm.float_window(window);
    wm.tuck_window(window, false);
    wm.tick(Duration::ZERO);

    wm.activate(Some(window));
    wm.tick(Duration::ZERO);
    assert!(!wm.float_controller().is_tucked(window));
    assert_eq!(
        wm.host().bounds_in_screen(window).bottom_right(),
        Point::new(1592, 944)
    );
}

#[test]
fn pressing_the_handle_untucks() {
    let mut wm = manager(true);
    let window = add(&mut wm);
    wm.float_window(window);
    wm.tuck_window(window, true);
    wm.tick(Duration::ZERO);

    let handle = wm.host().helpers(HelperKind::TuckHandle)[0];
    assert_eq!(wm.window_at(wm.host().bounds_in_screen(handle).center()), Some(handle));
    assert!(wm.press_tuck_handle(handle));
    wm.tick(Duration::ZERO);
    assert!(!wm.float_controller().is_tucked(window));
    assert!(!wm.press_tuck_handle(window));
}
