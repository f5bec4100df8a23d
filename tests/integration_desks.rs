use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use term_splitview::config::{DisplaySpec, LayoutConfig};
use term_splitview::desks::ProxyState;
use term_splitview::geometry::{Point, Rect};
use term_splitview::window::headless::HeadlessHost;
use term_splitview::window::{Container, DeskId, HelperKind, LayoutEvent, WindowHost, WindowManager};

fn manager() -> WindowManager<HeadlessHost> {
    let config = LayoutConfig {
        animation_scale: 0.0,
        ..LayoutConfig::default()
    };
    let mut wm = WindowManager::new(HeadlessHost::new(DisplaySpec::default()), config);
    wm.dispatch_host_events();
    wm
}

fn order(wm: &WindowManager<HeadlessHost>) -> Vec<DeskId> {
    wm.desks().desks().iter().map(|desk| desk.id).collect()
}

#[test]
fn starts_with_two_centered_desks() {
    let wm = manager();
    assert_eq!(order(&wm), vec![DeskId(0), DeskId(1)]);
    assert_eq!(wm.desks().mini_view_bounds(0), Rect::new(634, 14, 160, 100));
    assert_eq!(wm.desks().mini_view_bounds(1), Rect::new(806, 14, 160, 100));
    assert_eq!(wm.desks().desk_at(Point::new(714, 64)), Some(DeskId(0)));
}

#[test]
fn dragging_a_desk_past_its_neighbour_reorders() {
    let mut wm = manager();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    wm.subscribe(move |event| sink.borrow_mut().push(*event));

    assert!(wm.start_desk_drag(DeskId(0), Point::new(714, 64)));
    let proxies = wm.host().helpers(HelperKind::DeskDragProxy);
    assert_eq!(proxies.len(), 1);
    assert_eq!(wm.host().container(proxies[0]), Some(Container::Overlay));
    assert!(!wm.start_desk_drag(DeskId(1), Point::new(886, 64)));

    wm.continue_desk_drag(Point::new(886, 64));
    // The scaled proxy keeps the grabbed point under the pointer.
    assert_eq!(
        wm.host().bounds_in_screen(proxies[0]),
        Rect::new(806, 14, 160, 100)
    );
    assert_eq!(order(&wm), vec![DeskId(1), DeskId(0)]);
    assert_eq!(
        *events.borrow(),
        vec![LayoutEvent::DeskReordered {
            desk: DeskId(0),
            from: 0,
            to: 1
        }]
    );

    assert!(wm.end_desk_drag());
    let proxy = wm.desks().drag_proxy().expect("proxy snaps back");
    assert_eq!(proxy.state(), ProxyState::SnappingBack);
    assert!(!wm.end_desk_drag());

    wm.tick(Duration::ZERO);
    assert!(!wm.desks().is_dragging_desk());
    assert!(wm.host().helpers(HelperKind::DeskDragProxy).is_empty());
    assert_eq!(order(&wm), vec![DeskId(1), DeskId(0)]);
    assert_eq!(events.borrow().len(), 1);
}

#[test]
fn small_moves_do_not_reorder() {
    let mut wm = manager();
    assert!(wm.start_desk_drag(DeskId(1), Point::new(886, 64)));
    wm.continue_desk_drag(Point::new(870, 70));
    assert_eq!(order(&wm), vec![DeskId(0), DeskId(1)]);
    assert!(wm.end_desk_drag());
    wm.tick(Duration::ZERO);
    assert!(wm.desks().drag_proxy().is_none());
}

#[test]
fn unknown_desk_is_refused() {
    let mut wm = manager();
    assert!(!wm.start_desk_drag(DeskId(7), Point::new(714, 64)));
    assert!(!wm.end_desk_drag());
    assert!(wm.host().helpers(HelperKind::DeskDragProxy).is_empty());
}
