use super::*;
use crate::draw::{
    CommandLog, DrawCommand, ImageData, ImageLoadError, RecordingContext, RenderContext, StylePatch,
};
use crate::input::{Modifiers, PointerEvent, PointerKind};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

type Seen = Rc<RefCell<Vec<String>>>;

fn create_test_surface() -> (Surface, CommandLog) {
    let ctx = RecordingContext::new(200.0, 150.0);
    let log = ctx.log();
    let surface = Surface::new(Box::new(ctx), SurfaceOptions::default())
        .unwrap();
    (surface, log)
}

fn reload_count(log: &CommandLog) -> usize {
    log.borrow()
        .iter()
        .filter(|c| matches!(c, DrawCommand::ClearRect(..)))
        .count()
}

fn recorder(seen: &Seen, tag: &'static str) -> SurfaceListener {
    let seen = Rc::clone(seen);
    listener(move |_: &mut Surface, e: &ItemEvent| {
        seen.borrow_mut().push(format!("{tag}:{}", e.kind));
    })
}

fn corners(bbox: &BoundingBox) -> [f64; 4] {
    [bbox.x1, bbox.y1, bbox.x2, bbox.y2]
}

fn count(seen: &Seen, entry: &str) -> usize {
    seen.borrow().iter().filter(|s| *s == entry).count()
}

fn pointer(surface: &mut Surface, kind: PointerKind, x: f64, y: f64) {
    surface.handle_pointer(&PointerEvent::new(kind, x, y));
}

fn rect(surface: &mut Surface, x: f64, y: f64, w: f64, h: f64) -> ItemId {
    surface.create_rectangle(x, y, w, h, None)
}

fn ok_loader(_url: &str) -> Result<ImageData, ImageLoadError> {
    Ok(ImageData::blank(2, 2))
}

fn failing_loader(url: &str) -> Result<ImageData, ImageLoadError> {
    Err(ImageLoadError::UnsupportedUrl(url.to_string()))
}

fn panicking_loader(_url: &str) -> Result<ImageData, ImageLoadError> {
    panic!("decoder crashed")
}

#[test]
fn test_new_surface_reloads_once() {
    let (surface, log) = create_test_surface();
    assert_eq!(reload_count(&log), 1);
    assert_eq!((surface.width(), surface.height()), (200.0, 150.0));
    assert_eq!(surface.viewport().x2, 200.0);
    assert!(surface.is_empty());
}

#[test]
fn test_options_size_resizes_context() {
    let ctx = RecordingContext::new(10.0, 10.0);
    let options = SurfaceOptions {
        width: Some(300.0),
        height: Some(100.0),
        scroll_region: None,
    };
    let surface = Surface::new(Box::new(ctx), options).unwrap();
    assert_eq!(surface.context().size(), (300.0, 100.0));
    assert_eq!(surface.viewport().y2, 100.0);
}

#[test]
fn test_rectangle_hit_test() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);

    assert_eq!(surface.find_targeted(25.0, 25.0), vec![id]);
    assert!(surface.find_targeted(100.0, 100.0).is_empty());
}

#[test]
fn test_hit_box_corners_and_center_are_targeted() {
    let (mut surface, _) = create_test_surface();
    let id = surface.create_ellipse(60.0, 40.0, 20.0, 10.0, None);
    let bbox = surface.item(id).unwrap().bbox().unwrap();
    let (cx, cy) = bbox.center();

    assert!(bbox.is_targeted_by(cx, cy));
    for (x, y) in [(40.0, 30.0), (80.0, 30.0), (40.0, 50.0), (80.0, 50.0)] {
        assert!(bbox.is_targeted_by(x, y), "({x}, {y}) should hit");
    }
    for (x, y) in [(38.0, 40.0), (82.0, 40.0), (60.0, 28.0), (60.0, 52.0)] {
        assert!(!bbox.is_targeted_by(x, y), "({x}, {y}) should miss");
    }
}

#[test]
fn test_lines_and_text_are_never_targeted() {
    let (mut surface, _) = create_test_surface();
    surface.create_line(0.0, 0.0, 100.0, 100.0, None);
    surface.create_text("hello", 10.0, 10.0, None);
    assert!(surface.find_targeted(10.0, 10.0).is_empty());
    assert_eq!(surface.len(), 2);
}

#[test]
fn test_text_strokes_border_around_its_box() {
    let (mut surface, log) = create_test_surface();
    log.borrow_mut().clear();
    surface.create_text("hi", 10.0, 20.0, None);

    let commands = log.borrow();
    let text_box = DrawCommand::Rect(10.0, 20.0, 2.0 * 12.0 * 0.6, 12.0);
    let glyphs = DrawCommand::FillText("hi".to_string(), 10.0, 20.0);
    let rect = commands.iter().position(|c| *c == text_box).unwrap();
    let border = commands
        .iter()
        .position(|c| matches!(c, DrawCommand::Stroke { width, .. } if *width == 1.0))
        .unwrap();
    let text = commands.iter().position(|c| *c == glyphs).unwrap();
    assert!(rect < border && border < text);
}

#[test]
fn test_enclosed_and_overlapping_queries() {
    let (mut surface, _) = create_test_surface();
    let inner = rect(&mut surface, 10.0, 10.0, 20.0, 20.0);
    let edge = rect(&mut surface, 40.0, 40.0, 30.0, 30.0);
    let far = rect(&mut surface, 150.0, 100.0, 10.0, 10.0);

    assert_eq!(surface.find_enclosed(10.0, 10.0, 30.0, 30.0), vec![inner]);
    assert_eq!(
        surface.find_enclosed(0.0, 0.0, 200.0, 150.0),
        vec![inner, edge, far]
    );
    // Touching the corner at (40, 40) counts as overlap.
    assert_eq!(
        surface.find_overlapping(0.0, 0.0, 40.0, 40.0),
        vec![inner, edge]
    );
    assert!(surface.find_overlapping(180.0, 0.0, 190.0, 10.0).is_empty());
}

#[test]
fn test_resolve_dedupes_in_first_occurrence_order() {
    let (mut surface, _) = create_test_surface();
    let a = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let b = rect(&mut surface, 20.0, 0.0, 10.0, 10.0);

    assert_eq!(surface.resolve([a, a]), vec![a]);
    assert_eq!(
        surface.resolve(vec![Selector::from(b), Selector::from("*")]),
        vec![b, a]
    );
    assert_eq!(surface.resolve(vec!["*", "*"]), vec![a, b]);
}

#[test]
fn test_unknown_selectors_resolve_to_nothing() {
    let (mut surface, log) = create_test_surface();
    let a = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    surface.delete(a);
    let dead = a;

    assert!(surface.resolve("missing").is_empty());
    assert!(surface.resolve(dead).is_empty());
    assert!(surface.resolve(Vec::<ItemId>::new()).is_empty());

    log.borrow_mut().clear();
    surface.move_items("missing", 5.0, 5.0);
    assert_eq!(reload_count(&log), 1);
}

#[test]
fn test_tag_selection() {
    let (mut surface, _) = create_test_surface();
    let first = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    rect(&mut surface, 20.0, 0.0, 10.0, 10.0);

    surface.add_tag(first, "red");
    assert_eq!(surface.resolve("red"), vec![first]);
    assert_eq!(surface.find_with_tag("red"), vec![first]);
    assert!(surface.tag_exists("red"));
    assert!(!surface.tag_exists("blue"));
}

#[test]
fn test_tag_round_trip() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);

    surface.add_tag(id, "x");
    assert!(surface.has_tag(id, "x"));
    assert_eq!(surface.delete_tag(id, "x"), vec![id]);
    assert!(!surface.has_tag(id, "x"));
}

#[test]
fn test_bulk_add_tag_skips_wildcard_and_duplicates() {
    let (mut surface, _) = create_test_surface();
    let a = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let b = rect(&mut surface, 20.0, 0.0, 10.0, 10.0);

    surface.add_tag_all("shape");
    surface.add_tag(a, "shape");
    surface.add_tag("*", "*");
    assert_eq!(surface.item(a).unwrap().tags(), ["shape"]);
    assert_eq!(surface.resolve("shape"), vec![a, b]);
    // Every item carries "shape", only one carries "other".
    assert!(surface.has_tag("*", "shape"));
    surface.add_tag(b, "other");
    assert!(!surface.has_tag("*", "other"));
    assert!(surface.has_tag("nothing", "other"));
}

#[test]
fn test_handle_tags_allow_duplicates_and_delete_all() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let mut handle = surface.handle(id).unwrap();

    handle.add_tag("a");
    handle.add_tag("a");
    handle.add_tag("b");
    assert_eq!(handle.item().tags(), ["a", "a", "b"]);
    handle.delete_tag(&["a"]);
    assert_eq!(handle.item().tags(), ["b"]);
    assert!(handle.has_tag("b"));
}

#[test]
fn test_bulk_move_reloads_once_and_translates_exactly() {
    let (mut surface, log) = create_test_surface();
    let a = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let b = surface.create_ellipse(50.0, 50.0, 5.0, 5.0, None);
    let c = surface.create_line(1.0, 2.0, 3.0, 4.0, None);

    log.borrow_mut().clear();
    surface.move_items("*", 5.0, -3.0);

    assert_eq!(reload_count(&log), 1);
    assert_eq!(surface.item(a).unwrap().shape().anchor(), (5.0, -3.0));
    assert_eq!(surface.item(b).unwrap().shape().anchor(), (55.0, 47.0));
    assert_eq!(
        *surface.item(c).unwrap().shape(),
        Shape::Line {
            x1: 6.0,
            y1: -1.0,
            x2: 8.0,
            y2: 1.0
        }
    );
    let bbox = surface.item(b).unwrap().bbox().unwrap();
    assert_eq!(corners(bbox), [50.0, 42.0, 60.0, 52.0]);
}

#[test]
fn test_bulk_coords_moves_anchors() {
    let (mut surface, log) = create_test_surface();
    let a = rect(&mut surface, 10.0, 10.0, 20.0, 5.0);
    let b = surface.create_arc(
        50.0,
        50.0,
        5.0,
        DEFAULT_ARC_START,
        DEFAULT_ARC_EXTENT,
        false,
        None,
    );

    log.borrow_mut().clear();
    surface.coords(vec![a, b], 0.0, 0.0);

    assert_eq!(reload_count(&log), 1);
    let bbox = surface.item(a).unwrap().bbox().unwrap();
    assert_eq!((bbox.x2, bbox.y2), (20.0, 5.0));
    assert_eq!(surface.item(b).unwrap().shape().anchor(), (0.0, 0.0));
}

#[test]
fn test_handle_reload_can_be_suppressed() {
    let (mut surface, log) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);

    log.borrow_mut().clear();
    let mut handle = surface.handle(id).unwrap();
    handle.move_by(1.0, 1.0, Reload::Suppress);
    handle.move_by(1.0, 1.0, false.into());
    assert_eq!(reload_count(&log), 0);
    handle.move_by(1.0, 1.0, Reload::Default);
    assert_eq!(reload_count(&log), 1);
    assert_eq!(handle.shape().anchor(), (3.0, 3.0));
}

#[test]
fn test_mismatched_coords_fail() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let err = surface
        .handle(id)
        .unwrap()
        .coords(
            Coords::Line {
                x1: 0.0,
                y1: 0.0,
                x2: 1.0,
                y2: 1.0,
            },
            Reload::Default,
        )
        .unwrap_err();
    assert!(matches!(err, SceneError::CoordsMismatch { .. }));

    surface
        .handle(id)
        .unwrap()
        .coords(
            Coords::Rect {
                x: 5.0,
                y: 5.0,
                width: 1.0,
                height: 1.0,
            },
            Reload::Default,
        )
        .unwrap();
    assert_eq!(surface.find_targeted(6.0, 6.0), vec![id]);
    assert!(surface.find_targeted(2.0, 2.0).is_empty());
}

#[test]
fn test_viewport_clamps_to_scroll_region() {
    let ctx = RecordingContext::new(200.0, 150.0);
    let options = SurfaceOptions {
        scroll_region: Some(ScrollRegion::from([0.0, 0.0, 100.0, 100.0])),
        ..SurfaceOptions::default()
    };
    let mut surface = Surface::new(Box::new(ctx), options).unwrap();

    surface.move_view(200.0, 0.0);
    let viewport = surface.viewport();
    assert_eq!(viewport.x1, 100.0);
    assert_eq!(viewport.x2, 300.0);

    surface.move_view(-50.0, -20.0);
    assert_eq!(surface.viewport().x1, 50.0);
    // No room above the origin.
    assert_eq!(surface.viewport().y1, 0.0);
}

#[test]
fn test_reload_clears_margins_and_draws_with_offset() {
    let ctx = RecordingContext::new(200.0, 150.0);
    let log = ctx.log();
    let options = SurfaceOptions {
        scroll_region: Some(ScrollRegion {
            top: 10.0,
            left: 20.0,
            right: 30.0,
            bottom: 40.0,
        }),
        ..SurfaceOptions::default()
    };
    let mut surface = Surface::new(Box::new(ctx), options).unwrap();
    rect(&mut surface, 0.0, 0.0, 10.0, 10.0);

    log.borrow_mut().clear();
    surface.coords_view(15.0, 0.0);

    let commands = log.borrow();
    assert_eq!(
        commands[0],
        DrawCommand::ClearRect(-20.0, -10.0, 250.0, 200.0)
    );
    assert!(commands.contains(&DrawCommand::Rect(15.0, 0.0, 10.0, 10.0)));
}

#[test]
fn test_configure_then_reset_restores_default_border() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);

    surface.item_configure(id, &StylePatch::border_color("green"));
    assert_eq!(surface.item(id).unwrap().style().border_color, "green");

    let mut handle = surface.handle(id).unwrap();
    handle.configure(&StylePatch::background_color("red"), Reload::Default);
    assert_eq!(handle.style().border_color, "green");
    assert_eq!(handle.style().background_color, "red");

    handle.reset_style(Reload::Default);
    assert_eq!(handle.style().border_color, "black");
    assert_eq!(handle.style().background_color, "transparent");
}

#[test]
fn test_items_paint_in_creation_order() {
    let (mut surface, log) = create_test_surface();
    let a = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let b = rect(&mut surface, 5.0, 5.0, 10.0, 10.0);
    assert_eq!((surface.index(a), surface.index(b)), (Some(0), Some(1)));

    log.borrow_mut().clear();
    surface.reload();
    let rects: Vec<_> = log
        .borrow()
        .iter()
        .filter_map(|c| match c {
            DrawCommand::Rect(x, ..) => Some(*x),
            _ => None,
        })
        .collect();
    assert_eq!(rects, vec![0.0, 5.0]);
}

#[test]
fn test_overlap_moves_items_to_top_in_selector_order() {
    let (mut surface, log) = create_test_surface();
    let a = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let b = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let c = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    surface.add_tag(a, "keep");
    let seen: Seen = Rc::default();
    surface.add_item_event(a, EventKind::Delete, recorder(&seen, "a"));

    log.borrow_mut().clear();
    surface.overlap([a, b]);

    assert_eq!(reload_count(&log), 1);
    assert_eq!(surface.find_all(), vec![c, a, b]);
    assert_eq!(surface.find_targeted(5.0, 5.0), vec![c, a, b]);
    assert!(surface.has_tag(a, "keep"));
    assert!(seen.borrow().is_empty());
}

#[test]
fn test_delete_compacts_order_and_invalidates_handle() {
    let (mut surface, _) = create_test_surface();
    let a = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let b = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let c = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);

    surface.handle(b).unwrap().delete(Reload::Default);

    assert_eq!(surface.index(c), Some(1));
    assert_eq!(surface.find_all(), vec![a, c]);
    let err = surface.handle(b).err();
    assert!(matches!(err, Some(SceneError::UnknownItem(id)) if id == b));

    let d = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    assert_eq!(surface.handle(d).unwrap().index(), 2);
}

#[test]
fn test_delete_notifies_listeners_after_removal() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let seen: Rc<RefCell<Vec<(Vec<ItemId>, bool)>>> = Rc::default();

    let sink = Rc::clone(&seen);
    surface.handle(id).unwrap().on(
        EventKind::Delete,
        listener(move |s: &mut Surface, e: &ItemEvent| {
            sink.borrow_mut().push((e.target.clone(), s.contains(id)));
        }),
    );
    surface.delete("*");

    assert_eq!(*seen.borrow(), vec![(vec![id], false)]);
}

#[test]
fn test_pointer_events_carry_local_and_canvas_coordinates() {
    let ctx = RecordingContext::new(200.0, 150.0);
    let options = SurfaceOptions {
        scroll_region: Some(ScrollRegion::from([0.0, 0.0, 100.0, 0.0])),
        ..SurfaceOptions::default()
    };
    let mut surface = Surface::new(Box::new(ctx), options).unwrap();
    surface.set_element_offset(10.0, 20.0);
    surface.coords_view(30.0, 0.0);
    let id = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);

    let seen: Rc<RefCell<Vec<ItemEvent>>> = Rc::default();
    let sink = Rc::clone(&seen);
    surface.on(
        EventKind::Wheel,
        listener(move |_: &mut Surface, e: &ItemEvent| sink.borrow_mut().push(e.clone())),
    );

    let shift = Modifiers {
        shift: true,
        ..Modifiers::default()
    };
    let raw = PointerEvent::wheel(65.0, 45.0, 3.0).with_modifiers(shift);
    surface.handle_pointer(&raw);

    let events = seen.borrow();
    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!((event.x, event.y), (25.0, 25.0));
    assert_eq!((event.canvas_x, event.canvas_y), (55.0, 25.0));
    assert_eq!(event.delta, Some(WheelDelta::Up));
    assert!(event.shift && !event.ctrl && !event.alt);
    assert_eq!(event.target, vec![id]);
}

#[test]
fn test_non_wheel_events_have_no_delta() {
    let (mut surface, _) = create_test_surface();
    let click = PointerEvent::new(PointerKind::Click, 1.0, 1.0);
    let event = surface.to_item_event(&click, EventKind::Click);
    assert_eq!(event.delta, None);
    assert!(event.target.is_empty());
}

#[test]
fn test_raw_events_forward_to_targeted_items_only() {
    let (mut surface, _) = create_test_surface();
    let hit = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);
    let miss = rect(&mut surface, 100.0, 100.0, 10.0, 10.0);
    let seen: Seen = Rc::default();

    surface.on(EventKind::Click, recorder(&seen, "surface"));
    surface.add_item_event(hit, EventKind::Click, recorder(&seen, "hit"));
    surface.add_item_event(miss, EventKind::Click, recorder(&seen, "miss"));

    pointer(&mut surface, PointerKind::Click, 10.0, 10.0);
    assert_eq!(*seen.borrow(), vec!["surface:click", "hit:click"]);
}

#[test]
fn test_gesture_sequence_yields_one_enter_leave_and_drop() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);
    let seen: Seen = Rc::default();

    for kind in [
        EventKind::MouseEnter,
        EventKind::MouseLeave,
        EventKind::Grab,
    ] {
        surface.add_item_event(id, kind, recorder(&seen, "item"));
    }
    surface.on(EventKind::Grab, recorder(&seen, "surface"));
    surface.on(EventKind::Drop, recorder(&seen, "surface"));

    pointer(&mut surface, PointerKind::MouseDown, 10.0, 10.0);
    pointer(&mut surface, PointerKind::MouseMove, 20.0, 20.0);
    pointer(&mut surface, PointerKind::MouseMove, 100.0, 100.0);
    pointer(&mut surface, PointerKind::MouseUp, 100.0, 100.0);

    assert_eq!(count(&seen, "item:mouseenter"), 1);
    assert_eq!(count(&seen, "item:mouseleave"), 1);
    assert_eq!(count(&seen, "item:grab"), 1);
    assert_eq!(count(&seen, "surface:grab"), 2);
    assert_eq!(count(&seen, "surface:drop"), 1);
    // Enter precedes the grab it was derived alongside.
    assert_eq!(seen.borrow()[0], "item:mouseenter");
}

#[test]
fn test_hover_emits_enter_once_while_inside() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);
    let seen: Seen = Rc::default();
    surface.add_item_event(id, EventKind::MouseEnter, recorder(&seen, "item"));
    surface.add_item_event(id, EventKind::MouseLeave, recorder(&seen, "item"));

    for x in [5.0, 10.0, 15.0, 20.0] {
        pointer(&mut surface, PointerKind::MouseMove, x, x);
    }
    pointer(&mut surface, PointerKind::MouseLeave, 20.0, 20.0);
    pointer(&mut surface, PointerKind::MouseLeave, 20.0, 20.0);

    assert_eq!(*seen.borrow(), vec!["item:mouseenter", "item:mouseleave"]);
    let hover = surface.item(id).unwrap().bbox().unwrap().hover();
    assert_eq!(hover, crate::input::HoverState::Outside);
}

#[test]
fn test_leaving_the_surface_while_pressed_drops() {
    let (mut surface, _) = create_test_surface();
    let seen: Seen = Rc::default();
    surface.on(EventKind::Drop, recorder(&seen, "surface"));

    pointer(&mut surface, PointerKind::MouseDown, 10.0, 10.0);
    pointer(&mut surface, PointerKind::MouseLeave, 10.0, 10.0);
    pointer(&mut surface, PointerKind::MouseUp, 10.0, 10.0);

    assert_eq!(count(&seen, "surface:drop"), 1);
}

#[test]
fn test_listener_deleting_a_later_item_stops_its_delivery() {
    let (mut surface, _) = create_test_surface();
    let first = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);
    let second = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);
    let seen: Seen = Rc::default();

    surface.add_item_event(
        first,
        EventKind::Click,
        listener(move |s: &mut Surface, _: &ItemEvent| s.delete(second)),
    );
    surface.add_item_event(second, EventKind::Click, recorder(&seen, "second"));

    pointer(&mut surface, PointerKind::Click, 10.0, 10.0);

    assert!(seen.borrow().is_empty());
    assert_eq!(surface.find_all(), vec![first]);
}

#[test]
fn test_items_created_during_dispatch_see_only_later_events() {
    let (mut surface, _) = create_test_surface();
    let seen: Seen = Rc::default();
    let sink = Rc::clone(&seen);

    surface.on(
        EventKind::Click,
        listener(move |s: &mut Surface, _: &ItemEvent| {
            if s.is_empty() {
                let id = s.create_rectangle(0.0, 0.0, 50.0, 50.0, None);
                s.add_item_event(id, EventKind::Click, recorder(&sink, "late"));
            }
        }),
    );

    pointer(&mut surface, PointerKind::Click, 10.0, 10.0);
    assert!(seen.borrow().is_empty());
    pointer(&mut surface, PointerKind::Click, 10.0, 10.0);
    assert_eq!(*seen.borrow(), vec!["late:click"]);
}

#[test]
fn test_panicking_listener_is_isolated() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);
    let seen: Seen = Rc::default();

    surface.on(
        EventKind::Click,
        listener(|_: &mut Surface, _: &ItemEvent| panic!("listener failure")),
    );
    surface.add_item_event(id, EventKind::Click, recorder(&seen, "item"));

    pointer(&mut surface, PointerKind::Click, 10.0, 10.0);
    assert_eq!(*seen.borrow(), vec!["item:click"]);
}

#[test]
fn test_reentrant_emit_skips_running_listener() {
    let (mut surface, _) = create_test_surface();
    let seen: Seen = Rc::default();
    let sink = Rc::clone(&seen);
    let ping = EventKind::custom("ping");
    let ping_again = ping.clone();

    surface.on(
        ping.clone(),
        listener(move |s: &mut Surface, e: &ItemEvent| {
            sink.borrow_mut().push(e.kind.to_string());
            s.emit(&ItemEvent::bare(ping_again.clone(), Vec::new()));
        }),
    );
    surface.emit(&ItemEvent::bare(ping, Vec::new()));

    assert_eq!(*seen.borrow(), vec!["ping"]);
}

#[test]
fn test_off_removes_one_registration() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);
    let seen: Seen = Rc::default();
    let l = recorder(&seen, "item");

    surface.add_item_event(id, EventKind::Click, Rc::clone(&l));
    surface.add_item_event(id, EventKind::Click, Rc::clone(&l));
    surface.remove_item_event(id, &EventKind::Click, &l);
    pointer(&mut surface, PointerKind::Click, 10.0, 10.0);
    assert_eq!(count(&seen, "item:click"), 1);

    let s = recorder(&seen, "surface");
    surface.on(EventKind::Click, Rc::clone(&s));
    assert!(surface.off(&EventKind::Click, &s));
    assert!(!surface.off(&EventKind::Click, &s));
}

#[test]
fn test_items_without_hit_box_ignore_listeners() {
    let (mut surface, _) = create_test_surface();
    let id = surface.create_line(0.0, 0.0, 10.0, 10.0, None);
    let seen: Seen = Rc::default();
    let mut line = surface.handle(id).unwrap();
    assert!(!line.on(EventKind::Click, recorder(&seen, "line")));
}

#[test]
fn test_item_emit_reaches_only_that_item() {
    let (mut surface, _) = create_test_surface();
    let a = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);
    let b = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);
    let seen: Seen = Rc::default();
    let custom = EventKind::custom("select");
    surface.add_item_event(a, custom.clone(), recorder(&seen, "a"));
    surface.add_item_event(b, custom.clone(), recorder(&seen, "b"));
    surface.on(custom.clone(), recorder(&seen, "surface"));

    let event = ItemEvent::bare(custom, vec![b]);
    surface.handle(b).unwrap().emit(&event);
    assert_eq!(*seen.borrow(), vec!["b:select"]);
}

#[test]
fn test_item_cursor_follows_hover() {
    let (mut surface, _) = create_test_surface();
    let id = rect(&mut surface, 0.0, 0.0, 50.0, 50.0);
    surface.set_item_cursor(id, "pointer");
    assert_eq!(surface.cursor(), DEFAULT_CURSOR);

    pointer(&mut surface, PointerKind::MouseMove, 10.0, 10.0);
    assert_eq!(surface.cursor(), "pointer");
    pointer(&mut surface, PointerKind::MouseMove, 100.0, 100.0);
    assert_eq!(surface.cursor(), "auto");
}

#[test]
fn test_unknown_cursor_names_become_urls() {
    let (mut surface, _) = create_test_surface();
    surface.set_cursor("hand.png");
    assert_eq!(surface.cursor(), "url(hand.png)");
    surface.set_cursor("crosshair");
    assert_eq!(surface.cursor(), "crosshair");
}

#[test]
fn test_image_load_draws_and_emits_load() {
    let (mut surface, log) = create_test_surface();
    surface.set_image_loader(Arc::new(ok_loader));
    let id = surface.create_image(5.0, 5.0, 20.0, 10.0, "pic.png", None);
    let seen: Seen = Rc::default();
    surface.add_item_event(id, EventKind::Load, recorder(&seen, "image"));
    assert!(
        !log.borrow()
            .iter()
            .any(|c| matches!(c, DrawCommand::DrawImage { .. }))
    );

    assert_eq!(surface.wait_for_images(Duration::from_secs(5)), 1);

    assert_eq!(*seen.borrow(), vec!["image:load"]);
    assert_eq!(surface.pending_images(), 0);
    assert!(matches!(
        surface.item(id).unwrap().shape(),
        Shape::Image {
            status: ImageStatus::Ready(_),
            ..
        }
    ));
    assert!(log.borrow().contains(&DrawCommand::DrawImage {
        x: 5.0,
        y: 5.0,
        width: 20.0,
        height: 10.0
    }));
}

#[test]
fn test_image_failure_emits_loaderror() {
    let (mut surface, _) = create_test_surface();
    surface.set_image_loader(Arc::new(failing_loader));
    let id = surface.create_image(0.0, 0.0, 10.0, 10.0, "nowhere://x", None);
    let seen: Seen = Rc::default();
    surface.add_item_event(id, EventKind::Load, recorder(&seen, "image"));
    surface.add_item_event(id, EventKind::LoadError, recorder(&seen, "image"));

    surface.wait_for_images(Duration::from_secs(5));

    assert_eq!(*seen.borrow(), vec!["image:loaderror"]);
    assert!(matches!(
        surface.item(id).unwrap().shape(),
        Shape::Image {
            status: ImageStatus::Failed(_),
            ..
        }
    ));
}

#[test]
fn test_panicking_loader_reports_loaderror() {
    let (mut surface, _) = create_test_surface();
    surface.set_image_loader(Arc::new(panicking_loader));
    let id = surface.create_image(0.0, 0.0, 10.0, 10.0, "broken.png", None);
    let seen: Seen = Rc::default();
    surface.add_item_event(id, EventKind::LoadError, recorder(&seen, "image"));

    assert_eq!(surface.wait_for_images(Duration::from_secs(5)), 1);

    assert_eq!(surface.pending_images(), 0);
    assert_eq!(*seen.borrow(), vec!["image:loaderror"]);
    match surface.item(id).unwrap().shape() {
        Shape::Image {
            status: ImageStatus::Failed(message),
            ..
        } => assert!(message.contains("decoder crashed")),
        other => panic!("unexpected shape {other:?}"),
    }
}

#[test]
fn test_superseded_image_load_is_dropped() {
    let (mut surface, _) = create_test_surface();
    surface.set_image_loader(Arc::new(ok_loader));
    let id = surface.create_image(0.0, 0.0, 10.0, 10.0, "first.png", None);
    let seen: Seen = Rc::default();
    surface.add_item_event(id, EventKind::Load, recorder(&seen, "image"));

    surface.handle(id).unwrap().set_url("second.png").unwrap();
    assert_eq!(surface.wait_for_images(Duration::from_secs(5)), 1);

    assert_eq!(count(&seen, "image:load"), 1);
    assert!(matches!(
        surface.item(id).unwrap().shape(),
        Shape::Image { url, generation: 1, .. } if url == "second.png"
    ));
}

#[test]
fn test_image_for_deleted_item_is_ignored() {
    let (mut surface, _) = create_test_surface();
    surface.set_image_loader(Arc::new(ok_loader));
    let id = surface.create_image(0.0, 0.0, 10.0, 10.0, "gone.png", None);
    surface.delete(id);

    assert_eq!(surface.wait_for_images(Duration::from_secs(5)), 0);
    assert_eq!(surface.pending_images(), 0);
}

#[test]
fn test_set_url_and_set_text_check_item_type() {
    let (mut surface, _) = create_test_surface();
    let r = rect(&mut surface, 0.0, 0.0, 10.0, 10.0);
    let t = surface.create_text("old", 0.0, 0.0, None);

    let err = surface.handle(r).unwrap().set_url("x.png").unwrap_err();
    assert!(matches!(
        err,
        SceneError::WrongItemType {
            expected: ItemType::Image,
            found: ItemType::Rectangle
        }
    ));
    let result = surface.handle(r).unwrap().set_text("x", Reload::Default);
    assert!(result.is_err());

    surface
        .handle(t)
        .unwrap()
        .set_text("new", Reload::Default)
        .unwrap();
    assert!(matches!(
        surface.item(t).unwrap().shape(),
        Shape::Text { text, .. } if text == "new"
    ));
}

#[test]
fn test_save_requires_an_exporting_context() {
    let (surface, _) = create_test_surface();
    assert!(matches!(surface.save(None), Err(SceneError::Render(_))));
}
