use core::time::Duration;

use mirror_room::*;
use mirror_room_svg::*;

const BOUNDS: RoomBounds = RoomBounds::new(0., 0., 200., 200.);

fn ball() -> ShapeConfig {
    ShapeConfig::new("ball", Circle::new([50., 100.], 10.)).with_style(Style::fill("#ff0000"))
}

fn engine(placement: Option<MirrorPlacement>) -> Engine<SvgSurface> {
    let mut config = EngineConfig::new(BOUNDS).with_shapes([ball()]);
    config.mirror_location = placement;
    Engine::new(SvgSurface::new(200., 200.), config)
}

fn center_of(engine: &Engine<SvgSurface>, id: &str) -> Point {
    let h = engine.element(id).unwrap();
    let svg = engine.surface();
    Point::new(svg.numeric_attribute(&h, "cx"), svg.numeric_attribute(&h, "cy"))
}

fn drag(engine: &mut Engine<SvgSurface>, id: &str, from: [Float; 2], to: [Float; 2]) {
    let target = engine.element(id);
    engine.handle_pointer(&PointerEvent::down(target, from));
    engine.handle_pointer(&PointerEvent::moved(to));
    engine.handle_pointer(&PointerEvent::up(to));
}

fn path_count(engine: &Engine<SvgSurface>) -> usize {
    engine.surface().with_id_prefix(PATH_ID_PREFIX).count()
}

#[test]
fn translate_and_reflect() {
    let mut engine = engine(Some(MirrorPlacement::LeftRight));

    // 2 first order, 2 second order
    assert_eq!(engine.images_of("ball").len(), 4);

    drag(&mut engine, "ball", [50., 100.], [150., 100.]);

    assert_eq!(*engine.drag_state(), DragState::Idle);
    assert_eq!(center_of(&engine, "ball"), Point::new(150., 100.));

    // mirror 1 is the right wall
    let right = engine.image("ball", &[1]).unwrap();
    assert_eq!(engine.graph().node(right).geometry.center(), Point::new(250., 100.));
    assert_eq!(center_of(&engine, "ball-reflection1"), Point::new(250., 100.));
    assert_eq!(center_of(&engine, "ball-reflection0"), Point::new(-150., 100.));

    assert_eq!(engine.image("ball", &[2]), None);
    assert_eq!(engine.image("ball", &[1, 1]), None);
    assert!(engine.element("ball-reflection2").is_none());
}

#[test]
fn pointer_coordinates_are_made_local() {
    let config = EngineConfig::new(BOUNDS)
        .with_shapes([ball()])
        .with_mirrors(MirrorPlacement::TopBottom);
    let mut engine = Engine::new(SvgSurface::new(200., 200.).with_offset(100., 50.), config);

    drag(&mut engine, "ball", [150., 150.], [170., 130.]);

    assert_eq!(center_of(&engine, "ball"), Point::new(70., 80.));
    // top mirror, y = 0
    assert_eq!(center_of(&engine, "ball-reflection0"), Point::new(70., -80.));
}

#[test]
fn dragging_stops_at_the_walls() {
    let mut engine = engine(Some(MirrorPlacement::All));

    // the pointer grabbed the ball 5 units right of its center
    drag(&mut engine, "ball", [55., 100.], [1000., -1000.]);
    assert_eq!(center_of(&engine, "ball"), Point::new(190., 10.));

    drag(&mut engine, "ball", [190., 10.], [-50., 400.]);
    assert_eq!(center_of(&engine, "ball"), Point::new(10., 190.));
}

#[test]
fn images_follow_every_move() {
    let mut engine = engine(Some(MirrorPlacement::All));
    assert_eq!(engine.images_of("ball").len(), 16);

    let target = engine.element("ball");
    engine.handle_pointer(&PointerEvent::down(target, [50., 100.]));

    for step in 1..=10 {
        let pointer = [50. + step as Float * 7., 100. - step as Float * 3.];
        engine.handle_pointer(&PointerEvent::moved(pointer));

        let graph = engine.graph();
        for image in engine.images_of("ball") {
            let parent = graph.parent(image).unwrap();
            let mirror = engine.room().mirror(graph.node(image).mirror().unwrap()).unwrap();
            let expected = reflected(&graph.node(parent).geometry, mirror).center();

            assert!((graph.node(image).geometry.center() - expected).norm() < EPSILON);

            let drawn = center_of(&engine, &graph.element_id(image));
            assert!((drawn - expected).norm() < 1e-6);
        }
    }

    engine.handle_pointer(&PointerEvent::up([0., 0.]));
    assert!(!engine.drag_state().is_dragging());
}

#[test]
fn no_mirrors_no_images() {
    let mut engine = engine(None);

    assert_eq!(engine.graph().image_count(), 0);
    assert!(engine.images_of("ball").is_empty());

    assert!(engine.move_source("ball", [120., 30.]));
    let ball = engine.graph().source("ball").unwrap();
    assert_eq!(engine.on_source_moved(ball), 0);
    assert_eq!(center_of(&engine, "ball"), Point::new(120., 30.));
    assert!(engine.surface().with_id_prefix("room-mirror-").next().is_none());
}

#[test]
fn polygons_drag_by_their_first_vertex() {
    let tri: Polygon = "10,10 30,10 20,25".parse().unwrap();
    let config = EngineConfig::new(BOUNDS)
        .with_shapes([ShapeConfig::new("tri", tri)])
        .with_mirrors(MirrorPlacement::All);
    let mut engine = Engine::new(SvgSurface::new(200., 200.), config);

    drag(&mut engine, "tri", [20., 15.], [500., 15.]);

    // bounding box is 20 wide, right edge against x = 200
    let h = engine.element("tri").unwrap();
    assert_eq!(engine.surface().attribute(&h, "points"), Some("180,10 200,10 190,25"));

    // reflected across the right wall (mirror 3)
    let h = engine.element("tri-reflection3").unwrap();
    assert_eq!(engine.surface().attribute(&h, "points"), Some("220,10 200,10 210,25"));
}

#[test]
fn fixed_shapes_cannot_be_dragged() {
    let config = EngineConfig::new(BOUNDS)
        .with_shapes([ball().with_draggable(false)])
        .with_mirrors(MirrorPlacement::LeftRight);
    let mut engine = Engine::new(SvgSurface::new(200., 200.), config);

    drag(&mut engine, "ball", [50., 100.], [150., 100.]);
    assert_eq!(center_of(&engine, "ball"), Point::new(50., 100.));
    assert!(!engine.move_source("ball", [150., 100.]));
    assert!(!engine.move_source("nope", [150., 100.]));
}

#[test]
fn clicking_an_image_traces_instead_of_dragging() {
    let mut engine = engine(Some(MirrorPlacement::LeftRight));

    // the left image, seen from the center of the room
    let image = engine.element("ball-reflection0");
    engine.handle_pointer(&PointerEvent::down(image, [-50., 100.]));
    assert!(!engine.drag_state().is_dragging());

    let path = engine.light_path().unwrap();
    assert_eq!(path.exit_wall, Wall::Left);
    assert_eq!(path.bounce, None);
    let expected = [Point::new(50., 100.), Point::new(0., 100.), Point::new(100., 100.)];
    assert_eq!(path.waypoints().len(), expected.len());
    for (a, b) in path.waypoints().iter().zip(expected) {
        assert!((a - b).norm() < 1e-9, "{a} != {b}");
    }

    // moving the pointer doesn't move the image
    engine.handle_pointer(&PointerEvent::moved([-80., 100.]));
    engine.handle_pointer(&PointerEvent::up([-80., 100.]));
    assert_eq!(center_of(&engine, "ball-reflection0"), Point::new(-50., 100.));
}

#[test]
fn light_paths_are_revealed_one_segment_at_a_time() {
    let config = EngineConfig::new(BOUNDS)
        .with_shapes([ball()])
        .with_mirrors(MirrorPlacement::LeftRight)
        .with_observer([100., 150.])
        .with_reveal_delay(Duration::from_millis(100));
    let mut engine = Engine::new(SvgSurface::new(200., 200.), config);

    // right, then left
    let image = engine.image("ball", &[1, 0]).unwrap();
    let path = engine.trace_from(image).unwrap();
    assert!(path.bounce.is_some());
    assert_eq!(path.waypoints().len(), 4);

    assert_eq!(path_count(&engine), 1);
    engine.tick(Duration::from_millis(50));
    assert_eq!(path_count(&engine), 1);
    engine.tick(Duration::from_millis(50));
    assert_eq!(path_count(&engine), 2);
    engine.tick(Duration::from_millis(100));
    assert_eq!(path_count(&engine), 3);
    assert!(!engine.reveal().is_pending());

    let h = engine.element("light-path-0").unwrap();
    assert_eq!(engine.surface().attribute(&h, "stroke"), Some(PATH_COLOR));
    assert!(engine.surface().attribute(&h, "d").unwrap().starts_with("M 50 100 L "));
}

#[test]
fn a_new_trace_cancels_the_previous_one() {
    let mut engine = engine(Some(MirrorPlacement::All));

    let first = engine.image("ball", &[2]).unwrap();
    engine.trace_from(first);
    assert_eq!(path_count(&engine), 1);
    let stale = engine.reveal().generation();

    let second = engine.image("ball", &[0]).unwrap();
    engine.trace_from(second);
    assert_ne!(engine.reveal().generation(), stale);
    assert_eq!(path_count(&engine), 1);

    engine.finish_reveal();
    let drawn = path_count(&engine);
    assert_eq!(drawn, engine.light_path().unwrap().waypoints().len() - 1);

    engine.clear_path();
    assert_eq!(path_count(&engine), 0);
    assert_eq!(engine.light_path(), None);

    engine.tick(Duration::from_secs(10));
    assert_eq!(path_count(&engine), 0);
}

#[test]
fn observer_at_the_source_draws_nothing() {
    let config = EngineConfig::new(BOUNDS)
        .with_shapes([ball()])
        .with_mirrors(MirrorPlacement::LeftRight)
        .with_observer([50., 100.]);
    let mut engine = Engine::new(SvgSurface::new(200., 200.), config);

    let image = engine.element("ball-reflection1");
    engine.handle_pointer(&PointerEvent::down(image, [150., 100.]));

    assert_eq!(engine.light_path(), None);
    engine.finish_reveal();
    assert_eq!(path_count(&engine), 0);
}

#[test]
fn decorations_are_inert() {
    let mut engine = engine(Some(MirrorPlacement::All));

    assert_eq!(engine.surface().with_id_prefix("room-wall-").count(), 4);
    assert_eq!(engine.surface().with_id_prefix("room-mirror-").count(), 4);
    assert_eq!(center_of(&engine, OBSERVER_ID), Point::new(100., 100.));

    let wall = engine.element("room-wall-top");
    assert!(wall.is_some());
    engine.handle_pointer(&PointerEvent::down(wall, [100., 0.]));
    assert!(!engine.drag_state().is_dragging());
    assert_eq!(engine.light_path(), None);

    let mirror = engine.element("room-mirror-0").unwrap();
    assert_eq!(engine.node_of(&mirror), None);
}

#[test]
fn sources_are_drawn_over_their_images() {
    let engine = engine(Some(MirrorPlacement::All));

    let order: Vec<_> = engine
        .surface()
        .elements()
        .filter_map(|(_, e)| e.id().filter(|id| id.starts_with("ball")).map(String::from))
        .collect();

    assert_eq!(order.len(), 17);
    assert_eq!(order.last().map(String::as_str), Some("ball"));

    let ball = engine.element("ball").unwrap();
    assert_eq!(engine.surface().attribute(&ball, "fill"), Some("#ff0000"));
    let image = engine.element("ball-reflection01").unwrap();
    assert_eq!(engine.surface().attribute(&image, "fill"), Some("#ff8080"));
    assert_eq!(engine.surface().attribute(&image, "data-draggable"), Some("false"));
}

#[test]
fn update_bounds_rederives_the_room() {
    let mut engine = engine(Some(MirrorPlacement::LeftRight));
    assert!(engine.move_source("ball", [150., 100.]));

    let image = engine.image("ball", &[0]).unwrap();
    engine.trace_from(image);
    assert_eq!(path_count(&engine), 1);

    engine.update_bounds(RoomBounds::new(0., 0., 100., 100.));

    // the trace is cleared, the ball is pushed back in
    assert_eq!(path_count(&engine), 0);
    assert_eq!(center_of(&engine, "ball"), Point::new(90., 90.));

    // the right mirror moved to x = 100
    assert_eq!(center_of(&engine, "ball-reflection1"), Point::new(110., 90.));
    assert_eq!(center_of(&engine, "ball-reflection10"), Point::new(-110., 90.));

    assert_eq!(engine.surface().with_id_prefix("room-wall-").count(), 4);
    assert_eq!(engine.surface().with_id_prefix("room-mirror-").count(), 2);
    assert_eq!(center_of(&engine, OBSERVER_ID), Point::new(50., 50.));

    let h = engine.element("room-mirror-1").unwrap();
    assert_eq!(engine.surface().attribute(&h, "d"), Some("M 100 0 L 100 100"));
}

#[test]
fn update_shapes_reinitializes() {
    let mut engine = engine(Some(MirrorPlacement::All));
    let image = engine.image("ball", &[0]).unwrap();
    engine.trace_from(image);

    engine.update_shapes([
        ShapeConfig::new("a", Circle::new([20., 20.], 5.)),
        ShapeConfig::new("a", Circle::new([80., 80.], 5.)),
        ShapeConfig::new("b", Circle::new([40., 40.], 5.)),
    ]);

    // the duplicate is skipped
    assert_eq!(engine.graph().len(), 2 * 17);
    assert_eq!(center_of(&engine, "a"), Point::new(20., 20.));
    assert_eq!(engine.element("ball"), None);
    assert_eq!(engine.light_path(), None);
    assert_eq!(path_count(&engine), 0);
    assert_eq!(engine.surface().with_id_prefix("room-wall-").count(), 4);

    engine.update_shapes([]);
    assert!(engine.graph().is_empty());
    // walls, mirrors and the observer
    assert_eq!(engine.surface().len(), 4 + 4 + 1);
}

#[test]
fn engines_can_borrow_their_surface() {
    let mut svg = SvgSurface::new(200., 200.);

    {
        let config = EngineConfig::new(BOUNDS)
            .with_shapes([ball()])
            .with_mirrors(MirrorPlacement::TopBottom);
        let mut engine = Engine::new(&mut svg, config);
        assert!(engine.move_source("ball", [60., 40.]));
    }

    let doc = svg.to_string();
    assert!(doc.contains(r#"<circle id="ball" cx="60" cy="40" r="10""#));
    assert!(doc.contains(r#"id="ball-reflection0" cx="60" cy="-40""#));
}

#[test]
fn scenes_load_from_json() {
    let scene = mirror_room_json::parse_scene(
        r##"{
            "bounds": {"x": 0, "y": 0, "width": 200, "height": 200},
            "mirrorLocation": "top-bottom",
            "imageOrder": 1,
            "shapes": [
                {"id": "ball", "kind": "circle", "cx": 50, "cy": 100, "r": 10, "fill": "#00f"},
                {"id": "cloud", "kind": "cloud"}
            ]
        }"##,
    )
    .unwrap();

    let engine = Engine::new(SvgSurface::new(200., 200.), scene.to_engine_config().unwrap());

    assert_eq!(engine.images_of("ball").len(), 2);
    assert_eq!(engine.element("cloud"), None);
    let h = engine.element("ball-reflection1").unwrap();
    assert_eq!(engine.surface().attribute(&h, "fill"), Some("#8080ff"));
}

#[test]
fn reserved_ids_are_skipped() {
    let mut engine = engine(Some(MirrorPlacement::LeftRight));
    engine.update_shapes([
        ShapeConfig::new("observer", Circle::new([20., 20.], 5.)),
        ShapeConfig::new("room-lamp", Circle::new([40., 40.], 5.)),
        ShapeConfig::new("light-path-x", Circle::new([60., 60.], 5.)),
        ShapeConfig::new("lamp", Circle::new([50., 100.], 5.)),
    ]);

    assert_eq!(engine.graph().len(), 1 + 4);
    assert_eq!(engine.geometry("room-lamp"), None);
    assert!(engine.element("room-lamp").is_none());

    let image = engine.image("lamp", &[1]).unwrap();
    engine.trace_from(image);
    engine.finish_reveal();
    engine.update_bounds(RoomBounds::new(0., 0., 180., 180.));

    assert_eq!(center_of(&engine, "lamp"), Point::new(50., 100.));
    assert_eq!(center_of(&engine, "lamp-reflection1"), Point::new(310., 100.));
    assert_eq!(center_of(&engine, OBSERVER_ID), Point::new(90., 90.));
}

#[test]
fn decorations_stay_under_the_bodies() {
    let mut engine = engine(Some(MirrorPlacement::LeftRight));
    let wall = engine.element("room-wall-top");

    engine.update_bounds(RoomBounds::new(0., 0., 150., 120.));

    // updated in place
    assert_eq!(engine.element("room-wall-top"), wall);
    let h = engine.element("room-wall-top").unwrap();
    assert_eq!(engine.surface().attribute(&h, "d"), Some("M 0 0 L 150 0"));

    // 4 walls, 2 mirrors and the observer come first
    let ids: Vec<_> = engine
        .surface()
        .elements()
        .filter_map(|(_, e)| e.id().map(String::from))
        .collect();
    assert_eq!(ids.len(), 7 + 5);
    assert!(ids[..7].iter().all(|id| id.starts_with(ROOM_ID_PREFIX) || id == OBSERVER_ID));
    assert_eq!(ids.last().map(String::as_str), Some("ball"));
}

#[test]
fn invalid_bounds_are_ignored() {
    let mut engine = engine(Some(MirrorPlacement::All));
    assert!(engine.move_source("ball", [150., 100.]));

    engine.update_bounds(RoomBounds::new(Float::NAN, 0., 100., 100.));
    engine.update_bounds(RoomBounds::new(0., 0., -100., 100.));

    assert_eq!(*engine.room().bounds(), BOUNDS);
    assert!(engine.move_source("ball", [500., 100.]));
    assert_eq!(center_of(&engine, "ball"), Point::new(190., 100.));
}
