use mirror_room::*;
use mirror_room_svg::SvgSurface;

fn main() {
    let config = EngineConfig::new(RoomBounds::new(0., 0., 300., 200.))
        .with_shapes([ShapeConfig::new("ball", Circle::new([220., 60.], 8.))
            .with_style(Style::fill("#2a9d8f"))])
        .with_mirrors(MirrorPlacement::LeftRight)
        .with_observer([80., 150.]);

    let mut engine = Engine::new(SvgSurface::new(300., 200.), config);

    // right, then left
    let image = engine.image("ball", &[1, 0]).unwrap();
    engine.trace_from(image);
    engine.finish_reveal();

    print!("{}", engine.surface());
}
