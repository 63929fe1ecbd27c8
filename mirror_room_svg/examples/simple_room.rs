use mirror_room::*;
use mirror_room_svg::SvgSurface;

fn main() {
    let shapes = [
        ShapeConfig::new("ball", Circle::new([50., 100.], 10.)).with_style(Style::fill("#ff0000")),
        ShapeConfig::new("tri", "120,40 150,40 135,65".parse::<Polygon>().unwrap())
            .with_style(Style::fill("#0000ff")),
    ];

    let config = EngineConfig::new(RoomBounds::new(0., 0., 200., 200.))
        .with_shapes(shapes)
        .with_mirrors(MirrorPlacement::All);

    let mut engine = Engine::new(SvgSurface::new(200., 200.), config);
    engine.move_source("ball", [150., 120.]);

    print!("{}", engine.surface());
}
