use core::f64::consts::TAU;

use mirror_room::*;
use mirror_room_json::{SceneConfig, ShapeEntry};

pub use rand;

pub trait Random: Sized {
    /// Generate a random value using the provided `rng`
    ///
    /// This method must not fail. If creating a value is faillible, keep trying until success
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self;
}

impl Random for RoomBounds {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::new(
            rng.gen_range(0.0..100.0),
            rng.gen_range(0.0..100.0),
            rng.gen_range(100.0..600.0),
            rng.gen_range(100.0..600.0),
        )
    }
}

impl Random for MirrorPlacement {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        match rng.gen_range(0usize..3) {
            0 => Self::TopBottom,
            1 => Self::LeftRight,
            2 => Self::All,
            _ => unreachable!(),
        }
    }
}

/// A `#rrggbb` color.
pub fn rand_color(rng: &mut (impl rand::Rng + ?Sized)) -> String {
    let [r, g, b]: [u8; 3] = rng.gen();
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// A random point in `bounds`, at least `margin` away from its walls.
pub fn rand_point_in(
    rng: &mut (impl rand::Rng + ?Sized),
    bounds: &RoomBounds,
    margin: Float,
) -> Point {
    let (lo, hi) = (bounds.min().add_scalar(margin), bounds.max().add_scalar(-margin));
    Point::new(
        if lo.x < hi.x { rng.gen_range(lo.x..hi.x) } else { bounds.center().x },
        if lo.y < hi.y { rng.gen_range(lo.y..hi.y) } else { bounds.center().y },
    )
}

/// The size shapes are scaled to in `bounds`.
fn max_size(bounds: &RoomBounds) -> Float {
    bounds.width.min(bounds.height) / 8.
}

pub fn rand_circle(rng: &mut (impl rand::Rng + ?Sized), bounds: &RoomBounds) -> Circle {
    let radius = rng.gen_range(0.25..1.0) * max_size(bounds);
    Circle::new(rand_point_in(rng, bounds, radius), radius)
}

/// A regular polygon, with 3 to 8 vertices, that fits in `bounds`.
pub fn rand_polygon(rng: &mut (impl rand::Rng + ?Sized), bounds: &RoomBounds) -> Polygon {
    loop {
        let n = rng.gen_range(3usize..=8);
        let radius = rng.gen_range(0.25..1.0) * max_size(bounds);
        let center = rand_point_in(rng, bounds, radius);
        let phase = rng.gen_range(0.0..TAU);

        let points = (0..n)
            .map(|i| {
                let angle = phase + TAU * i as Float / n as Float;
                center + Point::new(angle.cos(), angle.sin()) * radius
            })
            .collect();

        if let Ok(polygon) = Polygon::try_new(points) {
            break polygon;
        }
    }
}

/// A circle or a polygon, with a random fill, in `bounds`.
pub fn rand_shape(
    rng: &mut (impl rand::Rng + ?Sized),
    id: impl Into<String>,
    bounds: &RoomBounds,
) -> ShapeEntry {
    let entry = if rng.gen_bool(0.5) {
        ShapeEntry::circle(id, &rand_circle(rng, bounds))
    } else {
        ShapeEntry::polygon(id, &rand_polygon(rng, bounds))
    };
    entry.with_fill(rand_color(rng))
}

/// A scene with `num_shapes` shapes, ids `shape0`, `shape1`, ...
pub fn random_scene(rng: &mut (impl rand::Rng + ?Sized), num_shapes: usize) -> SceneConfig {
    let mut scene = SceneConfig::new(RoomBounds::random(rng));
    scene.mirror_location = Some(MirrorPlacement::random(rng));

    let bounds = scene.bounds;
    scene.shapes = (0..num_shapes)
        .map(|i| rand_shape(rng, format!("shape{i}"), &bounds))
        .collect();

    scene
}

impl Random for SceneConfig {
    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        const MIN_NUM_SHAPES: usize = 1;
        const MAX_NUM_SHAPES: usize = 8;
        let num_shapes = rng.gen_range(MIN_NUM_SHAPES..MAX_NUM_SHAPES);

        random_scene(rng, num_shapes)
    }
}
