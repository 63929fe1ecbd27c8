use thiserror::Error;

use super::*;

/// Errors produced when parsing a polygon's point list (`"x1,y1 x2,y2 ..."`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PointListError {
    #[error("point list has an odd number of coordinates ({0})")]
    OddCount(usize),

    #[error("invalid coordinate `{0}`")]
    NotANumber(String),

    #[error("a polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}

/// Common operations on every draggable body, whatever its kind.
pub trait Shape: Reflect {
    /// The point drag offsets are measured from.
    fn anchor(&self) -> Point;

    fn translate(&mut self, by: &Point);

    /// The bounding box of `self`, as `(min, max)` offsets from [`Self::anchor`].
    fn extent(&self) -> (Point, Point);

    /// The point light paths start from.
    fn center(&self) -> Point;
}

impl<L: Shape, R: Shape> Shape for Either<L, R> {
    fn anchor(&self) -> Point {
        either::for_both!(self, s => s.anchor())
    }

    fn translate(&mut self, by: &Point) {
        either::for_both!(self, s => s.translate(by))
    }

    fn extent(&self) -> (Point, Point) {
        either::for_both!(self, s => s.extent())
    }

    fn center(&self) -> Point {
        either::for_both!(self, s => s.center())
    }
}

/// A point-like body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub center: Point,
    pub radius: Float,
}

impl Circle {
    #[inline]
    #[must_use]
    pub fn new(center: impl Into<Point>, radius: Float) -> Self {
        Self {
            center: center.into(),
            radius: radius.abs(),
        }
    }
}

impl Reflect for Circle {
    #[inline]
    fn reflect_across(&mut self, line: &Line) {
        self.center.reflect_across(line);
    }
}

impl Shape for Circle {
    fn anchor(&self) -> Point {
        self.center
    }

    fn translate(&mut self, by: &Point) {
        self.center += by;
    }

    fn extent(&self) -> (Point, Point) {
        let r = Point::repeat(self.radius);
        (-r, r)
    }

    fn center(&self) -> Point {
        self.center
    }
}

/// A polygon with at least 3 vertices.
///
/// Vertex order is the winding order, and is kept as is by every transformation.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn try_new(points: Vec<Point>) -> Result<Self, PointListError> {
        if points.len() < 3 {
            return Err(PointListError::TooFewVertices(points.len()));
        }
        Ok(Self { points })
    }

    #[inline]
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The vertex average, see [`centroid`].
    #[inline]
    #[must_use]
    pub fn centroid(&self) -> Point {
        centroid(&self.points)
    }

    /// Formats the vertices the way [`Polygon::from_str`] parses them.
    #[must_use]
    pub fn to_point_list(&self) -> String {
        self.points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for Polygon {
    type Err = PointListError;

    /// Coordinates may be separated by commas, whitespace, or both.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let coords = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<Float>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| PointListError::NotANumber(t.into()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if coords.len() % 2 != 0 {
            return Err(PointListError::OddCount(coords.len()));
        }

        Self::try_new(
            coords
                .chunks_exact(2)
                .map(|c| Point::new(c[0], c[1]))
                .collect(),
        )
    }
}

impl Reflect for Polygon {
    #[inline]
    fn reflect_across(&mut self, line: &Line) {
        self.points.reflect_across(line);
    }
}

impl Shape for Polygon {
    fn anchor(&self) -> Point {
        self.points[0]
    }

    fn translate(&mut self, by: &Point) {
        self.points.iter_mut().for_each(|p| *p += by);
    }

    fn extent(&self) -> (Point, Point) {
        let anchor = self.anchor();
        self.points.iter().fold(
            (Point::zeros(), Point::zeros()),
            |(min, max), p| {
                let d = p - anchor;
                (min.inf(&d), max.sup(&d))
            },
        )
    }

    fn center(&self) -> Point {
        self.centroid()
    }
}

/// The geometry of a body: a circle or a polygon.
pub type Geometry = Either<Circle, Polygon>;

impl From<Circle> for Geometry {
    fn from(c: Circle) -> Self {
        Either::Left(c)
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Either::Right(p)
    }
}

/// Render surface element kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Circle,
    Polygon,
    Path,
}

impl ElementKind {
    #[inline]
    #[must_use]
    pub const fn of(geometry: &Geometry) -> Self {
        match geometry {
            Either::Left(_) => Self::Circle,
            Either::Right(_) => Self::Polygon,
        }
    }

    #[inline]
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Polygon => "polygon",
            Self::Path => "path",
        }
    }
}

/// The geometric attributes of an element drawing `geometry`.
#[must_use]
pub fn geometry_attributes(geometry: &Geometry) -> Vec<(&'static str, String)> {
    match geometry {
        Either::Left(c) => vec![
            ("cx", c.center.x.to_string()),
            ("cy", c.center.y.to_string()),
            ("r", c.radius.to_string()),
        ],
        Either::Right(p) => vec![("points", p.to_point_list())],
    }
}

/// How much image fills are blended toward white.
pub const IMAGE_BLEND: Float = 0.5;

#[derive(Clone, Debug, PartialEq, Default)]
pub struct Style {
    pub fill: Option<String>,
    pub stroke: Option<String>,
    pub stroke_width: Option<Float>,
    pub opacity: Option<Float>,
}

impl Style {
    #[inline]
    #[must_use]
    pub fn fill(color: impl Into<String>) -> Self {
        Self {
            fill: Some(color.into()),
            ..Self::default()
        }
    }

    /// The style images of a body with this style are drawn with.
    ///
    /// Hex fills (`#rgb` or `#rrggbb`) are blended toward white by [`IMAGE_BLEND`],
    /// other fills keep their value but have their opacity scaled by the same amount.
    #[must_use]
    pub fn lightened(&self) -> Self {
        let mut style = self.clone();

        match self.fill.as_deref().and_then(parse_hex_color) {
            Some(rgb) => {
                let [r, g, b] =
                    rgb.map(|c| (c as Float + (255. - c as Float) * IMAGE_BLEND).round() as u8);
                style.fill = Some(format!("#{r:02x}{g:02x}{b:02x}"));
            }
            None => style.opacity = Some(self.opacity.unwrap_or(1.) * (1. - IMAGE_BLEND)),
        }

        style
    }

    #[must_use]
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = Vec::with_capacity(4);
        attrs.push(("fill", self.fill.clone().unwrap_or_else(|| "none".into())));
        if let Some(stroke) = &self.stroke {
            attrs.push(("stroke", stroke.clone()));
        }
        if let Some(w) = self.stroke_width {
            attrs.push(("stroke-width", w.to_string()));
        }
        if let Some(o) = self.opacity {
            attrs.push(("opacity", o.to_string()));
        }
        attrs
    }
}

/// Parses `#rgb` and `#rrggbb` colors.
#[must_use]
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }

    match hex.len() {
        3 => {
            let mut rgb = [0; 3];
            for (c, i) in rgb.iter_mut().zip(0..) {
                let v = u8::from_str_radix(&hex[i..i + 1], 16).ok()?;
                *c = v * 17;
            }
            Some(rgb)
        }
        6 => {
            let mut rgb = [0; 3];
            for (c, i) in rgb.iter_mut().zip((0..).step_by(2)) {
                *c = u8::from_str_radix(&hex[i..i + 2], 16).ok()?;
            }
            Some(rgb)
        }
        _ => None,
    }
}
