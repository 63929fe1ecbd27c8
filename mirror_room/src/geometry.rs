use core::cmp::Ordering;

use super::*;

/// An infinite line, used as a reflection axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
    dir: Unit<Point>,
}

impl Line {
    /// Returns `None` if `p1` and `p2` are (approximately) the same point.
    #[inline]
    #[must_use]
    pub fn try_new(p1: impl Into<Point>, p2: impl Into<Point>) -> Option<Self> {
        let (p1, p2) = (p1.into(), p2.into());
        Unit::try_new(p2 - p1, Float::EPSILON).map(|dir| Self { p1, p2, dir })
    }

    /// The line through `p1`, directed by `dir`.
    #[inline]
    #[must_use]
    pub fn from_unit_dir(p1: impl Into<Point>, dir: Unit<Point>) -> Self {
        let p1 = p1.into();
        Self {
            p1,
            p2: p1 + dir.as_ref(),
            dir,
        }
    }

    #[inline]
    #[must_use]
    pub const fn direction(&self) -> &Unit<Point> {
        &self.dir
    }

    /// Returns the mirror image of `p` with respect to this line.
    ///
    /// Points on the line map to themselves, and reflecting twice gives `p` back.
    #[inline]
    #[must_use]
    pub fn reflect(&self, p: &Point) -> Point {
        let v = p - self.p1;
        let proj = self.dir.as_ref() * v.dot(&self.dir);
        self.p1 + proj * 2.0 - v
    }

    #[inline]
    #[must_use]
    pub fn distance_to(&self, p: &Point) -> Float {
        let v = p - self.p1;
        (v - self.dir.as_ref() * v.dot(&self.dir)).norm()
    }
}

/// In-place orthogonal symmetry with respect to a [`Line`].
#[impl_trait_for_tuples::impl_for_tuples(8)]
pub trait Reflect {
    fn reflect_across(&mut self, line: &Line);
}

impl Reflect for Point {
    #[inline]
    fn reflect_across(&mut self, line: &Line) {
        *self = line.reflect(self);
    }
}

impl<L: Reflect, R: Reflect> Reflect for Either<L, R> {
    #[inline]
    fn reflect_across(&mut self, line: &Line) {
        match self {
            Either::Left(l) => l.reflect_across(line),
            Either::Right(r) => r.reflect_across(line),
        }
    }
}

impl<T: Reflect> Reflect for [T] {
    #[inline]
    fn reflect_across(&mut self, line: &Line) {
        self.iter_mut().for_each(|v| v.reflect_across(line));
    }
}

impl<T: Reflect> Reflect for Vec<T> {
    #[inline]
    fn reflect_across(&mut self, line: &Line) {
        self.as_mut_slice().reflect_across(line);
    }
}

impl<T: Reflect + ?Sized> Reflect for &mut T {
    #[inline]
    fn reflect_across(&mut self, line: &Line) {
        (**self).reflect_across(line);
    }
}

/// Returns a reflected copy of `value`.
#[inline]
#[must_use]
pub fn reflected<T: Reflect + Clone>(value: &T, line: &Line) -> T {
    let mut v = value.clone();
    v.reflect_across(line);
    v
}

/// A bounded line segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    #[inline]
    #[must_use]
    pub fn new(start: impl Into<Point>, end: impl Into<Point>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    fn key(&self) -> [Float; 4] {
        [self.start.x, self.start.y, self.end.x, self.end.y]
    }

    /// Returns the point where `self` and `other` cross, endpoints included.
    ///
    /// Parallel, collinear (even overlapping) and zero-length segments never intersect.
    /// The result doesn't depend on the order of the operands: the computation
    /// is always carried out from the same one.
    #[must_use]
    pub fn intersection(&self, other: &Segment) -> Option<Point> {
        let ord = self
            .key()
            .iter()
            .zip(other.key().iter())
            .map(|(a, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal);

        let (a, b) = if ord.is_gt() { (other, self) } else { (self, other) };

        let r = a.end - a.start;
        let s = b.end - b.start;
        let denom = cross(&r, &s);

        if denom.abs() <= Float::EPSILON * r.norm() * s.norm() {
            return None;
        }

        let qp = b.start - a.start;
        let t = cross(&qp, &s) / denom;
        let u = cross(&qp, &r) / denom;

        const E: Float = EPSILON;
        ((-E..=1.0 + E).contains(&t) && (-E..=1.0 + E).contains(&u)).then(|| a.start + r * t)
    }
}

impl Reflect for Segment {
    #[inline]
    fn reflect_across(&mut self, line: &Line) {
        (&mut self.start, &mut self.end).reflect_across(line);
    }
}

#[inline]
fn cross(a: &Point, b: &Point) -> Float {
    a.x * b.y - a.y * b.x
}

/// Arithmetic mean of `points`.
///
/// This is the vertex average, not the area centroid: the two only agree for
/// regular (or otherwise symmetric) polygons. Returns the origin for an empty slice.
#[inline]
#[must_use]
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::zeros();
    }
    points.iter().sum::<Point>() / points.len() as Float
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn close(a: &Point, b: &Point) -> bool {
        (a - b).norm() < EPSILON
    }

    #[test]
    fn reflection_is_an_involution() {
        let mut rng = rand::thread_rng();

        for _ in 0..1000 {
            let mut coord = || rng.gen_range(-500.0..500.0);
            let p = Point::new(coord(), coord());
            let Some(line) = Line::try_new([coord(), coord()], [coord(), coord()]) else {
                continue;
            };

            let back = line.reflect(&line.reflect(&p));
            assert!((back - p).norm() < EPSILON * 1000.0, "{p} came back as {back}");
        }
    }

    #[test]
    fn points_on_the_axis_are_fixed() {
        let line = Line::try_new([0., 0.], [2., 1.]).unwrap();

        for t in [-3.0, 0.0, 0.5, 7.25] {
            let p = Point::new(2.0 * t, t);
            assert!(close(&line.reflect(&p), &p));
        }
    }

    #[test]
    fn reflect_across_vertical_line() {
        let line = Line::from_unit_dir([200., 0.], Point::y_axis());
        assert!(close(&line.reflect(&Point::new(150., 100.)), &Point::new(250., 100.)));
        assert!((line.distance_to(&Point::new(150., 3.)) - 50.).abs() < EPSILON);
    }

    #[test]
    fn degenerate_line() {
        assert!(Line::try_new([1., 1.], [1., 1.]).is_none());
    }

    #[test]
    fn tuples_and_segments_reflect_componentwise() {
        let line = Line::from_unit_dir([0., 10.], Point::x_axis());
        let mut seg = Segment::new([0., 0.], [5., 4.]);
        seg.reflect_across(&line);
        assert!(close(&seg.start, &Point::new(0., 20.)));
        assert!(close(&seg.end, &Point::new(5., 16.)));

        let mut pair = (Point::new(1., 11.), vec![Point::new(2., 9.)]);
        pair.reflect_across(&line);
        assert!(close(&pair.0, &Point::new(1., 9.)));
        assert!(close(&pair.1[0], &Point::new(2., 11.)));
    }

    #[test]
    fn crossing_segments() {
        let a = Segment::new([0., 0.], [10., 10.]);
        let b = Segment::new([0., 10.], [10., 0.]);
        let p = a.intersection(&b).unwrap();
        assert!(close(&p, &Point::new(5., 5.)));
    }

    #[test]
    fn intersection_is_order_independent() {
        let mut rng = rand::thread_rng();

        for _ in 0..500 {
            let mut coord = || rng.gen_range(-100.0..100.0);
            let a = Segment::new([coord(), coord()], [coord(), coord()]);
            let b = Segment::new([coord(), coord()], [coord(), coord()]);
            assert_eq!(a.intersection(&b), b.intersection(&a));
        }
    }

    #[test]
    fn touching_endpoints_count() {
        let a = Segment::new([0., 0.], [10., 0.]);
        let b = Segment::new([10., -5.], [10., 5.]);
        assert!(close(&a.intersection(&b).unwrap(), &Point::new(10., 0.)));
    }

    #[test]
    fn disjoint_parallel_and_degenerate_segments() {
        let a = Segment::new([0., 0.], [10., 0.]);

        assert_eq!(a.intersection(&Segment::new([0., 1.], [10., 1.])), None);
        // overlapping collinear segments are treated as not intersecting
        assert_eq!(a.intersection(&Segment::new([5., 0.], [15., 0.])), None);
        assert_eq!(a.intersection(&Segment::new([20., -1.], [20., 1.])), None);
        assert_eq!(a.intersection(&Segment::new([5., 0.], [5., 0.])), None);
    }

    #[test]
    fn vertex_average() {
        let c = centroid(&[
            Point::new(0., 0.),
            Point::new(4., 0.),
            Point::new(4., 4.),
            Point::new(0., 4.),
        ]);
        assert!(close(&c, &Point::new(2., 2.)));
        assert_eq!(centroid(&[]), Point::zeros());
    }
}
