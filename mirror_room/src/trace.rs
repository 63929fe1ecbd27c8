use super::*;

/// The most waypoints a [`LightPath`] can have: source, bounce, exit, observer.
pub const MAX_WAYPOINTS: usize = 4;

/// A plausible path followed by light from a source to the observer, as seen
/// through one of the source's images.
///
/// This is a single bounce heuristic, built from the sightline between the observer
/// and the image, not a general billiard path solver.
#[derive(Clone, Debug, PartialEq)]
pub struct LightPath {
    /// The wall the sightline leaves the room through.
    pub exit_wall: Wall,
    pub exit_point: Point,
    /// The wall crossing one room away from `exit_point`, folded back into the room.
    pub bounce: Option<Point>,
    waypoints: ArrayVec<Point, MAX_WAYPOINTS>,
}

impl LightPath {
    /// Source, bounce (if any), exit point, observer.
    #[inline]
    #[must_use]
    pub fn waypoints(&self) -> &[Point] {
        &self.waypoints
    }

    /// The consecutive pairs of waypoints.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.waypoints
            .windows(2)
            .map(|w| Segment::new(w[0], w[1]))
    }
}

/// The crossing between `sightline` and `segments` closest to `observer`.
fn closest_crossing<'a, T: 'a>(
    sightline: &Segment,
    segments: impl IntoIterator<Item = (T, &'a Segment)>,
    observer: &Point,
) -> Option<(T, Point)> {
    segments
        .into_iter()
        .filter_map(|(tag, s)| sightline.intersection(s).map(|p| (tag, p)))
        .min_by(|(_, a), (_, b)| {
            (a - observer)
                .norm_squared()
                .total_cmp(&(b - observer).norm_squared())
        })
}

/// Traces light from `source`, whose image is seen at `image`, to `observer`.
///
/// The sightline from `image` to `observer` leaves the room through the exit wall.
/// If it also crosses the secondary ring, that crossing, folded back across the exit
/// wall, is where the light bounced before reaching the exit point.
///
/// Returns `None` (nothing should be drawn) when the sightline doesn't cross any wall,
/// which includes the degenerate cases where `observer` coincides with `image` or `source`.
#[must_use]
pub fn trace(room: &Room, source: Point, image: Point, observer: Point) -> Option<LightPath> {
    if (observer - source).norm() < EPSILON {
        log::debug!("observer coincides with the source, no path to trace");
        return None;
    }

    let sightline = Segment::new(image, observer);

    let (exit_wall, exit_point) = closest_crossing(
        &sightline,
        Wall::ALL.into_iter().zip(room.walls()),
        &observer,
    )?;

    let bounce = closest_crossing(
        &sightline,
        room.secondary_ring().iter().map(|s| ((), s)),
        &observer,
    )
    .map(|((), p)| exit_wall.line(room.bounds()).reflect(&p));

    let mut waypoints = ArrayVec::new();
    waypoints.push(source);
    waypoints.extend(bounce);
    waypoints.push(exit_point);
    waypoints.push(observer);

    Some(LightPath {
        exit_wall,
        exit_point,
        bounce,
        waypoints,
    })
}
