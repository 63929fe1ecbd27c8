use super::*;

/// The axis-aligned rectangle bodies are confined to, and whose edges hold the mirrors.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomBounds {
    pub x: Float,
    pub y: Float,
    pub width: Float,
    pub height: Float,
}

impl RoomBounds {
    #[inline]
    #[must_use]
    pub const fn new(x: Float, y: Float, width: Float, height: Float) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether `width` and `height` are finite and positive.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.
            && self.height > 0.
    }

    #[inline]
    #[must_use]
    pub fn min(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    #[must_use]
    pub fn max(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Point {
        (self.min() + self.max()) / 2.
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        let (min, max) = (self.min(), self.max());
        (min.x..=max.x).contains(&p.x) && (min.y..=max.y).contains(&p.y)
    }
}

/// Which edges of the room are mirrors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum MirrorPlacement {
    TopBottom,
    LeftRight,
    All,
}

impl MirrorPlacement {
    /// The mirrored walls, in mirror index order.
    #[must_use]
    pub fn walls(self) -> &'static [Wall] {
        match self {
            Self::TopBottom => &[Wall::Top, Wall::Bottom],
            Self::LeftRight => &[Wall::Left, Wall::Right],
            Self::All => &[Wall::Top, Wall::Bottom, Wall::Left, Wall::Right],
        }
    }
}

/// An edge of the room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Wall {
    Top,
    Right,
    Bottom,
    Left,
}

impl Wall {
    /// Clockwise, starting from the top (y grows downwards).
    pub const ALL: [Wall; 4] = [Wall::Top, Wall::Right, Wall::Bottom, Wall::Left];

    #[must_use]
    pub fn segment(self, bounds: &RoomBounds) -> Segment {
        let (min, max) = (bounds.min(), bounds.max());
        match self {
            Wall::Top => Segment::new(min, [max.x, min.y]),
            Wall::Right => Segment::new([max.x, min.y], max),
            Wall::Bottom => Segment::new(max, [min.x, max.y]),
            Wall::Left => Segment::new([min.x, max.y], min),
        }
    }

    /// The infinite line containing this wall. Never fails, even for degenerate bounds.
    #[must_use]
    pub fn line(self, bounds: &RoomBounds) -> Line {
        match self {
            Wall::Top => Line::from_unit_dir(bounds.min(), Point::x_axis()),
            Wall::Bottom => Line::from_unit_dir([bounds.x, bounds.y + bounds.height], Point::x_axis()),
            Wall::Left => Line::from_unit_dir(bounds.min(), Point::y_axis()),
            Wall::Right => Line::from_unit_dir([bounds.x + bounds.width, bounds.y], Point::y_axis()),
        }
    }
}

/// The room: its walls, its mirrors, and the walls of the rooms seen through them.
#[derive(Clone, Debug, PartialEq)]
pub struct Room {
    bounds: RoomBounds,
    placement: Option<MirrorPlacement>,
    mirror_walls: Vec<Wall>,
    mirrors: Vec<Line>,
    walls: [Segment; 4],
    secondary: Vec<Segment>,
}

impl Room {
    #[must_use]
    pub fn new(bounds: RoomBounds, placement: Option<MirrorPlacement>) -> Self {
        let mut room = Self {
            bounds,
            placement,
            mirror_walls: Vec::new(),
            mirrors: Vec::new(),
            walls: Wall::ALL.map(|w| w.segment(&bounds)),
            secondary: Vec::new(),
        };
        room.derive();
        room
    }

    fn derive(&mut self) {
        let bounds = &self.bounds;

        self.walls = Wall::ALL.map(|w| w.segment(bounds));

        self.mirror_walls = self
            .placement
            .map(MirrorPlacement::walls)
            .unwrap_or_default()
            .to_vec();

        self.mirrors = self.mirror_walls.iter().map(|w| w.line(bounds)).collect();

        // the room reflected across each mirror, minus the wall it shares with this one
        self.secondary = self
            .mirror_walls
            .iter()
            .zip(&self.mirrors)
            .flat_map(|(mirror, line)| {
                Wall::ALL
                    .into_iter()
                    .filter(move |w| w != mirror)
                    .map(move |w| reflected(&w.segment(bounds), line))
            })
            .collect();
    }

    /// Replaces the bounds, re-deriving mirrors, walls and the secondary ring.
    ///
    /// Mirror indices are kept, since the placement doesn't change.
    pub fn set_bounds(&mut self, bounds: RoomBounds) {
        self.bounds = bounds;
        self.derive();
    }

    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> &RoomBounds {
        &self.bounds
    }

    #[inline]
    #[must_use]
    pub fn mirror_count(&self) -> usize {
        self.mirrors.len()
    }

    #[inline]
    #[must_use]
    pub fn mirror(&self, index: usize) -> Option<&Line> {
        self.mirrors.get(index)
    }

    /// The active mirror lines. Their position in this list is their mirror index.
    #[inline]
    #[must_use]
    pub fn mirror_lines(&self) -> &[Line] {
        &self.mirrors
    }

    /// The walls holding the active mirrors, in mirror index order.
    #[inline]
    #[must_use]
    pub fn mirror_walls(&self) -> &[Wall] {
        &self.mirror_walls
    }

    /// The four room boundary segments, in [`Wall::ALL`] order.
    #[inline]
    #[must_use]
    pub const fn walls(&self) -> &[Segment; 4] {
        &self.walls
    }

    /// The walls of the rooms adjacent to this one through each mirror,
    /// excluding the walls they share with it.
    #[inline]
    #[must_use]
    pub fn secondary_ring(&self) -> &[Segment] {
        &self.secondary
    }
}
