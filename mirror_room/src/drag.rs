use super::*;

/// An ongoing drag of a source body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragSession {
    pub node: NodeId,
    /// Pointer position minus the body's anchor, when the drag started.
    pub offset: Point,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

impl DragState {
    #[inline]
    #[must_use]
    pub const fn session(&self) -> Option<&DragSession> {
        match self {
            Self::Dragging(s) => Some(s),
            Self::Idle => None,
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging(_))
    }

    /// Records the offset between `pointer` and `anchor`, so the body
    /// doesn't jump to the pointer on the first move.
    pub fn begin(&mut self, node: NodeId, pointer: Point, anchor: Point) {
        *self = Self::Dragging(DragSession {
            node,
            offset: pointer - anchor,
        });
    }

    /// The body being dragged, and where its anchor should go for this pointer position.
    #[must_use]
    pub fn target(&self, pointer: Point) -> Option<(NodeId, Point)> {
        self.session().map(|s| (s.node, pointer - s.offset))
    }

    pub fn end(&mut self) -> Option<DragSession> {
        match core::mem::take(self) {
            Self::Dragging(s) => Some(s),
            Self::Idle => None,
        }
    }
}

/// Clamps `v` to `lo..=hi`. An empty range pins `v` to its middle.
///
/// NaN bounds are ignored, never a panic.
#[inline]
#[must_use]
pub fn clamp_axis(v: Float, lo: Float, hi: Float) -> Float {
    if lo > hi {
        (lo + hi) / 2.
    } else {
        v.max(lo).min(hi)
    }
}

/// The position closest to `anchor` at which a body, whose bounding box has
/// `extent` relative to its anchor (see [`Shape::extent`]), fits entirely in `bounds`.
///
/// On an axis where the body is larger than the room, it is centered on that axis.
#[must_use]
pub fn clamp_anchor(anchor: Point, (min, max): (Point, Point), bounds: &RoomBounds) -> Point {
    let (lo, hi) = (bounds.min() - min, bounds.max() - max);
    Point::new(
        clamp_axis(anchor.x, lo.x, hi.x),
        clamp_axis(anchor.y, lo.y, hi.y),
    )
}
