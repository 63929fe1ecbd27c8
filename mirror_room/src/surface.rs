use super::*;

/// A rectangle in device (screen) coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScreenRect {
    pub left: Float,
    pub top: Float,
    pub width: Float,
    pub height: Float,
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct BBox {
    pub width: Float,
    pub height: Float,
}

/// A retained vector drawing surface (e. g. an SVG element).
///
/// Elements are identified by handles, and tagged with an `id` attribute
/// that predicates passed to [`Self::query`] and [`Self::remove_shapes`] match against.
pub trait RenderSurface {
    type Handle: Clone + Eq + Hash + Debug;

    fn create_shape(&mut self, kind: ElementKind, attributes: &[(&str, String)]) -> Self::Handle;

    fn set_attribute(&mut self, handle: &Self::Handle, name: &str, value: &str);

    fn attribute(&self, handle: &Self::Handle, name: &str) -> Option<&str>;

    fn remove_all_children(&mut self);

    /// Where the surface is, in device coordinates.
    fn bounding_rect(&self) -> ScreenRect;

    fn shape_bbox(&self, handle: &Self::Handle) -> BBox;

    /// The first element whose id matches `predicate`.
    fn query(&self, predicate: &dyn Fn(&str) -> bool) -> Option<Self::Handle>;

    /// Removes every element whose id matches `predicate`.
    fn remove_shapes(&mut self, predicate: &dyn Fn(&str) -> bool);

    /// Reads a numeric attribute. Missing or unparseable values read as zero.
    fn numeric_attribute(&self, handle: &Self::Handle, name: &str) -> Float {
        self.attribute(handle, name)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0.)
    }

    /// Translates device coordinates to surface-local ones.
    fn to_local(&self, client: Point) -> Point {
        let rect = self.bounding_rect();
        client - Point::new(rect.left, rect.top)
    }

    /// Sets every attribute in `attributes`.
    fn set_attributes(&mut self, handle: &Self::Handle, attributes: &[(&str, String)]) {
        for (name, value) in attributes {
            self.set_attribute(handle, name, value);
        }
    }
}

impl<S: RenderSurface + ?Sized> RenderSurface for &mut S {
    type Handle = S::Handle;

    fn create_shape(&mut self, kind: ElementKind, attributes: &[(&str, String)]) -> Self::Handle {
        (**self).create_shape(kind, attributes)
    }

    fn set_attribute(&mut self, handle: &Self::Handle, name: &str, value: &str) {
        (**self).set_attribute(handle, name, value);
    }

    fn attribute(&self, handle: &Self::Handle, name: &str) -> Option<&str> {
        (**self).attribute(handle, name)
    }

    fn remove_all_children(&mut self) {
        (**self).remove_all_children();
    }

    fn bounding_rect(&self) -> ScreenRect {
        (**self).bounding_rect()
    }

    fn shape_bbox(&self, handle: &Self::Handle) -> BBox {
        (**self).shape_bbox(handle)
    }

    fn query(&self, predicate: &dyn Fn(&str) -> bool) -> Option<Self::Handle> {
        (**self).query(predicate)
    }

    fn remove_shapes(&mut self, predicate: &dyn Fn(&str) -> bool) {
        (**self).remove_shapes(predicate);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Down,
    Move,
    Up,
}

/// A pointer event, as delivered by the input source.
#[derive(Clone, Debug, PartialEq)]
pub struct PointerEvent<H> {
    pub kind: PointerEventKind,
    /// The element under the pointer, if any.
    pub target: Option<H>,
    /// Device coordinates.
    pub client: Point,
}

impl<H> PointerEvent<H> {
    #[inline]
    #[must_use]
    pub fn down(target: Option<H>, client: impl Into<Point>) -> Self {
        Self {
            kind: PointerEventKind::Down,
            target,
            client: client.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn moved(client: impl Into<Point>) -> Self {
        Self {
            kind: PointerEventKind::Move,
            target: None,
            client: client.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn up(client: impl Into<Point>) -> Self {
        Self {
            kind: PointerEventKind::Up,
            target: None,
            client: client.into(),
        }
    }
}
