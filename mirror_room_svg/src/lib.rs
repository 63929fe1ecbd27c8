use core::fmt;
use std::{collections::BTreeMap, io};

use mirror_room::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(usize);

/// A shape in an [`SvgSurface`]. Attributes keep their insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    kind: ElementKind,
    attributes: Vec<(String, String)>,
}

impl Element {
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find_map(|(n, v)| (n == name).then_some(v.as_str()))
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    fn set(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => value.clone_into(v),
            None => self.attributes.push((name.into(), value.into())),
        }
    }
}

/// Every number found in `s`, skipping everything else (path commands, separators).
fn numbers(s: &str) -> impl Iterator<Item = Float> + '_ {
    s.split(|c: char| c == ',' || c.is_whitespace())
        .filter_map(|t| t.parse().ok())
}

fn bbox_of(points: impl IntoIterator<Item = Point>) -> BBox {
    let mut points = points.into_iter();
    let Some(first) = points.next() else {
        return BBox::default();
    };

    let (min, max) = points.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p)));
    let size = max - min;
    BBox {
        width: size.x,
        height: size.y,
    }
}

/// An in-memory SVG document, drawn in creation order.
///
/// Handles are never reused, so handles to removed elements stay dangling
/// (reads return nothing, writes are ignored).
#[derive(Clone, Debug, PartialEq)]
pub struct SvgSurface {
    rect: ScreenRect,
    elements: BTreeMap<usize, Element>,
    next_id: usize,
}

impl SvgSurface {
    #[must_use]
    pub fn new(width: Float, height: Float) -> Self {
        Self {
            rect: ScreenRect {
                left: 0.,
                top: 0.,
                width,
                height,
            },
            elements: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Places the surface at (`left`, `top`) in device coordinates.
    #[inline]
    #[must_use]
    pub fn with_offset(mut self, left: Float, top: Float) -> Self {
        self.rect.left = left;
        self.rect.top = top;
        self
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, handle: &ElementHandle) -> Option<&Element> {
        self.elements.get(&handle.0)
    }

    /// All elements, in drawing order.
    pub fn elements(&self) -> impl Iterator<Item = (ElementHandle, &Element)> {
        self.elements.iter().map(|(&i, e)| (ElementHandle(i), e))
    }

    /// All elements whose id starts with `prefix`.
    pub fn with_id_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (ElementHandle, &'a Element)> + 'a {
        self.elements()
            .filter(move |(_, e)| e.id().is_some_and(|id| id.starts_with(prefix)))
    }

    pub fn write_svg(&self, mut writer: impl io::Write) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for SvgSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ScreenRect { width, height, .. } = self.rect;

        writeln!(
            f,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        )?;

        for element in self.elements.values() {
            write!(f, "  <{}", element.kind.tag())?;
            for (name, value) in element.attributes() {
                write!(f, r#" {name}="{}""#, escape(value))?;
            }
            writeln!(f, "/>")?;
        }

        writeln!(f, "</svg>")
    }
}

impl RenderSurface for SvgSurface {
    type Handle = ElementHandle;

    fn create_shape(&mut self, kind: ElementKind, attributes: &[(&str, String)]) -> ElementHandle {
        let mut element = Element {
            kind,
            attributes: Vec::with_capacity(attributes.len()),
        };
        for (name, value) in attributes {
            element.set(name, value);
        }

        let id = self.next_id;
        self.next_id += 1;
        self.elements.insert(id, element);
        ElementHandle(id)
    }

    fn set_attribute(&mut self, handle: &ElementHandle, name: &str, value: &str) {
        match self.elements.get_mut(&handle.0) {
            Some(element) => element.set(name, value),
            None => log::trace!("ignoring write to removed element {handle:?}"),
        }
    }

    fn attribute(&self, handle: &ElementHandle, name: &str) -> Option<&str> {
        self.get(handle)?.attribute(name)
    }

    fn remove_all_children(&mut self) {
        self.elements.clear();
    }

    fn bounding_rect(&self) -> ScreenRect {
        self.rect
    }

    fn shape_bbox(&self, handle: &ElementHandle) -> BBox {
        let Some(element) = self.get(handle) else {
            return BBox::default();
        };

        match element.kind {
            ElementKind::Circle => {
                let d = self.numeric_attribute(handle, "r").abs() * 2.;
                BBox {
                    width: d,
                    height: d,
                }
            }
            ElementKind::Polygon | ElementKind::Path => {
                let list = element
                    .attribute(if element.kind == ElementKind::Path { "d" } else { "points" })
                    .unwrap_or_default();
                let coords: Vec<_> = numbers(list).collect();
                bbox_of(coords.chunks_exact(2).map(|c| Point::new(c[0], c[1])))
            }
        }
    }

    fn query(&self, predicate: &dyn Fn(&str) -> bool) -> Option<ElementHandle> {
        self.elements()
            .find(|(_, e)| e.id().is_some_and(predicate))
            .map(|(h, _)| h)
    }

    fn remove_shapes(&mut self, predicate: &dyn Fn(&str) -> bool) {
        self.elements.retain(|_, e| !e.id().is_some_and(predicate));
    }
}
