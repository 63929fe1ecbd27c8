use std::collections::VecDeque;

use super::*;

/// Images are never built past this many successive reflections: with four mirrors,
/// a single source already has 1456 images at this order.
pub const MAX_IMAGE_ORDER: usize = 6;

/// Index of a body (source or image) in an [`ImageGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Where a body comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Origin {
    /// A real body, created from the configuration.
    Source { id: String, draggable: bool },
    /// The reflection of `parent` across the mirror at index `mirror`.
    Image { parent: NodeId, mirror: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub geometry: Geometry,
    pub style: Style,
    origin: Origin,
    /// Keyed by mirror index, in creation order.
    children: Vec<(usize, NodeId)>,
}

impl Node {
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> &Origin {
        &self.origin
    }

    #[inline]
    #[must_use]
    pub const fn is_image(&self) -> bool {
        matches!(self.origin, Origin::Image { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_draggable(&self) -> bool {
        matches!(self.origin, Origin::Source { draggable: true, .. })
    }

    /// The index of the mirror this image was reflected across, `None` for sources.
    #[inline]
    #[must_use]
    pub const fn mirror(&self) -> Option<usize> {
        match self.origin {
            Origin::Image { mirror, .. } => Some(mirror),
            Origin::Source { .. } => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[(usize, NodeId)] {
        &self.children
    }
}

/// The ownership graph of sources and their virtual images.
///
/// Every image is owned by exactly one parent and indexed by `(parent, mirror index)`.
/// An image is never reflected back across the mirror that produced it,
/// so the graph is a forest.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImageGraph {
    nodes: Vec<Node>,
    sources: HashMap<String, NodeId>,
}

impl ImageGraph {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.sources.clear();
    }

    /// Total number of bodies, sources included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn image_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_image()).count()
    }

    /// Registers a new source. Ids are expected to be unique: registering an id
    /// twice makes [`Self::source`] return the latest one.
    pub fn add_source(
        &mut self,
        id: impl Into<String>,
        geometry: Geometry,
        style: Style,
        draggable: bool,
    ) -> NodeId {
        let id = id.into();
        let node = self.push(Node {
            geometry,
            style,
            origin: Origin::Source {
                id: id.clone(),
                draggable,
            },
            children: Vec::new(),
        });
        self.sources.insert(id, node);
        node
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    #[inline]
    #[must_use]
    pub fn source(&self, id: &str) -> Option<NodeId> {
        self.sources.get(id).copied()
    }

    /// All sources, in registration order.
    pub fn sources(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| !n.is_image())
            .map(|(i, _)| NodeId(i))
    }

    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    #[inline]
    #[must_use]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    /// The image of `parent` across the mirror at index `mirror`, if any.
    #[must_use]
    pub fn child(&self, parent: NodeId, mirror: usize) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .find_map(|&(m, c)| (m == mirror).then_some(c))
    }

    /// Follows a chain of mirror indices down from `node`.
    #[must_use]
    pub fn descend(&self, node: NodeId, path: &[usize]) -> Option<NodeId> {
        path.iter()
            .try_fold(node, |n, &mirror| self.child(n, mirror))
    }

    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        match self.node(node).origin {
            Origin::Image { parent, .. } => Some(parent),
            Origin::Source { .. } => None,
        }
    }

    /// The source `node` was ultimately reflected from (`node` itself for sources).
    #[must_use]
    pub fn root(&self, mut node: NodeId) -> NodeId {
        while let Some(parent) = self.parent(node) {
            node = parent;
        }
        node
    }

    /// The id of the source `node` was ultimately reflected from.
    #[must_use]
    pub fn root_id(&self, node: NodeId) -> &str {
        match &self.node(self.root(node)).origin {
            Origin::Source { id, .. } => id,
            Origin::Image { .. } => unreachable!("roots are sources"),
        }
    }

    /// The mirror indices leading from `node`'s source to `node`.
    #[must_use]
    pub fn path(&self, mut node: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        while let Origin::Image { parent, mirror } = self.node(node).origin {
            path.push(mirror);
            node = parent;
        }
        path.reverse();
        path
    }

    /// The number of reflections that produced `node`.
    #[inline]
    #[must_use]
    pub fn order(&self, node: NodeId) -> usize {
        self.path(node).len()
    }

    /// A display id for `node`: the source id, followed, for images, by the
    /// mirror indices that produced it (e. g. `ball-reflection01`).
    #[must_use]
    pub fn element_id(&self, node: NodeId) -> String {
        let root = self.root_id(node);
        let path = self.path(node);

        if path.is_empty() {
            root.into()
        } else {
            let suffix: String = path.iter().map(ToString::to_string).collect();
            format!("{root}-reflection{suffix}")
        }
    }

    /// Every image owned, directly or not, by `node`, parents before children.
    #[must_use]
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([node]);

        while let Some(n) = queue.pop_front() {
            for &(_, child) in &self.node(n).children {
                out.push(child);
                queue.push_back(child);
            }
        }
        out
    }

    /// Creates the images of `source` across `mirrors`, up to `max_order` reflections.
    ///
    /// Each image is reflected again across every mirror except the one that
    /// produced it. Returns the new images, parents before children.
    ///
    /// `max_order` is capped to [`MAX_IMAGE_ORDER`].
    pub fn build_images(&mut self, source: NodeId, mirrors: &[Line], max_order: usize) -> Vec<NodeId> {
        let max_order = if max_order > MAX_IMAGE_ORDER {
            log::warn!("image order {max_order} is too high, capping it to {MAX_IMAGE_ORDER}");
            MAX_IMAGE_ORDER
        } else {
            max_order
        };

        let style = self.node(source).style.lightened();

        let mut created = Vec::new();
        let mut queue = VecDeque::from([(source, None, 0)]);

        while let Some((parent, excluded, order)) = queue.pop_front() {
            if order >= max_order {
                continue;
            }

            for (i, line) in mirrors.iter().enumerate() {
                if excluded == Some(i) || self.child(parent, i).is_some() {
                    continue;
                }

                let image = self.push(Node {
                    geometry: reflected(&self.node(parent).geometry, line),
                    style: style.clone(),
                    origin: Origin::Image { parent, mirror: i },
                    children: Vec::new(),
                });
                self.node_mut(parent).children.push((i, image));

                created.push(image);
                queue.push_back((image, Some(i), order + 1));
            }
        }

        created
    }

    /// Recomputes, in place, every image owned by `source` from its current geometry.
    ///
    /// Parents are always updated before their children. Returns the updated images,
    /// in update order.
    pub fn propagate(&mut self, source: NodeId, mirrors: &[Line]) -> Vec<NodeId> {
        let order = self.descendants(source);

        for &image in &order {
            let Origin::Image { parent, mirror } = self.node(image).origin else {
                continue;
            };

            let Some(line) = mirrors.get(mirror) else {
                log::warn!("image {image:?} refers to missing mirror {mirror}");
                continue;
            };

            let geometry = reflected(&self.node(parent).geometry, line);
            self.node_mut(image).geometry = geometry;
        }

        order
    }
}
