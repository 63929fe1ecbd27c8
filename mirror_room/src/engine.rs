use core::iter;

use super::*;

/// Default number of successive reflections images are built with.
pub const DEFAULT_IMAGE_ORDER: usize = 2;

/// Ids of the room decorations start with this.
pub const ROOM_ID_PREFIX: &str = "room-";
pub const OBSERVER_ID: &str = "observer";
/// Ids of the drawn light path segments start with this.
pub const PATH_ID_PREFIX: &str = "light-path-";

/// Whether `id` belongs to the elements the engine draws by itself.
/// Such ids can't be used by sources.
#[must_use]
pub fn is_reserved_id(id: &str) -> bool {
    id == OBSERVER_ID || id.starts_with(ROOM_ID_PREFIX) || id.starts_with(PATH_ID_PREFIX)
}

pub const WALL_COLOR: &str = "#444444";
pub const MIRROR_COLOR: &str = "#5555ff";
pub const PATH_COLOR: &str = "#f8b430";

/// A source body, as provided by the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeConfig {
    pub id: String,
    pub geometry: Geometry,
    pub style: Style,
    pub draggable: bool,
}

impl ShapeConfig {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>, geometry: impl Into<Geometry>) -> Self {
        Self {
            id: id.into(),
            geometry: geometry.into(),
            style: Style::default(),
            draggable: true,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    pub shapes: Vec<ShapeConfig>,
    pub bounds: RoomBounds,
    /// `None` disables mirrors, and thus images.
    pub mirror_location: Option<MirrorPlacement>,
    /// Where light paths end. Defaults to the center of the room.
    pub observer: Option<Point>,
    /// How many successive reflections images are built with.
    pub image_order: usize,
    /// Pause between two segments of a revealed light path.
    pub reveal_delay: Duration,
}

impl EngineConfig {
    #[must_use]
    pub fn new(bounds: RoomBounds) -> Self {
        Self {
            shapes: Vec::new(),
            bounds,
            mirror_location: None,
            observer: None,
            image_order: DEFAULT_IMAGE_ORDER,
            reveal_delay: DEFAULT_REVEAL_DELAY,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_shapes(mut self, shapes: impl IntoIterator<Item = ShapeConfig>) -> Self {
        self.shapes.extend(shapes);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_mirrors(mut self, placement: MirrorPlacement) -> Self {
        self.mirror_location = Some(placement);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_observer(mut self, observer: impl Into<Point>) -> Self {
        self.observer = Some(observer.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }
}

/// The `d` attribute of a path drawing `segment`.
#[must_use]
pub fn segment_path(segment: &Segment) -> String {
    let Segment { start, end } = segment;
    format!("M {} {} L {} {}", start.x, start.y, end.x, end.y)
}

/// Draws a room, its bodies and their images on a [`RenderSurface`], and
/// reacts to pointer events: dragging sources, and tracing light paths from images.
///
/// All state (drag session, image graph) is owned here, so independent engines
/// can share a thread. Pointer events must be delivered one at a time.
pub struct Engine<S: RenderSurface> {
    surface: S,
    room: Room,
    graph: ImageGraph,
    elements: HashMap<NodeId, S::Handle>,
    bodies: HashMap<S::Handle, NodeId>,
    /// Walls, mirrors, then the observer.
    decorations: Vec<S::Handle>,
    drag: DragState,
    observer: Option<Point>,
    image_order: usize,
    reveal: RevealScheduler,
    path: Option<LightPath>,
}

impl<S: RenderSurface> Engine<S> {
    pub fn new(surface: S, config: EngineConfig) -> Self {
        let EngineConfig {
            shapes,
            bounds,
            mirror_location,
            observer,
            image_order,
            reveal_delay,
        } = config;

        let mut engine = Self {
            surface,
            room: Room::new(bounds, mirror_location),
            graph: ImageGraph::new(),
            elements: HashMap::new(),
            bodies: HashMap::new(),
            decorations: Vec::new(),
            drag: DragState::Idle,
            observer,
            image_order,
            reveal: RevealScheduler::new(reveal_delay),
            path: None,
        };

        engine.update_shapes(shapes);
        engine
    }

    /// Clears the surface, and rebuilds everything from `shapes`.
    pub fn update_shapes(&mut self, shapes: impl IntoIterator<Item = ShapeConfig>) {
        self.surface.remove_all_children();
        self.graph.clear();
        self.elements.clear();
        self.bodies.clear();
        self.drag = DragState::Idle;
        self.reveal.cancel();
        self.path = None;

        self.draw_room();

        for shape in shapes {
            self.add_shape(shape);
        }

        log::debug!(
            "initialized {} bodies ({} images) with {} mirrors",
            self.graph.len(),
            self.graph.image_count(),
            self.room.mirror_count(),
        );
    }

    /// Swaps the room's bounds.
    ///
    /// Mirrors, walls and the secondary ring are re-derived, sources are pushed
    /// back inside the new bounds, and every image is recomputed.
    /// Invalid bounds (see [`RoomBounds::is_valid`]) are ignored.
    pub fn update_bounds(&mut self, bounds: RoomBounds) {
        if !bounds.is_valid() {
            log::warn!("ignoring invalid room bounds {bounds:?}");
            return;
        }

        self.room.set_bounds(bounds);
        self.clear_path();

        // decorations are updated in place, to stay under the bodies
        let decorations = self.room_decorations();
        for (handle, (_, attributes)) in self.decorations.iter().zip(&decorations) {
            self.surface.set_attributes(handle, attributes);
        }

        let sources: Vec<_> = self.graph.sources().collect();
        for source in sources {
            let anchor = self.graph.node(source).geometry.anchor();
            self.place(source, anchor);
        }

        log::debug!("room bounds changed to {bounds:?}");
    }

    fn add_shape(&mut self, shape: ShapeConfig) {
        let ShapeConfig {
            id,
            geometry,
            style,
            draggable,
        } = shape;

        if self.graph.source(&id).is_some() {
            log::warn!("duplicate shape id `{id}`, ignoring");
            return;
        }

        if is_reserved_id(&id) {
            log::warn!("shape id `{id}` is reserved, ignoring");
            return;
        }

        let source = self.graph.add_source(id, geometry, style, draggable);
        let images = self
            .graph
            .build_images(source, self.room.mirror_lines(), self.image_order);

        // images first, so that sources are drawn over them
        for node in images.into_iter().chain(iter::once(source)) {
            self.draw_node(node);
        }
    }

    /// Kinds and attributes of the walls, the mirrors and the observer marker.
    fn room_decorations(&self) -> Vec<(ElementKind, Vec<(&'static str, String)>)> {
        let bounds = self.room.bounds();

        let walls = Wall::ALL.into_iter().zip(self.room.walls()).map(|(wall, segment)| {
            vec![
                ("id", format!("{ROOM_ID_PREFIX}wall-{wall:?}").to_lowercase()),
                ("d", segment_path(segment)),
                ("fill", "none".into()),
                ("stroke", WALL_COLOR.into()),
                ("stroke-width", "1".into()),
            ]
        });

        let mirrors = self.room.mirror_walls().iter().enumerate().map(|(i, wall)| {
            vec![
                ("id", format!("{ROOM_ID_PREFIX}mirror-{i}")),
                ("d", segment_path(&wall.segment(bounds))),
                ("fill", "none".into()),
                ("stroke", MIRROR_COLOR.into()),
                ("stroke-width", "4".into()),
                ("opacity", "0.5".into()),
            ]
        });

        let observer = self.observer();
        let marker = vec![
            ("id", OBSERVER_ID.into()),
            ("cx", observer.x.to_string()),
            ("cy", observer.y.to_string()),
            ("r", "4".into()),
            ("fill", "#000000".into()),
        ];

        walls
            .chain(mirrors)
            .map(|attributes| (ElementKind::Path, attributes))
            .chain(iter::once((ElementKind::Circle, marker)))
            .collect()
    }

    fn draw_room(&mut self) {
        let decorations = self.room_decorations();
        self.decorations = decorations
            .iter()
            .map(|(kind, attributes)| self.surface.create_shape(*kind, attributes))
            .collect();
    }

    fn draw_node(&mut self, node: NodeId) {
        let n = self.graph.node(node);

        let mut attributes = vec![("id", self.graph.element_id(node))];
        attributes.extend(geometry_attributes(&n.geometry));
        attributes.extend(n.style.attributes());
        attributes.push(("data-draggable", n.is_draggable().to_string()));
        if n.is_image() {
            attributes.push(("data-image", "true".into()));
        }

        let handle = self
            .surface
            .create_shape(ElementKind::of(&n.geometry), &attributes);

        self.bodies.insert(handle.clone(), node);
        self.elements.insert(node, handle);
    }

    fn sync_node(&mut self, node: NodeId) {
        if let Some(handle) = self.elements.get(&node) {
            let attributes = geometry_attributes(&self.graph.node(node).geometry);
            self.surface.set_attributes(handle, &attributes);
        }
    }

    /// Dispatches a pointer event, see [`Self::pointer_down`],
    /// [`Self::pointer_move`] and [`Self::pointer_up`].
    pub fn handle_pointer(&mut self, event: &PointerEvent<S::Handle>) {
        let local = self.surface.to_local(event.client);

        match event.kind {
            PointerEventKind::Down => self.pointer_down(event.target.as_ref(), local),
            PointerEventKind::Move => self.pointer_move(local),
            PointerEventKind::Up => self.pointer_up(),
        }
    }

    /// Starts dragging `target` if it's a draggable source,
    /// or traces a light path if it's an image.
    ///
    /// `pointer` is in surface-local coordinates.
    pub fn pointer_down(&mut self, target: Option<&S::Handle>, pointer: Point) {
        let Some(&node) = target.and_then(|h| self.bodies.get(h)) else {
            return;
        };

        let n = self.graph.node(node);

        if n.is_image() {
            self.trace_from(node);
        } else if n.is_draggable() {
            self.drag.begin(node, pointer, n.geometry.anchor());
            log::debug!("dragging `{}`", self.graph.root_id(node));
        }
    }

    /// Moves the body being dragged, if any, keeping it inside the room.
    pub fn pointer_move(&mut self, pointer: Point) {
        if let Some((node, anchor)) = self.drag.target(pointer) {
            self.place(node, anchor);
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(session) = self.drag.end() {
            log::debug!("dropped `{}`", self.graph.root_id(session.node));
        }
    }

    /// Moves the source `id` as close as possible to `anchor`, like a drag would.
    ///
    /// Returns `false` if there is no such draggable source.
    pub fn move_source(&mut self, id: &str, anchor: impl Into<Point>) -> bool {
        match self.graph.source(id) {
            Some(node) if self.graph.node(node).is_draggable() => {
                self.place(node, anchor.into());
                true
            }
            _ => false,
        }
    }

    fn place(&mut self, node: NodeId, anchor: Point) {
        let bounds = *self.room.bounds();
        let geometry = &mut self.graph.node_mut(node).geometry;

        let clamped = clamp_anchor(anchor, geometry.extent(), &bounds);
        let by = clamped - geometry.anchor();
        geometry.translate(&by);

        self.sync_node(node);
        self.on_source_moved(node);
    }

    /// Recomputes every image owned by `source`, and updates their elements.
    ///
    /// Returns the number of updated images.
    pub fn on_source_moved(&mut self, source: NodeId) -> usize {
        let updated = self.graph.propagate(source, self.room.mirror_lines());

        for &image in &updated {
            self.sync_node(image);
        }

        log::trace!(
            "`{}` moved, {} images updated",
            self.graph.root_id(source),
            updated.len()
        );
        updated.len()
    }

    /// Removes the drawn light path, and stops its reveal.
    pub fn clear_path(&mut self) {
        self.reveal.cancel();
        self.path = None;
        self.surface
            .remove_shapes(&|id| id.starts_with(PATH_ID_PREFIX));
    }

    /// Traces light from `image`'s source to the observer, replacing the previous path.
    ///
    /// The first segment is drawn right away, the others on later [`Self::tick`]s.
    pub fn trace_from(&mut self, image: NodeId) -> Option<&LightPath> {
        self.clear_path();

        let source = self.graph.node(self.graph.root(image)).geometry.center();
        let seen = self.graph.node(image).geometry.center();

        self.path = trace(&self.room, source, seen, self.observer());

        match &self.path {
            Some(path) => {
                let generation = self.reveal.start(path.segments());
                log::debug!(
                    "tracing `{}` ({} waypoints, reveal #{generation})",
                    self.graph.element_id(image),
                    path.waypoints().len()
                );
            }
            None => log::debug!("no light path for `{}`", self.graph.element_id(image)),
        }

        self.tick(Duration::ZERO);
        self.path.as_ref()
    }

    /// Advances the reveal clock by `elapsed`, drawing the path segments that became due.
    pub fn tick(&mut self, elapsed: Duration) {
        let steps = self.reveal.poll(elapsed);
        self.draw_steps(steps);
    }

    /// Draws every remaining segment of the current light path.
    pub fn finish_reveal(&mut self) {
        let steps = self.reveal.drain();
        self.draw_steps(steps);
    }

    fn draw_steps(&mut self, steps: Vec<RevealStep>) {
        for step in steps {
            if !self.reveal.is_current(&step) {
                continue;
            }

            self.surface.create_shape(
                ElementKind::Path,
                &[
                    ("id", format!("{PATH_ID_PREFIX}{}", step.index)),
                    ("d", segment_path(&step.segment)),
                    ("fill", "none".into()),
                    ("stroke", PATH_COLOR.into()),
                    ("stroke-width", "2".into()),
                ],
            );
        }
    }

    /// Where light paths end.
    #[inline]
    #[must_use]
    pub fn observer(&self) -> Point {
        self.observer
            .unwrap_or_else(|| self.room.bounds().center())
    }

    #[inline]
    #[must_use]
    pub const fn room(&self) -> &Room {
        &self.room
    }

    #[inline]
    #[must_use]
    pub const fn graph(&self) -> &ImageGraph {
        &self.graph
    }

    #[inline]
    #[must_use]
    pub const fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// The last traced light path, if any.
    #[inline]
    #[must_use]
    pub fn light_path(&self) -> Option<&LightPath> {
        self.path.as_ref()
    }

    #[inline]
    #[must_use]
    pub const fn reveal(&self) -> &RevealScheduler {
        &self.reveal
    }

    #[inline]
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    #[inline]
    pub fn into_surface(self) -> S {
        self.surface
    }

    /// The first element whose id is `id`.
    #[must_use]
    pub fn element(&self, id: &str) -> Option<S::Handle> {
        self.surface.query(&|e| e == id)
    }

    #[inline]
    #[must_use]
    pub fn handle_of(&self, node: NodeId) -> Option<&S::Handle> {
        self.elements.get(&node)
    }

    #[inline]
    #[must_use]
    pub fn node_of(&self, handle: &S::Handle) -> Option<NodeId> {
        self.bodies.get(handle).copied()
    }

    /// The current geometry of the source `id`.
    #[must_use]
    pub fn geometry(&self, id: &str) -> Option<&Geometry> {
        self.graph
            .source(id)
            .map(|n| &self.graph.node(n).geometry)
    }

    /// Every image of the source `id`, lower orders first.
    #[must_use]
    pub fn images_of(&self, id: &str) -> Vec<NodeId> {
        self.graph
            .source(id)
            .map(|n| self.graph.descendants(n))
            .unwrap_or_default()
    }

    /// The image of the source `id` produced by the mirrors at indices `path`, in order.
    #[must_use]
    pub fn image(&self, id: &str, path: &[usize]) -> Option<NodeId> {
        self.graph
            .source(id)
            .and_then(|n| self.graph.descend(n, path))
            .filter(|_| !path.is_empty())
    }
}
