use core::time::Duration;
use std::{collections::HashSet, fs::File, io::BufReader, path::Path};

use mirror_room::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use serde_json;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("shape `{id}`: {source}")]
    PointList {
        id: String,
        #[source]
        source: PointListError,
    },

    #[error("room bounds must have a positive width and height, got {0:?}")]
    InvalidBounds(RoomBounds),

    #[error("duplicate shape id `{0}`")]
    DuplicateId(String),

    #[error("shape id `{0}` is reserved for the room's decorations")]
    ReservedId(String),

    #[error("image order {0} is higher than the maximum of {max}", max = MAX_IMAGE_ORDER)]
    ImageOrder(usize),

    #[error("event #{index}: {source}")]
    InvalidEvent {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

const fn default_image_order() -> usize {
    DEFAULT_IMAGE_ORDER
}

const fn default_reveal_delay_ms() -> u64 {
    DEFAULT_REVEAL_DELAY.as_millis() as u64
}

const fn default_draggable() -> bool {
    true
}

/// A scene file.
///
/// ```json
/// {
///     "bounds": {"x": 0, "y": 0, "width": 200, "height": 200},
///     "mirrorLocation": "top-bottom" | "left-right" | "all", // optional
///     "observer": [100, 150], // optional
///     "imageOrder": 2, // optional
///     "revealDelayMs": 300, // optional
///     "shapes": [ShapeEntry, ...]
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub bounds: RoomBounds,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mirror_location: Option<MirrorPlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer: Option<[Float; 2]>,
    #[serde(default = "default_image_order")]
    pub image_order: usize,
    #[serde(default = "default_reveal_delay_ms")]
    pub reveal_delay_ms: u64,
    #[serde(default)]
    pub shapes: Vec<ShapeEntry>,
}

impl SceneConfig {
    #[must_use]
    pub fn new(bounds: RoomBounds) -> Self {
        Self {
            bounds,
            mirror_location: None,
            observer: None,
            image_order: default_image_order(),
            reveal_delay_ms: default_reveal_delay_ms(),
            shapes: Vec::new(),
        }
    }

    /// Validates the scene, and converts it into an engine configuration.
    ///
    /// Shapes of unknown kinds are skipped.
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        if !self.bounds.is_valid() {
            return Err(ConfigError::InvalidBounds(self.bounds));
        }

        if self.image_order > MAX_IMAGE_ORDER {
            return Err(ConfigError::ImageOrder(self.image_order));
        }

        let mut ids = HashSet::new();
        let mut shapes = Vec::with_capacity(self.shapes.len());

        for entry in &self.shapes {
            if !ids.insert(entry.id.as_str()) {
                return Err(ConfigError::DuplicateId(entry.id.clone()));
            }
            if is_reserved_id(&entry.id) {
                return Err(ConfigError::ReservedId(entry.id.clone()));
            }
            shapes.extend(entry.to_shape_config()?);
        }

        Ok(EngineConfig {
            shapes,
            bounds: self.bounds,
            mirror_location: self.mirror_location,
            observer: self.observer.map(Point::from),
            image_order: self.image_order,
            reveal_delay: Duration::from_millis(self.reveal_delay_ms),
        })
    }
}

/// A body in a scene file. Which geometric fields are read depends on `kind`:
///
/// - `"circle"`: `cx`, `cy` and `r`. Missing values read as zero.
/// - `"polygon"`: `points`, as in `"x1,y1 x2,y2 x3,y3"`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShapeEntry {
    pub id: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cx: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cy: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<Float>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Float>,
    #[serde(default = "default_draggable")]
    pub draggable: bool,
}

impl ShapeEntry {
    fn with_kind(id: impl Into<String>, kind: &str) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            cx: None,
            cy: None,
            r: None,
            points: None,
            fill: None,
            stroke: None,
            stroke_width: None,
            opacity: None,
            draggable: true,
        }
    }

    #[must_use]
    pub fn circle(id: impl Into<String>, circle: &Circle) -> Self {
        Self {
            cx: Some(circle.center.x),
            cy: Some(circle.center.y),
            r: Some(circle.radius),
            ..Self::with_kind(id, "circle")
        }
    }

    #[must_use]
    pub fn polygon(id: impl Into<String>, polygon: &Polygon) -> Self {
        Self {
            points: Some(polygon.to_point_list()),
            ..Self::with_kind(id, "polygon")
        }
    }

    #[inline]
    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<String>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    #[must_use]
    pub fn style(&self) -> Style {
        Style {
            fill: self.fill.clone(),
            stroke: self.stroke.clone(),
            stroke_width: self.stroke_width,
            opacity: self.opacity,
        }
    }

    /// Returns `None` if `kind` isn't recognized.
    pub fn to_shape_config(&self) -> Result<Option<ShapeConfig>, ConfigError> {
        let geometry: Geometry = match self.kind.as_str() {
            "circle" => Circle::new(
                [self.cx.unwrap_or(0.), self.cy.unwrap_or(0.)],
                self.r.unwrap_or(0.),
            )
            .into(),
            "polygon" => self
                .points
                .as_deref()
                .unwrap_or_default()
                .parse::<Polygon>()
                .map_err(|source| ConfigError::PointList {
                    id: self.id.clone(),
                    source,
                })?
                .into(),
            kind => {
                log::warn!("shape `{}` has unknown kind `{kind}`, skipping", self.id);
                return Ok(None);
            }
        };

        Ok(Some(
            ShapeConfig::new(self.id.clone(), geometry)
                .with_style(self.style())
                .with_draggable(self.draggable),
        ))
    }
}

/// An entry of an event script.
///
/// ```json
/// {"type": "down", "x": 10, "y": 20, "target": "ball"}
/// {"type": "move", "x": 15, "y": 20}
/// {"type": "up", "x": 15, "y": 20}
/// {"type": "wait", "ms": 300}
/// ```
///
/// Coordinates are device coordinates.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScriptEvent {
    Down {
        x: Float,
        y: Float,
        /// Id of the element under the pointer.
        #[serde(default)]
        target: Option<String>,
    },
    Move {
        x: Float,
        y: Float,
    },
    Up {
        x: Float,
        y: Float,
    },
    Wait {
        ms: u64,
    },
}

impl ScriptEvent {
    /// The pointer event this entry stands for, `None` for waits.
    ///
    /// `resolve` maps element ids to handles. Unresolved targets are dropped.
    pub fn to_pointer_event<H>(
        &self,
        resolve: impl FnOnce(&str) -> Option<H>,
    ) -> Option<PointerEvent<H>> {
        match self {
            Self::Down { x, y, target } => Some(PointerEvent::down(
                target.as_deref().and_then(resolve),
                [*x, *y],
            )),
            Self::Move { x, y } => Some(PointerEvent::moved([*x, *y])),
            Self::Up { x, y } => Some(PointerEvent::up([*x, *y])),
            Self::Wait { .. } => None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Option<Duration> {
        match self {
            Self::Wait { ms } => Some(Duration::from_millis(*ms)),
            _ => None,
        }
    }
}

pub fn parse_scene(json: &str) -> Result<SceneConfig, ConfigError> {
    Ok(serde_json::from_str(json)?)
}

pub fn load_scene(path: impl AsRef<Path>) -> Result<SceneConfig, ConfigError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn events_from_values(values: Vec<serde_json::Value>) -> Result<Vec<ScriptEvent>, ConfigError> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            serde_json::from_value(value).map_err(|source| ConfigError::InvalidEvent { index, source })
        })
        .collect()
}

/// Parses an event script: a json array of [`ScriptEvent`]s.
pub fn parse_events(json: &str) -> Result<Vec<ScriptEvent>, ConfigError> {
    events_from_values(serde_json::from_str(json)?)
}

pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<ScriptEvent>, ConfigError> {
    let file = File::open(path)?;
    events_from_values(serde_json::from_reader(BufReader::new(file))?)
}
