use core::{hash::Hash, str::FromStr, time::Duration};
use std::{collections::HashMap, fmt::Debug};

use arrayvec::ArrayVec;
use either::Either;
use nalgebra::{SVector, Unit};

mod drag;
mod engine;
mod geometry;
mod images;
mod reveal;
mod room;
mod shapes;
mod surface;
mod trace;

pub use drag::*;
pub use engine::*;
pub use geometry::*;
pub use images::*;
pub use reveal::*;
pub use room::*;
pub use shapes::*;
pub use surface::*;
pub use trace::*;

pub use either;
pub use nalgebra;

pub type Float = f64;

/// A position (or displacement) in surface-local coordinates.
pub type Point = SVector<Float, 2>;

/// Tolerance used when comparing coordinates.
pub const EPSILON: Float = 1e-9;
