//! Axis-aligned geometry for rendered element footprints.

use crate::TIME_EPSILON;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in scene coordinate space.
///
/// # Examples
///
/// ```
/// use cadence_core::BoundingBox;
///
/// let a = BoundingBox::new(0.0, 0.0, 2.0, 2.0);
/// let b = BoundingBox::new(1.0, 1.0, 3.0, 3.0);
/// let overlap = a.intersection(&b).unwrap();
/// assert_eq!(overlap.area(), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Getters)]
pub struct BoundingBox {
    /// Left edge
    min_x: f64,
    /// Bottom edge
    min_y: f64,
    /// Right edge
    max_x: f64,
    /// Top edge
    max_y: f64,
}

impl BoundingBox {
    /// Creates a box from its corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Creates a box from its centre and size.
    pub fn centered(center_x: f64, center_y: f64, width: f64, height: f64) -> Self {
        Self::new(
            center_x - width / 2.0,
            center_y - height / 2.0,
            center_x + width / 2.0,
            center_y + height / 2.0,
        )
    }

    /// Box width.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Box height.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Box area.
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// True when every coordinate is finite and the box is not inverted.
    pub fn is_well_formed(&self) -> bool {
        [self.min_x, self.min_y, self.max_x, self.max_y]
            .iter()
            .all(|v| v.is_finite())
            && self.max_x >= self.min_x
            && self.max_y >= self.min_y
    }

    /// The region shared with `other`, if it has positive area.
    ///
    /// Boxes that only touch along an edge or at a corner do not intersect.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        let overlap = BoundingBox::new(
            self.min_x.max(other.min_x),
            self.min_y.max(other.min_y),
            self.max_x.min(other.max_x),
            self.max_y.min(other.max_y),
        );
        (overlap.width() > 0.0 && overlap.height() > 0.0).then_some(overlap)
    }

    /// Returns the box moved by the given offsets.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.min_x + dx,
            self.min_y + dy,
            self.max_x + dx,
            self.max_y + dy,
        )
    }
}

/// Bounding footprint and active interval of a rendered element.
///
/// Supplied by the rendering layer as a sampled snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(setter(into))]
pub struct Footprint {
    /// Element identifier
    element_id: String,
    /// Bounding box in scene coordinates
    bounds: BoundingBox,
    /// Time the element appears, in seconds from scene start
    appear_time: f64,
    /// Time the element disappears, in seconds from scene start
    disappear_time: f64,
}

impl Footprint {
    /// Whether the element is on screen at time `t` (interval is inclusive).
    pub fn is_active_at(&self, t: f64) -> bool {
        self.appear_time - TIME_EPSILON <= t && t <= self.disappear_time + TIME_EPSILON
    }
}
