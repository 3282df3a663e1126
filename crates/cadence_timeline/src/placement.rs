//! Label placement around an anchor element.

use cadence_core::BoundingBox;

/// Where a label ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Index of the chosen candidate
    pub index: usize,
    /// Chosen box
    pub bounds: BoundingBox,
    /// Total overlap area with the obstacles, ignoring overlaps within epsilon
    pub overlap_area: f64,
}

impl Placement {
    /// Whether the label clears every obstacle.
    pub fn is_clear(&self) -> bool {
        self.overlap_area == 0.0
    }
}

/// Candidate boxes of size `width × height` around `target`, separated by `gap`.
///
/// Order: above, below, right, left, then the four diagonals clockwise from upper
/// right.
pub fn candidates_around(
    target: &BoundingBox,
    width: f64,
    height: f64,
    gap: f64,
) -> Vec<BoundingBox> {
    let cx = (target.min_x() + target.max_x()) / 2.0;
    let cy = (target.min_y() + target.max_y()) / 2.0;
    let right = target.max_x() + gap + width / 2.0;
    let left = target.min_x() - gap - width / 2.0;
    let above = target.max_y() + gap + height / 2.0;
    let below = target.min_y() - gap - height / 2.0;

    [
        (cx, above),
        (cx, below),
        (right, cy),
        (left, cy),
        (right, above),
        (right, below),
        (left, below),
        (left, above),
    ]
    .into_iter()
    .map(|(x, y)| BoundingBox::centered(x, y, width, height))
    .collect()
}

/// Pick the first candidate that clears every obstacle.
///
/// An intersection counts only when its area exceeds `epsilon`. If no candidate is
/// clear, the one with the least total overlap wins, ties going to the earlier
/// candidate. Returns `None` only when there are no candidates.
pub fn place_label(
    candidates: &[BoundingBox],
    obstacles: &[BoundingBox],
    epsilon: f64,
) -> Option<Placement> {
    let mut best: Option<Placement> = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let overlap_area: f64 = obstacles
            .iter()
            .filter_map(|o| candidate.intersection(o))
            .map(|o| o.area())
            .filter(|&area| area > epsilon)
            .sum();

        let placement = Placement {
            index,
            bounds: *candidate,
            overlap_area,
        };
        if placement.is_clear() {
            return Some(placement);
        }
        if best.is_none_or(|b| overlap_area < b.overlap_area) {
            best = Some(placement);
        }
    }

    best
}
