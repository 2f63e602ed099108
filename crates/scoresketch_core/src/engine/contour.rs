//! Pitch-contour classification from freehand strokes.
//!
//! # Responsibility
//! - Reduce an ordered 2-D point sequence to a coarse direction label.
//! - Support incremental point capture for live drawing.
//!
//! # Invariants
//! - The coarse classifier compares first and last y only; intermediate
//!   points are ignored.
//! - The strict classifier additionally reports `Mixed` when the y
//!   direction reverses mid-stroke.
//! - Increasing y (pen moving down the canvas) classifies as `Down`.
//!   This is the literal screen-space convention of the capture surface,
//!   preserved as-is; see the open-question note in DESIGN.md.

use crate::model::event::PitchContour;
use crate::model::symbol::Point;

/// Flatness epsilon in canvas units.
const FLAT_EPSILON: f64 = 5.0;

/// Coarse classification: first and last y only.
///
/// Returns `Flat` for empty or single-point input.
pub fn classify(points: &[Point]) -> PitchContour {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return PitchContour::Flat;
    };
    direction(first.y, last.y)
}

/// Strict classification: coarse label, unless the y-deltas reverse
/// direction anywhere along the stroke, in which case `Mixed`.
pub fn classify_strict(points: &[Point]) -> PitchContour {
    let coarse = classify(points);
    if coarse == PitchContour::Flat {
        return coarse;
    }

    let mut seen_up = false;
    let mut seen_down = false;
    for pair in points.windows(2) {
        let delta = pair[1].y - pair[0].y;
        if delta > FLAT_EPSILON {
            seen_down = true;
        } else if delta < -FLAT_EPSILON {
            seen_up = true;
        }
    }
    if seen_up && seen_down {
        return PitchContour::Mixed;
    }
    coarse
}

fn direction(first_y: f64, last_y: f64) -> PitchContour {
    let delta = last_y - first_y;
    if delta > FLAT_EPSILON {
        PitchContour::Down
    } else if delta < -FLAT_EPSILON {
        PitchContour::Up
    } else {
        PitchContour::Flat
    }
}

/// Incremental stroke capture for live drawing surfaces.
#[derive(Debug, Default)]
pub struct ContourClassifier {
    points: Vec<Point>,
}

impl ContourClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears any buffered points and starts a fresh stroke.
    pub fn begin_drawing(&mut self) {
        self.points.clear();
    }

    /// Appends one point in capture order.
    pub fn add_point(&mut self, x: f64, y: f64) {
        self.points.push(Point::new(x, y));
    }

    /// Ends the stroke and returns the coarse label for it.
    pub fn end_drawing(&mut self) -> PitchContour {
        let label = classify(&self.points);
        self.points.clear();
        label
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, classify_strict, ContourClassifier};
    use crate::model::event::PitchContour;
    use crate::model::symbol::Point;

    fn path(ys: &[f64]) -> Vec<Point> {
        ys.iter()
            .enumerate()
            .map(|(i, y)| Point::new(i as f64 * 10.0, *y))
            .collect()
    }

    #[test]
    fn increasing_y_is_screen_space_down() {
        assert_eq!(classify(&path(&[0.0, 50.0])), PitchContour::Down);
        assert_eq!(classify(&path(&[50.0, 0.0])), PitchContour::Up);
    }

    #[test]
    fn deltas_within_epsilon_are_flat() {
        assert_eq!(classify(&path(&[10.0, 14.0])), PitchContour::Flat);
        assert_eq!(classify(&path(&[10.0, 5.1])), PitchContour::Flat);
        assert_eq!(classify(&[]), PitchContour::Flat);
        assert_eq!(classify(&path(&[3.0])), PitchContour::Flat);
    }

    #[test]
    fn coarse_classifier_ignores_intermediate_points() {
        // Dips far down mid-stroke, but start and end match.
        assert_eq!(classify(&path(&[0.0, 90.0, 2.0])), PitchContour::Flat);
    }

    #[test]
    fn strict_classifier_reports_reversals_as_mixed() {
        assert_eq!(
            classify_strict(&path(&[0.0, 90.0, 30.0])),
            PitchContour::Mixed
        );
        assert_eq!(
            classify_strict(&path(&[0.0, 30.0, 90.0])),
            PitchContour::Down
        );
    }

    #[test]
    fn incremental_capture_matches_batch_classification() {
        let mut classifier = ContourClassifier::new();
        classifier.begin_drawing();
        classifier.add_point(0.0, 80.0);
        classifier.add_point(10.0, 40.0);
        classifier.add_point(20.0, 10.0);

        assert_eq!(classifier.end_drawing(), PitchContour::Up);
        // Buffer resets for the next stroke.
        assert_eq!(classifier.end_drawing(), PitchContour::Flat);
    }
}
