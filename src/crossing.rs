//! Edge detection over the continuously rotating wheel: one tick per frame
//! in which the pointer sits over a different segment than the frame before.

use std::f64::consts::FRAC_PI_2;

use crate::resolver::segment_angle;

/// Boundary index under the pointer. The quarter turn aligns segment 0
/// with the pointer when the wheel is at rest.
pub fn segment_index(rotation: f64, item_count: usize) -> i64 {
    ((rotation + FRAC_PI_2) / segment_angle(item_count)).floor() as i64
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentCrossingDetector {
    last_segment: Option<i64>,
}

impl SegmentCrossingDetector {
    /// Detector that treats `rotation` as already observed.
    pub fn at(rotation: f64, item_count: usize) -> Self {
        Self {
            last_segment: Some(segment_index(rotation, item_count)),
        }
    }

    /// Returns the new segment index when it differs from the last one seen.
    /// Several boundaries passed in one frame still yield a single crossing.
    pub fn observe(&mut self, rotation: f64, item_count: usize) -> Option<i64> {
        let current = segment_index(rotation, item_count);
        if self.last_segment == Some(current) {
            return None;
        }
        self.last_segment = Some(current);
        Some(current)
    }

    pub fn last_segment(&self) -> Option<i64> {
        self.last_segment
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn test_segment_index() {
        // 8 segments of 45°, offset by 90°
        assert_eq!(segment_index(0.0, 8), 2);
        assert_eq!(segment_index(PI / 4.0 - 1e-9, 8), 2);
        assert_eq!(segment_index(PI / 4.0 + 1e-9, 8), 3);
        assert_eq!(segment_index(-PI, 8), -2);
    }

    #[test]
    fn test_fresh_detector_fires_once() {
        let mut detector = SegmentCrossingDetector::default();
        assert_eq!(detector.observe(0.0, 4), Some(1));
        assert_eq!(detector.observe(0.1, 4), None);
    }

    #[test]
    fn test_detector_at_rest_is_quiet() {
        let mut detector = SegmentCrossingDetector::at(0.0, 4);
        assert_eq!(detector.last_segment(), Some(1));
        assert_eq!(detector.observe(0.2, 4), None);
        assert_eq!(detector.observe(PI / 2.0 + 0.01, 4), Some(2));
        assert_eq!(detector.observe(PI / 2.0 + 0.02, 4), None);
    }

    #[test]
    fn test_multiple_boundaries_single_crossing() {
        let mut detector = SegmentCrossingDetector::at(0.0, 8);
        // a whole turn in one frame still reports one crossing
        assert_eq!(detector.observe(2.0 * PI + 0.5, 8), Some(segment_index(2.0 * PI + 0.5, 8)));
        assert_eq!(detector.observe(2.0 * PI + 0.5, 8), None);
    }
}
