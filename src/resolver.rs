//! Maps the final rotation of the wheel to the item under the pointer.
//!
//! Segment `i` covers `[i * segment, (i + 1) * segment)` in the wheel's own
//! frame, measured clockwise from screen-right (canvas convention, y down).
//! The pointer is fixed at the top of the screen, which is 270° in that frame.
//! The renderer in `widgets` draws with the same convention; both must change
//! together.

use std::f64::consts::TAU;

/// Pointer position in the unrotated wheel frame, in degrees.
pub const POINTER_ANGLE_DEG: f64 = 270.0;

/// Width of one segment in radians.
pub fn segment_angle(item_count: usize) -> f64 {
    TAU / item_count.max(1) as f64
}

/// Index of the segment under the pointer once the wheel has turned by
/// `rotation` radians. Always in `[0, item_count)` for `item_count > 0`.
pub fn resolve(rotation: f64, item_count: usize) -> usize {
    if item_count == 0 {
        return 0;
    }
    if !rotation.is_finite() {
        log::warn!("Non-finite rotation {} resolved to the first segment", rotation);
        return 0;
    }
    let total_angle_deg = rotation.to_degrees() % 360.0;
    let normalized_angle = (360.0 - (total_angle_deg % 360.0)) % 360.0;
    let adjusted = (normalized_angle + POINTER_ANGLE_DEG) % 360.0;
    let segment_angle_deg = 360.0 / item_count as f64;
    let index = (adjusted / segment_angle_deg).floor();
    // float accumulation can land exactly on 360
    (index.max(0.0) as usize).min(item_count - 1)
}

/// Convenience over [`resolve`] returning the item itself.
pub fn resolve_item<T>(rotation: f64, items: &[T]) -> Option<&T> {
    if items.is_empty() {
        return None;
    }
    items.get(resolve(rotation, items.len()))
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;

    #[test]
    fn test_resolve_at_rest() {
        assert_eq!(resolve(0.0, 8), 6);
    }

    #[test]
    fn test_resolve_half_turn() {
        assert_eq!(resolve(PI, 8), 2);
    }

    #[test]
    fn test_resolve_two_items() {
        assert_eq!(resolve(3.0 * PI / 2.0, 2), 0);
        assert_eq!(resolve(0.0, 2), 1);
    }

    #[test]
    fn test_resolve_full_turns_are_identity() {
        for turns in 1..20 {
            // middle of segment 2 under the pointer
            let angle = turns as f64 * TAU + PI - PI / 8.0;
            assert_eq!(resolve(angle, 8), 2, "after {} turns", turns);
        }
    }

    #[test]
    fn test_resolve_always_in_range() {
        let angles = [
            0.0,
            -0.0,
            1e-12,
            -1e-12,
            TAU - 1e-15,
            -TAU + 1e-15,
            123.456,
            -987.654,
            1e9,
            -1e9,
            1e300,
            f64::MAX,
            f64::MIN,
        ];
        for n in 2..40 {
            for &angle in &angles {
                let index = resolve(angle, n);
                assert!(index < n, "resolve({}, {}) = {}", angle, n, index);
            }
            let mut angle = -50.0;
            while angle < 50.0 {
                assert!(resolve(angle, n) < n);
                angle += 0.0137;
            }
        }
    }

    #[test]
    fn test_resolve_negative_angle() {
        // -90° lands the same as +270°
        assert_eq!(resolve(-PI / 2.0, 8), resolve(3.0 * PI / 2.0, 8));
        assert_eq!(resolve(-PI / 2.0, 8), 0);
    }

    #[test]
    fn test_resolve_non_finite() {
        assert_eq!(resolve(f64::NAN, 8), 0);
        assert_eq!(resolve(f64::INFINITY, 8), 0);
        assert_eq!(resolve(f64::NEG_INFINITY, 3), 0);
    }

    #[test]
    fn test_resolve_every_segment_reachable() {
        let n = 6;
        let segment_deg = 360.0 / n as f64;
        let mut seen = vec![false; n];
        for i in 0..n {
            // rotate so the middle of segment i sits under the pointer
            let middle = i as f64 * segment_deg + segment_deg / 2.0;
            let rotation = (POINTER_ANGLE_DEG - middle).to_radians();
            let index = resolve(rotation, n);
            assert_eq!(index, i);
            seen[index] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_resolve_item() {
        let items = ["a", "b"];
        assert_eq!(resolve_item(3.0 * PI / 2.0, &items), Some(&"a"));
        assert_eq!(resolve_item::<&str>(0.0, &[]), None);
    }
}
