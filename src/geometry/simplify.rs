use crate::domain::Point;

/// Tolerance used for building outlines in the normalized frame.
///
/// Removes near-collinear survey noise while keeping real corners.
pub const DEFAULT_TOLERANCE: f64 = 0.02;

/// Douglas-Peucker simplification over a normalized outline.
///
/// The first and last points are always kept. Each pending `(start, end)`
/// range lives on an explicit stack, so depth does not depend on the
/// call stack even for pathological inputs. A negative or NaN tolerance
/// behaves like `0.0`.
pub fn simplify_polygon(points: &[Point], tolerance: f64) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let tolerance = tolerance.max(0.0);
    let last = points.len() - 1;

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;

    let mut stack = vec![(0usize, last)];
    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let Some((index, distance)) = farthest_point(points, start, end) else {
            continue;
        };

        if distance > tolerance {
            keep[index] = true;
            stack.push((index, end));
            stack.push((start, index));
        }
    }

    points
        .iter()
        .zip(&keep)
        .filter_map(|(&p, &k)| k.then_some(p))
        .collect()
}

/// Interior point of `points[start..=end]` farthest from the chord.
///
/// Ties resolve to the lowest index.
fn farthest_point(points: &[Point], start: usize, end: usize) -> Option<(usize, f64)> {
    let chord_start = points[start];
    let chord_end = points[end];

    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate().take(end).skip(start + 1) {
        let d = segment_distance(p, &chord_start, &chord_end);
        if best.is_none_or(|(_, max)| d > max) {
            best = Some((i, d));
        }
    }
    best
}

/// Distance from `point` to the closed segment `a`-`b`.
///
/// The projection parameter is clamped to `[0, 1]`, so points beyond an
/// endpoint measure to that endpoint. A zero-length segment falls back to
/// point-to-point distance.
pub fn segment_distance(point: &Point, a: &Point, b: &Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    if len_sq == 0.0 {
        return point.distance(a);
    }

    let t = (((point.x - a.x) * dx + (point.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    let closest = Point::new(a.x + t * dx, a.y + t * dy);
    point.distance(&closest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().copied().map(Point::from).collect()
    }

    /// Square outline with a slightly wobbly edge along the bottom
    fn noisy_square() -> Vec<Point> {
        pts(&[
            (0.0, 0.0),
            (0.25, 0.004),
            (0.5, -0.003),
            (0.75, 0.005),
            (1.0, 0.0),
            (1.0, 0.5),
            (1.0, 1.0),
            (0.5, 1.01),
            (0.0, 1.0),
            (0.0, 0.5),
        ])
    }

    #[test]
    fn test_simplify_short_input_unchanged() {
        let one = pts(&[(0.3, 0.3)]);
        assert_eq!(simplify_polygon(&one, 0.02), one);

        let two = pts(&[(0.0, 0.0), (1.0, 1.0)]);
        assert_eq!(simplify_polygon(&two, 0.02), two);
    }

    #[test]
    fn test_simplify_collinear_collapses() {
        let line = pts(&[(0.0, 0.0), (0.25, 0.0), (0.5, 0.0), (1.0, 0.0)]);
        assert_eq!(
            simplify_polygon(&line, 0.02),
            pts(&[(0.0, 0.0), (1.0, 0.0)])
        );
    }

    #[test]
    fn test_simplify_removes_noise_keeps_corners() {
        let result = simplify_polygon(&noisy_square(), DEFAULT_TOLERANCE);
        assert_eq!(
            result,
            pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.5)])
        );
    }

    #[test]
    fn test_simplify_zero_tolerance_keeps_off_chord_points() {
        let input = noisy_square();
        let result = simplify_polygon(&input, 0.0);
        // Only (1.0, 0.5) sits exactly on the chord between its kept neighbours
        assert_eq!(result.len(), input.len() - 1);
        assert!(!result.contains(&Point::new(1.0, 0.5)));
    }

    #[test]
    fn test_simplify_monotone_and_keeps_endpoints() {
        let input = noisy_square();
        for tolerance in [0.0, 0.001, 0.005, 0.02, 0.1, 0.5, 10.0] {
            let result = simplify_polygon(&input, tolerance);
            assert!(result.len() <= input.len());
            assert_eq!(result.first(), input.first());
            assert_eq!(result.last(), input.last());
        }
    }

    #[test]
    fn test_simplify_idempotent() {
        let input = noisy_square();
        for tolerance in [0.0, 0.005, 0.02, 0.3] {
            let once = simplify_polygon(&input, tolerance);
            let twice = simplify_polygon(&once, tolerance);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_simplify_tie_picks_lowest_index() {
        // Both interior points are exactly 1.0 from the chord
        let input = pts(&[(0.0, 0.0), (0.0, 1.0), (0.5, 1.0), (0.5, 0.0)]);
        let result = simplify_polygon(&input, 0.02);
        assert_eq!(result, input);
        assert_eq!(farthest_point(&input, 0, 3), Some((1, 1.0)));
    }

    #[test]
    fn test_simplify_negative_tolerance_treated_as_zero() {
        let input = pts(&[(0.0, 0.0), (0.5, 0.0), (1.0, 0.0)]);
        assert_eq!(simplify_polygon(&input, -1.0), simplify_polygon(&input, 0.0));
        assert_eq!(simplify_polygon(&input, f64::NAN).len(), 2);
    }

    #[test]
    fn test_simplify_closed_ring() {
        // First point repeated at the end makes a zero-length chord
        let ring = pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]);
        let result = simplify_polygon(&ring, 0.02);
        assert_eq!(result, ring);
    }

    #[test]
    fn test_simplify_long_zigzag_does_not_overflow() {
        let input: Vec<Point> = (0..50_000)
            .map(|i| Point::new(i as f64, if i % 2 == 0 { 0.0 } else { 1.0 }))
            .collect();
        let result = simplify_polygon(&input, 0.1);
        assert!(result.len() > 2);
        assert_eq!(result.first(), input.first());
        assert_eq!(result.last(), input.last());
    }

    #[test]
    fn test_segment_distance_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);

        assert!((segment_distance(&Point::new(0.5, 2.0), &a, &b) - 2.0).abs() < 1e-12);
        // Beyond b: distance to b, not to the infinite line
        assert!((segment_distance(&Point::new(4.0, 4.0), &a, &b) - 5.0).abs() < 1e-12);
        assert!((segment_distance(&Point::new(-3.0, 0.0), &a, &b) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_segment_distance_degenerate_segment() {
        let a = Point::new(1.0, 1.0);
        assert!((segment_distance(&Point::new(4.0, 5.0), &a, &a) - 5.0).abs() < 1e-12);
    }
}
