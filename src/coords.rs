use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f32,
    pub y: f32,
}

impl Point2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dist(&self, other: &Point2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn within(&self, other: &Point2, radius: f32) -> bool {
        self.dist(other) <= radius
    }
}

/// Moves `source` toward `target` by at most `max_dist`, snapping onto the
/// target once the remaining gap is within `epsilon`.
///
/// Returns the distance actually travelled and whether the target was reached.
pub fn go_towards(source: &mut Point2, target: Point2, max_dist: f32, epsilon: f32) -> (f32, bool) {
    let dist = source.dist(&target);
    if dist <= max_dist || dist - max_dist <= epsilon {
        *source = target;
        return (dist, true);
    }
    let scaling = max_dist / dist;
    source.x += (target.x - source.x) * scaling;
    source.y += (target.y - source.y) * scaling;
    (max_dist, false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point2::new(5.0, 5.0);
        let b = Point2::new(8.0, 9.0);
        assert!((a.dist(&b) - 5.0).abs() < 1e-6);
        assert!(a.within(&b, 5.0));
        assert!(!a.within(&b, 4.9));
    }

    #[test]
    fn go_towards_partial_step() {
        let mut p = Point2::new(0.0, 0.0);
        let (moved, arrived) = go_towards(&mut p, Point2::new(10.0, 0.0), 2.0, 0.05);
        assert!(!arrived);
        assert!((moved - 2.0).abs() < 1e-6);
        assert!((p.x - 2.0).abs() < 1e-6);
        assert_eq!(p.y, 0.0);
    }

    #[test]
    fn go_towards_snaps_inside_epsilon() {
        let mut p = Point2::new(0.0, 0.0);
        let target = Point2::new(1.03, 0.0);
        let (moved, arrived) = go_towards(&mut p, target, 1.0, 0.05);
        assert!(arrived);
        assert_eq!(p, target);
        assert!((moved - 1.03).abs() < 1e-6);
    }

    #[test]
    fn go_towards_at_target_moves_nothing() {
        let mut p = Point2::new(3.0, 4.0);
        let (moved, arrived) = go_towards(&mut p, Point2::new(3.0, 4.0), 1.0, 0.05);
        assert!(arrived);
        assert_eq!(moved, 0.0);
    }
}
