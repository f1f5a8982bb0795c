use super::{Point3, Vector3, TOLERANCE};

/// Closest approach between two bounded segments.
#[derive(Debug, Clone, Copy)]
pub struct SegmentApproach {
    /// Fraction along the first segment, in `[0, 1]`.
    pub s: f64,
    /// Fraction along the second segment, in `[0, 1]`.
    pub t: f64,
    /// Closest point on the first segment.
    pub point_a: Point3,
    /// Closest point on the second segment.
    pub point_b: Point3,
}

impl SegmentApproach {
    fn new(a0: &Point3, da: &Vector3, b0: &Point3, db: &Vector3, s: f64, t: f64) -> Self {
        Self {
            s,
            t,
            point_a: a0 + da * s,
            point_b: b0 + db * t,
        }
    }

    /// Distance between the two closest points.
    #[must_use]
    pub fn distance(&self) -> f64 {
        (self.point_b - self.point_a).norm()
    }

    /// Midpoint of the two closest points.
    #[must_use]
    pub fn midpoint(&self) -> Point3 {
        nalgebra::center(&self.point_a, &self.point_b)
    }
}

/// Computes the closest approach between segments `a0-a1` and `b0-b1` in 3D.
///
/// Returns `None` for degenerate or parallel segments, which never meet in
/// a single point.
#[must_use]
pub fn segment_closest_approach(
    a0: &Point3,
    a1: &Point3,
    b0: &Point3,
    b1: &Point3,
) -> Option<SegmentApproach> {
    let da = a1 - a0;
    let db = b1 - b0;
    let r = a0 - b0;

    let a = da.dot(&da);
    let e = db.dot(&db);
    if a <= TOLERANCE || e <= TOLERANCE {
        return None;
    }

    let b = da.dot(&db);
    let c = da.dot(&r);
    let f = db.dot(&r);
    let denom = a * e - b * b;
    if denom <= TOLERANCE * a * e {
        return None;
    }

    let mut s = ((b * f - c * e) / denom).clamp(0.0, 1.0);
    let mut t = (b * s + f) / e;
    if t < 0.0 {
        t = 0.0;
        s = (-c / a).clamp(0.0, 1.0);
    } else if t > 1.0 {
        t = 1.0;
        s = ((b - c) / a).clamp(0.0, 1.0);
    }

    Some(SegmentApproach::new(a0, &da, b0, &db, s, t))
}

/// Computes where the XY projections of segments `a0-a1` and `b0-b1` cross.
///
/// The returned approach carries each segment's own elevation at the
/// crossing. Returns `None` when the projections are parallel or miss.
#[must_use]
pub fn plan_crossing(
    a0: &Point3,
    a1: &Point3,
    b0: &Point3,
    b1: &Point3,
) -> Option<SegmentApproach> {
    let da = a1 - a0;
    let db = b1 - b0;

    let len_a = da.x.hypot(da.y);
    let len_b = db.x.hypot(db.y);
    let cross = da.x * db.y - da.y * db.x;
    if cross.abs() <= TOLERANCE * len_a * len_b {
        return None;
    }

    let dx = b0.x - a0.x;
    let dy = b0.y - a0.y;
    let s = (dx * db.y - dy * db.x) / cross;
    let t = (dx * da.y - dy * da.x) / cross;

    let eps = TOLERANCE;
    if s >= -eps && s <= 1.0 + eps && t >= -eps && t <= 1.0 + eps {
        Some(SegmentApproach::new(
            a0,
            &da,
            b0,
            &db,
            s.clamp(0.0, 1.0),
            t.clamp(0.0, 1.0),
        ))
    } else {
        None
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn crossing_segments_meet() {
        let hit = segment_closest_approach(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            &p(5.0, -5.0, 0.0),
            &p(5.0, 5.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(hit.s, 0.5);
        assert_relative_eq!(hit.t, 0.5);
        assert!(hit.distance() < 1e-12);
        assert_relative_eq!(hit.midpoint().x, 5.0);
    }

    #[test]
    fn skew_segments_report_gap() {
        let hit = segment_closest_approach(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            &p(5.0, -5.0, 3.0),
            &p(5.0, 5.0, 3.0),
        )
        .unwrap();
        assert_relative_eq!(hit.distance(), 3.0);
        assert_relative_eq!(hit.midpoint().z, 1.5);
    }

    #[test]
    fn closest_approach_clamps_to_segment_end() {
        let hit = segment_closest_approach(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            &p(15.0, -5.0, 0.0),
            &p(15.0, 5.0, 0.0),
        )
        .unwrap();
        assert_relative_eq!(hit.s, 1.0);
        assert_relative_eq!(hit.distance(), 5.0);
    }

    #[test]
    fn parallel_segments_have_no_single_approach() {
        assert!(segment_closest_approach(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            &p(0.0, 1.0, 0.0),
            &p(10.0, 1.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn plan_crossing_keeps_each_elevation() {
        let hit = plan_crossing(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            &p(4.0, -5.0, 1000.0),
            &p(4.0, 5.0, 1000.0),
        )
        .unwrap();
        assert_relative_eq!(hit.point_a.z, 0.0);
        assert_relative_eq!(hit.point_b.z, 1000.0);
        assert_relative_eq!(hit.s, 0.4);
    }

    #[test]
    fn plan_crossing_misses_outside_segments() {
        assert!(plan_crossing(
            &p(0.0, 0.0, 0.0),
            &p(10.0, 0.0, 0.0),
            &p(12.0, -5.0, 0.0),
            &p(12.0, 5.0, 0.0),
        )
        .is_none());
    }
}
