use crate::math::vec2::Vec2;
use crate::shapes::{Capsule2, Disc2, Obb2, Shape};
use super::manifold::{ContactPoint, Manifold};

/// Slack used when deciding whether a box corner lies inside the other box.
const CONTAINMENT_TOLERANCE: f64 = 1e-9;

/// Box B only becomes the reference box when its best axis is shallower than
/// `RELATIVE * a + ABSOLUTE`. Keeps the reference face from flickering
/// between the two boxes while they rest on each other.
const REFERENCE_RELATIVE_TOLERANCE: f64 = 0.95;
const REFERENCE_ABSOLUTE_TOLERANCE: f64 = 0.01;

/// Narrow phase: tests two world-space shapes for overlap.
///
/// The normal of the returned manifold points from `a` towards `b`. Shapes that
/// merely touch (zero penetration) are not reported.
pub fn collide(a: &Shape, b: &Shape) -> Option<Manifold> {
    match (a, b) {
        (Shape::Aabb(a), Shape::Aabb(b)) => check_box_box(&Obb2::from(*a), &Obb2::from(*b)),
        (Shape::Aabb(a), Shape::Box(b)) => check_box_box(&Obb2::from(*a), b),
        (Shape::Aabb(a), Shape::Disc(b)) => check_box_capsule(&Obb2::from(*a), &disc_as_capsule(b)),
        (Shape::Aabb(a), Shape::Capsule(b)) => check_box_capsule(&Obb2::from(*a), b),

        (Shape::Box(a), Shape::Aabb(b)) => check_box_box(a, &Obb2::from(*b)),
        (Shape::Box(a), Shape::Box(b)) => check_box_box(a, b),
        (Shape::Box(a), Shape::Disc(b)) => check_box_capsule(a, &disc_as_capsule(b)),
        (Shape::Box(a), Shape::Capsule(b)) => check_box_capsule(a, b),

        (Shape::Disc(a), Shape::Aabb(b)) => {
            check_box_capsule(&Obb2::from(*b), &disc_as_capsule(a)).map(Manifold::flipped)
        }
        (Shape::Disc(a), Shape::Box(b)) => check_box_capsule(b, &disc_as_capsule(a)).map(Manifold::flipped),
        (Shape::Disc(a), Shape::Disc(b)) => check_capsule_capsule(&disc_as_capsule(a), &disc_as_capsule(b)),
        (Shape::Disc(a), Shape::Capsule(b)) => check_capsule_capsule(&disc_as_capsule(a), b),

        (Shape::Capsule(a), Shape::Aabb(b)) => check_box_capsule(&Obb2::from(*b), a).map(Manifold::flipped),
        (Shape::Capsule(a), Shape::Box(b)) => check_box_capsule(b, a).map(Manifold::flipped),
        (Shape::Capsule(a), Shape::Disc(b)) => check_capsule_capsule(a, &disc_as_capsule(b)),
        (Shape::Capsule(a), Shape::Capsule(b)) => check_capsule_capsule(a, b),
    }
}

/// Boolean form of [`collide`].
pub fn overlaps(a: &Shape, b: &Shape) -> bool {
    collide(a, b).is_some()
}

/// A disc is a capsule whose segment has collapsed to its center.
fn disc_as_capsule(disc: &Disc2) -> Capsule2 {
    Capsule2::new(disc.center, disc.center, disc.radius)
}

/// Projection interval of a capsule onto a unit axis.
fn project_capsule(capsule: &Capsule2, axis: Vec2) -> (f64, f64) {
    let ps = capsule.start.dot(axis);
    let pe = capsule.end.dot(axis);
    (ps.min(pe) - capsule.radius, ps.max(pe) + capsule.radius)
}

/// Overlap of two intervals on an axis, or `None` when they are separated or touching.
fn interval_overlap((min_a, max_a): (f64, f64), (min_b, max_b): (f64, f64)) -> Option<f64> {
    let overlap1 = max_a - min_b;
    let overlap2 = max_b - min_a;
    if overlap1 <= 0.0 || overlap2 <= 0.0 {
        None
    } else {
        Some(overlap1.min(overlap2))
    }
}

/// SAT between two oriented boxes. AABBs come through here as unrotated boxes.
///
/// The face of the reference box along the winning axis clips the other
/// box's most opposed face, which yields one or two solver points.
pub fn check_box_box(a: &Obb2, b: &Obb2) -> Option<Manifold> {
    let (overlap_a, axis_a) = min_overlap_axis(a, b, a.axes())?;
    let (overlap_b, axis_b) = min_overlap_axis(a, b, b.axes())?;

    let reference_is_b = overlap_b < REFERENCE_RELATIVE_TOLERANCE * overlap_a - REFERENCE_ABSOLUTE_TOLERANCE;
    let (depth, mut normal) = if reference_is_b {
        (overlap_b, axis_b)
    } else {
        (overlap_a, axis_a)
    };
    if (b.center - a.center).dot(normal) < 0.0 {
        normal = -normal;
    }

    let points = if reference_is_b {
        ReferenceFace::of(b, -normal).clip_box(a)
    } else {
        ReferenceFace::of(a, normal).clip_box(b)
    };

    Some(Manifold::with_points(
        normal,
        depth,
        box_box_contact(a, b, normal),
        &points,
    ))
}

/// Smallest overlap of the two boxes over `axes`, or `None` on a separating axis.
fn min_overlap_axis(a: &Obb2, b: &Obb2, axes: [Vec2; 2]) -> Option<(f64, Vec2)> {
    let mut best = (f64::INFINITY, Vec2::ZERO);
    for axis in axes {
        let overlap = interval_overlap(a.project(axis), b.project(axis))?;
        if overlap < best.0 {
            best = (overlap, axis);
        }
    }
    Some(best)
}

/// The face of a box whose outward normal is `normal`, with its side planes.
struct ReferenceFace {
    center: Vec2,
    normal: Vec2,
    tangent: Vec2,
    side_extent: f64,
}

impl ReferenceFace {
    /// `normal` must be one of the box's axes, either sign.
    fn of(obb: &Obb2, normal: Vec2) -> Self {
        let [right, _] = obb.axes();
        let (face_extent, side_extent) = if normal.dot(right).abs() >= 0.5 {
            (obb.half_extents.x, obb.half_extents.y)
        } else {
            (obb.half_extents.y, obb.half_extents.x)
        };
        Self {
            center: obb.center + normal * face_extent,
            normal,
            tangent: normal.perpendicular(),
            side_extent,
        }
    }

    fn clip_box(&self, incident: &Obb2) -> Vec<ContactPoint> {
        self.points_below(incident_edge(incident, self.normal), 0.0)
    }

    fn clip_capsule(&self, capsule: &Capsule2) -> Vec<ContactPoint> {
        self.points_below((capsule.start, capsule.end), capsule.radius)
    }

    /// Clips `edge` to the face's side planes, then keeps the ends that sink
    /// below the face once pushed `radius` against the normal. Each point sits
    /// halfway between the sunken end and the face.
    fn points_below(&self, edge: (Vec2, Vec2), radius: f64) -> Vec<ContactPoint> {
        let middle = self.center.dot(self.tangent);
        let Some((start, end)) = clip_to_slab(edge, self.tangent, middle - self.side_extent, middle + self.side_extent)
        else {
            return Vec::new();
        };

        let ends = if start.distance_squared(end) < 1e-20 {
            vec![start]
        } else {
            vec![start, end]
        };
        ends.into_iter()
            .filter_map(|point| {
                let depth = radius - (point - self.center).dot(self.normal);
                (depth > 0.0).then(|| ContactPoint {
                    position: point - self.normal * radius + self.normal * (depth * 0.5),
                    depth,
                })
            })
            .collect()
    }
}

/// The edge of `incident` whose outward normal opposes `normal` the most.
fn incident_edge(incident: &Obb2, normal: Vec2) -> (Vec2, Vec2) {
    let [right, up] = incident.axes();
    let h = incident.half_extents;
    let faces = [
        (right, h.x, up * h.y),
        (-right, h.x, up * h.y),
        (up, h.y, right * h.x),
        (-up, h.y, right * h.x),
    ];

    let mut best = faces[0];
    for face in &faces[1..] {
        if face.0.dot(normal) < best.0.dot(normal) {
            best = *face;
        }
    }
    let (face_normal, extent, half_edge) = best;
    let middle = incident.center + face_normal * extent;
    (middle - half_edge, middle + half_edge)
}

/// Cuts a segment to the part whose projection on `axis` lies in `[lo, hi]`.
fn clip_to_slab(edge: (Vec2, Vec2), axis: Vec2, lo: f64, hi: f64) -> Option<(Vec2, Vec2)> {
    let (mut start, mut end) = edge;
    for (bound, sign) in [(lo, 1.0), (hi, -1.0)] {
        let ds = sign * (start.dot(axis) - bound);
        let de = sign * (end.dot(axis) - bound);
        if ds < 0.0 && de < 0.0 {
            return None;
        }
        if ds < 0.0 {
            start = start + (end - start) * (ds / (ds - de));
        } else if de < 0.0 {
            end = start + (end - start) * (ds / (ds - de));
        }
    }
    Some((start, end))
}

/// Average of the corners of each box found inside the other; if no corner is
/// inside (edge-on-edge crossings), the midpoint of the two support points.
fn box_box_contact(a: &Obb2, b: &Obb2, normal: Vec2) -> Vec2 {
    let inside = |host: &Obb2, point: Vec2| {
        let local = host.to_local(point);
        local.x.abs() <= host.half_extents.x + CONTAINMENT_TOLERANCE
            && local.y.abs() <= host.half_extents.y + CONTAINMENT_TOLERANCE
    };

    let mut sum = Vec2::ZERO;
    let mut count = 0usize;
    for corner in b.corners().into_iter().filter(|c| inside(a, *c)) {
        sum += corner;
        count += 1;
    }
    for corner in a.corners().into_iter().filter(|c| inside(b, *c)) {
        sum += corner;
        count += 1;
    }
    if count > 0 {
        return sum / count as f64;
    }

    let support = |obb: &Obb2, direction: Vec2| {
        obb.corners()
            .into_iter()
            .fold((f64::NEG_INFINITY, obb.center), |best, c| {
                let d = c.dot(direction);
                if d > best.0 { (d, c) } else { best }
            })
            .1
    };
    (support(a, normal) + support(b, -normal)) * 0.5
}

/// SAT between a box and a capsule (discs arrive as zero-length capsules).
///
/// Candidate axes are the box axes, the capsule segment's perpendicular and the
/// directions from each segment endpoint to each box corner. The capsule's
/// radius widens its projected interval on every axis. A capsule resting on a
/// box face is clipped to that face for up to two solver points.
pub fn check_box_capsule(a: &Obb2, capsule: &Capsule2) -> Option<Manifold> {
    let mut axes: Vec<Vec2> = Vec::with_capacity(11);
    axes.extend(a.axes());

    let segment = capsule.segment();
    if !segment.is_degenerate() {
        axes.push(segment.direction().perpendicular().normalize());
    }
    let endpoints = if segment.is_degenerate() {
        vec![capsule.start]
    } else {
        vec![capsule.start, capsule.end]
    };
    for endpoint in endpoints {
        for corner in a.corners() {
            let axis = corner - endpoint;
            if axis.magnitude_squared() > 1e-12 {
                axes.push(axis.normalize());
            }
        }
    }

    let mut min_overlap = f64::INFINITY;
    let mut mtv_axis = Vec2::ZERO;
    let mut mtv_index = 0;
    for (index, axis) in axes.into_iter().enumerate() {
        let overlap = interval_overlap(a.project(axis), project_capsule(capsule, axis))?;
        if overlap < min_overlap {
            min_overlap = overlap;
            mtv_axis = axis;
            mtv_index = index;
        }
    }

    let mut normal = mtv_axis;
    if (capsule.center() - a.center).dot(normal) < 0.0 {
        normal = -normal;
    }

    // The first two axes are the box's own, so the capsule rests on a face
    let points = if mtv_index < 2 && !segment.is_degenerate() {
        ReferenceFace::of(a, normal).clip_capsule(capsule)
    } else {
        Vec::new()
    };

    Some(Manifold::with_points(
        normal,
        min_overlap,
        box_capsule_contact(a, capsule, normal, min_overlap),
        &points,
    ))
}

/// Deepest point of the capsule towards the box, pulled back by half the depth.
/// A capsule lying parallel to the contact face is clipped to the box's extent
/// along the face and its middle is used instead of an endpoint.
fn box_capsule_contact(a: &Obb2, capsule: &Capsule2, normal: Vec2, depth: f64) -> Vec2 {
    let ds = capsule.start.dot(normal);
    let de = capsule.end.dot(normal);
    let scale = capsule.length().max(1.0);

    let segment_point = if (ds - de).abs() <= 1e-6 * scale {
        let tangent = normal.perpendicular();
        let (box_min, box_max) = a.project(tangent);
        let ts = capsule.start.dot(tangent);
        let te = capsule.end.dot(tangent);
        let lo = ts.min(te).max(box_min);
        let hi = ts.max(te).min(box_max);
        let mid = if lo <= hi { 0.5 * (lo + hi) } else { 0.5 * (ts + te) };
        if (te - ts).abs() > 1e-12 {
            capsule.start + (capsule.end - capsule.start) * ((mid - ts) / (te - ts))
        } else {
            capsule.center()
        }
    } else if ds < de {
        capsule.start
    } else {
        capsule.end
    };

    let deepest = segment_point - normal * capsule.radius;
    deepest + normal * (depth * 0.5)
}

/// Two capsules (or discs) overlap when their segments come closer than the
/// sum of their radii.
pub fn check_capsule_capsule(a: &Capsule2, b: &Capsule2) -> Option<Manifold> {
    let (point_a, point_b) = a.segment().closest_points(&b.segment());
    let dist_vec = point_b - point_a;
    let dist_sq = dist_vec.magnitude_squared();
    let radii_sum = a.radius + b.radius;

    if dist_sq >= radii_sum * radii_sum {
        return None;
    }

    let distance = dist_sq.sqrt();
    let depth = radii_sum - distance;
    let normal = if distance > 1e-10 {
        dist_vec * (1.0 / distance)
    } else {
        coincident_normal(a, b)
    };

    Some(Manifold::new(normal, depth, point_a + normal * (a.radius - depth * 0.5)))
}

/// Fallback normal when the two core segments intersect.
fn coincident_normal(a: &Capsule2, b: &Capsule2) -> Vec2 {
    let centers = b.center() - a.center();
    if centers.magnitude_squared() > 1e-20 {
        return centers.normalize();
    }
    let segment = a.segment();
    if !segment.is_degenerate() {
        return segment.direction().perpendicular().normalize();
    }
    Vec2::UP
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Aabb2;
    const EPSILON: f64 = 1e-9;

    fn aabb(min: (f64, f64), max: (f64, f64)) -> Shape {
        Shape::Aabb(Aabb2::new(Vec2::new(min.0, min.1), Vec2::new(max.0, max.1)))
    }

    fn disc(x: f64, y: f64, r: f64) -> Shape {
        Shape::Disc(Disc2::new(Vec2::new(x, y), r))
    }

    fn assert_vec_eq(actual: Vec2, expected: Vec2) {
        assert!(
            actual.distance(expected) < 1e-6,
            "expected {:?}, got {:?}",
            expected,
            actual
        );
    }

    #[test]
    fn test_aabb_aabb_overlap() {
        let a = aabb((0.0, 0.0), (2.0, 2.0));
        let b = aabb((1.5, 0.5), (3.5, 2.5));
        let m = collide(&a, &b).unwrap();
        assert_vec_eq(m.normal, Vec2::new(1.0, 0.0));
        assert!((m.depth - 0.5).abs() < EPSILON);
        // One corner of each box lies inside the other
        assert_vec_eq(m.contact_point, Vec2::new(1.75, 1.25));
    }

    #[test]
    fn test_aabb_aabb_touching_is_not_overlap() {
        let a = aabb((0.0, 0.0), (1.0, 1.0));
        let b = aabb((1.0, 0.0), (2.0, 1.0));
        assert!(collide(&a, &b).is_none());
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_aabb_aabb_separated() {
        let a = aabb((0.0, 0.0), (1.0, 1.0));
        let b = aabb((3.0, 3.0), (4.0, 4.0));
        assert!(collide(&a, &b).is_none());
    }

    #[test]
    fn test_rotated_box_corner_on_floor() {
        let floor = aabb((-5.0, -1.0), (5.0, 1.0));
        let tilted = Shape::Box(Obb2::new(Vec2::new(0.0, 1.3), Vec2::new(0.5, 0.5), 45.0));
        let m = collide(&floor, &tilted).unwrap();
        let corner_y = 1.3 - 0.5_f64.sqrt();
        assert_vec_eq(m.normal, Vec2::new(0.0, 1.0));
        assert!((m.depth - (1.0 - corner_y)).abs() < 1e-6);
        assert_vec_eq(m.contact_point, Vec2::new(0.0, corner_y));
        // Only the lowest corner sinks into the floor
        assert_eq!(m.points().len(), 1);
        assert!((m.points()[0].depth - (1.0 - corner_y)).abs() < 1e-6);
    }

    #[test]
    fn test_flat_box_on_floor_has_two_points() {
        let floor = aabb((-5.0, -1.0), (5.0, 0.0));
        let resting = Shape::Box(Obb2::new(Vec2::new(0.0, 0.4), Vec2::new(0.5, 0.5), 0.0));
        let m = collide(&floor, &resting).unwrap();
        assert_vec_eq(m.normal, Vec2::new(0.0, 1.0));
        assert_eq!(m.points().len(), 2);
        assert_vec_eq(m.points()[0].position, Vec2::new(-0.5, -0.05));
        assert_vec_eq(m.points()[1].position, Vec2::new(0.5, -0.05));
        for point in m.points() {
            assert!((point.depth - 0.1).abs() < 1e-6);
        }

        // Same points when the floor comes second
        let reversed = collide(&resting, &floor).unwrap();
        assert_vec_eq(reversed.normal, Vec2::new(0.0, -1.0));
        assert_eq!(reversed.points().len(), 2);
        assert_vec_eq(reversed.points()[0].position, Vec2::new(-0.5, -0.05));
    }

    #[test]
    fn test_box_over_ledge_edge_is_clipped() {
        let ledge = aabb((-5.0, 0.0), (0.0, 1.0));
        let block = aabb((-0.2, 0.9), (0.8, 1.9));
        let m = collide(&ledge, &block).unwrap();
        assert_vec_eq(m.normal, Vec2::new(0.0, 1.0));
        assert_eq!(m.points().len(), 2);
        assert_vec_eq(m.points()[0].position, Vec2::new(-0.2, 0.95));
        assert_vec_eq(m.points()[1].position, Vec2::new(0.0, 0.95));
    }

    #[test]
    fn test_box_box_reversed_flips_normal() {
        let a = Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(1.0, 1.0), 30.0));
        let b = Shape::Box(Obb2::new(Vec2::new(1.5, 0.2), Vec2::new(1.0, 1.0), 0.0));
        let ab = collide(&a, &b).unwrap();
        let ba = collide(&b, &a).unwrap();
        assert!((ab.depth - ba.depth).abs() < 1e-6);
        assert!(ab.normal.x > 0.0);
        assert!(ba.normal.x < 0.0);
    }

    #[test]
    fn test_box_disc_face_contact() {
        let b = aabb((-1.0, -1.0), (1.0, 1.0));
        let d = disc(0.0, 1.9, 1.0);
        let m = collide(&b, &d).unwrap();
        assert_vec_eq(m.normal, Vec2::new(0.0, 1.0));
        assert!((m.depth - 0.1).abs() < 1e-6);
        assert_vec_eq(m.contact_point, Vec2::new(0.0, 0.95));

        let reversed = collide(&d, &b).unwrap();
        assert_vec_eq(reversed.normal, Vec2::new(0.0, -1.0));
        assert!((reversed.depth - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_aabb_disc_corner_contact_uses_vertex_axis() {
        let b = aabb((0.0, 0.0), (1.0, 1.0));
        let d = disc(1.5, 1.5, 1.0);
        let m = collide(&b, &d).unwrap();
        let diag = 0.5_f64.sqrt();
        assert_vec_eq(m.normal, Vec2::new(diag, diag));
        assert!((m.depth - (1.0 - diag)).abs() < 1e-6);
    }

    #[test]
    fn test_box_disc_separated_near_corner() {
        // Inside the face slabs' reach but outside the rounded corner
        let b = Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(1.0, 1.0), 0.0));
        let d = disc(1.8, 1.8, 1.0);
        assert!(collide(&b, &d).is_none());
        assert!(collide(&d, &b).is_none());
    }

    #[test]
    fn test_box_capsule_lying_flat() {
        let b = Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(2.0, 1.0), 0.0));
        let c = Shape::Capsule(Capsule2::new(Vec2::new(-1.0, 1.3), Vec2::new(1.0, 1.3), 0.5));
        let m = collide(&b, &c).unwrap();
        assert_vec_eq(m.normal, Vec2::new(0.0, 1.0));
        assert!((m.depth - 0.2).abs() < 1e-6);
        assert_vec_eq(m.contact_point, Vec2::new(0.0, 0.9));
        assert_eq!(m.points().len(), 2);
        assert_vec_eq(m.points()[0].position, Vec2::new(-1.0, 0.9));
        assert_vec_eq(m.points()[1].position, Vec2::new(1.0, 0.9));

        let reversed = collide(&c, &b).unwrap();
        assert_vec_eq(reversed.normal, Vec2::new(0.0, -1.0));
        assert_eq!(reversed.points().len(), 2);
    }

    #[test]
    fn test_box_capsule_overhang_is_clipped_to_face() {
        let b = Shape::Box(Obb2::new(Vec2::ZERO, Vec2::new(1.0, 1.0), 0.0));
        let c = Shape::Capsule(Capsule2::new(Vec2::new(0.0, 1.3), Vec2::new(3.0, 1.3), 0.5));
        let m = collide(&b, &c).unwrap();
        assert_vec_eq(m.normal, Vec2::new(0.0, 1.0));
        assert!((m.depth - 0.2).abs() < 1e-6);
        assert_eq!(m.points().len(), 2);
        assert_vec_eq(m.points()[0].position, Vec2::new(0.0, 0.9));
        assert_vec_eq(m.points()[1].position, Vec2::new(1.0, 0.9));
    }

    #[test]
    fn test_box_capsule_endpoint_contact() {
        // Capsule standing upright on the box, lower cap dipping in
        let b = aabb((-2.0, -1.0), (2.0, 1.0));
        let c = Shape::Capsule(Capsule2::new(Vec2::new(0.0, 3.0), Vec2::new(0.0, 1.25), 0.5));
        let m = collide(&b, &c).unwrap();
        assert_vec_eq(m.normal, Vec2::new(0.0, 1.0));
        assert!((m.depth - 0.25).abs() < 1e-6);
        assert_vec_eq(m.contact_point, Vec2::new(0.0, 0.875));
        assert_eq!(m.points().len(), 1);
        assert_vec_eq(m.points()[0].position, Vec2::new(0.0, 0.875));
    }

    #[test]
    fn test_disc_disc_colliding() {
        let a = disc(0.0, 0.0, 1.0);
        let b = disc(1.5, 0.0, 1.0);
        let m = collide(&a, &b).unwrap();
        assert_vec_eq(m.normal, Vec2::new(1.0, 0.0));
        assert!((m.depth - 0.5).abs() < EPSILON);
        assert_vec_eq(m.contact_point, Vec2::new(0.75, 0.0));
    }

    #[test]
    fn test_disc_disc_touching() {
        assert!(collide(&disc(0.0, 0.0, 1.0), &disc(2.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_disc_disc_concentric() {
        let m = collide(&disc(0.0, 0.0, 2.0), &disc(0.0, 0.0, 1.0)).unwrap();
        assert!((m.depth - 3.0).abs() < EPSILON);
        // Arbitrary but stable fallback
        assert_vec_eq(m.normal, Vec2::UP);
    }

    #[test]
    fn test_capsule_capsule_crossing() {
        let a = Shape::Capsule(Capsule2::new(Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0), 0.5));
        let b = Shape::Capsule(Capsule2::new(Vec2::new(0.0, 0.8), Vec2::new(0.0, 3.0), 0.5));
        let m = collide(&a, &b).unwrap();
        assert_vec_eq(m.normal, Vec2::new(0.0, 1.0));
        assert!((m.depth - 0.2).abs() < EPSILON);
        assert_vec_eq(m.contact_point, Vec2::new(0.0, 0.4));
    }

    #[test]
    fn test_capsule_disc_both_orders() {
        let c = Shape::Capsule(Capsule2::new(Vec2::new(-2.0, 0.0), Vec2::new(2.0, 0.0), 0.5));
        let d = disc(1.0, -1.0, 0.75);
        let cd = collide(&c, &d).unwrap();
        let dc = collide(&d, &c).unwrap();
        assert_vec_eq(cd.normal, Vec2::new(0.0, -1.0));
        assert_vec_eq(dc.normal, Vec2::new(0.0, 1.0));
        assert!((cd.depth - 0.25).abs() < EPSILON);
        assert!((dc.depth - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_every_pair_detects_deep_overlap() {
        let shapes = [
            aabb((-1.0, -1.0), (1.0, 1.0)),
            Shape::Box(Obb2::new(Vec2::new(0.2, 0.0), Vec2::new(1.0, 0.5), 20.0)),
            disc(0.1, 0.3, 0.8),
            Shape::Capsule(Capsule2::new(Vec2::new(-0.5, 0.0), Vec2::new(0.5, 0.4), 0.3)),
        ];
        for a in &shapes {
            for b in &shapes {
                let m = collide(a, b);
                assert!(m.is_some(), "{:?} vs {:?}", a.collider_type(), b.collider_type());
                let m = m.unwrap();
                assert!(m.depth > 0.0);
                assert!((m.normal.magnitude() - 1.0).abs() < 1e-6);
            }
        }
    }
}
