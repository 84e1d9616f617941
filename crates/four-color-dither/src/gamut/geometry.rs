//! Tetrahedron geometry for the projection gamut mappings.
//!
//! Stateless free functions over `[f64; 3]` points. The same code runs in
//! normalized RGB and in Lab; only the vertex coordinates differ.

/// A point or vector in the working space.
pub type Vec3 = [f64; 3];

/// Inside test tolerance on the signed face distance.
pub const INSIDE_EPSILON: f64 = 1e-10;

const NORMAL_EPSILON: f64 = 1e-12;
const DENOM_EPSILON: f64 = 1e-30;
const BARY_EPSILON: f64 = 1e-8;

/// Vertex indices of each face, followed by the opposite vertex.
const FACE_INDICES: [[usize; 4]; 4] = [[1, 2, 3, 0], [0, 3, 2, 1], [0, 1, 3, 2], [0, 2, 1, 3]];

#[inline]
pub(crate) fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub(crate) fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub(crate) fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub(crate) fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub(crate) fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub(crate) fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// One triangular face with its outward unit normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// The three corners
    pub vertices: [Vec3; 3],
    /// Outward normal (unit length unless the face is degenerate)
    pub normal: Vec3,
}

/// The solid spanned by the four palette colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tetrahedron {
    vertices: [Vec3; 4],
    faces: [Face; 4],
}

impl Tetrahedron {
    /// Build the four faces with normals pointing away from the opposite
    /// vertex.
    pub fn new(vertices: [Vec3; 4]) -> Self {
        let faces = FACE_INDICES.map(|[a, b, c, opp]| {
            let (v0, v1, v2) = (vertices[a], vertices[b], vertices[c]);
            let mut n = cross(sub(v1, v0), sub(v2, v0));
            let len = norm(n);
            if len > NORMAL_EPSILON {
                n = scale(n, 1.0 / len);
            }
            if dot(n, sub(vertices[opp], v0)) > 0.0 {
                n = scale(n, -1.0);
            }
            Face {
                vertices: [v0, v1, v2],
                normal: n,
            }
        });
        Self { vertices, faces }
    }

    /// The four corners, in palette order.
    pub fn vertices(&self) -> &[Vec3; 4] {
        &self.vertices
    }

    /// The four faces.
    pub fn faces(&self) -> &[Face; 4] {
        &self.faces
    }

    /// Mean of the four vertices.
    pub fn centroid(&self) -> Vec3 {
        let sum = self.vertices.iter().fold([0.0; 3], |acc, &v| add(acc, v));
        scale(sum, 0.25)
    }

    /// True if `p` is inside or on the boundary (within [`INSIDE_EPSILON`]).
    pub fn contains(&self, p: Vec3) -> bool {
        self.faces
            .iter()
            .all(|f| dot(sub(p, f.vertices[0]), f.normal) <= INSIDE_EPSILON)
    }

    /// Nearest point on the surface: minimum over the four faces.
    pub fn project_to_surface(&self, p: Vec3) -> Vec3 {
        let mut best = p;
        let mut best_dist = f64::INFINITY;
        for f in &self.faces {
            let [a, b, c] = f.vertices;
            let q = closest_point_on_triangle(p, a, b, c);
            let d = sub(p, q);
            let dist = dot(d, d);
            if dist < best_dist {
                best_dist = dist;
                best = q;
            }
        }
        best
    }

    /// Clip `p` along the ray from the centroid through `p`.
    ///
    /// Keeps the nearest face hit with positive ray parameter and
    /// barycentric coordinates inside the triangle. A degenerate ray or
    /// no hit at all falls back to [`project_to_surface`](Self::project_to_surface).
    pub fn clip_via_centroid(&self, p: Vec3) -> Vec3 {
        let origin = self.centroid();
        let dir = sub(p, origin);
        let len = norm(dir);
        if len < NORMAL_EPSILON {
            return self.project_to_surface(p);
        }
        let dir = scale(dir, 1.0 / len);

        let mut best_t = f64::INFINITY;
        let mut best = None;
        for f in &self.faces {
            let [v0, v1, v2] = f.vertices;
            let denom = dot(dir, f.normal);
            if denom.abs() <= NORMAL_EPSILON {
                continue;
            }
            let t = dot(sub(v0, origin), f.normal) / denom;
            if t <= INSIDE_EPSILON {
                continue;
            }
            let hit = add(origin, scale(dir, t));

            let e1 = sub(v1, v0);
            let e2 = sub(v2, v0);
            let h = sub(hit, v0);
            let (d11, d12, d22) = (dot(e1, e1), dot(e1, e2), dot(e2, e2));
            let (dh1, dh2) = (dot(h, e1), dot(h, e2));
            let det = d11 * d22 - d12 * d12;
            if det.abs() < DENOM_EPSILON {
                continue;
            }
            let u = (d22 * dh1 - d12 * dh2) / det;
            let v = (d11 * dh2 - d12 * dh1) / det;

            let in_triangle = u >= -BARY_EPSILON && v >= -BARY_EPSILON && u + v <= 1.0 + BARY_EPSILON;
            if in_triangle && t < best_t {
                best_t = t;
                best = Some(hit);
            }
        }

        match best {
            Some(hit) => hit,
            None => self.project_to_surface(p),
        }
    }
}

/// Closest point to `p` on triangle `abc`.
///
/// Classifies `p` into the vertex, edge or interior Voronoi region of the
/// triangle (Ericson, *Real-Time Collision Detection*, 5.1.5).
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = sub(b, a);
    let ac = sub(c, a);

    let ap = sub(p, a);
    let d1 = dot(ap, ab);
    let d2 = dot(ap, ac);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = sub(p, b);
    let d3 = dot(bp, ab);
    let d4 = dot(bp, ac);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let s = safe_ratio(d1, d1 - d3, 0.0);
        return add(a, scale(ab, s));
    }

    let cp = sub(p, c);
    let d5 = dot(cp, ab);
    let d6 = dot(cp, ac);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let s = safe_ratio(d2, d2 - d6, 0.0);
        return add(a, scale(ac, s));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && d4 - d3 >= 0.0 && d5 - d6 >= 0.0 {
        let s = safe_ratio(d4 - d3, (d4 - d3) + (d5 - d6), 0.0);
        return add(b, scale(sub(c, b), s));
    }

    let denom = va + vb + vc;
    let denom = if denom.abs() > DENOM_EPSILON { denom } else { 1.0 };
    add(a, add(scale(ab, vb / denom), scale(ac, vc / denom)))
}

#[inline]
fn safe_ratio(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() > DENOM_EPSILON {
        num / den
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn unit_simplex() -> Tetrahedron {
        Tetrahedron::new([
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
        ])
    }

    fn eink_rgb() -> Tetrahedron {
        Tetrahedron::new([
            [1.0, 1.0, 1.0],
            [0.0, 0.0, 0.0],
            [200.0 / 255.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
        ])
    }

    #[test]
    fn test_normals_point_outward() {
        for tet in [unit_simplex(), eink_rgb()] {
            for (f, idx) in tet.faces().iter().zip(FACE_INDICES) {
                let to_opp = sub(tet.vertices()[idx[3]], f.vertices[0]);
                assert!(dot(f.normal, to_opp) < 0.0, "normal must face away from the opposite vertex");
                assert!((norm(f.normal) - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_cross_matches_nalgebra() {
        let a = [0.3, -1.2, 2.5];
        let b = [1.7, 0.4, -0.9];
        let ours = cross(a, b);
        let theirs = Vector3::from(a).cross(&Vector3::from(b));
        for i in 0..3 {
            assert!((ours[i] - theirs[i]).abs() < 1e-12);
        }
        assert!((dot(a, b) - Vector3::from(a).dot(&Vector3::from(b))).abs() < 1e-12);
    }

    #[test]
    fn test_vertices_are_inside() {
        for tet in [unit_simplex(), eink_rgb()] {
            for &v in tet.vertices() {
                assert!(tet.contains(v), "vertex {v:?} must test inside");
            }
            assert!(tet.contains(tet.centroid()));
        }
    }

    #[test]
    fn test_outside_point_detected() {
        let tet = unit_simplex();
        assert!(!tet.contains([1.0, 1.0, 1.0]));
        assert!(!tet.contains([-0.1, 0.2, 0.2]));
        assert!(tet.contains([0.1, 0.1, 0.1]));
    }

    #[test]
    fn test_closest_point_regions() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.0, 0.0, 0.0];
        let c = [0.0, 1.0, 0.0];
        // Vertex regions
        assert_eq!(closest_point_on_triangle([-1.0, -1.0, 0.5], a, b, c), a);
        assert_eq!(closest_point_on_triangle([2.0, -0.5, 0.0], a, b, c), b);
        assert_eq!(closest_point_on_triangle([-0.5, 2.0, 0.0], a, b, c), c);
        // Edge regions
        assert_eq!(closest_point_on_triangle([0.5, -1.0, 0.0], a, b, c), [0.5, 0.0, 0.0]);
        assert_eq!(closest_point_on_triangle([-1.0, 0.25, 0.0], a, b, c), [0.0, 0.25, 0.0]);
        let bc = closest_point_on_triangle([1.0, 1.0, 0.0], a, b, c);
        assert!((bc[0] - 0.5).abs() < 1e-12 && (bc[1] - 0.5).abs() < 1e-12);
        // Interior
        let q = closest_point_on_triangle([0.2, 0.3, 5.0], a, b, c);
        assert!((q[0] - 0.2).abs() < 1e-12 && (q[1] - 0.3).abs() < 1e-12 && q[2].abs() < 1e-12);
    }

    #[test]
    fn test_projection_lands_on_surface() {
        let tet = eink_rgb();
        for p in [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.2, 0.6, 0.9], [1.0, 0.0, 1.0]] {
            assert!(!tet.contains(p));
            let q = tet.project_to_surface(p);
            assert!(tet.contains(q), "projection {q:?} of {p:?} must be inside");
        }
    }

    #[test]
    fn test_centroid_clip_lands_on_surface() {
        let tet = eink_rgb();
        for p in [[0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.2, 0.6, 0.9], [1.0, 0.0, 1.0]] {
            let q = tet.clip_via_centroid(p);
            assert!(tet.contains(q), "clip {q:?} of {p:?} must be inside");
            // The hit lies on the segment from the centroid to p
            let c = tet.centroid();
            let along = cross(sub(q, c), sub(p, c));
            assert!(norm(along) < 1e-9, "clip must stay on the centroid ray");
        }
    }

    #[test]
    fn test_centroid_clip_degenerate_ray_falls_back() {
        let tet = unit_simplex();
        let c = tet.centroid();
        // A point on the centroid has no direction; fallback is surface projection
        assert_eq!(tet.clip_via_centroid(c), tet.project_to_surface(c));
    }
}
