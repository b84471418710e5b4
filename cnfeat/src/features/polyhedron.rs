//! Coordination polyhedron, defined as the convex hull of the neighbors
//! positions around a central site.
//!
//! Coordination shells are small (rarely more than 20 neighbors), so the hull
//! is built by checking every triple of neighbors for a supporting plane,
//! merging coplanar triples into a single face.

use std::collections::BTreeSet;

use crate::Vector3D;

/// A single face of the polyhedron
#[derive(Debug, Clone)]
struct Face {
    /// Outward unit normal
    normal: Vector3D,
    /// Signed distance from the central site to the face plane, positive
    /// when the central site is inside the polyhedron
    offset: f64,
    /// Indexes of the corners of this face, sorted around the face
    vertices: Vec<usize>,
}

/// Convex coordination polyhedron around a central site, placed at the origin.
#[derive(Debug, Clone)]
pub struct Polyhedron {
    vertices: Vec<Vector3D>,
    faces: Vec<Face>,
}

impl Polyhedron {
    /// Build the convex hull of the given `vertices`, expressed relative to
    /// the central site. This returns `None` if there are less than four
    /// vertices, or if they are all coplanar.
    pub fn new(vertices: &[Vector3D]) -> Option<Polyhedron> {
        if vertices.len() < 4 {
            return None;
        }

        let scale = vertices.iter().map(|v| v.norm()).fold(0.0, f64::max);
        if scale == 0.0 {
            return None;
        }
        let tolerance = 1e-6 * scale;

        let mut faces: Vec<Face> = Vec::new();
        for i in 0..vertices.len() {
            for j in (i + 1)..vertices.len() {
                for k in (j + 1)..vertices.len() {
                    let normal = (vertices[j] - vertices[i]) ^ (vertices[k] - vertices[i]);
                    if normal.norm() <= tolerance * scale {
                        // collinear vertices
                        continue;
                    }

                    let mut normal = normal.normalized();
                    let mut offset = normal * vertices[i];

                    let (below, above) = signed_extent(vertices, normal, offset);
                    if above <= tolerance {
                        // all vertices are below the plane, nothing to do
                    } else if below >= -tolerance {
                        normal = -normal;
                        offset = -offset;
                    } else {
                        // vertices on both sides, this is not a face
                        continue;
                    }

                    let known = faces.iter().any(|face| {
                        face.normal * normal > 1.0 - 1e-6 && f64::abs(face.offset - offset) <= tolerance
                    });
                    if known {
                        continue;
                    }

                    let on_plane = (0..vertices.len())
                        .filter(|&v| f64::abs(normal * vertices[v] - offset) <= tolerance)
                        .collect();

                    faces.push(Face {
                        normal: normal,
                        offset: offset,
                        vertices: face_corners(vertices, normal, on_plane, tolerance * scale),
                    });
                }
            }
        }

        // coplanar vertices give a single face
        if faces.len() < 4 {
            return None;
        }

        return Some(Polyhedron {
            vertices: vertices.to_vec(),
            faces: faces,
        });
    }

    /// Get the number of faces of this polyhedron. Coplanar triangles are
    /// counted as a single face.
    pub fn faces(&self) -> usize {
        self.faces.len()
    }

    /// Get the number of edges of this polyhedron
    pub fn edges(&self) -> usize {
        let mut edges = BTreeSet::new();
        for face in &self.faces {
            let n_vertices = face.vertices.len();
            for (i, &first) in face.vertices.iter().enumerate() {
                let second = face.vertices[(i + 1) % n_vertices];
                edges.insert((usize::min(first, second), usize::max(first, second)));
            }
        }
        return edges.len();
    }

    /// Get the volume of this polyhedron
    pub fn volume(&self) -> f64 {
        // sum of the pyramids joining the central site to each face, the
        // signed offset takes care of a central site outside the polyhedron
        let mut volume = 0.0;
        for face in &self.faces {
            volume += self.face_area(face) * face.offset / 3.0;
        }
        return volume;
    }

    /// Get the radius of the largest sphere centered on the central site and
    /// contained in this polyhedron, i.e. the distance to the closest face.
    /// This is zero if the central site is outside the polyhedron.
    pub fn inscribed_radius(&self) -> f64 {
        let closest = self.faces.iter().map(|face| face.offset).fold(f64::INFINITY, f64::min);
        return f64::max(closest, 0.0);
    }

    fn face_area(&self, face: &Face) -> f64 {
        let origin = self.vertices[face.vertices[0]];
        let mut area = 0.0;
        for pair in face.vertices[1..].windows(2) {
            let first = self.vertices[pair[0]] - origin;
            let second = self.vertices[pair[1]] - origin;
            area += (first ^ second) * face.normal;
        }
        return 0.5 * f64::abs(area);
    }
}

/// Get the smallest and largest signed distance of `vertices` to the plane
/// defined by `normal` and `offset`.
fn signed_extent(vertices: &[Vector3D], normal: Vector3D, offset: f64) -> (f64, f64) {
    let mut below = f64::INFINITY;
    let mut above = f64::NEG_INFINITY;
    for vertex in vertices {
        let distance = normal * vertex - offset;
        below = f64::min(below, distance);
        above = f64::max(above, distance);
    }
    return (below, above);
}

/// Get the corners of the face made of the vertices at `indexes`, all lying
/// on a plane with the given `normal`, sorted counter-clockwise around the
/// normal. Vertices inside the face or on one of its sides are not corners,
/// and are removed.
fn face_corners(vertices: &[Vector3D], normal: Vector3D, indexes: Vec<usize>, tolerance: f64) -> Vec<usize> {
    let origin = vertices[indexes[0]];
    let farthest = indexes.iter()
        .map(|&i| vertices[i] - origin)
        .fold(Vector3D::zero(), |farthest, delta| if delta.norm2() > farthest.norm2() { delta } else { farthest });

    // in-plane basis, right-handed around the normal
    let u = farthest.normalized();
    let w = normal ^ u;

    let mut points = indexes.into_iter().map(|i| {
        let delta = vertices[i] - origin;
        ([delta * u, delta * w], i)
    }).collect::<Vec<_>>();
    points.sort_by(|a, b| {
        a.0[0].total_cmp(&b.0[0])
            .then(a.0[1].total_cmp(&b.0[1]))
            .then(a.1.cmp(&b.1))
    });

    // Andrew's monotone chain, dropping points which do not make a strict
    // left turn
    let mut lower: Vec<([f64; 2], usize)> = Vec::new();
    for &point in &points {
        while lower.len() >= 2 && turn(lower[lower.len() - 2].0, lower[lower.len() - 1].0, point.0) <= tolerance {
            lower.pop();
        }
        lower.push(point);
    }

    let mut upper: Vec<([f64; 2], usize)> = Vec::new();
    for &point in points.iter().rev() {
        while upper.len() >= 2 && turn(upper[upper.len() - 2].0, upper[upper.len() - 1].0, point.0) <= tolerance {
            upper.pop();
        }
        upper.push(point);
    }

    lower.pop();
    upper.pop();
    return lower.into_iter().chain(upper).map(|(_, i)| i).collect();
}

/// Twice the signed area of the triangle `origin`, `first`, `second`;
/// positive for a counter-clockwise turn.
fn turn(origin: [f64; 2], first: [f64; 2], second: [f64; 2]) -> f64 {
    (first[0] - origin[0]) * (second[1] - origin[1]) - (first[1] - origin[1]) * (second[0] - origin[0])
}
