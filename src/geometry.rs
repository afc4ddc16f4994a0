//! Tessellation of the three primitive shapes used by the scene.
//!
//! The layouts follow the conventions of the classic browser 3D libraries so that the scene looks
//! the same: planes lie in the XY plane facing +Z, boxes get four vertices per face with flat
//! normals, and spheres are UV spheres built ring by ring from the north pole. All triangles wind
//! counter-clockwise when seen from the outside.

use std::f32::consts::PI;

use crate::vertex::Vertex;

/// Shape description attached to a [`crate::scene::Mesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Plane {
        width: f32,
        height: f32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
}

/// CPU-side vertex and index data ready to be uploaded.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Geometry {
    pub fn tessellate(&self) -> MeshData {
        match *self {
            Geometry::Plane { width, height } => plane(width, height),
            Geometry::Box {
                width,
                height,
                depth,
            } => cuboid(width, height, depth),
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments.max(3), height_segments.max(2)),
        }
    }
}

fn plane(width: f32, height: f32) -> MeshData {
    let (hw, hh) = (width / 2.0, height / 2.0);
    let normal = [0.0, 0.0, 1.0];

    // Row-major from the top-left corner, matching a 1x1 segment grid.
    let vertices = vec![
        Vertex::new([-hw, hh, 0.0], normal),
        Vertex::new([hw, hh, 0.0], normal),
        Vertex::new([-hw, -hh, 0.0], normal),
        Vertex::new([hw, -hh, 0.0], normal),
    ];

    // a = top-left, b = bottom-left, c = bottom-right, d = top-right
    let (a, b, c, d) = (0, 2, 3, 1);
    MeshData {
        vertices,
        indices: vec![a, b, d, b, c, d],
    }
}

fn cuboid(width: f32, height: f32, depth: f32) -> MeshData {
    let half = [width / 2.0, height / 2.0, depth / 2.0];

    // (normal, u, v) with u x v == normal so that the quad winds counter-clockwise from outside.
    let faces: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];

    let mut data = MeshData::default();
    for (normal, u, v) in faces {
        let base = data.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = std::array::from_fn(|axis| {
                (normal[axis] + su * u[axis] + sv * v[axis]) * half[axis]
            });
            data.vertices.push(Vertex::new(position, normal));
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    data
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut data = MeshData::default();
    let row = width_segments + 1;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let position = [
                -radius * (u * 2.0 * PI).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * 2.0 * PI).sin() * (v * PI).sin(),
            ];
            let normal = position.map(|c| c / radius);
            data.vertices.push(Vertex::new(position, normal));
        }
    }

    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // The pole rows collapse to a point, so each contributes only one triangle per segment.
            if iy != 0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn dot(a: [f32; 3], b: [f32; 3]) -> f32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Every triangle's geometric normal must agree with its vertex normal.
    fn assert_outward_winding(data: &MeshData) {
        for tri in data.indices.chunks(3) {
            let [p0, p1, p2] = [0, 1, 2].map(|i| data.vertices[tri[i] as usize].position);
            let face = cross(sub(p1, p0), sub(p2, p0));
            if length(face) < 1e-6 {
                continue;
            }
            let n = data.vertices[tri[0] as usize].normal;
            assert!(dot(face, n) > 0.0, "triangle {tri:?} winds inward");
        }
    }

    #[test]
    fn plane_counts_and_extent() {
        let data = Geometry::Plane {
            width: 60.0,
            height: 20.0,
        }
        .tessellate();
        assert_eq!(data.vertices.len(), 4);
        assert_eq!(data.indices.len(), 6);
        let max_x = data
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_x, 30.0);
        assert_outward_winding(&data);
    }

    #[test]
    fn box_has_flat_faces() {
        let data = Geometry::Box {
            width: 4.0,
            height: 4.0,
            depth: 4.0,
        }
        .tessellate();
        assert_eq!(data.vertices.len(), 24);
        assert_eq!(data.indices.len(), 36);
        for vertex in &data.vertices {
            assert!(vertex.position.iter().all(|c| c.abs() == 2.0));
            assert_eq!(length(vertex.normal), 1.0);
        }
        assert_outward_winding(&data);
    }

    #[test]
    fn sphere_counts_match_segments() {
        let data = Geometry::Sphere {
            radius: 4.0,
            width_segments: 20,
            height_segments: 20,
        }
        .tessellate();
        assert_eq!(data.vertices.len(), 21 * 21);
        assert_eq!(data.indices.len(), 6 * 20 * 19);
        assert!(data
            .indices
            .iter()
            .all(|&i| (i as usize) < data.vertices.len()));
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let data = Geometry::Sphere {
            radius: 4.0,
            width_segments: 20,
            height_segments: 20,
        }
        .tessellate();
        for vertex in &data.vertices {
            assert!((length(vertex.position) - 4.0).abs() < 1e-4);
            assert!((length(vertex.normal) - 1.0).abs() < 1e-5);
        }
        assert_outward_winding(&data);
    }
}
