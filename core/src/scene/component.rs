use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

#[derive(Pod, Zeroable, Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    #[inline]
    const fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle list kept on the CPU. A backend uploads it on draw.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Geometry {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

/// Corner positions and unscaled uv of one quad, in the order the indices
/// expect.
type Face = ([Vec3; 4], Vec3, [Vec2; 4]);

const BOX_FACES: [Face; 6] = {
    let (n, p) = (-1., 1.);
    [
        // Front
        (
            [
                Vec3::new(n, p, n),
                Vec3::new(n, n, n),
                Vec3::new(p, n, n),
                Vec3::new(p, p, n),
            ],
            Vec3::NEG_Z,
            [
                Vec2::new(1., 1.),
                Vec2::new(1., 0.),
                Vec2::new(0., 0.),
                Vec2::new(0., 1.),
            ],
        ),
        // Back
        (
            [
                Vec3::new(n, p, p),
                Vec3::new(p, p, p),
                Vec3::new(p, n, p),
                Vec3::new(n, n, p),
            ],
            Vec3::Z,
            [
                Vec2::new(-1., 1.),
                Vec2::new(0., 1.),
                Vec2::new(0., 0.),
                Vec2::new(-1., 0.),
            ],
        ),
        // Left
        (
            [
                Vec3::new(n, p, n),
                Vec3::new(n, p, p),
                Vec3::new(n, n, p),
                Vec3::new(n, n, n),
            ],
            Vec3::NEG_X,
            [
                Vec2::new(-1., 1.),
                Vec2::new(0., 1.),
                Vec2::new(0., 0.),
                Vec2::new(-1., 0.),
            ],
        ),
        // Right
        (
            [
                Vec3::new(p, n, n),
                Vec3::new(p, n, p),
                Vec3::new(p, p, p),
                Vec3::new(p, p, n),
            ],
            Vec3::X,
            [
                Vec2::new(1., 0.),
                Vec2::new(0., 0.),
                Vec2::new(0., 1.),
                Vec2::new(1., 1.),
            ],
        ),
        // Up
        (
            [
                Vec3::new(n, p, n),
                Vec3::new(p, p, n),
                Vec3::new(p, p, p),
                Vec3::new(n, p, p),
            ],
            Vec3::Y,
            [
                Vec2::new(1., 0.),
                Vec2::new(0., 0.),
                Vec2::new(0., 1.),
                Vec2::new(1., 1.),
            ],
        ),
        // Down
        (
            [
                Vec3::new(n, n, p),
                Vec3::new(p, n, p),
                Vec3::new(p, n, n),
                Vec3::new(n, n, n),
            ],
            Vec3::NEG_Y,
            [
                Vec2::new(-1., 1.),
                Vec2::new(0., 1.),
                Vec2::new(0., 0.),
                Vec2::new(-1., 0.),
            ],
        ),
    ]
};

const PLANE_FACES: [Face; 2] = {
    let (n, p) = (-1., 1.);
    [
        (
            [
                Vec3::new(n, 0., n),
                Vec3::new(p, 0., n),
                Vec3::new(p, 0., p),
                Vec3::new(n, 0., p),
            ],
            Vec3::Y,
            [
                Vec2::new(1., 0.),
                Vec2::new(0., 0.),
                Vec2::new(0., 1.),
                Vec2::new(1., 1.),
            ],
        ),
        (
            [
                Vec3::new(n, 0., p),
                Vec3::new(p, 0., p),
                Vec3::new(p, 0., n),
                Vec3::new(n, 0., n),
            ],
            Vec3::NEG_Y,
            [
                Vec2::new(1., 1.),
                Vec2::new(0., 1.),
                Vec2::new(0., 0.),
                Vec2::new(1., 0.),
            ],
        ),
    ]
};

/// The front face winds `0 1 2, 2 3 0`, the rest `0 1 2, 0 2 3`. Both cover
/// the same quad.
const BOX_QUAD_INDICES: [[u32; 6]; 6] = [
    [0, 1, 2, 2, 3, 0],
    [0, 1, 2, 0, 2, 3],
    [0, 1, 2, 0, 2, 3],
    [0, 1, 2, 0, 2, 3],
    [0, 1, 2, 0, 2, 3],
    [0, 1, 2, 0, 2, 3],
];

fn build_quads(faces: &[Face], quad_indices: impl Fn(usize) -> [u32; 6], uv: Vec2) -> Geometry {
    let mut geometry = Geometry {
        vertices: Vec::with_capacity(faces.len() * 4),
        indices: Vec::with_capacity(faces.len() * 6),
    };

    for (face_index, (corners, normal, tex)) in faces.iter().enumerate() {
        let base = geometry.vertices.len() as u32;
        geometry.vertices.extend(
            corners
                .iter()
                .zip(tex)
                .map(|(&corner, &t)| Vertex::new(corner, *normal, t * uv)),
        );
        geometry
            .indices
            .extend(quad_indices(face_index).iter().map(|i| base + i));
    }

    geometry
}

impl Geometry {
    /// Cube spanning `-1..1` on every axis, 4 vertices per face.
    pub fn cube(uv: Vec2) -> Self {
        build_quads(&BOX_FACES, |face| BOX_QUAD_INDICES[face], uv)
    }

    /// Double sided square on the `y = 0` plane spanning `-1..1`.
    pub fn plane(uv: Vec2) -> Self {
        build_quads(&PLANE_FACES, |_| [0, 1, 2, 0, 2, 3], uv)
    }

    pub fn triangle(a: Vec3, b: Vec3, c: Vec3, uv: Vec2) -> Self {
        let normal = (b - a).cross(c - a).normalize_or_zero();
        Self {
            vertices: vec![
                Vertex::new(a, normal, Vec2::new(uv.x, 0.)),
                Vertex::new(b, normal, Vec2::ZERO),
                Vertex::new(c, normal, uv),
            ],
            indices: vec![0, 1, 2],
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Raw vertex bytes, laid out as `position, normal, uv`.
    #[inline]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
