// geometry.rs - Subdivided unit plane
//
// Vertices are interleaved [x, y, z, u, v], row by row from the top edge.
// The plane is subdivided so the vertex shader can bend it smoothly.

pub const STRIDE: usize = 5;

pub struct PlaneGeometry {
    pub vertices: Vec<f32>,
    pub indices: Vec<u16>,
}

impl PlaneGeometry {
    pub fn new(width: f32, height: f32, segments_x: u32, segments_y: u32) -> Self {
        let gx = segments_x as usize;
        let gy = segments_y as usize;
        let (hw, hh) = (width / 2.0, height / 2.0);
        let (sw, sh) = (width / segments_x as f32, height / segments_y as f32);

        let mut vertices = Vec::with_capacity((gx + 1) * (gy + 1) * STRIDE);
        for iy in 0..=gy {
            let y = iy as f32 * sh - hh;
            for ix in 0..=gx {
                let x = ix as f32 * sw - hw;
                vertices.extend_from_slice(&[
                    x,
                    -y,
                    0.0,
                    ix as f32 / segments_x as f32,
                    1.0 - iy as f32 / segments_y as f32,
                ]);
            }
        }

        let row = gx + 1;
        let mut indices = Vec::with_capacity(gx * gy * 6);
        for iy in 0..gy {
            for ix in 0..gx {
                let a = (ix + row * iy) as u16;
                let b = (ix + row * (iy + 1)) as u16;
                let c = (ix + 1 + row * (iy + 1)) as u16;
                let d = (ix + 1 + row * iy) as u16;
                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        Self { vertices, indices }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / STRIDE
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_match_subdivision() {
        let g = PlaneGeometry::new(1.0, 1.0, 100, 100);
        assert_eq!(g.vertex_count(), 101 * 101);
        assert_eq!(g.index_count(), 100 * 100 * 6);
        let max = *g.indices.iter().max().unwrap() as usize;
        assert_eq!(max, g.vertex_count() - 1);
    }

    #[test]
    fn corners_and_uvs() {
        let g = PlaneGeometry::new(1.0, 1.0, 2, 2);
        let v = |i: usize| &g.vertices[i * STRIDE..(i + 1) * STRIDE];
        // top-left
        assert_eq!(v(0), &[-0.5f32, 0.5, 0.0, 0.0, 1.0][..]);
        // centre
        assert_eq!(v(4), &[0.0f32, 0.0, 0.0, 0.5, 0.5][..]);
        // bottom-right
        assert_eq!(v(8), &[0.5f32, -0.5, 0.0, 1.0, 0.0][..]);
    }

    #[test]
    fn triangles_wind_counter_clockwise() {
        let g = PlaneGeometry::new(1.0, 1.0, 1, 1);
        for tri in g.indices.chunks(3) {
            let p = |i: u16| {
                let o = i as usize * STRIDE;
                (g.vertices[o], g.vertices[o + 1])
            };
            let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
            let cross = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
            assert!(cross > 0.0);
        }
    }
}
